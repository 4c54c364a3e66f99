use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by an erased route handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

type HandlerFn<C> = dyn Fn(Arc<C>, Request) -> HandlerFuture + Send + Sync;

/// Reference to the controller method a route was declared on.
///
/// The instance is supplied per call, so one handler can be bound to any
/// instance of the controller when the route table is built.
pub struct Handler<C> {
    name: &'static str,
    call: Arc<HandlerFn<C>>,
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            call: Arc::clone(&self.call),
        }
    }
}

impl<C: Send + Sync + 'static> Handler<C> {
    /// Wrap a controller method taking `self: Arc<Self>` and the raw request
    ///
    /// # Example
    /// ```
    /// use routemeta::route::Handler;
    /// use axum::extract::Request;
    /// use std::sync::Arc;
    ///
    /// struct UserController;
    ///
    /// impl UserController {
    ///     async fn list(self: Arc<Self>, _request: Request) -> &'static str {
    ///         "[]"
    ///     }
    /// }
    ///
    /// let handler = Handler::new("list", UserController::list);
    /// assert_eq!(handler.name(), "list");
    /// ```
    pub fn new<F, Fut, R>(name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        Self {
            name,
            call: Arc::new(move |instance, request| {
                let fut = f(instance, request);
                Box::pin(async move { fut.await.into_response() })
            }),
        }
    }
}

impl<C> Handler<C> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the handler against a controller instance
    pub fn call(&self, instance: Arc<C>, request: Request) -> HandlerFuture {
        (self.call)(instance, request)
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}
