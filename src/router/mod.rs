//! Hands a built [`RouteTable`] to `axum`.
//!
//! Dispatch, validation and payload handling stay with axum; this module only
//! translates each descriptor's method and path into router registrations.

use crate::error::{Result, RouteError};
use crate::registry::RouteTable;
use axum::Router;
use axum::extract::Request;
use axum::http::Method;
use axum::routing::{MethodFilter, MethodRouter};
use matchit::InsertError;
use std::collections::HashMap;

/// Method string accepted as "every method"
pub const ANY_METHOD: &str = "*";

enum Methods {
    Any,
    One(MethodFilter),
}

/// Reject paths axum would refuse to register.
///
/// Segments must use `{capture}` syntax, and a new path must not conflict
/// with one already accepted (e.g. `/users/{id}` and `/users/{name}`).
fn check_path(matcher: &mut matchit::Router<()>, method: &str, path: &str) -> Result<()> {
    let legacy_capture = path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if !path.starts_with('/') || legacy_capture {
        return Err(RouteError::InvalidPath {
            path: path.to_string(),
        });
    }
    match matcher.insert(path, ()) {
        Ok(()) => Ok(()),
        Err(InsertError::Conflict { with }) => {
            tracing::debug!(path, with = %with, "Route path conflicts with an earlier route");
            Err(RouteError::DuplicateRoute {
                method: method.to_string(),
                path: path.to_string(),
            })
        }
        Err(_) => Err(RouteError::InvalidPath {
            path: path.to_string(),
        }),
    }
}

fn parse_method(method: &str, path: &str) -> Result<Methods> {
    if method == ANY_METHOD {
        return Ok(Methods::Any);
    }
    let invalid = || RouteError::InvalidMethod {
        method: method.to_string(),
        path: path.to_string(),
    };
    let parsed = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| invalid())?;
    MethodFilter::try_from(parsed)
        .map(Methods::One)
        .map_err(|_| invalid())
}

impl<C: Send + Sync + 'static> RouteTable<C> {
    /// Register every route of this table on a new [`Router`].
    ///
    /// Routes sharing a path are merged into one method router. A `*` route
    /// must be the only route on its path. Paths with `:name` segments or
    /// captures that clash with another path are rejected.
    ///
    /// # Example
    /// ```
    /// use routemeta::{RouteRegistry, route::{Handler, RouteOptions}};
    /// use axum::{Router, extract::Request};
    /// use std::sync::Arc;
    ///
    /// struct PingController;
    ///
    /// impl PingController {
    ///     async fn ping(self: Arc<Self>, _request: Request) -> &'static str { "pong" }
    /// }
    ///
    /// let registry = RouteRegistry::new();
    /// registry.annotate(RouteOptions::get("/ping"), Handler::new("ping", PingController::ping));
    ///
    /// let router: Router = registry
    ///     .build_with_prefix("", &Arc::new(PingController))
    ///     .and_then(|table| table.into_router())
    ///     .unwrap();
    /// ```
    pub fn into_router<S>(self) -> Result<Router<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut order: Vec<String> = Vec::new();
        let mut paths: HashMap<String, (MethodRouter<S>, Vec<String>)> = HashMap::new();
        let mut matcher = matchit::Router::new();

        for route in self {
            if !paths.contains_key(&route.path) {
                check_path(&mut matcher, &route.method, &route.path)?;
            }
            let methods = parse_method(&route.method, &route.path)?;
            let instance = route.bound().cloned().ok_or_else(|| RouteError::Unbound {
                method: route.method.clone(),
                path: route.path.clone(),
            })?;

            let handler = route.handler.clone();
            let endpoint = move |request: Request| handler.call(instance.clone(), request);
            let method = route.method.to_ascii_uppercase();

            match paths.get_mut(&route.path) {
                Some((router, seen)) => {
                    let overlaps = seen
                        .iter()
                        .any(|m| *m == method || m == ANY_METHOD || method == ANY_METHOD);
                    if overlaps {
                        return Err(RouteError::DuplicateRoute {
                            method: route.method,
                            path: route.path,
                        });
                    }
                    // Any-method routes never reach this arm: they overlap every method.
                    if let Methods::One(filter) = methods {
                        *router = router.clone().on(filter, endpoint);
                    }
                    seen.push(method);
                }
                None => {
                    let router = match methods {
                        Methods::Any => axum::routing::any(endpoint),
                        Methods::One(filter) => axum::routing::on(filter, endpoint),
                    };
                    tracing::debug!(method = %route.method, path = %route.path, handler = route.handler.name(), "Registering route");
                    order.push(route.path.clone());
                    paths.insert(route.path, (router, vec![method]));
                }
            }
        }

        let mut router = Router::new();
        for path in order {
            if let Some((method_router, _)) = paths.remove(&path) {
                router = router.route(&path, method_router);
            }
        }
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteRegistry;
    use crate::route::{Handler, RouteOptions};
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct GreetController {
        greeting: String,
    }

    impl GreetController {
        async fn hello(self: Arc<Self>, _request: Request) -> String {
            self.greeting.clone()
        }

        async fn echo(self: Arc<Self>, request: Request) -> String {
            format!("{} {}", request.method(), request.uri().path())
        }
    }

    fn controller() -> Arc<GreetController> {
        Arc::new(GreetController {
            greeting: "hello".to_string(),
        })
    }

    async fn body_text(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_dispatches_to_bound_instance() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/hello").tags(["api"]), Handler::new("hello", GreetController::hello))
            .annotate(RouteOptions::post("/hello"), Handler::new("echo", GreetController::echo));

        let router: Router = registry
            .build_with_prefix("/v1", &controller())
            .unwrap()
            .into_router()
            .unwrap();

        let (status, body) = body_text(router.clone(), "GET", "/api/v1/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello");

        let (status, body) = body_text(router.clone(), "POST", "/v1/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "POST /v1/hello");

        let (status, _) = body_text(router, "GET", "/v1/hello").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_merges_methods_on_shared_path() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/greet"), Handler::new("hello", GreetController::hello))
            .annotate(RouteOptions::new("delete", "/greet"), Handler::new("echo", GreetController::echo));

        let router: Router = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router()
            .unwrap();

        let (_, body) = body_text(router.clone(), "GET", "/greet").await;
        assert_eq!(body, "hello");
        let (_, body) = body_text(router, "DELETE", "/greet").await;
        assert_eq!(body, "DELETE /greet");
    }

    #[tokio::test]
    async fn test_any_method_route() {
        let registry = RouteRegistry::new();
        registry.annotate(RouteOptions::new("*", "/any"), Handler::new("echo", GreetController::echo));

        let router: Router = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router()
            .unwrap();

        let (_, body) = body_text(router, "PATCH", "/any").await;
        assert_eq!(body, "PATCH /any");
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/dup"), Handler::new("hello", GreetController::hello))
            .annotate(RouteOptions::get("/dup"), Handler::new("echo", GreetController::echo));

        let result = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router::<()>();
        assert!(matches!(result, Err(RouteError::DuplicateRoute { .. })));
    }

    #[test]
    fn test_any_method_conflicts_with_specific_method() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/mixed"), Handler::new("hello", GreetController::hello))
            .annotate(RouteOptions::new("*", "/mixed"), Handler::new("echo", GreetController::echo));

        let result = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router::<()>();
        assert!(matches!(result, Err(RouteError::DuplicateRoute { .. })));
    }

    #[test]
    fn test_invalid_method_and_path() {
        let registry = RouteRegistry::new();
        registry.annotate(RouteOptions::new("FETCH", "/x"), Handler::new("hello", GreetController::hello));
        let result = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router::<()>();
        assert!(matches!(result, Err(RouteError::InvalidMethod { .. })));

        struct Relative;
        impl Relative {
            async fn go(self: Arc<Self>, _request: Request) -> &'static str {
                ""
            }
        }
        let registry = RouteRegistry::new();
        registry.annotate(RouteOptions::get("relative"), Handler::new("go", Relative::go));
        let result = registry
            .build_with_prefix("", &Arc::new(Relative))
            .unwrap()
            .into_router::<()>();
        assert!(matches!(result, Err(RouteError::InvalidPath { .. })));
    }

    #[test]
    fn test_colon_capture_rejected() {
        let registry = RouteRegistry::new();
        registry.annotate(RouteOptions::get("/users/:id"), Handler::new("hello", GreetController::hello));
        let result = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router::<()>();
        assert!(matches!(result, Err(RouteError::InvalidPath { ref path }) if path == "/users/:id"));
    }

    #[test]
    fn test_conflicting_captures_rejected() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/users/{id}"), Handler::new("hello", GreetController::hello))
            .annotate(RouteOptions::post("/users/{name}"), Handler::new("echo", GreetController::echo));
        let result = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router::<()>();
        assert!(matches!(
            result,
            Err(RouteError::DuplicateRoute { ref method, ref path }) if method == "POST" && path == "/users/{name}"
        ));
    }

    #[tokio::test]
    async fn test_static_segment_beside_capture() {
        let registry = RouteRegistry::new();
        registry
            .annotate(RouteOptions::get("/users/{id}"), Handler::new("echo", GreetController::echo))
            .annotate(RouteOptions::get("/users/me"), Handler::new("hello", GreetController::hello));

        let router: Router = registry
            .build_with_prefix("", &controller())
            .unwrap()
            .into_router()
            .unwrap();

        let (_, body) = body_text(router.clone(), "GET", "/users/me").await;
        assert_eq!(body, "hello");
        let (_, body) = body_text(router, "GET", "/users/42").await;
        assert_eq!(body, "GET /users/42");
    }

    #[test]
    fn test_unbound_route_rejected() {
        let table = RouteTable::new(vec![crate::route::RouteDescriptor::from_options(
            RouteOptions::get("/loose"),
            Handler::new("hello", GreetController::hello),
            &crate::config::DocumentationPolicy::AnyTag,
        )]);
        assert!(matches!(
            table.into_router::<()>(),
            Err(RouteError::Unbound { .. })
        ));
    }
}
