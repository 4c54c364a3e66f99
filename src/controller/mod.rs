// Controller functionality is primarily provided through macros:
// - #[controller(path = "...")] implements `Controller` with the base path
// - #[routes] plus #[get], #[post], #[put], #[delete], #[patch], #[route]
//   implement `DeclareRoutes`
//
// Both expand to plain `RouteRegistry` calls and can be written by hand.

use crate::error::Result;
use crate::registry::{RouteRegistry, RouteTable};
use std::sync::Arc;

/// A type whose annotated methods are aggregated into a route table.
pub trait Controller: Send + Sync + 'static {
    /// Prefix prepended to every route declared on this controller
    fn base_path() -> &'static str {
        ""
    }

    /// Build this controller's route table bound to `self`
    ///
    /// # Example
    /// ```
    /// use routemeta::{Controller, RouteRegistry, route::{Handler, RouteOptions}};
    /// use axum::extract::Request;
    /// use std::sync::Arc;
    ///
    /// struct HealthController;
    ///
    /// impl Controller for HealthController {
    ///     fn base_path() -> &'static str { "/health" }
    /// }
    ///
    /// impl HealthController {
    ///     async fn live(self: Arc<Self>, _request: Request) -> &'static str { "ok" }
    /// }
    ///
    /// let registry = RouteRegistry::new();
    /// registry.annotate(RouteOptions::get("/live"), Handler::new("live", HealthController::live));
    ///
    /// let table = Arc::new(HealthController).routes(&registry).unwrap();
    /// assert_eq!(table.iter().next().unwrap().path, "/health/live");
    /// ```
    fn routes(self: &Arc<Self>, registry: &RouteRegistry) -> Result<RouteTable<Self>>
    where
        Self: Sized,
    {
        registry.build(self)
    }
}

/// A type that records its route descriptors into a registry.
///
/// Usually generated by `#[routes]`; descriptors must be annotated in
/// declaration order.
pub trait DeclareRoutes: Send + Sync + 'static {
    fn declare_routes(registry: &RouteRegistry);
}
