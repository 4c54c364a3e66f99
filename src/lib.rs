//! # Routemeta
//!
//! Declarative route metadata for controller-based Rust web services.
//!
//! Controllers record one route descriptor per annotated method (HTTP method,
//! path, validation schemas, documentation tags) in a [`RouteRegistry`]. At
//! startup the registry aggregates each controller's descriptors into an
//! ordered [`RouteTable`]: the controller's base path is prepended, documented
//! routes additionally get the API root, and every handler is bound to a live
//! controller instance. The table can be serialized in the route-registration
//! shape a routing framework consumes, or mounted directly on an `axum::Router`.
//!
//! ## Features
//!
//! - **Explicit registry**: no ambient metadata; routes live in the registry you pass around
//! - **Ordered tables**: descriptors keep their declaration order
//! - **Documentation policy**: tagged routes carry a documentation block and the API root
//! - **Typed payload policy**: bare schema or structured descriptor, never guessed
//! - **Macros**: `#[controller]` and `#[routes]` expand to plain registry calls
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routemeta::prelude::*;
//! use routemeta::axum::extract::Request;
//!
//! #[controller(path = "/users")]
//! pub struct UserController {
//!     prefix: String,
//! }
//!
//! #[routes]
//! impl UserController {
//!     #[get("/{id}", tags = ["api"], description = "Fetch one user")]
//!     async fn get_user(self: Arc<Self>, _request: Request) -> String {
//!         format!("{}-user", self.prefix)
//!     }
//!
//!     #[post("/sync", auth = false)]
//!     async fn sync(self: Arc<Self>, _request: Request) -> &'static str {
//!         "ok"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let registry = RouteRegistry::new();
//!     registry.register::<UserController>();
//!
//!     let controller = Arc::new(UserController { prefix: "v1".into() });
//!     let table = controller.routes(&registry)?;
//!     // [GET /api/users/{id}, POST /users/sync]
//!     let app: Router = table.into_router()?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod registry;
pub mod route;
pub mod router;

// Re-export core types
pub use config::{ConfigService, DocumentationPolicy, RegistryConfig};
pub use controller::{Controller, DeclareRoutes};
pub use error::{Result, RouteError};
pub use registry::{RouteRegistry, RouteTable};

// Re-export macros
pub use routemeta_macro::{controller, delete, get, patch, post, put, route, routes};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use routemeta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, DocumentationPolicy, RegistryConfig};
    pub use crate::controller::{Controller, DeclareRoutes};
    pub use crate::error::{Result, RouteError};
    pub use crate::registry::{RouteRegistry, RouteTable};
    pub use crate::route::{
        Auth, Handler, Payload, PayloadDescriptor, PayloadOutput, PayloadType, ResponseDoc,
        RouteDescriptor, RouteOptions, Rules, Schema,
    };
    pub use crate::{controller, delete, get, patch, post, put, route, routes};
    pub use axum::Router;
    pub use std::sync::Arc;
}
