//! Explicit per-controller route registry.
//!
//! Handler modules record their routes at startup with
//! [`RouteRegistry::annotate`] (or the `#[routes]` macro), and the
//! aggregation step later turns each controller's descriptors into a
//! [`RouteTable`] with [`RouteRegistry::build`].

mod table;

pub use table::RouteTable;

use crate::config::RegistryConfig;
use crate::controller::{Controller, DeclareRoutes};
use crate::error::{Result, RouteError};
use crate::route::{Handler, RouteDescriptor, RouteOptions};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

type ErasedTable = Box<dyn Any + Send + Sync>;

/// Descriptors of one controller type, in annotation order.
struct ClassRouteTable<C> {
    routes: Vec<RouteDescriptor<C>>,
    builds: usize,
}

impl<C> ClassRouteTable<C> {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            builds: 0,
        }
    }
}

/// Registry mapping controller types to their accumulated route descriptors.
///
/// # Example
/// ```
/// use routemeta::{RouteRegistry, route::{Handler, RouteOptions}};
/// use axum::extract::Request;
/// use std::sync::Arc;
///
/// struct UserController;
///
/// impl UserController {
///     async fn list(self: Arc<Self>, _request: Request) -> &'static str { "[]" }
/// }
///
/// let registry = RouteRegistry::new();
/// registry.annotate(RouteOptions::get("/users").tags(["api"]), Handler::new("list", UserController::list));
///
/// let table = registry.build_with_prefix("/v1", &Arc::new(UserController)).unwrap();
/// assert_eq!(table.get(0).unwrap().path, "/api/v1/users");
/// ```
pub struct RouteRegistry {
    tables: DashMap<TypeId, ErasedTable>,
    config: RegistryConfig,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            tables: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Record one annotated method of controller `C`.
    ///
    /// Descriptors are appended, so a controller's table keeps annotation order.
    pub fn annotate<C>(&self, options: RouteOptions, handler: Handler<C>) -> &Self
    where
        C: Send + Sync + 'static,
    {
        let descriptor = RouteDescriptor::from_options(options, handler, &self.config.documentation);
        tracing::debug!(
            controller = std::any::type_name::<C>(),
            method = %descriptor.method,
            path = %descriptor.path,
            handler = descriptor.handler.name(),
            documented = descriptor.is_documented(),
            "Annotated route"
        );

        let mut entry = self
            .tables
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(ClassRouteTable::<C>::new()) as ErasedTable);

        match entry.value_mut().downcast_mut::<ClassRouteTable<C>>() {
            Some(table) => table.routes.push(descriptor),
            None => tracing::error!(
                controller = std::any::type_name::<C>(),
                "Route table has an unexpected type; annotation dropped"
            ),
        }
        self
    }

    /// Record every route a controller declares
    pub fn register<C: DeclareRoutes>(&self) -> &Self {
        C::declare_routes(self);
        self
    }

    /// Build the route table of `C` bound to `instance`, using `C::base_path()`.
    pub fn build<C: Controller>(&self, instance: &Arc<C>) -> Result<RouteTable<C>> {
        self.build_with_prefix(C::base_path(), instance)
    }

    /// Build the route table of `C` with an explicit base prefix.
    ///
    /// Documented routes resolve to `api_root + prefix + path`, the others to
    /// `prefix + path`. Stored descriptors are rewritten in place, so building
    /// the same controller twice prefixes its paths twice.
    pub fn build_with_prefix<C>(&self, prefix: &str, instance: &Arc<C>) -> Result<RouteTable<C>>
    where
        C: Send + Sync + 'static,
    {
        let controller = std::any::type_name::<C>();
        let Some(mut entry) = self.tables.get_mut(&TypeId::of::<C>()) else {
            tracing::debug!(controller, "No routes annotated; returning empty table");
            return Ok(RouteTable::empty());
        };

        let table = entry
            .value_mut()
            .downcast_mut::<ClassRouteTable<C>>()
            .ok_or_else(RouteError::downcast_failed::<C>)?;

        table.builds += 1;
        if table.builds > 1 {
            tracing::warn!(
                controller,
                builds = table.builds,
                "Route table built again; stored paths are prefixed once more"
            );
        }

        let api_root = self.config.api_root.as_str();
        for route in table.routes.iter_mut() {
            route.mount(api_root, prefix, Arc::clone(instance));
            tracing::debug!(controller, method = %route.method, path = %route.path, "Mounted route");
        }

        tracing::info!(controller, routes = table.routes.len(), "Built route table");
        Ok(RouteTable::new(table.routes.clone()))
    }

    /// Whether any route was annotated for `C`
    pub fn contains<C: 'static>(&self) -> bool {
        self.tables.contains_key(&TypeId::of::<C>())
    }

    /// Number of controller types with at least one route
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
