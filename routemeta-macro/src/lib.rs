use proc_macro::TokenStream;

mod controller;
mod routes;

/// Attribute macro marking a struct as a controller with a base path
///
/// The path is prepended to every route the controller declares. It
/// defaults to the empty string.
///
/// # Example
/// ```ignore
/// use routemeta::controller;
///
/// #[controller(path = "/users")]
/// pub struct UserController {
///     store: Arc<UserStore>,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro collecting the route-annotated methods of an impl block
///
/// Every method carrying `#[get]`, `#[post]`, `#[put]`, `#[delete]`,
/// `#[patch]` or `#[route]` is recorded, in source order, by the generated
/// `DeclareRoutes::declare_routes`.
///
/// Route options: `tags = [..]`, `description = ".."`, `notes = ".."`,
/// `auth = "strategy" | true | false`, `produces = [..]`, `consumes = [..]`
/// and `with = some_fn`, where `some_fn: fn(RouteOptions) -> RouteOptions` adds
/// schemas, payload policy or responses.
///
/// # Example
/// ```ignore
/// #[routes]
/// impl UserController {
///     #[get("/{id}", tags = ["api"], description = "Fetch one user")]
///     async fn get_user(&self, request: Request) -> Json<User> {
///         // ...
///     }
///
///     #[route("OPTIONS", "/", auth = false)]
///     async fn options(&self) -> StatusCode {
///         StatusCode::NO_CONTENT
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::routes_attribute(attr, item)
}

/// HTTP GET route for controller methods
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}

/// HTTP POST route for controller methods
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}

/// HTTP PUT route for controller methods
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}

/// HTTP DELETE route for controller methods
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}

/// HTTP PATCH route for controller methods
#[proc_macro_attribute]
pub fn patch(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}

/// Route with an explicit method string, e.g. `#[route("OPTIONS", "/")]` or `#[route("*", "/proxy")]`
#[proc_macro_attribute]
pub fn route(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::http_method_attribute(attr, item)
}
