use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Failed to downcast route table for controller: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Unsupported HTTP method '{method}' for route {path}")]
    InvalidMethod { method: String, path: String },

    #[error("Route path must start with '/': {path}")]
    InvalidPath { path: String },

    #[error("Duplicate route: {method} {path}")]
    DuplicateRoute { method: String, path: String },

    #[error("Route {method} {path} is not bound to a controller instance")]
    Unbound { method: String, path: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RouteError {
    pub(crate) fn downcast_failed<C: ?Sized>() -> Self {
        RouteError::DowncastFailed {
            type_name: std::any::type_name::<C>().to_string(),
        }
    }
}
