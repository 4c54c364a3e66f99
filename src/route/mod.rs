//! Route configuration and the descriptors recorded for annotated methods.

mod descriptor;
mod handler;
mod options;

pub use descriptor::{DOCS_PLUGIN, Documentation, PayloadTransport, RouteDescriptor, Validation};
pub use handler::{Handler, HandlerFuture};
pub use options::{
    Auth, Payload, PayloadDescriptor, PayloadOutput, PayloadType, ResponseDoc, RouteOptions, Rules,
    Schema, SecurityRequirement,
};
