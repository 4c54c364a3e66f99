use super::handler::Handler;
use super::options::{
    Auth, Payload, PayloadOutput, PayloadType, ResponseDoc, RouteOptions, Rules, Schema,
    SecurityRequirement,
};
use crate::config::DocumentationPolicy;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Plugin key under which documentation metadata is published
pub const DOCS_PLUGIN: &str = "hapi-swagger";

/// Documentation block carried only by documented routes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Documentation {
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub responses: Option<BTreeMap<u16, ResponseDoc>>,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    pub security: Option<Vec<SecurityRequirement>>,
    /// `Some` once the route declares a payload descriptor; the inner value
    /// is its type, if one was given
    pub payload_type: Option<Option<PayloadType>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Validation {
    pub query: Option<Rules>,
    pub params: Option<Rules>,
    pub payload: Option<Schema>,
}

/// Body transport settings, present only when explicitly configured
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadTransport {
    pub output: Option<PayloadOutput>,
    pub parse: Option<bool>,
}

/// One annotated controller method, as recorded in the registry.
pub struct RouteDescriptor<C> {
    pub method: String,
    pub path: String,
    pub handler: Handler<C>,
    pub docs: Option<Documentation>,
    pub auth: Auth,
    pub validate: Validation,
    pub transport: Option<PayloadTransport>,
    bind: Option<Arc<C>>,
}

impl<C> RouteDescriptor<C> {
    /// Build a descriptor from the route configuration given at annotation time.
    ///
    /// Nothing is validated here; schemas pass through untouched.
    pub fn from_options(options: RouteOptions, handler: Handler<C>, policy: &DocumentationPolicy) -> Self {
        let documented = policy.is_documented(&options.tags);

        let mut docs = documented.then(|| Documentation {
            description: non_empty(options.description),
            notes: non_empty(options.notes),
            tags: options.tags,
            responses: options.responses,
            produces: options.produces,
            consumes: options.consumes,
            security: options.security,
            payload_type: None,
        });

        let mut validate = Validation {
            query: options.query,
            params: options.params,
            payload: None,
        };

        let mut transport = None;
        match options.payload {
            Some(Payload::Descriptor(payload)) => {
                if let Some(docs) = docs.as_mut() {
                    docs.payload_type = Some(payload.kind);
                }
                // `parse: Some(false)` is still an explicit setting.
                if payload.output.is_some() || payload.parse.is_some() {
                    transport = Some(PayloadTransport {
                        output: payload.output,
                        parse: payload.parse,
                    });
                }
                validate.payload = payload.validate;
            }
            Some(Payload::Schema(schema)) => validate.payload = Some(schema),
            None => {}
        }

        Self {
            method: options.method,
            path: options.path,
            handler,
            docs,
            auth: options.auth.unwrap_or_default(),
            validate,
            transport,
            bind: None,
        }
    }

    pub fn is_documented(&self) -> bool {
        self.docs.is_some()
    }

    /// Controller instance the handler runs against, once the table is built
    pub fn bound(&self) -> Option<&Arc<C>> {
        self.bind.as_ref()
    }

    /// Prepend the mount prefix to the stored path and bind the instance.
    ///
    /// Applied to the stored descriptor, so every call prefixes again.
    pub(crate) fn mount(&mut self, api_root: &str, prefix: &str, instance: Arc<C>) {
        self.path = if self.is_documented() {
            format!("{api_root}{prefix}{}", self.path)
        } else {
            format!("{prefix}{}", self.path)
        };
        self.bind = Some(instance);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl<C> Clone for RouteDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            handler: self.handler.clone(),
            docs: self.docs.clone(),
            auth: self.auth.clone(),
            validate: self.validate.clone(),
            transport: self.transport.clone(),
            bind: self.bind.clone(),
        }
    }
}

impl<C> fmt::Debug for RouteDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handler", &self.handler)
            .field("docs", &self.docs)
            .field("auth", &self.auth)
            .field("validate", &self.validate)
            .field("transport", &self.transport)
            .field("bound", &self.bind.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct WireRoute<'a> {
    method: &'a str,
    path: &'a str,
    handler: &'a str,
    config: WireConfig<'a>,
}

#[derive(Serialize)]
struct WireConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
    auth: &'a Auth,
    validate: &'a Validation,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a PayloadTransport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugins: Option<WirePlugins<'a>>,
}

#[derive(Serialize)]
struct WirePlugins<'a> {
    #[serde(rename = "hapi-swagger")]
    docs: WireDocs<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDocs<'a> {
    responses: Option<&'a BTreeMap<u16, ResponseDoc>>,
    produces: Option<&'a [String]>,
    consumes: Option<&'a [String]>,
    security: Option<&'a [SecurityRequirement]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_type: Option<Option<PayloadType>>,
}

impl<C> Serialize for RouteDescriptor<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let docs = self.docs.as_ref();
        WireRoute {
            method: &self.method,
            path: &self.path,
            handler: self.handler.name(),
            config: WireConfig {
                description: docs.map(|d| d.description.as_deref()),
                notes: docs.map(|d| d.notes.as_deref()),
                tags: docs.map(|d| d.tags.as_slice()),
                auth: &self.auth,
                validate: &self.validate,
                payload: self.transport.as_ref(),
                plugins: docs.map(|d| WirePlugins {
                    docs: WireDocs {
                        responses: d.responses.as_ref(),
                        produces: d.produces.as_deref(),
                        consumes: d.consumes.as_deref(),
                        security: d.security.as_deref(),
                        payload_type: d.payload_type,
                    },
                }),
            },
        }
        .serialize(serializer)
    }
}
