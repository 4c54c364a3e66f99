use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display};

/// Opaque validation schema.
///
/// The registry never interprets a schema; it is handed to the consumer's
/// schema engine exactly as it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(serde_json::Value);

impl Schema {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Schema {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Validation rules for the query string or the path parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Rules {
    /// One schema applied to the whole query/params object
    Schema(Schema),
    /// One schema per field, in declaration order
    Fields(Vec<(String, Schema)>),
}

impl Rules {
    pub fn schema(schema: impl Into<Schema>) -> Self {
        Rules::Schema(schema.into())
    }

    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Schema>,
    {
        Rules::Fields(
            fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema.into()))
                .collect(),
        )
    }
}

impl Serialize for Rules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rules::Schema(schema) => schema.serialize(serializer),
            Rules::Fields(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, schema) in fields {
                    map.serialize_entry(name, schema)?;
                }
                map.end()
            }
        }
    }
}

/// Authentication setting of a route.
///
/// `Default` is the explicit "no override" sentinel written when a route
/// does not mention auth at all; it serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    #[default]
    Default,
    Disabled,
    Required,
    Strategy(String),
}

impl From<bool> for Auth {
    fn from(enabled: bool) -> Self {
        if enabled { Auth::Required } else { Auth::Disabled }
    }
}

impl From<&str> for Auth {
    fn from(strategy: &str) -> Self {
        Auth::Strategy(strategy.to_string())
    }
}

impl From<String> for Auth {
    fn from(strategy: String) -> Self {
        Auth::Strategy(strategy)
    }
}

impl Serialize for Auth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Auth::Default => serializer.serialize_none(),
            Auth::Disabled => serializer.serialize_bool(false),
            Auth::Required => serializer.serialize_bool(true),
            Auth::Strategy(name) => serializer.serialize_str(name),
        }
    }
}

/// Documented body encoding of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayloadType {
    Json,
    Form,
}

/// How the consumer hands the request body to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayloadOutput {
    Data,
    Stream,
    File,
}

/// Structured payload policy: documentation type, transport settings and
/// the body schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayloadDescriptor {
    pub kind: Option<PayloadType>,
    pub output: Option<PayloadOutput>,
    pub parse: Option<bool>,
    pub validate: Option<Schema>,
}

impl PayloadDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: PayloadType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn output(mut self, output: PayloadOutput) -> Self {
        self.output = Some(output);
        self
    }

    pub fn parse(mut self, parse: bool) -> Self {
        self.parse = Some(parse);
        self
    }

    pub fn validate(mut self, schema: impl Into<Schema>) -> Self {
        self.validate = Some(schema.into());
        self
    }
}

/// The two shapes accepted for a route's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A schema validating the body directly
    Schema(Schema),
    Descriptor(PayloadDescriptor),
}

impl From<Schema> for Payload {
    fn from(schema: Schema) -> Self {
        Payload::Schema(schema)
    }
}

impl From<PayloadDescriptor> for Payload {
    fn from(descriptor: PayloadDescriptor) -> Self {
        Payload::Descriptor(descriptor)
    }
}

/// Documentation of one response status.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResponseDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl ResponseDoc {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            schema: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Named security scheme mapped to its required scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Route configuration supplied when a method is annotated.
///
/// # Example
/// ```
/// use routemeta::route::{RouteOptions, Rules, Schema, PayloadDescriptor, PayloadOutput};
/// use serde_json::json;
///
/// let options = RouteOptions::post("/upload")
///     .tags(["api", "files"])
///     .description("Upload a file")
///     .params(Rules::fields([("id", Schema::new(json!({"type": "string"})))]))
///     .payload(PayloadDescriptor::new().output(PayloadOutput::Stream).parse(false))
///     .auth("jwt");
/// assert_eq!(options.method, "POST");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteOptions {
    pub method: String,
    pub path: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub params: Option<Rules>,
    pub query: Option<Rules>,
    pub payload: Option<Payload>,
    pub responses: Option<BTreeMap<u16, ResponseDoc>>,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    pub security: Option<Vec<SecurityRequirement>>,
    pub auth: Option<Auth>,
}

impl RouteOptions {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new("PATCH", path)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn params(mut self, rules: Rules) -> Self {
        self.params = Some(rules);
        self
    }

    pub fn query(mut self, rules: Rules) -> Self {
        self.query = Some(rules);
        self
    }

    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn response(mut self, status: u16, doc: ResponseDoc) -> Self {
        self.responses
            .get_or_insert_with(BTreeMap::new)
            .insert(status, doc);
        self
    }

    pub fn produces<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.produces = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn consumes<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.consumes = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Add one security requirement: a scheme name and its scopes
    pub fn security<I, T>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let requirement =
            SecurityRequirement::from([(scheme.into(), scopes.into_iter().map(Into::into).collect())]);
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    pub fn auth(mut self, auth: impl Into<Auth>) -> Self {
        self.auth = Some(auth.into());
        self
    }
}
