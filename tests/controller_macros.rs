use routemeta::axum::body::Body;
use routemeta::axum::extract::Request;
use routemeta::axum::http::StatusCode;
use routemeta::prelude::*;
use serde_json::json;
use tower::ServiceExt;

#[controller(path = "/v1")]
pub struct UserController {
    name: String,
}

fn user_schema(options: RouteOptions) -> RouteOptions {
    options.params(Rules::fields([("id", Schema::new(json!({"type": "string"})))]))
        .payload(PayloadDescriptor::new().kind(PayloadType::Json).parse(true))
        .response(200, ResponseDoc::new("The user"))
}

#[routes(UserController)]
impl UserController {
    #[get(
        "/a",
        tags = ["api"],
        description = "Fetch the user",
        notes = "Reads from the cache",
        produces = ["application/json"],
        with = user_schema
    )]
    async fn a(&self, _request: Request) -> String {
        self.name.clone()
    }

    #[post("/b")]
    async fn b(self: Arc<Self>) -> &'static str {
        "b"
    }

    #[route("options", "/c", auth = false)]
    async fn c(&self) -> StatusCode {
        StatusCode::NO_CONTENT
    }

    #[delete("/d", auth = "jwt", consumes = [])]
    async fn d(&self, request: Request) -> String {
        request.uri().path().to_string()
    }

    fn helper(&self) -> usize {
        self.name.len()
    }
}

#[controller]
pub struct EmptyController;

#[routes]
impl EmptyController {}

fn user_controller() -> Arc<UserController> {
    Arc::new(UserController {
        name: "ada".to_string(),
    })
}

#[test]
fn test_controller_base_paths() {
    assert_eq!(UserController::base_path(), "/v1");
    assert_eq!(EmptyController::base_path(), "");
}

#[test]
fn test_routes_declared_in_source_order() {
    let registry = RouteRegistry::new();
    registry.register::<UserController>();

    let controller = user_controller();
    assert_eq!(controller.helper(), 3);

    let table = controller.routes(&registry).unwrap();
    let routes: Vec<_> = table
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str(), r.handler.name()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("GET", "/api/v1/a", "a"),
            ("POST", "/v1/b", "b"),
            ("OPTIONS", "/v1/c", "c"),
            ("DELETE", "/v1/d", "d"),
        ]
    );
}

#[test]
fn test_route_options_reach_descriptors() {
    let registry = RouteRegistry::new();
    registry.register::<UserController>();
    let table = registry.build(&user_controller()).unwrap();

    let a = table.get(0).unwrap();
    let docs = a.docs.as_ref().unwrap();
    assert_eq!(docs.description.as_deref(), Some("Fetch the user"));
    assert_eq!(docs.notes.as_deref(), Some("Reads from the cache"));
    assert_eq!(docs.produces, Some(vec!["application/json".to_string()]));
    assert_eq!(docs.payload_type, Some(Some(PayloadType::Json)));
    assert!(docs.responses.as_ref().unwrap().contains_key(&200));
    assert_eq!(a.transport.as_ref().unwrap().parse, Some(true));
    assert!(matches!(a.validate.params, Some(Rules::Fields(ref f)) if f.len() == 1));
    assert_eq!(a.auth, Auth::Default);

    let b = table.get(1).unwrap();
    assert!(b.docs.is_none());
    assert_eq!(b.auth, Auth::Default);

    assert_eq!(table.get(2).unwrap().auth, Auth::Disabled);

    let d = table.get(3).unwrap();
    assert_eq!(d.auth, Auth::Strategy("jwt".to_string()));
    // Untagged, so `consumes` is dropped with the rest of the documentation.
    assert!(d.docs.is_none());
}

#[test]
fn test_empty_controller_has_empty_table() {
    let registry = RouteRegistry::new();
    registry.register::<EmptyController>();
    assert!(!registry.contains::<EmptyController>());
    assert!(Arc::new(EmptyController).routes(&registry).unwrap().is_empty());
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = routemeta::axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_macro_routes_serve_through_axum() {
    let registry = RouteRegistry::new();
    registry.register::<UserController>();
    let router: Router = user_controller()
        .routes(&registry)
        .and_then(|table| table.into_router())
        .unwrap();

    assert_eq!(send(&router, "GET", "/api/v1/a").await, (StatusCode::OK, "ada".to_string()));
    assert_eq!(send(&router, "POST", "/v1/b").await, (StatusCode::OK, "b".to_string()));
    assert_eq!(send(&router, "OPTIONS", "/v1/c").await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&router, "DELETE", "/v1/d").await, (StatusCode::OK, "/v1/d".to_string()));
    assert_eq!(send(&router, "GET", "/v1/a").await.0, StatusCode::NOT_FOUND);
}
