use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::get,
};
use reqwest::StatusCode as UpstreamStatus;
use serde_json::json;
use tower::ServiceExt;

use materials_api::middleware::auth::{GateState, gate::gate};
use materials_api::services::auth::{
    AuthzContext, BearerToken, IdentityClient, InvalidReason, Principal, ValidationOutcome,
};

#[derive(Default)]
struct StubIdentity {
    calls: AtomicUsize,
}

impl StubIdentity {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn principal(username: &str, roles: &[&str], permissions: &[&str]) -> Principal {
    serde_json::from_value(json!({
        "id": 42,
        "username": username,
        "email": format!("{username}@example.com"),
        "firstName": "Test",
        "lastName": "User",
        "roles": roles,
        "permissions": permissions,
    }))
    .unwrap()
}

#[async_trait]
impl IdentityClient for StubIdentity {
    async fn check(&self, token: &BearerToken) -> ValidationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token.as_str() {
            "valid-abc" => ValidationOutcome::Valid(principal("alice", &["ADMIN"], &[])),
            "manager-tok" => ValidationOutcome::Valid(principal("bob", &["MANAGER"], &["READ_MATERIAL"])),
            "no-roles" => ValidationOutcome::Valid(principal("carol", &[], &[])),
            "blank-user" => ValidationOutcome::Valid(principal(" ", &["ADMIN"], &[])),
            "no-principal" => ValidationOutcome::Invalid(InvalidReason::MissingPrincipal),
            _ => ValidationOutcome::Invalid(InvalidReason::Status(UpstreamStatus::UNAUTHORIZED)),
        }
    }
}

// Echoes what the gate left in the request: "subject:auth1,auth2" or "anonymous".
async fn whoami(req: Request) -> String {
    match req.extensions().get::<AuthzContext>() {
        Some(ctx) => {
            let authorities: Vec<&str> = ctx.authorities().iter().map(String::as_str).collect();
            format!("{}:{}", ctx.subject(), authorities.join(","))
        }
        None => "anonymous".to_string(),
    }
}

fn app(identity: Arc<StubIdentity>) -> Router {
    Router::new()
        .route("/api/materials", get(whoami))
        .route("/api/public/catalog", get(whoami))
        .route("/actuator/health", get(whoami))
        .layer(from_fn_with_state(GateState::new(identity), gate))
}

async fn call(router: Router, path: &str, authorization: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

async fn send(router: Router, req: Request) -> (StatusCode, String) {
    let resp = router.oneshot(req).await.unwrap();

    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn bypassed_paths_never_reach_the_identity_service() {
    let identity = Arc::new(StubIdentity::default());

    for path in ["/api/public/catalog", "/actuator/health"] {
        let (status, body) = call(app(identity.clone()), path, Some("Bearer valid-abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }
    assert_eq!(identity.calls(), 0);
}

#[tokio::test]
async fn missing_or_foreign_authorization_stays_anonymous() {
    let identity = Arc::new(StubIdentity::default());

    let cases: [Option<&str>; 4] = [
        None,
        Some("Basic dXNlcjpwYXNz"),
        Some("Token valid-abc"),
        Some("Bearer "),
    ];
    for authorization in cases {
        let (status, body) = call(app(identity.clone()), "/api/materials", authorization).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }
    assert_eq!(identity.calls(), 0);
}

#[tokio::test]
async fn undecodable_header_is_forwarded_anonymously() {
    let identity = Arc::new(StubIdentity::default());

    let req = Request::builder()
        .uri("/api/materials")
        .header(AUTHORIZATION, &b"Bearer \xffvalid-abc"[..])
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(identity.clone()), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");
    assert_eq!(identity.calls(), 0);
}

#[tokio::test]
async fn rejected_token_leaves_no_context() {
    let identity = Arc::new(StubIdentity::default());

    let (status, body) = call(
        app(identity.clone()),
        "/api/materials",
        Some("Bearer expired-xyz"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");
    assert_eq!(identity.calls(), 1);
}

#[tokio::test]
async fn admin_token_installs_role_authority() {
    let identity = Arc::new(StubIdentity::default());

    let (_, body) = call(
        app(identity.clone()),
        "/api/materials",
        Some("Bearer valid-abc"),
    )
    .await;

    assert_eq!(body, "alice:ROLE_ADMIN");
    assert_eq!(identity.calls(), 1);
}

#[tokio::test]
async fn permissions_are_granted_unprefixed() {
    let identity = Arc::new(StubIdentity::default());

    let (_, body) = call(app(identity), "/api/materials", Some("Bearer manager-tok")).await;

    assert_eq!(body, "bob:READ_MATERIAL,ROLE_MANAGER");
}

#[tokio::test]
async fn partial_principals_are_not_installed() {
    let identity = Arc::new(StubIdentity::default());

    for token in ["no-roles", "blank-user", "no-principal"] {
        let header = format!("Bearer {token}");
        let (status, body) =
            call(app(identity.clone()), "/api/materials", Some(header.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous", "token {token}");
    }
    assert_eq!(identity.calls(), 3);
}

#[tokio::test]
async fn stacked_gates_validate_once() {
    let identity = Arc::new(StubIdentity::default());

    let router = app(identity.clone()).layer(from_fn_with_state(
        GateState::new(identity.clone()),
        gate,
    ));
    let (_, body) = call(router, "/api/materials", Some("Bearer valid-abc")).await;

    assert_eq!(body, "alice:ROLE_ADMIN");
    assert_eq!(identity.calls(), 1);
}

// Stands in for an earlier layer that already authenticated the request.
async fn preinstall(State(ctx): State<AuthzContext>, mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

#[tokio::test]
async fn existing_context_skips_validation() {
    let identity = Arc::new(StubIdentity::default());
    let ctx = AuthzContext::from_principal(&principal("dave", &["AUDITOR"], &[])).unwrap();

    let router = app(identity.clone()).layer(from_fn_with_state(ctx, preinstall));
    let (status, body) = call(router, "/api/materials", Some("Bearer valid-abc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "dave:ROLE_AUDITOR");
    assert_eq!(identity.calls(), 0);
}
