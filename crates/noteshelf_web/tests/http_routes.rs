use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use noteshelf_core::db::open_db_in_memory;
use noteshelf_core::{FeatureFlags, Note, NoteRepository, SqliteNoteRepository};
use noteshelf_web::{build_router, AppState, HttpServer, WebError, INDEX_HEADING};
use tower::ServiceExt;

fn router_with_notes(names: &[&str], flags: FeatureFlags) -> Router {
    let conn = open_db_in_memory().expect("in-memory db");
    {
        let repo = SqliteNoteRepository::try_new(&conn).expect("repo");
        for name in names {
            repo.save(&mut Note::new(*name)).expect("seed note");
        }
    }
    build_router(AppState::new(conn, flags))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, String::from_utf8_lossy(&body).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn index_without_notes_returns_heading() {
    let app = router_with_notes(&[], FeatureFlags::default());
    let (status, body) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(INDEX_HEADING));
    assert!(body.contains("<h1>Notes</h1>"));
}

#[tokio::test]
async fn index_lists_every_persisted_name() {
    let app = router_with_notes(&["First Note", "Second Note"], FeatureFlags::default());
    let (status, body) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("First Note"));
    assert!(body.contains("Second Note"));
    assert!(body.find("First Note").unwrap() < body.find("Second Note").unwrap());
}

#[tokio::test]
async fn index_responds_with_html() {
    let app = router_with_notes(&[], FeatureFlags::default());
    let response = app.oneshot(get("/")).await.expect("response");
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn post_then_list_notes_as_json() {
    let conn = open_db_in_memory().expect("in-memory db");
    let app = build_router(AppState::new(conn, FeatureFlags::default()));

    let create = Request::builder()
        .uri("/notes")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"From JSON"}"#))
        .expect("request");
    let (status, body) = send(app.clone(), create).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["name"], "From JSON");
    assert!(created["id"].is_string());

    let (status, body) = send(app.clone(), get("/notes")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);

    let (_, page) = send(app, get("/")).await;
    assert!(page.contains("From JSON"));
}

#[tokio::test]
async fn post_without_name_is_rejected() {
    let app = router_with_notes(&[], FeatureFlags::default());
    let request = Request::builder()
        .uri("/notes")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"wrong field"}"#))
        .expect("request");
    let (status, _) = send(app, request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn health_reports_captured_flag() {
    let off = router_with_notes(&[], FeatureFlags::default());
    let (status, body) = send(off, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["dependency_upgraded_next"], false);
    assert_eq!(health["dependency_path"], "current");

    let on = router_with_notes(
        &[],
        FeatureFlags {
            dependency_upgraded_next: true,
        },
    );
    let (_, body) = send(on, get("/health")).await;
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["dependency_upgraded_next"], true);
    assert_eq!(health["dependency_path"], "next");
}

#[tokio::test]
async fn broken_store_fails_the_request() {
    let conn = open_db_in_memory().expect("in-memory db");
    conn.execute_batch("DROP TABLE notes;").expect("drop table");
    let app = build_router(AppState::new(conn, FeatureFlags::default()));

    let (status, _) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn server_keeps_configured_bind_addr() {
    let conn = open_db_in_memory().expect("in-memory db");
    let server = HttpServer::new(AppState::new(conn, FeatureFlags::default()), "127.0.0.1:0");
    assert_eq!(server.bind_addr(), "127.0.0.1:0");
    let _router = server.router();
}

#[tokio::test]
async fn index_recovers_after_store_work_panics() {
    let conn = open_db_in_memory().expect("in-memory db");
    let state = AppState::new(conn, FeatureFlags::default());
    state
        .with_notes(|service| service.create_note("Survivor"))
        .await
        .expect("seed note");

    let panicked = state
        .with_notes(|_| -> Result<(), noteshelf_core::NoteServiceError> { panic!("boom") })
        .await;
    assert!(matches!(panicked, Err(WebError::Worker(_))));

    let app = build_router(state.clone());
    for _ in 0..3 {
        let (status, body) = send(app.clone(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Survivor"));
    }

    let count = state
        .with_notes(|service| Ok(service.count_notes()?))
        .await
        .expect("count after recovery");
    assert_eq!(count, 1);
}
