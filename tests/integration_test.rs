//! Integration tests for the plaktaki server
//!
//! End-to-end coverage over a real temp-dir database and blob store:
//! - planner service flows (pages, canvas, entries, smudges)
//! - the HTTP surface, including the admin session guard

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use plaktaki::app::AppState;
use plaktaki::auth::{hash_password, AdminAuth};
use plaktaki::database::{create_pool, Repository};
use plaktaki::http;
use plaktaki::storage::BlobStore;

const ADMIN_PASSWORD: &str = "test-sifre";

async fn test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let pool = create_pool(&temp_dir.path().join("test.db")).await.unwrap();
    let repo = Repository::new(pool);

    let blobs = BlobStore::new(temp_dir.path().join("blobs"));
    blobs.initialize().await.unwrap();

    let auth = AdminAuth::new(hash_password(ADMIN_PASSWORD).unwrap());

    (AppState::new(repo, blobs, auth), temp_dir)
}

async fn test_router() -> (Router, TempDir) {
    let (state, temp_dir) = test_state().await;
    (http::router(state), temp_dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in and return the admin session cookie.
async fn admin_cookie(router: &Router) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            json!({ "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_canvas_save_clamps_and_overwrites() {
    let (router, _temp) = test_router().await;

    let save = |x: f64, y: f64| {
        json_request(
            "PUT",
            "/api/planner/canvas",
            json!({
                "year": 2026,
                "month": 3,
                "items": [
                    { "page": "left", "item_kind": "sticker", "item_key": "cat-1", "x": x, "y": y }
                ]
            }),
        )
    };

    let response = router.clone().oneshot(save(-0.4, 1.9)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(response).await;
    assert_eq!(saved[0]["x"], json!(0.0));
    assert_eq!(saved[0]["y"], json!(1.0));

    // Re-save the same key: overwrite, not duplicate.
    router.clone().oneshot(save(0.5, 0.5)).await.unwrap();

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/canvas?year=2026&month=3"))
        .await
        .unwrap();
    let items = body_json(response).await;

    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["x"], json!(0.5));
}

#[tokio::test]
async fn test_canvas_list_without_page_is_empty_list() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/canvas?year=2031&month=11"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_canvas_bad_month_is_400() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/canvas?year=2026&month=13"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_entry_with_media_urls() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/entry",
            json!({
                "date": "2026-03-15",
                "title": "Plak günü",
                "media_urls": ["http://x/1.jpg", "http://x/2.jpg"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let media = created["media"].as_array().unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0]["url"], json!("http://x/1.jpg"));
    assert_eq!(media[1]["url"], json!("http://x/2.jpg"));

    // Day detail shows the entry with its media.
    let response = router
        .clone()
        .oneshot(get_request("/api/planner/entries/2026-03-15"))
        .await
        .unwrap();
    let detail = body_json(response).await;
    assert_eq!(detail.as_array().unwrap().len(), 1);
    assert_eq!(detail[0]["media"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_month_summary_over_http() {
    let (router, _temp) = test_router().await;

    for date in ["2026-03-15", "2026-03-15", "2026-03-20"] {
        router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/planner/entry",
                json!({ "date": date, "title": "Kayıt" }),
            ))
            .await
            .unwrap();
    }

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/entries?year=2026&month=3"))
        .await
        .unwrap();
    let summary = body_json(response).await;

    assert_eq!(summary.as_array().unwrap().len(), 2);
    assert_eq!(summary[0]["date"], json!("2026-03-15"));
    assert_eq!(summary[0]["entry_count"], json!(2));
}

#[tokio::test]
async fn test_entry_patch_and_media_attachment_clear() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/entry",
            json!({
                "date": "2026-03-15",
                "media": [
                    { "url": "http://x/1.jpg", "attachment_type": "paperclip" }
                ]
            }),
        ))
        .await
        .unwrap();
    let created = body_json(response).await;
    let entry_id = created["id"].as_str().unwrap().to_string();
    let media_id = created["media"][0]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/planner/entry/{}", entry_id),
            json!({ "mood": "calm" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["mood"], json!("calm"));

    // Empty string clears the attachment visual.
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/planner/media/{}", media_id),
            json!({ "attachment_type": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["attachment_type"], Value::Null);
}

#[tokio::test]
async fn test_day_entry_upsert_by_date() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/planner/day-entries",
            json!({ "date": "2026-03-15", "title": "İlk" }),
        ))
        .await
        .unwrap();
    let first = body_json(response).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/planner/day-entries",
            json!({ "date": "2026-03-15", "mood": "happy" }),
        ))
        .await
        .unwrap();
    let second = body_json(response).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["title"], json!("İlk"));
    assert_eq!(second["mood"], json!("happy"));

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/day-entries/2026-03-15"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["id"], first["id"]);
}

#[tokio::test]
async fn test_invalid_date_is_400() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/entries/2026-13-40"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_smudge_lifecycle_over_http() {
    let (router, _temp) = test_router().await;

    // Empty body: everything randomized within its range.
    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/planner/smudge/2026-03-15", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let smudge = body_json(response).await;
    let x = smudge["x"].as_f64().unwrap();
    let y = smudge["y"].as_f64().unwrap();
    let opacity = smudge["opacity"].as_f64().unwrap();
    assert!((0.2..=0.8).contains(&x));
    assert!((0.3..=0.8).contains(&y));
    assert!((0.1..=0.25).contains(&opacity));

    // Explicit opacity is clamped.
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/smudge/2026-03-15",
            json!({ "opacity": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["opacity"], json!(1.0));

    // Month decor lists it, delete clears it.
    let response = router
        .clone()
        .oneshot(get_request("/api/planner/decor?year=2026&month=3"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/planner/smudge/2026-03-15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/smudge/2026-03-15"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, Value::Null);
}

#[tokio::test]
async fn test_smudge_rejects_malformed_body() {
    let (router, _temp) = test_router().await;

    // A type error is a 400, not an implicit "randomize everything".
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/smudge/2026-03-15",
            json!({ "opacity": "high" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/planner/smudge/2026-03-15")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Neither request persisted anything.
    let response = router
        .clone()
        .oneshot(get_request("/api/planner/smudge/2026-03-15"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, Value::Null);

    // A body-less POST still randomizes.
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/planner/smudge/2026-03-15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_padded_entry_date_is_400() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/entry",
            json!({ "date": "2026-3-15", "title": "Kayıt" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing readable was created under either spelling of the month.
    let response = router
        .clone()
        .oneshot(get_request("/api/planner/entries?year=2026&month=3"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let (router, _temp) = test_router().await;

    let guarded = [
        json_request("POST", "/api/planner/admin/items", json!({})),
        get_request("/api/planner/admin/pages?year=2026&month=3"),
        json_request("PATCH", "/api/settings", json!({})),
    ];

    for request in guarded {
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_wrong_password_is_401() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            json!({ "password": "yanlis" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_item_crud_with_session() {
    let (router, _temp) = test_router().await;
    let cookie = admin_cookie(&router).await;

    // Get-or-create the page first.
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/planner/admin/pages?year=2026&month=3")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["title"], json!("Mart 2026"));
    let page_id = page["id"].as_str().unwrap().to_string();

    // Create an item.
    let mut request = json_request(
        "POST",
        "/api/planner/admin/items",
        json!({
            "page_id": page_id,
            "page_side": "left",
            "item_type": "polaroid",
            "asset_url": "/media/abc",
            "x": 0.3, "y": 0.4, "z_index": 2
        }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await;
    let item_id = item["id"].as_str().unwrap().to_string();

    // Unknown item type is rejected.
    let mut request = json_request(
        "POST",
        "/api/planner/admin/items",
        json!({ "page_id": page_id, "item_type": "hologram" }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Patch, then delete.
    let mut request = json_request(
        "PATCH",
        &format!("/api/planner/admin/items/{}", item_id),
        json!({ "x": 0.9 }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(body_json(response).await["x"], json!(0.9));

    let mut request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/planner/admin/items/{}", item_id))
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_spread_elements_replace() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(get_request("/api/planner/spreads?year=2026&month=5"))
        .await
        .unwrap();
    let spread = body_json(response).await;
    assert_eq!(spread["title"], json!("Mayıs 2026"));
    let spread_id = spread["id"].as_str().unwrap().to_string();

    let elements_uri = format!("/api/planner/spreads/{}/elements", spread_id);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &elements_uri,
            json!([
                { "item_type": "sticker", "x": 0.1, "y": 0.2 },
                { "item_type": "tape", "x": 0.5, "y": 0.6 }
            ]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Replace with one element: the other row is gone.
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &elements_uri,
            json!([{ "item_type": "doodle" }]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.clone().oneshot(get_request(&elements_uri)).await.unwrap();
    let elements = body_json(response).await;
    assert_eq!(elements.as_array().unwrap().len(), 1);
    assert_eq!(elements[0]["item_type"], json!("doodle"));
}

#[tokio::test]
async fn test_upload_and_serve_media() {
    let (router, _temp) = test_router().await;
    let cookie = admin_cookie(&router).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/planner/admin/upload?filename=kapak.png&mime=image/png")
        .header(header::COOKIE, &cookie)
        .body(Body::from(&b"fake png bytes"[..]))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let uploaded = body_json(response).await;
    let url = uploaded["url"].as_str().unwrap().to_string();

    let response = router.clone().oneshot(get_request(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"fake png bytes");
}

#[tokio::test]
async fn test_entry_upload_creates_media_row() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/planner/entry",
            json!({ "date": "2026-03-15", "title": "Video günü" }),
        ))
        .await
        .unwrap();
    let entry = body_json(response).await;
    let entry_id = entry["id"].as_str().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri(format!(
            "/api/planner/upload?entry_id={}&filename=klip.mp4&mime=video/mp4",
            entry_id
        ))
        .body(Body::from(&b"fake mp4 bytes"[..]))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let media = body_json(response).await;
    assert_eq!(media["media_type"], json!("video"));
    assert!(media["url"].as_str().unwrap().starts_with("/media/"));
}

#[tokio::test]
async fn test_settings_get_and_patch() {
    let (router, _temp) = test_router().await;

    let response = router
        .clone()
        .oneshot(get_request("/api/settings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["site_title"],
        json!("Plaktaki Kitap")
    );

    let cookie = admin_cookie(&router).await;
    let mut request = json_request(
        "PATCH",
        "/api/settings",
        json!({ "tagline": "filmler, kitaplar, plaklar" }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let patched = body_json(response).await;
    assert_eq!(patched["tagline"], json!("filmler, kitaplar, plaklar"));
    assert_eq!(patched["site_title"], json!("Plaktaki Kitap"));
}
