use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use section_core::SearchConfig;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

const CORPUS: &str = "\
section_id,section_title,chapter_title,law_text,punishment_text,keywords
299,Culpable homicide,Offences Affecting Life,Whoever causes death by doing an act with the intention of causing death commits culpable homicide.,,homicide
302,Murder,Offences Affecting Life,Whoever commits murder shall be punished with death or imprisonment for life.,Death or imprisonment for life,murder killing
302A,Murder by life convict,Offences Affecting Life,Whoever being under sentence of imprisonment for life commits murder shall be punished with death.,Death,
378,Theft,Of Theft,\"Whoever, intending to take dishonestly any movable property out of the possession of any person, commits theft.\",,theft stealing
379,Punishment for theft,Of Theft,Whoever commits theft shall be punished with imprisonment for a term which may extend to three years.,Three years,theft
";

fn app() -> (tempfile::TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sections.csv");
    fs::write(&path, CORPUS).unwrap();
    let app = section_server::build_app(path.to_str().unwrap(), SearchConfig::default()).unwrap();
    (dir, app)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (_dir, app) = app();
    let (status, json) = get(app, "/search?q=murder&k=3").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert!(!arr.is_empty() && arr.len() <= 3);
    assert_eq!(arr[0]["id"], "302");
    assert_eq!(arr[0]["group"], "Offences Affecting Life");
    assert!(arr[0]["snippet"].as_str().unwrap().contains("murder"));
}

#[tokio::test]
async fn post_search_uses_numeric_fast_path() {
    let (_dir, app) = app();
    let req = Request::post("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "302", "top_k": 5}"#))
        .unwrap();
    let (status, json) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["id"], "302");
}

#[tokio::test]
async fn unknown_terms_return_no_results() {
    let (_dir, app) = app();
    let (_, json) = get(app, "/search?q=zzzznonexistentterm").await;
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn autocomplete_matches_titles_and_ids() {
    let (_dir, app) = app();
    let (status, json) = get(app.clone(), "/autocomplete?q=mur").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json.as_array().unwrap().iter().map(|v| v["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["302", "302A"]);

    let (_, json) = get(app.clone(), "/autocomplete?q=m").await;
    assert!(json.as_array().unwrap().is_empty());

    let (_, json) = get(app, "/autocomplete?q=37&limit=1").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Theft");
}

#[tokio::test]
async fn section_detail_and_not_found() {
    let (_dir, app) = app();
    let (status, json) = get(app.clone(), "/section/302A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Murder by life convict");
    assert_eq!(json["sanction_text"], "Death");
    assert_eq!(json["proviso"], "");

    let (status, json) = get(app, "/section/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}

#[test]
fn duplicate_ids_abort_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    fs::write(&path, "section_id,section_title\n302,Murder\n302,Murder again\n").unwrap();
    let err = section_server::build_app(path.to_str().unwrap(), SearchConfig::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate identifier"));
}
