//! HTTP surface tests against a live listener.

use std::path::Path;

use airs_server::{create_router, AppState};
use tokio::net::TcpListener;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn build_tree(root: &Path) {
    write(
        root,
        "wakeup-intents.yaml",
        "intents: [session.start]\naliases:\n  session.start: [boot]\n",
    );
    write(
        root,
        "flows/routing.yaml",
        "strategies:\n  - match: {by: intent, value: session.start}\n    route: {flow: CORE-01:onboarding}\n",
    );
    write(
        root,
        "flows/registry.yaml",
        "registry:\n  CORE-01:\n    file: bricks/core.yaml\n    exports: [onboarding]\n",
    );
    write(
        root,
        "flows/bricks/core.yaml",
        concat!(
            "id: CORE-01\n",
            "flows:\n",
            "  onboarding:\n",
            "    sequence:\n",
            "      - name: intake\n",
            "        requires_caps: [cap.intake]\n",
        ),
    );
    write(
        root,
        "flows/capabilities.yaml",
        "capabilities:\n  cap.intake: [Data Engineer]\n",
    );
    write(
        root,
        "agents/clients/acme/data-engineer/onboarding.yaml",
        "role: data-engineer\n",
    );
}

/// Bind an ephemeral port, serve the app in the background, return base URL.
async fn spawn_app(root: &Path) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(root));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn ping_reports_ok_and_root() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;

    let resp = reqwest::get(format!("{base}/ping")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(body["root"].as_str().unwrap().contains(
        dir.path().file_name().unwrap().to_str().unwrap()
    ));
}

#[tokio::test]
async fn unknown_path_returns_json_404() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;

    let resp = reqwest::get(format!("{base}/nope")).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn resolve_end_to_end_over_http() {
    let dir = tempfile::tempdir().unwrap();
    build_tree(dir.path());
    let base = spawn_app(dir.path()).await;

    let resp = reqwest::get(format!("{base}/resolve?term=boot&client=acme"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["intent"], "session.start");
    assert_eq!(body["flow_ref"], "CORE-01:onboarding");
    assert_eq!(body["recommended_roles"][0], "Data Engineer");
    assert_eq!(body["candidate_agents"][0]["client"], "acme");
}

#[tokio::test]
async fn resolve_on_broken_tree_returns_classified_500() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;

    let resp = reqwest::get(format!("{base}/resolve?intent=x")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("missing_artifact: "));
}

#[tokio::test]
async fn catalog_and_lookup_marshal_query_parameters() {
    let dir = tempfile::tempdir().unwrap();
    build_tree(dir.path());
    let base = spawn_app(dir.path()).await;

    let resp = reqwest::get(format!("{base}/catalog?facet=agent&client=acme"))
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["counts"]["total"], 1);
    assert_eq!(body["items"][0]["facet"], "agent");

    let resp = reqwest::get(format!("{base}/lookup?term=boot")).await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["term"], "boot");
    assert_eq!(body["intent"], "session.start");

    // A missing term parameter resolves to nothing rather than erroring.
    let resp = reqwest::get(format!("{base}/lookup")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["intent"], serde_json::Value::Null);
}
