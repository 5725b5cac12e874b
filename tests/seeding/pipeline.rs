use std::path::Path;

use serde_json::Value;
use shortlink_seeder::config::Config;
use shortlink_seeder::dataset::{Dataset, Distribution};
use shortlink_seeder::runner::{generate, inspect};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fake_service::{healthy_server, mount_create, server_with_health, CreateResponder};

fn config_for(base_url: &str, count: usize, output: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.target.base_url = base_url.to_string();
    cfg.dataset.count = count;
    cfg.dataset.output = output.to_path_buf();
    cfg.dataset.seed = Some(2024);
    cfg
}

async fn post_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn seeds_partitions_and_writes_dataset() {
    let server = healthy_server().await;
    mount_create(&server, CreateResponder::new(vec![5, 17])).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out").join("step1-dataset.json");

    let summary = generate(&config_for(&server.uri(), 200, &output)).await.unwrap();

    assert_eq!(summary.requested, 200);
    assert_eq!(summary.created, 198);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.seed, 2024);
    assert_eq!(
        summary.distribution,
        Distribution {
            hot: 2,
            warm: 18,
            cold: 178,
            invalid: 4
        }
    );

    let dataset = inspect(&output).unwrap();
    assert_eq!(dataset.metadata.total_urls, 198);
    let hot: Vec<&str> = dataset.data.hot.iter().map(|e| e.short_code.as_str()).collect();
    assert_eq!(hot, vec!["S00000", "S00001"]);
    // Call 5 was rejected, so the fourth warm entry comes from call 6.
    assert_eq!(dataset.data.warm[3].short_code, "S00006");
    assert_eq!(dataset.data.invalid.first().unwrap(), "INVALID000000");
    assert_eq!(dataset.data.invalid.last().unwrap(), "INVALID000003");

    let bodies = post_bodies(&server).await;
    assert_eq!(bodies.len(), 200);
    assert!(bodies[0]["alias"].is_null());
    assert!(bodies[0]["expirationDate"].is_null());
    assert!(bodies[7]["originalUrl"].as_str().unwrap().contains("/test/7/"));
    assert_eq!(
        dataset.data.hot[0].original_url,
        bodies[0]["originalUrl"].as_str().unwrap()
    );
}

#[tokio::test]
async fn unhealthy_service_aborts_before_seeding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    let err = generate(&config_for(&server.uri(), 10, &output)).await.unwrap_err();

    assert!(err.to_string().contains("not available"), "{err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn health_requires_exactly_ok() {
    let server = server_with_health(ResponseTemplate::new(204)).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    let err = generate(&config_for(&server.uri(), 3, &output)).await.unwrap_err();

    assert!(err.to_string().contains("not available"), "{err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn any_success_status_counts_as_created() {
    let server = healthy_server().await;
    mount_create(&server, CreateResponder::new(Vec::new()).with_success_status(200)).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    let summary = generate(&config_for(&server.uri(), 3, &output)).await.unwrap();

    assert_eq!(summary.created, 3);
    assert_eq!(summary.failed, 0);
    assert!(output.exists());
}

#[tokio::test]
async fn oversized_count_is_rejected_without_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_for(&server.uri(), usize::MAX / 2, &dir.path().join("dataset.json"));

    assert!(generate(&cfg).await.is_err());
}

#[tokio::test]
async fn nothing_created_is_fatal() {
    let server = healthy_server().await;
    mount_create(&server, CreateResponder::new((0..10).collect())).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    let err = generate(&config_for(&server.uri(), 10, &output)).await.unwrap_err();

    assert!(err.to_string().contains("no URLs were created"), "{err}");
    assert!(!output.exists());
}

#[tokio::test]
async fn success_without_short_code_is_skipped() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("dataset.json");

    let err = generate(&config_for(&server.uri(), 3, &output)).await.unwrap_err();
    assert!(err.to_string().contains("no URLs were created"), "{err}");
}

#[tokio::test]
async fn same_seed_reproduces_original_urls() {
    let dir = tempfile::tempdir().unwrap();
    let mut runs = Vec::new();
    for name in ["a.json", "b.json"] {
        let server = healthy_server().await;
        mount_create(&server, CreateResponder::new(Vec::new())).await;
        let output = dir.path().join(name);
        generate(&config_for(&server.uri(), 30, &output)).await.unwrap();
        runs.push(Dataset::read_from(&output).unwrap());
    }

    let urls = |d: &Dataset| -> Vec<String> {
        d.data
            .hot
            .iter()
            .chain(&d.data.warm)
            .chain(&d.data.cold)
            .map(|e| e.original_url.clone())
            .collect()
    };
    assert_eq!(urls(&runs[0]), urls(&runs[1]));
}

#[tokio::test]
async fn invalid_config_is_rejected_without_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_for(&server.uri(), 10, &dir.path().join("dataset.json"));
    cfg.distribution.hot_percent = 50;
    cfg.distribution.warm_percent = 5;

    assert!(generate(&cfg).await.is_err());
}
