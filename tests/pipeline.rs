//! Integration tests for the node_atlas pipeline.
//!
//! The registry is served by a local `httptest` server and the GeoIP database
//! is an in-memory `CityDatabase`, so no test touches the network or needs a
//! GeoLite2 file.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use node_atlas::initialization::init_client;
use node_atlas::registry::fetch_snapshot;
use node_atlas::{
    CityDatabase, CityRecord, Config, DatabaseOpener, FetchError, FilterPolicy, GeoResolver,
    LookupFault, NodePipeline, OpenFuture,
};

#[derive(Clone, Default)]
struct FakeCityDatabase {
    records: HashMap<String, CityRecord>,
}

impl FakeCityDatabase {
    fn with(mut self, ip: &str, lat: f64, lng: f64, city: &str, country: &str) -> Self {
        self.records.insert(
            ip.to_string(),
            CityRecord {
                latitude: Some(lat),
                longitude: Some(lng),
                city: Some(city.to_string()),
                country: Some(country.to_string()),
            },
        );
        self
    }
}

impl CityDatabase for FakeCityDatabase {
    fn get(&self, address: &str) -> Result<Option<CityRecord>, LookupFault> {
        Ok(self.records.get(address).cloned())
    }
}

struct FakeOpener {
    database: Option<FakeCityDatabase>,
    calls: AtomicUsize,
}

impl FakeOpener {
    fn new(database: Option<FakeCityDatabase>) -> Arc<Self> {
        Arc::new(Self {
            database,
            calls: AtomicUsize::new(0),
        })
    }
}

impl DatabaseOpener for FakeOpener {
    fn open(&self) -> OpenFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let database = self.database.clone();
        Box::pin(async move {
            match database {
                Some(db) => Ok(Arc::new(db) as Arc<dyn CityDatabase>),
                None => anyhow::bail!("Failed to read GeoIP database from missing.mmdb"),
            }
        })
    }
}

fn registry_body() -> serde_json::Value {
    json!({
        "network": { "current_height": 600, "block_timestamp": 1_000_000 },
        "nodes": [
            {
                "public_ip": "10.0.0.1", "active": true, "last_uptime_proof": 1_000_000,
                "events": [{ "name": "NewServiceNodeV2" }]
            },
            {
                "public_ip": "10.0.0.2", "active": false, "last_uptime_proof": 1_000_000,
                "events": [{ "name": "NewSeededServiceNode" }]
            },
            {
                "public_ip": "10.0.0.3", "active": true, "last_uptime_proof": 1_000_000,
                "events": [{ "name": "NewServiceNodeV2" }]
            },
            {
                "public_ip": "10.0.0.4", "active": true, "last_uptime_proof": 1_000_000,
                "exit_type": "exit",
                "events": [{ "name": "ServiceNodeExit" }, { "name": "NewServiceNodeV2" }]
            },
            {
                "public_ip": "203.0.113.9", "active": true, "last_uptime_proof": 1_000_000,
                "events": [{ "name": "RewardsClaimed" }, { "name": "NewServiceNodeV2" }]
            }
        ]
    })
}

fn database() -> FakeCityDatabase {
    FakeCityDatabase::default()
        .with("10.0.0.1", 52.52, 13.40, "Berlin", "Germany")
        .with("10.0.0.2", 52.50, 13.38, "Berlin", "Germany")
        .with("10.0.0.3", 35.68, 139.69, "Tokyo", "Japan")
        .with("10.0.0.4", 40.71, -74.00, "New York", "United States")
}

fn pipeline_for(server: &Server, opener: Arc<FakeOpener>) -> NodePipeline {
    let config = Config {
        registry_url: server.url_str("/api/ssb/nodes"),
        filter: FilterPolicy::State,
        ..Default::default()
    };
    let client = init_client(&config).expect("Failed to build HTTP client");
    NodePipeline::new(&config, client, Arc::new(GeoResolver::new(opener)))
}

#[tokio::test]
async fn test_get_nodes_bins_present_nodes() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .respond_with(json_encoded(registry_body())),
    );
    let pipeline = pipeline_for(&server, FakeOpener::new(Some(database())));

    let outcome = pipeline.get_nodes().await;
    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error());
    let bins = outcome.into_result().expect("bins");

    // The exited node is filtered out before geolocation
    assert_eq!(bins.len(), 3);
    assert_eq!(bins[0].city.as_deref(), Some("Berlin"));
    assert_eq!((bins[0].n, bins[0].n_active), (2, 1));
    assert_eq!(bins[1].city.as_deref(), Some("Tokyo"));
    assert!(bins[2].is_unknown());
    assert_eq!((bins[2].n, bins[2].n_active), (1, 1));

    let total: usize = bins.iter().map(|b| b.n).sum();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_get_nodes_twice_is_identical_and_opens_once() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .times(2)
            .respond_with(json_encoded(registry_body())),
    );
    let opener = FakeOpener::new(Some(database()));
    let pipeline = pipeline_for(&server, opener.clone());

    let first = pipeline.get_nodes().await;
    let second = pipeline.get_nodes().await;

    assert!(first.is_ok());
    assert_eq!(first, second);
    assert_eq!(opener.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_runs_share_one_open() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .times(3)
            .respond_with(json_encoded(registry_body())),
    );
    let opener = FakeOpener::new(Some(database()));
    let pipeline = pipeline_for(&server, opener.clone());

    let (a, b, c) = tokio::join!(pipeline.get_nodes(), pipeline.get_nodes(), pipeline.get_nodes());

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(opener.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_geoip_failure_is_reported_without_fetching() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .times(0)
            .respond_with(json_encoded(registry_body())),
    );
    let opener = FakeOpener::new(None);
    let pipeline = pipeline_for(&server, opener.clone());

    let outcome = pipeline.get_nodes().await;
    let error = outcome.error().expect("init failure must be reported");
    assert!(error.contains("missing.mmdb"), "got: {error}");
    assert!(outcome.value().is_none());

    // A failed attempt is not cached; the next run retries
    let _ = pipeline.get_nodes().await;
    assert_eq!(opener.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_registry_error_status_is_reported() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .respond_with(status_code(500).body("upstream down")),
    );
    let pipeline = pipeline_for(&server, FakeOpener::new(Some(database())));

    let outcome = pipeline.get_nodes().await;
    let error = outcome.error().expect("status 500 must be reported");
    assert!(error.contains("status 500"), "got: {error}");
    assert!(pipeline.resolver().is_initialized());
}

#[tokio::test]
async fn test_get_nodes_unsafe_propagates_error() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .respond_with(json_encoded(json!({ "network": { "current_height": 1, "block_timestamp": 0 } }))),
    );
    let pipeline = pipeline_for(&server, FakeOpener::new(Some(database())));

    let err = pipeline
        .get_nodes_unsafe()
        .await
        .expect_err("missing nodes array must fail");
    let fetch = err.downcast_ref::<FetchError>().expect("FetchError in chain");
    assert!(matches!(fetch, FetchError::InvalidFormat));
}

#[tokio::test]
async fn test_uptime_policy_keeps_recent_proofs() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .respond_with(json_encoded(json!({
                "network": { "current_height": 600, "block_timestamp": 1_000_000 },
                "nodes": [
                    { "public_ip": "10.0.0.1", "active": true, "last_uptime_proof": 999_000 },
                    { "public_ip": "10.0.0.3", "active": true, "last_uptime_proof": 1_000_000 - 49 * 3600 }
                ]
            }))),
    );
    let config = Config {
        registry_url: server.url_str("/api/ssb/nodes"),
        filter: FilterPolicy::Uptime,
        uptime_window_hours: 48,
        ..Default::default()
    };
    let client = init_client(&config).expect("client");
    let resolver = Arc::new(GeoResolver::new(FakeOpener::new(Some(database()))));
    let pipeline = NodePipeline::new(&config, client, resolver);

    let bins = pipeline.get_nodes().await.into_result().expect("bins");
    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0].city.as_deref(), Some("Berlin"));
}

#[tokio::test]
async fn test_fetch_snapshot_parses_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/nodes"))
            .respond_with(json_encoded(registry_body())),
    );
    let client = reqwest::Client::new();

    let snapshot = fetch_snapshot(&client, &server.url_str("/nodes"))
        .await
        .expect("valid snapshot");
    assert_eq!(snapshot.network.current_height, 600);
    assert_eq!(snapshot.nodes.len(), 5);
    assert_eq!(snapshot.nodes[3].events.len(), 2);
}

#[tokio::test]
async fn test_fetch_snapshot_rejects_non_json() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/nodes"))
            .respond_with(status_code(200).body("<html>maintenance</html>")),
    );
    let client = reqwest::Client::new();

    let err = fetch_snapshot(&client, &server.url_str("/nodes"))
        .await
        .expect_err("HTML must not parse");
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_serialized_bins_match_wire_shape() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/ssb/nodes"))
            .respond_with(json_encoded(registry_body())),
    );
    let pipeline = pipeline_for(&server, FakeOpener::new(Some(database())));

    let outcome = pipeline.get_nodes().await;
    let wire = serde_json::to_value(&outcome).expect("serializable");

    assert!(wire[0].is_null());
    assert_eq!(
        wire[1][0],
        json!({
            "lat": 52.52, "lng": 13.40, "city": "Berlin", "country": "Germany", "n": 2, "nActive": 1
        })
    );
    assert_eq!(wire[1][2]["city"], "Unknown");
}
