//! Tests for the configuration depot handler.

use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};
use salvo::{Depot, Router, Service, handler};

use super::*;

fn settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 2,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8697,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
        venue: VenueConfig {
            rooms: vec!["Oost".to_string(), "West".to_string()],
        },
        sync: SyncConfig {
            enabled: false,
            webhook_url: None,
            max_attempts: 8,
            batch_size: 25,
            poll_interval_secs: 5,
            request_timeout_secs: 10,
        },
    }
}

#[handler]
async fn bind_addr(depot: &Depot) -> String {
    get_config_from_depot(depot)
        .map(|settings| settings.server.bind_addr())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_config_handler_injects_settings() {
    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::new(settings()),
        })
        .push(Router::with_path("addr").get(bind_addr));
    let service = Service::new(router);

    let mut res = TestClient::get("http://127.0.0.1:5800/addr")
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(res.take_string().await.unwrap(), "127.0.0.1:8697");
}

#[test]
fn test_missing_config_is_an_invariant_violation() {
    let depot = Depot::new();
    assert!(matches!(
        get_config_from_depot(&depot),
        Err(AppError::CoreError(
            zaalplan_core::error::CoreError::InvariantViolation(_)
        ))
    ));
}
