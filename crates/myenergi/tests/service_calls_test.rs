// End-to-end service calls against a mocked s18 API, using only the public API.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

use myenergi::platform::Entity;
use myenergi::platform::StateUpdateReceiver;
use myenergi::platform::StateUpdateSender;
use myenergi::vendor::Client;
use myenergi::vendor::Connection;
use myenergi::vendor::Coordinator;
use myenergi::vendor::Device;
use myenergi::BoxError;
use myenergi::ConfigEntry;
use myenergi::Error;
use myenergi::MyenergiEntity;
use myenergi::MyenergiHub;

struct Zappi;

#[async_trait]
impl Device for Zappi {
    fn serial_number(&self) -> &str {
        "16000001"
    }

    fn name(&self) -> &str {
        "Driveway"
    }

    fn kind(&self) -> &str {
        "zappi"
    }

    fn firmware_version(&self) -> &str {
        "3560S3.142"
    }

    async fn start_boost(&self, _amount: f64) -> Result<(), BoxError> {
        Ok(())
    }

    async fn manual_boost(&self, _target: &str, _time: f64) -> Result<(), BoxError> {
        Ok(())
    }

    async fn start_smart_boost(&self, _amount: f64, _when: &str) -> Result<(), BoxError> {
        Ok(())
    }

    async fn stop_boost(&self) -> Result<(), BoxError> {
        Ok(())
    }

    async fn unlock(&self) -> Result<(), BoxError> {
        Ok(())
    }

    async fn set_charge_target(&self, _chargetarget: f64) -> Result<(), BoxError> {
        Ok(())
    }
}

struct AppConnection {
    password: Option<String>,
    refreshes: AtomicUsize,
    http: reqwest::Client,
}

impl Connection for AppConnection {
    fn app_email(&self) -> Option<&str> {
        Some("owner@example.com")
    }

    fn app_password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn check_and_update_token(&self) -> Result<(), BoxError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn access_token(&self) -> String {
        format!("token-{}", self.refreshes.load(Ordering::SeqCst))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(2)
    }

    fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

struct HubClient {
    connection: Arc<AppConnection>,
}

impl Client for HubClient {
    fn serial_number(&self) -> &str {
        "10000001"
    }

    fn site_name(&self) -> &str {
        "Cottage"
    }

    fn connection(&self) -> Arc<dyn Connection> {
        self.connection.clone()
    }
}

struct TestCoordinator {
    client: HubClient,
    tx: StateUpdateSender,
}

impl Coordinator for TestCoordinator {
    fn client(&self) -> &dyn Client {
        &self.client
    }

    fn state_updates(&self) -> &StateUpdateSender {
        &self.tx
    }
}

fn setup(
    base_url: &str,
    password: Option<&str>,
) -> (Arc<TestCoordinator>, Arc<ConfigEntry>, StateUpdateReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let coordinator = TestCoordinator {
        client: HubClient {
            connection: Arc::new(AppConnection {
                password: password.map(String::from),
                refreshes: AtomicUsize::new(0),
                http: reqwest::Client::new(),
            }),
        },
        tx,
    };

    let entry: ConfigEntry = format!(
        "entry_id = \"01JHW3K8\"\ntitle = \"Cottage\"\n\n[options]\ns18_base_url = \"{}\"\n",
        base_url
    )
    .parse()
    .unwrap();

    (Arc::new(coordinator), Arc::new(entry), rx)
}

#[tokio::test]
async fn test_super_schedule_slot_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/devices/ZA16000001/super-schedule"))
        .and(header("Authorization", "Bearer token-1"))
        .and(body_json(json!({
            "chargeSchedules": [{
                "startTime": "2026-01-15T22:00:00.000Z",
                "endTime": "2026-01-16T06:00:00.000Z",
                "mode": "MODE_ECO_PLUS",
                "chargeRateWatts": 3500,
                "energyTargetWh": 10000
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (coordinator, entry, mut rx) = setup(&server.uri(), Some("hunter2"));
    let entity = MyenergiEntity::new(coordinator, Arc::new(Zappi), entry, None);

    myenergi::call_service(
        &entity,
        "myenergi_set_super_schedule_slot",
        json!({
            "entity_id": "select.myenergi_driveway_charge_mode",
            "start_time": "2026-01-15T22:00:00.000Z",
            "end_time": "2026-01-16T06:00:00.000Z",
            "mode": "MODE_ECO_PLUS",
            "charge_rate_watts": 3500.0,
            "energy_target_wh": 10000.0,
        }),
    )
    .await
    .unwrap();

    let refresh = rx.try_recv().unwrap();
    assert_eq!(refresh.unique_id, "16000001");
}

#[tokio::test]
async fn test_missing_password_is_config_error() {
    let server = MockServer::start().await;
    let (coordinator, entry, mut rx) = setup(&server.uri(), None);
    let entity = MyenergiEntity::new(coordinator, Arc::new(Zappi), entry, None);

    let err = myenergi::call_service(
        &entity,
        "myenergi_set_managed_mode",
        json!({"managed_mode_enabled": true}),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::MissingAppCredentials));
    assert!(err.to_string().contains("app_password"));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_device_and_hub_share_identity_domain() {
    let (coordinator, entry, _rx) = setup("https://api.s18.myenergi.net", Some("hunter2"));
    let entity = MyenergiEntity::new(coordinator.clone(), Arc::new(Zappi), entry.clone(), None);
    let hub = MyenergiHub::new(coordinator, entry, Default::default());

    let device_info = entity.device_info();
    let hub_info = hub.device_info();
    assert_eq!(device_info.identifiers[0].0, "myenergi");
    assert_eq!(hub_info.identifiers[0].0, "myenergi");
    assert_eq!(device_info.model.as_deref(), Some("Zappi"));
    assert_eq!(hub_info.name, "Cottage");

    let unlock = entity.unlock().await;
    assert!(unlock.is_ok());
}
