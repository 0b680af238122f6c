use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use linkup_client::api_client::ApiClient;
use linkup_client::app_config::AppConfig;
use linkup_client::profile_store::ProfileStore;
use linkup_client::session_manager::SessionManager;
use linkup_client::webapp_bridge::{EnvBridge, NativeDialogs, SafeWebApp};

/// native dialog double that stays silent and declines every confirm
pub struct QuietNative;

impl NativeDialogs for QuietNative {
    fn alert(&self, _message: &str) {}

    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// config pointing at a mock backend, with an isolated profile file
pub fn test_config(api_base: &str, profile_path: &Path, extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert("LINKUP_API_URL".to_string(), api_base.to_string());
    vars.insert(
        "LINKUP_PROFILE_PATH".to_string(),
        profile_path.display().to_string(),
    );
    AppConfig::resolve(move |key| vars.get(key).cloned())
}

pub fn client_for(api_base: &str, dir: &TempDir) -> ApiClient {
    let config = test_config(api_base, &dir.path().join("profile.json"), &[]);
    ApiClient::new(&config).expect("failed to build api client")
}

pub fn webapp_with_payload(payload: &str) -> SafeWebApp {
    SafeWebApp::with_native(
        Some(Arc::new(EnvBridge::new(payload))),
        Arc::new(QuietNative),
    )
}

pub fn webapp_without_bridge() -> SafeWebApp {
    SafeWebApp::with_native(None, Arc::new(QuietNative))
}

/// session manager wired to a mock backend; `payload` of None means the
/// host bridge is absent entirely
pub fn manager_for(
    api_base: &str,
    dir: &TempDir,
    payload: Option<&str>,
    extra: &[(&str, &str)],
) -> SessionManager {
    let profile_path = dir.path().join("profile.json");
    let config = test_config(api_base, &profile_path, extra);
    let api = ApiClient::new(&config).expect("failed to build api client");
    let webapp = match payload {
        Some(payload) => webapp_with_payload(payload),
        None => webapp_without_bridge(),
    };
    SessionManager::new(&config, webapp, api, ProfileStore::new(profile_path))
}

pub fn profile_store_in(dir: &TempDir) -> ProfileStore {
    ProfileStore::new(dir.path().join("profile.json"))
}

/// backend-shaped user document
pub fn user_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "telegram_id": 999,
        "name": name,
        "avatar_url": null,
        "bio": null,
        "interests": [],
        "photos": [],
        "created_at": "2024-05-01T12:00:00",
        "updated_at": "2024-05-01T12:00:00",
    })
}

pub fn event_json(id: &str, creator_id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "creator_id": creator_id,
        "title": title,
        "description": "",
        "location": "Berlin",
        "datetime": "2024-06-01T18:00:00",
        "is_open": true,
        "type": "custom",
        "created_at": "2024-05-01T12:00:00",
        "updated_at": "2024-05-01T12:00:00",
    })
}

pub fn response_json(id: &str, event_id: &str, user_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "event_id": event_id,
        "user_id": user_id,
        "status": status,
        "responded_at": "2024-06-01T10:00:00",
    })
}
