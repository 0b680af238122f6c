pub mod doctor;
pub mod events;
pub mod profile;
pub mod session;

pub use doctor::DoctorHandler;
pub use events::EventsHandler;
pub use profile::ProfileHandler;
pub use session::SessionHandler;

use crate::api_client::{ApiClient, ApiError};
use crate::app_config::AppConfig;
use crate::profile_store::ProfileStore;
use crate::session_manager::SessionManager;
use crate::webapp_bridge::{detect_host_bridge, SafeWebApp};
use std::sync::Arc;

/// shared pieces handed to every command
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub webapp: SafeWebApp,
    pub api: ApiClient,
    pub session: Arc<SessionManager>,
}

impl AppContext {
    /// wires the bridge, backend client and session store from the resolved
    /// configuration
    pub fn bootstrap(config: AppConfig) -> Result<Self, ApiError> {
        let webapp = SafeWebApp::probe(detect_host_bridge());
        let api = ApiClient::new(&config)?;
        let store = ProfileStore::new(config.profile_path.clone());
        let session = Arc::new(SessionManager::new(
            &config,
            webapp.clone(),
            api.clone(),
            store,
        ));
        Ok(Self {
            config,
            webapp,
            api,
            session,
        })
    }
}
