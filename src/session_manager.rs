use crate::api_client::{ApiClient, ApiError};
use crate::app_config::{AppConfig, OfflineGuestPolicy};
use crate::models::{UserPatch, UserRecord};
use crate::profile_store::ProfileStore;
use crate::webapp_bridge::SafeWebApp;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::fmt;
use std::io;
use std::sync::Mutex;

/// id of the fixed placeholder identity used when the backend is unreachable
pub const OFFLINE_GUEST_ID: &str = "12345";

pub fn offline_guest_user() -> UserRecord {
    let now = Utc::now().to_rfc3339();
    UserRecord {
        id: OFFLINE_GUEST_ID.to_string(),
        telegram_id: 12345,
        name: "Test User".to_string(),
        avatar_url: Some("https://via.placeholder.com/100".to_string()),
        bio: Some("This is a mock user for development".to_string()),
        interests: vec!["coding".to_string(), "testing".to_string()],
        photos: vec![],
        created_at: now.clone(),
        updated_at: now,
    }
}

/// a user is present exactly in the Authenticated state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Authenticated(UserRecord),
    Unauthenticated,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Loading => "loading",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Unauthenticated => "unauthenticated",
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

#[derive(Debug)]
pub enum AuthError {
    NoSession,
    MissingInitData,
    Api(ApiError),
    Storage(io::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NoSession => write!(f, "No active session, sign in first"),
            AuthError::MissingInitData => {
                write!(f, "Init data is required but the host provided none")
            }
            AuthError::Api(e) => write!(f, "{}", e),
            AuthError::Storage(e) => write!(f, "Profile storage failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        AuthError::Api(e)
    }
}

impl From<io::Error> for AuthError {
    fn from(e: io::Error) -> Self {
        AuthError::Storage(e)
    }
}

/// owns the session lifecycle: restores the cached profile, exchanges the
/// host init payload for a backend identity, and keeps the on-disk copy in
/// step with the in-memory state
pub struct SessionManager {
    webapp: SafeWebApp,
    api: ApiClient,
    store: ProfileStore,
    guest_policy: OfflineGuestPolicy,
    require_init_data: bool,
    state: Mutex<SessionState>,
    login_gate: tokio::sync::Mutex<()>,
}

impl SessionManager {
    pub fn new(
        config: &AppConfig,
        webapp: SafeWebApp,
        api: ApiClient,
        store: ProfileStore,
    ) -> Self {
        Self {
            webapp,
            api,
            store,
            guest_policy: config.guest_policy,
            require_init_data: config.require_init_data,
            state: Mutex::new(SessionState::Uninitialized),
            login_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// restores the cached profile on first call; later calls return the
    /// current state unchanged
    pub fn initialize(&self) -> SessionState {
        let mut state = self.state.lock().unwrap();
        if matches!(*state, SessionState::Uninitialized) {
            *state = match self.store.load() {
                Some(user) => {
                    info!("Restored session for user {}", user.id);
                    SessionState::Authenticated(user)
                }
                None => SessionState::Unauthenticated,
            };
        }
        state.clone()
    }

    /// signs in against the backend. Concurrent calls serialize on an
    /// internal gate, so at most one request is in flight and latecomers
    /// adopt the winner's session instead of logging in again.
    pub async fn login(&self) -> Result<UserRecord, AuthError> {
        let _gate = self.login_gate.lock().await;

        if let Some(user) = self.current_user() {
            debug!("Login skipped, session already active for user {}", user.id);
            return Ok(user);
        }

        self.set_state(SessionState::Loading);

        let init_data = self.webapp.init_data();
        if init_data.is_empty() {
            debug!("Host provided no init data");
            if self.require_init_data {
                self.set_state(SessionState::Unauthenticated);
                return Err(AuthError::MissingInitData);
            }
        }

        match self.api.authenticate(&init_data).await {
            Ok(user) => {
                info!("Authenticated as user {} ({})", user.id, user.name);
                self.persist(&user);
                self.set_state(SessionState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => match self.guest_policy {
                OfflineGuestPolicy::FallbackToGuest => {
                    warn!("Authentication failed ({}), continuing as offline guest", e);
                    let guest = offline_guest_user();
                    self.persist(&guest);
                    self.set_state(SessionState::Authenticated(guest.clone()));
                    Ok(guest)
                }
                OfflineGuestPolicy::Strict => {
                    error!("Authentication failed: {}", e);
                    self.set_state(SessionState::Unauthenticated);
                    Err(AuthError::Api(e))
                }
            },
        }
    }

    /// drops the session and the cached profile; never fails
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored profile: {}", e);
        }
        self.set_state(SessionState::Unauthenticated);
        info!("Session cleared");
    }

    /// applies a profile patch for the signed-in user. The offline guest
    /// never exists on the backend, so its edits merge locally; everyone
    /// else round-trips the backend and adopts its record.
    pub async fn update_user(&self, patch: &UserPatch) -> Result<UserRecord, AuthError> {
        let current = self.current_user().ok_or(AuthError::NoSession)?;

        if current.id == OFFLINE_GUEST_ID {
            let mut updated = current;
            patch.apply(&mut updated);
            updated.updated_at = Utc::now().to_rfc3339();
            self.store.save(&updated)?;
            self.set_state(SessionState::Authenticated(updated.clone()));
            info!("Updated offline guest profile locally");
            return Ok(updated);
        }

        let updated = self.api.update_user(&current.id, patch).await?;
        self.persist(&updated);
        self.set_state(SessionState::Authenticated(updated.clone()));
        info!("Updated profile for user {}", updated.id);
        Ok(updated)
    }

    /// discards the session and signs in from scratch
    pub async fn force_reauth(&self) -> Result<UserRecord, AuthError> {
        info!("Forcing re-authentication");
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored profile: {}", e);
        }
        self.set_state(SessionState::Unauthenticated);
        self.login().await
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap().clone()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.state.lock().unwrap().user().cloned()
    }

    /// cache write failures are logged, the backend record stays the source
    /// of truth
    fn persist(&self, user: &UserRecord) {
        if let Err(e) = self.store.save(user) {
            warn!("Failed to persist profile for user {}: {}", user.id, e);
        }
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().unwrap();
        debug!("Session state: {} -> {}", state.name(), next.name());
        *state = next;
    }
}
