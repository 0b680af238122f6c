use log::{debug, warn};
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// button id reported when a fallback tier has no notion of button identity
pub const DEFAULT_BUTTON_ID: &str = "ok";

pub const INIT_DATA_ENV: &str = "LINKUP_INIT_DATA";

#[derive(Debug)]
pub enum BridgeError {
    Unavailable,
    Unsupported(&'static str),
    Failed(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Unavailable => write!(f, "bridge is not attached"),
            BridgeError::Unsupported(capability) => {
                write!(f, "host does not support {}", capability)
            }
            BridgeError::Failed(e) => write!(f, "bridge call failed: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

#[derive(Debug, Clone, Default)]
pub struct PopupButton {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub text: String,
}

impl PopupButton {
    pub fn ok(text: &str) -> Self {
        Self {
            id: Some(DEFAULT_BUTTON_ID.to_string()),
            kind: Some("ok".to_string()),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PopupSpec {
    pub title: Option<String>,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

impl PopupSpec {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            ..Default::default()
        }
    }

    pub fn with_title(title: &str, message: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            message: message.to_string(),
            buttons: vec![PopupButton::ok("OK")],
        }
    }

    /// single-line form used by the tiers that can only show plain text
    pub fn flattened_message(&self) -> String {
        match &self.title {
            Some(title) => format!("{}: {}", title, self.message),
            None => self.message.clone(),
        }
    }
}

pub type ActivateHandler = Box<dyn Fn() + Send + Sync>;

pub trait MainButtonControl: Send + Sync {
    fn show(&self) -> Result<(), BridgeError>;
    fn hide(&self) -> Result<(), BridgeError>;
    fn set_label(&self, text: &str) -> Result<(), BridgeError>;
    fn on_activate(&self, handler: ActivateHandler) -> Result<(), BridgeError>;
}

pub trait PopupSurface: Send + Sync {
    /// shows the rich popup and reports the pressed button id
    fn show_popup(&self, spec: &PopupSpec) -> Result<String, BridgeError>;
}

pub trait AlertSurface: Send + Sync {
    fn show_alert(&self, message: &str) -> Result<(), BridgeError>;
    fn show_confirm(&self, message: &str) -> Result<bool, BridgeError>;
}

/// the surface a hosting client hands to the app; capabilities are optional
/// because older hosts predate some of them, and any call may fail or panic
pub trait WebAppBridge: Send + Sync {
    fn ready(&self) -> Result<(), BridgeError>;
    fn init_data(&self) -> Result<String, BridgeError>;

    fn main_button(&self) -> Option<&dyn MainButtonControl> {
        None
    }

    fn popup(&self) -> Option<&dyn PopupSurface> {
        None
    }

    fn alerts(&self) -> Option<&dyn AlertSurface> {
        None
    }
}

/// last-tier dialogs when no host surface is usable
pub trait NativeDialogs: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// terminal dialogs; a failed read resolves to the negative answer
pub struct ConsoleDialogs;

impl NativeDialogs for ConsoleDialogs {
    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N]: ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// minimal bridge for running outside a real host: carries only an init
/// payload (pasted from the devtools of a live session) and no UI surfaces
pub struct EnvBridge {
    init_data: String,
}

impl EnvBridge {
    pub fn new(init_data: impl Into<String>) -> Self {
        Self {
            init_data: init_data.into(),
        }
    }
}

impl WebAppBridge for EnvBridge {
    fn ready(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn init_data(&self) -> Result<String, BridgeError> {
        Ok(self.init_data.clone())
    }
}

/// picks up an `EnvBridge` when LINKUP_INIT_DATA is set, otherwise reports
/// that no host bridge is attached
pub fn detect_host_bridge() -> Option<Arc<dyn WebAppBridge>> {
    env::var(INIT_DATA_ENV)
        .ok()
        .filter(|payload| !payload.is_empty())
        .map(|payload| Arc::new(EnvBridge::new(payload)) as Arc<dyn WebAppBridge>)
}

enum PopupAttempt {
    Button(String),
    Acknowledged,
    NoSurface,
}

/// facade over the optional host bridge; every operation is safe to call
/// unconditionally and never panics or errors across this boundary
#[derive(Clone)]
pub struct SafeWebApp {
    bridge: Option<Arc<dyn WebAppBridge>>,
    native: Arc<dyn NativeDialogs>,
}

impl SafeWebApp {
    pub fn probe(bridge: Option<Arc<dyn WebAppBridge>>) -> Self {
        Self::with_native(bridge, Arc::new(ConsoleDialogs))
    }

    pub fn with_native(
        bridge: Option<Arc<dyn WebAppBridge>>,
        native: Arc<dyn NativeDialogs>,
    ) -> Self {
        Self { bridge, native }
    }

    pub fn is_available(&self) -> bool {
        self.bridge.is_some()
    }

    /// notifies the host that the app finished loading; failures are logged
    /// and swallowed
    pub fn signal_ready(&self) {
        if self.guarded("ready", |bridge| bridge.ready()).is_some() {
            debug!("Host bridge acknowledged ready signal");
        }
    }

    /// opaque init payload; absence or any access failure yields ""
    pub fn init_data(&self) -> String {
        self.guarded("init_data", |bridge| bridge.init_data())
            .unwrap_or_default()
    }

    pub fn main_button(&self) -> MainButtonHandle<'_> {
        MainButtonHandle { app: self }
    }

    /// rich dialog with tiered fallback: host popup, host alert with the
    /// title folded into the message, then the native dialog. A missing
    /// capability steps down one tier; a failing or panicking call drops
    /// straight to the native dialog. Always resolves exactly once.
    pub fn show_popup(&self, spec: &PopupSpec) -> String {
        let Some(bridge) = self.bridge.as_deref() else {
            self.native.alert(&spec.flattened_message());
            return DEFAULT_BUTTON_ID.to_string();
        };

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(popup) = bridge.popup() {
                return popup.show_popup(spec).map(PopupAttempt::Button);
            }
            if let Some(alerts) = bridge.alerts() {
                return alerts
                    .show_alert(&spec.flattened_message())
                    .map(|_| PopupAttempt::Acknowledged);
            }
            Ok(PopupAttempt::NoSurface)
        }));

        match attempt {
            Ok(Ok(PopupAttempt::Button(id))) => id,
            Ok(Ok(PopupAttempt::Acknowledged)) => DEFAULT_BUTTON_ID.to_string(),
            Ok(Ok(PopupAttempt::NoSurface)) => {
                self.native.alert(&spec.flattened_message());
                DEFAULT_BUTTON_ID.to_string()
            }
            Ok(Err(e)) => {
                warn!("Bridge popup failed: {}", e);
                self.native.alert(&spec.flattened_message());
                DEFAULT_BUTTON_ID.to_string()
            }
            Err(_) => {
                warn!("Bridge popup panicked");
                self.native.alert(&spec.flattened_message());
                DEFAULT_BUTTON_ID.to_string()
            }
        }
    }

    pub fn show_alert(&self, message: &str) {
        let Some(bridge) = self.bridge.as_deref() else {
            self.native.alert(message);
            return;
        };

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| match bridge.alerts() {
            Some(alerts) => alerts.show_alert(message).map(|_| true),
            None => Ok(false),
        }));

        match attempt {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => self.native.alert(message),
            Ok(Err(e)) => {
                warn!("Bridge alert failed: {}", e);
                self.native.alert(message);
            }
            Err(_) => {
                warn!("Bridge alert panicked");
                self.native.alert(message);
            }
        }
    }

    pub fn show_confirm(&self, message: &str) -> bool {
        let Some(bridge) = self.bridge.as_deref() else {
            return self.native.confirm(message);
        };

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| match bridge.alerts() {
            Some(alerts) => alerts.show_confirm(message).map(Some),
            None => Ok(None),
        }));

        match attempt {
            Ok(Ok(Some(confirmed))) => confirmed,
            Ok(Ok(None)) => self.native.confirm(message),
            Ok(Err(e)) => {
                warn!("Bridge confirm failed: {}", e);
                self.native.confirm(message)
            }
            Err(_) => {
                warn!("Bridge confirm panicked");
                self.native.confirm(message)
            }
        }
    }

    /// runs one bridge call behind the panic/error boundary; any failure
    /// collapses to None
    fn guarded<T>(
        &self,
        what: &str,
        call: impl FnOnce(&dyn WebAppBridge) -> Result<T, BridgeError>,
    ) -> Option<T> {
        let bridge = self.bridge.as_deref()?;
        match panic::catch_unwind(AssertUnwindSafe(|| call(bridge))) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!("Bridge call {} failed: {}", what, e);
                None
            }
            Err(_) => {
                warn!("Bridge call {} panicked", what);
                None
            }
        }
    }
}

/// guarded view of the host's primary-action button; every operation is an
/// independent no-op when the capability is missing
pub struct MainButtonHandle<'a> {
    app: &'a SafeWebApp,
}

impl MainButtonHandle<'_> {
    pub fn show(&self) {
        self.control("MainButton.show", |button| button.show());
    }

    pub fn hide(&self) {
        self.control("MainButton.hide", |button| button.hide());
    }

    pub fn set_label(&self, text: &str) {
        self.control("MainButton.set_label", |button| button.set_label(text));
    }

    pub fn on_activate(&self, handler: ActivateHandler) {
        self.control("MainButton.on_activate", move |button| {
            button.on_activate(handler)
        });
    }

    fn control(
        &self,
        what: &str,
        call: impl FnOnce(&dyn MainButtonControl) -> Result<(), BridgeError>,
    ) {
        let Some(bridge) = self.app.bridge.as_deref() else {
            return;
        };
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| match bridge.main_button() {
            Some(button) => call(button).map(|_| true),
            None => Ok(false),
        }));
        match attempt {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => debug!("{} skipped, capability unavailable", what),
            Ok(Err(e)) => warn!("Bridge call {} failed: {}", what, e),
            Err(_) => warn!("Bridge call {} panicked", what),
        }
    }
}
