use log::warn;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// backend used whenever a production signal is detected
pub const PRODUCTION_API_URL: &str = "https://linkup-backend-production.up.railway.app";
/// development fallback when no override is configured
pub const DEFAULT_DEV_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_PROFILE_FILE: &str = "profile.json";

const PRODUCTION_HOST_PATTERN: &str = r"railway\.app";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// what to do when the login round trip fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfflineGuestPolicy {
    /// sign in as the fixed placeholder user so the UI stays usable
    #[default]
    FallbackToGuest,
    /// surface the failure and stay unauthenticated
    Strict,
}

impl OfflineGuestPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            OfflineGuestPolicy::FallbackToGuest => "fallback-to-guest",
            OfflineGuestPolicy::Strict => "strict",
        }
    }
}

/// resolved once at startup; all consumers share the same immutable view
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base: Url,
    pub guest_policy: OfflineGuestPolicy,
    pub require_init_data: bool,
    pub profile_path: PathBuf,
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// resolves the configuration from an environment lookup; never fails,
    /// malformed values fall back to defaults with a logged warning
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::detect_environment(&lookup);
        let api_base = Self::resolve_api_base(environment, &lookup);

        let guest_policy = match lookup("LINKUP_GUEST_FALLBACK").as_deref() {
            Some("0") | Some("off") | Some("false") => OfflineGuestPolicy::Strict,
            _ => OfflineGuestPolicy::FallbackToGuest,
        };

        let require_init_data = matches!(
            lookup("LINKUP_REQUIRE_INIT_DATA").as_deref(),
            Some("1") | Some("true") | Some("on")
        );

        let profile_path = lookup("LINKUP_PROFILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_FILE));

        let http_timeout = match lookup("LINKUP_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Invalid LINKUP_HTTP_TIMEOUT_SECS value {:?}, using default", raw);
                    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Self {
            environment,
            api_base,
            guest_policy,
            require_init_data,
            profile_path,
            http_timeout,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// checks the production signals: explicit APP_ENV flag, deployment
    /// hostname pattern, or an https public URL
    fn detect_environment<F>(lookup: &F) -> Environment
    where
        F: Fn(&str) -> Option<String>,
    {
        let production_host = Regex::new(PRODUCTION_HOST_PATTERN).unwrap();

        let flagged = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let hosted = lookup("HOSTNAME")
            .map(|v| production_host.is_match(&v))
            .unwrap_or(false);
        let https_public = lookup("LINKUP_PUBLIC_URL")
            .map(|v| v.starts_with("https:"))
            .unwrap_or(false);

        if flagged || hosted || https_public {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    fn resolve_api_base<F>(environment: Environment, lookup: &F) -> Url
    where
        F: Fn(&str) -> Option<String>,
    {
        // the override is honored only in development; production always
        // targets the fixed backend
        let raw = match environment {
            Environment::Production => PRODUCTION_API_URL.to_string(),
            Environment::Development => match lookup("LINKUP_API_URL") {
                Some(overridden) => overridden,
                None => DEFAULT_DEV_API_URL.to_string(),
            },
        };

        match Url::parse(&raw) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid API base URL {:?} ({}), using default", raw, e);
                Url::parse(DEFAULT_DEV_API_URL).unwrap()
            }
        }
    }
}
