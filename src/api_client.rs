use crate::app_config::AppConfig;
use crate::models::{
    Event, EventFilters, EventPatch, EventResponse, NewEvent, ResponseStatus, UserPatch,
    UserRecord,
};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use url::Url;

#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    Status { status: u16, body: String },
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "Request failed: {}", e),
            ApiError::Status { status, body } => {
                write!(f, "Backend returned {}: {}", status, body)
            }
            ApiError::Decode(e) => write!(f, "Failed to decode backend response: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e)
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "initData")]
    init_data: &'a str,
}

/// backend mutations carry the acting user inline with the payload
#[derive(Serialize)]
struct WithUserId<'a, T: Serialize> {
    #[serde(flatten)]
    payload: &'a T,
    user_id: &'a str,
}

#[derive(Serialize)]
struct NewResponseBody<'a> {
    event_id: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
struct ResponseStatusBody<'a> {
    status: ResponseStatus,
    user_id: &'a str,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.api_base.clone(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// exchanges the host init payload for the backend's user record
    pub async fn authenticate(&self, init_data: &str) -> Result<UserRecord, ApiError> {
        let url = self.endpoint("/users/auth");
        debug!("POST {}", url);
        self.execute(self.http.post(&url).json(&AuthRequest { init_data }))
            .await
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord, ApiError> {
        let url = self.endpoint(&format!("/users/{}", user_id));
        debug!("PUT {}", url);
        self.execute(self.http.put(&url).json(patch)).await
    }

    pub async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>, ApiError> {
        let url = self.endpoint("/events");
        debug!("GET {}", url);
        self.execute(self.http.get(&url).query(filters)).await
    }

    pub async fn user_events(&self, user_id: &str) -> Result<Vec<Event>, ApiError> {
        let url = self.endpoint(&format!("/events/user/{}", user_id));
        debug!("GET {}", url);
        self.execute(self.http.get(&url)).await
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Event, ApiError> {
        let url = self.endpoint(&format!("/events/{}", event_id));
        debug!("GET {}", url);
        self.execute(self.http.get(&url)).await
    }

    pub async fn create_event(&self, event: &NewEvent, user_id: &str) -> Result<Event, ApiError> {
        let url = self.endpoint("/events");
        debug!("POST {}", url);
        self.execute(self.http.post(&url).json(&WithUserId {
            payload: event,
            user_id,
        }))
        .await
    }

    pub async fn update_event(
        &self,
        event_id: &str,
        patch: &EventPatch,
        user_id: &str,
    ) -> Result<Event, ApiError> {
        let url = self.endpoint(&format!("/events/{}", event_id));
        debug!("PUT {}", url);
        self.execute(self.http.put(&url).json(&WithUserId {
            payload: patch,
            user_id,
        }))
        .await
    }

    pub async fn respond_to_event(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<EventResponse, ApiError> {
        let url = self.endpoint("/responses");
        debug!("POST {}", url);
        self.execute(self.http.post(&url).json(&NewResponseBody { event_id, user_id }))
            .await
    }

    pub async fn update_response(
        &self,
        response_id: &str,
        status: ResponseStatus,
        user_id: &str,
    ) -> Result<EventResponse, ApiError> {
        let url = self.endpoint(&format!("/responses/{}", response_id));
        debug!("PUT {}", url);
        self.execute(self.http.put(&url).json(&ResponseStatusBody { status, user_id }))
            .await
    }

    pub async fn event_responses(&self, event_id: &str) -> Result<Vec<EventResponse>, ApiError> {
        let url = self.endpoint(&format!("/responses/event/{}", event_id));
        debug!("GET {}", url);
        self.execute(self.http.get(&url)).await
    }

    /// reachability probe; reports the status code of the backend root
    pub async fn health(&self) -> Result<u16, ApiError> {
        let url = self.endpoint("/");
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        Ok(response.status().as_u16())
    }

    /// sends one request and decodes the JSON body; non-2xx responses are
    /// surfaced with their status and payload text
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}
