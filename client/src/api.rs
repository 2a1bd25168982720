//! HTTP access to the BloomBuhay backend.
//!
//! [`ApiClient`] owns the session. [`ResourceService`] gives every record type
//! the same list/get/create/update/delete calls against its REST path.

use std::marker::PhantomData;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::pregnancy::ProfileSummary;
use shared::{
    AlbumWithPhotos, ApiResponse, AuthResponse, CreateMotherProfile, CreatePhoto, HealthResponse,
    LoginRequest, MotherProfile, Photo, RegisterRequest, Resource, UpdateMotherProfile, User,
    Validate,
};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// A request still pending after this fails as a network error.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    user: User,
}

/// API client for communicating with the backend server
///
/// Clones share the session, so logging in through one clone authenticates
/// every [`ResourceService`] built from it.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.session
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.token.clone()))
    }

    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.user.clone()))
    }

    /// Adopts a session obtained elsewhere, e.g. a token restored from disk.
    pub fn set_session(&self, auth: AuthResponse) {
        if let Ok(mut session) = self.session.write() {
            *session = Some(Session {
                token: auth.token,
                user: auth.user,
            });
        }
    }

    pub fn clear_session(&self) {
        if let Ok(mut session) = self.session.write() {
            *session = None;
        }
    }

    pub fn resource<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// A request carrying the bearer token. Fails without a session.
    fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.public(method, path).bearer_auth(token))
    }

    /// Sends the request and unwraps the envelope.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| {
                    let text = String::from_utf8_lossy(&bytes).trim().to_string();
                    if text.is_empty() {
                        status.to_string()
                    } else {
                        text
                    }
                });
            warn!("Request failed with {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        if !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "Request failed".to_string()),
            });
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        self.execute::<T>(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Decode("response carried no data".to_string()))
    }

    /// For endpoints that answer with a message and no data.
    async fn acknowledge(&self, request: RequestBuilder) -> ClientResult<String> {
        let envelope = self.execute::<serde_json::Value>(request).await?;
        Ok(envelope.message.unwrap_or_default())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authed(method, path)?.json(body);
        self.fetch(request).await
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.fetch(self.public(Method::GET, "/api/health")).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        request.validate()?;
        let auth: AuthResponse = self
            .fetch(self.public(Method::POST, "/api/users/register").json(request))
            .await?;
        debug!("Registered user {}", auth.user.id);
        self.set_session(auth.clone());
        Ok(auth)
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        request.validate()?;
        let auth: AuthResponse = self
            .fetch(self.public(Method::POST, "/api/users/login").json(request))
            .await?;
        debug!("Logged in user {}", auth.user.id);
        self.set_session(auth.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.fetch(self.authed(Method::GET, "/api/users/me")?).await
    }

    /// Ends the session server-side. The local session is dropped either way.
    pub async fn logout(&self) -> ClientResult<()> {
        let request = self.authed(Method::POST, "/api/users/logout")?;
        let result = self.acknowledge(request).await;
        self.clear_session();
        result.map(|_| ())
    }

    pub async fn create_profile(&self, input: &CreateMotherProfile) -> ClientResult<MotherProfile> {
        input.validate()?;
        self.send_json(Method::POST, "/api/mother-profiles", input).await
    }

    pub async fn my_profile(&self) -> ClientResult<MotherProfile> {
        self.fetch(self.authed(Method::GET, "/api/mother-profiles/me")?)
            .await
    }

    pub async fn update_profile(&self, patch: &UpdateMotherProfile) -> ClientResult<MotherProfile> {
        patch.validate()?;
        self.send_json(Method::PATCH, "/api/mother-profiles/me", patch)
            .await
    }

    pub async fn profile_summary(&self) -> ClientResult<ProfileSummary> {
        self.fetch(self.authed(Method::GET, "/api/mother-profiles/me/summary")?)
            .await
    }

    pub async fn album(&self, album_id: &str) -> ClientResult<AlbumWithPhotos> {
        let path = format!("/api/journal/albums/{}", album_id);
        self.fetch(self.authed(Method::GET, &path)?).await
    }

    pub async fn list_photos(&self, album_id: &str) -> ClientResult<Vec<Photo>> {
        let path = format!("/api/journal/albums/{}/photos", album_id);
        self.fetch(self.authed(Method::GET, &path)?).await
    }

    pub async fn add_photo(&self, album_id: &str, input: &CreatePhoto) -> ClientResult<Photo> {
        input.validate()?;
        let path = format!("/api/journal/albums/{}/photos", album_id);
        self.send_json(Method::POST, &path, input).await
    }

    pub async fn delete_photo(&self, photo_id: &str) -> ClientResult<()> {
        let path = format!("/api/journal/photos/{}", photo_id);
        self.acknowledge(self.authed(Method::DELETE, &path)?)
            .await
            .map(|_| ())
    }
}

/// CRUD calls for one record type
pub struct ResourceService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::PATH, id)
    }

    /// The caller's records, newest first.
    pub async fn list(&self) -> ClientResult<Vec<R>> {
        self.client
            .fetch(self.client.authed(Method::GET, R::PATH)?)
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<R> {
        self.client
            .fetch(self.client.authed(Method::GET, &Self::item_path(id))?)
            .await
    }

    pub async fn create(&self, input: &R::Create) -> ClientResult<R> {
        input.validate()?;
        self.client.send_json(Method::POST, R::PATH, input).await
    }

    /// Sends only the fields present in `patch`.
    pub async fn update(&self, id: &str, patch: &R::Update) -> ClientResult<R> {
        patch.validate()?;
        self.client
            .send_json(Method::PATCH, &Self::item_path(id), patch)
            .await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: &str) -> ClientResult<String> {
        self.client
            .acknowledge(self.client.authed(Method::DELETE, &Self::item_path(id))?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CreateJournalNote, JournalNote};

    #[tokio::test]
    async fn test_calls_without_session_never_leave_the_client() {
        // Nothing listens here; reaching the network would be a Network error.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let notes = client.resource::<JournalNote>();

        assert_eq!(notes.list().await.unwrap_err(), ClientError::NotAuthenticated);
        assert_eq!(notes.delete("n1").await.unwrap_err(), ClientError::NotAuthenticated);
        assert_eq!(client.me().await.unwrap_err(), ClientError::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_sending() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let input = CreateJournalNote {
            title: "  ".to_string(),
            content: "Text".to_string(),
            tags: Vec::new(),
            mood: None,
            photo_url: None,
        };
        let err = client.resource::<JournalNote>().create(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let client = ApiClient::with_base_url("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/health"), "http://localhost:3000/api/health");
    }
}
