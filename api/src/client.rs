//! Backend API client implementation

use crate::{
    error::ApiError,
    types::{AuthResponse, ErrorBody, ImageDescriptor, UploadUrl},
};
use reqwest::{Client, Response, StatusCode};
use serde_json::json;

/// Seal image backend client
///
/// Holds a connection-pooled HTTP client and the backend base URL. Cloning
/// is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the base URL from the environment
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingBaseUrl`] if `SEAL_API_BASE_URL` is not set
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("SEAL_API_BASE_URL").map_err(|_| ApiError::MissingBaseUrl)?;

        Ok(Self::new(base_url))
    }

    /// Create a new client with an explicit base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Exchange credentials for an identity token
    ///
    /// # Errors
    ///
    /// - [`ApiError::AuthFailed`] when the backend rejects the credentials (401)
    /// - [`ApiError::RateLimited`] on HTTP 429
    /// - [`ApiError::QueryFailed`] for any other non-success status
    /// - [`ApiError::NetworkUnavailable`] when the backend cannot be reached
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        tracing::debug!(username, "Exchanging credentials");

        let response = self
            .client
            .post(format!("{}/auth", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        Self::auth_result(response).await
    }

    /// Exchange a refresh token for a fresh identity token
    ///
    /// The response may omit a replacement refresh token; rotation is
    /// optional server-side behavior.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::login`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        tracing::debug!("Exchanging refresh token");

        let response = self
            .client
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        Self::auth_result(response).await
    }

    /// List images for a seal, preserving server-provided order
    ///
    /// Every call is a fresh authenticated lookup: no retry, no cache.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RateLimited`] on HTTP 429
    /// - [`ApiError::QueryFailed`] with the status for any other non-success
    ///   response (401 for a bad/expired token, 404 for an unknown seal)
    /// - [`ApiError::NetworkUnavailable`] when the backend cannot be reached
    pub async fn fetch_images(
        &self,
        seal_id: &str,
        id_token: &str,
    ) -> Result<Vec<ImageDescriptor>, ApiError> {
        tracing::debug!(seal_id, "Fetching image listing");

        let response = self
            .client
            .get(format!("{}/seals/{seal_id}/images", self.base_url))
            .header("Authorization", id_token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<ImageDescriptor>>()
                .await
                .map_err(|e| ApiError::ParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            status => Err(ApiError::QueryFailed {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }

    /// Fetch a single image descriptor
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::fetch_images`].
    pub async fn fetch_image(
        &self,
        seal_id: &str,
        image_key: &str,
        id_token: &str,
    ) -> Result<ImageDescriptor, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/seals/{seal_id}/images/{image_key}",
                self.base_url
            ))
            .header("Authorization", id_token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<ImageDescriptor>()
                .await
                .map_err(|e| ApiError::ParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            status => Err(ApiError::QueryFailed {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }

    /// Upload a JPEG image body
    ///
    /// Consumed by tooling, not by the viewer flow.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::fetch_images`].
    pub async fn upload_image(
        &self,
        seal_id: &str,
        image_key: &str,
        id_token: &str,
        body: Vec<u8>,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(format!(
                "{}/seals/{seal_id}/images/{image_key}",
                self.base_url
            ))
            .header("Authorization", id_token)
            .header("Content-Type", "image/jpeg")
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            status => Err(ApiError::QueryFailed {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }

    /// Obtain a pre-signed write URL for an image key
    ///
    /// Consumed by tooling, not by the viewer flow.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::fetch_images`].
    pub async fn publish_upload_url(
        &self,
        seal_id: &str,
        image_key: &str,
        id_token: &str,
    ) -> Result<UploadUrl, ApiError> {
        let response = self
            .client
            .post(format!(
                "{}/seals/{seal_id}/images/{image_key}/upload-url",
                self.base_url
            ))
            .header("Authorization", id_token)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<UploadUrl>()
                .await
                .map_err(|e| ApiError::ParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            status => Err(ApiError::QueryFailed {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }

    /// Map an auth endpoint response into the error taxonomy
    async fn auth_result(response: Response) -> Result<AuthResponse, ApiError> {
        match response.status() {
            StatusCode::OK => response
                .json::<AuthResponse>()
                .await
                .map_err(|e| ApiError::ParseFailed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthFailed {
                message: Self::error_message(response).await,
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            status => Err(ApiError::QueryFailed {
                status: status.as_u16(),
                message: Self::error_message(response).await,
            }),
        }
    }

    /// Extract `{message}` from an error body, falling back to raw text
    async fn error_message(response: Response) -> String {
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&body).map_or(body, |parsed| parsed.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_strips_trailing_slashes() {
        let client = ApiClient::new("https://api.example.com/");
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
