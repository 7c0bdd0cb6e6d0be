//! HTTP client abstraction for the Battle.net API calls.
//!
//! The trait keeps the API layer mockable in tests; the default
//! implementation wraps reqwest and attaches the bearer token to every
//! request.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::Error;

/// A generic trait for making authorized GET requests.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<String, Error>;
}

#[derive(Clone)]
pub struct BearerClient {
    client: reqwest::Client,
    access_token: String,
}

impl BearerClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl ApiClient for BearerClient {
    async fn get_json(&self, url: &str) -> Result<String, Error> {
        let body = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

/// GET `url` with the authorized client and decode the body into `T`.
/// Transport and non-2xx failures surface as `Error::Http`, malformed bodies
/// as `Error::Json`.
pub async fn fetch_json<T: DeserializeOwned>(client: &dyn ApiClient, url: &str) -> Result<T, Error> {
    let body = client.get_json(url).await?;
    Ok(serde_json::from_str(&body)?)
}
