use serde::Serialize;
use thiserror::Error;

use snapvault_api_structs::{PhotoRecord, PhotosPage, UserInfo, VkEnvelope};

pub const API_VERSION: &str = "5.199";
const API_BASE: &str = "https://api.vk.com/method";

#[derive(Debug, Error)]
pub enum VkError {
    #[error("HTTP request to VK failed: {0}")]
    Http(surf::Error),
    #[error("VK {method} returned status {status}")]
    Status {
        method: &'static str,
        status: surf::StatusCode,
    },
    #[error("VK API error {code} from {method}: {message}")]
    Api {
        method: &'static str,
        code: i64,
        message: String,
    },
    #[error("malformed {method} response: {detail}")]
    Parse {
        method: &'static str,
        detail: String,
    },
    #[error("{method} response carried no payload")]
    EmptyResponse { method: &'static str },
}

impl From<surf::Error> for VkError {
    fn from(err: surf::Error) -> VkError {
        VkError::Http(err)
    }
}

/// Where photo records and their bytes come from.
#[async_trait::async_trait]
pub trait PhotoSource {
    /// Profile metadata for the given user IDs (`users.get`).
    async fn users_info(&self, user_id: &str) -> Result<Vec<UserInfo>, VkError>;

    /// One page of photo records with likes and size variants included
    /// (`photos.get` with `extended=1` and `photo_sizes=1`).
    async fn photos(
        &self,
        owner_id: &str,
        count: u32,
        album_id: &str,
    ) -> Result<Vec<PhotoRecord>, VkError>;

    /// Raw bytes of one photo rendition, fetched from the CDN URL the API
    /// handed out.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, VkError>;
}

#[derive(Clone, Debug)]
pub struct VkClient {
    token: String,
    version: String,
    base_url: String,
}

impl VkClient {
    pub fn new(token: impl Into<String>) -> VkClient {
        VkClient {
            token: token.into(),
            version: API_VERSION.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }
}

#[async_trait::async_trait]
impl PhotoSource for VkClient {
    async fn users_info(&self, user_id: &str) -> Result<Vec<UserInfo>, VkError> {
        #[derive(Serialize)]
        struct Params<'a> {
            user_ids: &'a str,
            access_token: &'a str,
            v: &'a str,
        }

        let method = "users.get";
        let mut res = surf::get(self.method_url(method))
            .query(&Params {
                user_ids: user_id,
                access_token: &self.token,
                v: &self.version,
            })?
            .await?;

        unwrap_envelope(method, &mut res).await
    }

    async fn photos(
        &self,
        owner_id: &str,
        count: u32,
        album_id: &str,
    ) -> Result<Vec<PhotoRecord>, VkError> {
        #[derive(Serialize)]
        struct Params<'a> {
            owner_id: &'a str,
            count: u32,
            album_id: &'a str,
            extended: u8,
            photo_sizes: u8,
            access_token: &'a str,
            v: &'a str,
        }

        let method = "photos.get";
        let mut res = surf::get(self.method_url(method))
            .query(&Params {
                owner_id,
                count,
                album_id,
                extended: 1,
                photo_sizes: 1,
                access_token: &self.token,
                v: &self.version,
            })?
            .await?;

        let page: PhotosPage = unwrap_envelope(method, &mut res).await?;
        Ok(page.items)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, VkError> {
        let method = "photo download";
        let mut res = surf::get(url).await?;

        let status = res.status();
        if !status.is_success() {
            return Err(VkError::Status { method, status });
        }

        Ok(res.body_bytes().await?)
    }
}

/// Checks the HTTP status, then peels VK's `response`/`error` envelope.
async fn unwrap_envelope<T>(method: &'static str, res: &mut surf::Response) -> Result<T, VkError>
where
    T: serde::de::DeserializeOwned,
{
    let status = res.status();
    if !status.is_success() {
        return Err(VkError::Status { method, status });
    }

    let envelope: VkEnvelope<T> = res.body_json().await.map_err(|err| VkError::Parse {
        method,
        detail: err.to_string(),
    })?;

    if let Some(error) = envelope.error {
        return Err(VkError::Api {
            method,
            code: error.error_code,
            message: error.error_msg,
        });
    }

    envelope.response.ok_or(VkError::EmptyResponse { method })
}
