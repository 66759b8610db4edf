use serde::Serialize;
use thiserror::Error;
use url::Url;

use snapvault_api_structs::UploadTicket;

const API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("HTTP request to storage failed: {0}")]
    Http(surf::Error),
    #[error("storage {action} for {path} returned status {status}: {body}")]
    Status {
        action: &'static str,
        path: String,
        status: surf::StatusCode,
        body: String,
    },
    #[error("storage returned no upload href for {path}")]
    MissingUploadUrl { path: String },
    #[error("storage returned an invalid upload href: {0}")]
    InvalidUploadUrl(#[from] url::ParseError),
}

impl From<surf::Error> for DiskError {
    fn from(err: surf::Error) -> DiskError {
        DiskError::Http(err)
    }
}

/// The cloud-storage operations the backup run needs.
#[async_trait::async_trait]
pub trait Storage {
    async fn folder_exists(&self, path: &str) -> Result<bool, DiskError>;

    async fn create_folder(&self, path: &str) -> Result<(), DiskError>;

    /// Asks the backend for a one-shot URL the file bytes should be PUT to.
    async fn request_upload_url(&self, path: &str) -> Result<Url, DiskError>;

    async fn put_bytes(&self, url: &Url, bytes: &[u8]) -> Result<(), DiskError>;
}

/// Folder creation is idempotent: an already existing folder counts as
/// success.
pub async fn ensure_folder<S: Storage + ?Sized>(storage: &S, path: &str) -> Result<(), DiskError> {
    if storage.folder_exists(path).await? {
        log::info!("folder {} already exists", path);
        return Ok(());
    }

    storage.create_folder(path).await?;
    log::info!("created folder {}", path);
    Ok(())
}

pub async fn upload_file<S: Storage + ?Sized>(
    storage: &S,
    folder: &str,
    file_name: &str,
    bytes: &[u8],
) -> Result<(), DiskError> {
    let full_path = format!("{}/{}", folder, file_name);
    let upload_url = storage.request_upload_url(&full_path).await?;
    storage.put_bytes(&upload_url, bytes).await?;
    log::info!("uploaded {} to folder {}", file_name, folder);
    Ok(())
}

/// Yandex.Disk REST client.
#[derive(Clone, Debug)]
pub struct DiskClient {
    token: String,
    base_url: String,
}

#[derive(Serialize)]
struct PathQuery<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct UploadQuery<'a> {
    path: &'a str,
    overwrite: bool,
}

impl DiskClient {
    pub fn new(token: impl Into<String>) -> DiskClient {
        DiskClient {
            token: token.into(),
            base_url: API_BASE.to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    fn resources_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }
}

#[async_trait::async_trait]
impl Storage for DiskClient {
    async fn folder_exists(&self, path: &str) -> Result<bool, DiskError> {
        let auth = self.auth_header();
        let mut res = surf::get(self.resources_url())
            .header("Authorization", auth.as_str())
            .query(&PathQuery { path })?
            .await?;

        match res.status() {
            surf::StatusCode::NotFound => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(status_error("folder probe", path, &mut res).await),
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), DiskError> {
        let auth = self.auth_header();
        let mut res = surf::put(self.resources_url())
            .header("Authorization", auth.as_str())
            .query(&PathQuery { path })?
            .await?;

        if !res.status().is_success() {
            return Err(status_error("folder create", path, &mut res).await);
        }

        Ok(())
    }

    async fn request_upload_url(&self, path: &str) -> Result<Url, DiskError> {
        let auth = self.auth_header();
        let mut res = surf::get(format!("{}/upload", self.resources_url()))
            .header("Authorization", auth.as_str())
            .query(&UploadQuery {
                path,
                overwrite: true,
            })?
            .await?;

        if !res.status().is_success() {
            return Err(status_error("upload URL request", path, &mut res).await);
        }

        let ticket: UploadTicket = res.body_json().await?;
        let href = ticket.href.ok_or_else(|| DiskError::MissingUploadUrl {
            path: path.to_string(),
        })?;

        Ok(Url::parse(&href)?)
    }

    async fn put_bytes(&self, url: &Url, bytes: &[u8]) -> Result<(), DiskError> {
        let mut res = surf::put(url.as_str())
            .body(surf::Body::from_bytes(bytes.to_vec()))
            .await?;

        if !res.status().is_success() {
            return Err(status_error("byte upload", url.as_str(), &mut res).await);
        }

        Ok(())
    }
}

async fn status_error(action: &'static str, path: &str, res: &mut surf::Response) -> DiskError {
    let status = res.status();
    let body = res.body_string().await.unwrap_or_default();
    DiskError::Status {
        action,
        path: path.to_string(),
        status,
        body,
    }
}
