use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use snapvault_api_structs::{NamedPhoto, PhotoRecord, UserInfo};

use crate::disk::{self, Storage};
use crate::naming::{NameAllocator, NamingError};
use crate::select::{self, SelectError};
use crate::vk::{PhotoSource, VkError};

const FOLDER_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("{0}")]
    Vk(#[from] VkError),
    #[error("VK returned no user matching the requested ID")]
    UnknownUser,
    #[error("{0}")]
    Naming(#[from] NamingError),
    #[error("couldn't format folder date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("couldn't write manifest: {0}")]
    ManifestIo(#[from] std::io::Error),
    #[error("couldn't serialize manifest: {0}")]
    ManifestJson(#[from] serde_json::Error),
}

pub struct BackupOptions {
    pub user_id: String,
    pub count: u32,
    pub album_id: String,
    pub manifest_path: PathBuf,
}

impl BackupOptions {
    pub fn new(user_id: impl Into<String>) -> BackupOptions {
        BackupOptions {
            user_id: user_id.into(),
            count: 5,
            album_id: "profile".to_string(),
            manifest_path: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct BackupReport {
    /// Photos that made it into the manifest.
    pub selected: usize,
    pub uploaded: usize,
    /// Records dropped for having no variants plus per-photo transfer
    /// failures.
    pub skipped: usize,
}

/// Runs one backup: fetch the user and their photos, pick variants and
/// names, make sure the destination folder exists, then download and
/// upload each photo in turn.
///
/// Fetch failures terminate the run. Per-photo transfer failures are
/// logged and skipped. The full manifest is rewritten after every
/// successful upload so an interrupted run still leaves valid JSON
/// behind.
pub async fn run<P, S>(
    source: &P,
    storage: &S,
    options: &BackupOptions,
) -> Result<BackupReport, BackupError>
where
    P: PhotoSource + ?Sized,
    S: Storage + ?Sized,
{
    let users = source.users_info(&options.user_id).await?;
    let user = users.first().ok_or(BackupError::UnknownUser)?;

    let records = source
        .photos(&options.user_id, options.count, &options.album_id)
        .await?;
    log::info!(
        "fetched {} photo records for {} {}",
        records.len(),
        user.first_name,
        user.last_name
    );

    let (manifest, dropped) = plan_manifest(&records)?;

    let folder = folder_name(user, OffsetDateTime::now_utc())?;
    if let Err(err) = disk::ensure_folder(storage, &folder).await {
        // Keep going; each upload reports its own failure.
        log::error!("couldn't ensure folder {}: {}", folder, err);
    }

    let mut report = BackupReport {
        selected: manifest.len(),
        skipped: dropped,
        ..BackupReport::default()
    };

    for (index, photo) in manifest.iter().enumerate() {
        log::info!("backing up {} ({}/{})", photo.file_name, index + 1, manifest.len());

        let bytes = match source.fetch_bytes(&photo.url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("couldn't download {}: {}", photo.file_name, err);
                report.skipped += 1;
                continue;
            },
        };

        if let Err(err) = disk::upload_file(storage, &folder, &photo.file_name, &bytes).await {
            log::error!("couldn't upload {}: {}", photo.file_name, err);
            report.skipped += 1;
            continue;
        }

        report.uploaded += 1;
        write_manifest(&options.manifest_path, &manifest)?;
    }

    Ok(report)
}

/// Chooses a variant and allocates a name for each record, in fetch
/// order. Records without variants are logged and dropped; the second
/// element of the return value counts them.
fn plan_manifest(records: &[PhotoRecord]) -> Result<(Vec<NamedPhoto>, usize), BackupError> {
    let mut allocator = NameAllocator::new();
    let mut manifest = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        let selected = match select::select_variant(record) {
            Ok(selected) => selected,
            Err(SelectError::EmptyVariantList) => {
                log::warn!("skipping a photo record with no size variants (date {})", record.date);
                dropped += 1;
                continue;
            },
        };

        let file_name = allocator.allocate(record.likes.count, record.date)?;
        manifest.push(NamedPhoto {
            url: selected.url,
            file_name,
            size: selected.size,
        });
    }

    Ok((manifest, dropped))
}

fn folder_name(user: &UserInfo, today: OffsetDateTime) -> Result<String, time::error::Format> {
    Ok(format!(
        "{}_{}_{}",
        user.first_name,
        user.last_name,
        today.format(FOLDER_DATE_FORMAT)?
    ))
}

fn write_manifest(path: &Path, manifest: &[NamedPhoto]) -> Result<(), BackupError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, manifest)?;
    Ok(())
}
