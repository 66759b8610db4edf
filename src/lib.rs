use thiserror::Error;

pub mod backup;
pub mod config;
pub mod disk;
pub mod naming;
pub mod select;
pub mod vk;

pub use backup::{BackupOptions, BackupReport};
pub use config::Settings;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Backup(#[from] backup::BackupError),
}

impl From<Error> for u8 {
    fn from(error: Error) -> u8 {
        match error {
            Error::Config(_) => 3,
            Error::Backup(_) => 4,
        }
    }
}
