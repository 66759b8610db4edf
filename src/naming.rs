use std::collections::HashSet;

use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("photo date {0} is outside the representable timestamp range")]
    TimestampOutOfRange(i64),
    #[error("couldn't format photo date: {0}")]
    Format(#[from] time::error::Format),
}

/// Hands out file names derived from likes counts, keeping them unique
/// within one run.
///
/// The first photo with a given likes count gets the bare count as its
/// name; later photos with the same count get the count plus their own
/// date, formatted to second precision. The final name is what gets
/// recorded as taken, so a timestamped name also blocks reuse.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> NameAllocator {
        NameAllocator::default()
    }

    /// Allocation is order sensitive: the same records in a different
    /// order produce different names.
    pub fn allocate(&mut self, likes: u64, date: i64) -> Result<String, NamingError> {
        let candidate = likes.to_string();
        let stem = if self.used.contains(&candidate) {
            let stamped = format!("{}_{}", candidate, format_timestamp(date)?);
            if self.used.contains(&stamped) {
                // Same likes count and same second-precision date. The
                // manifest will carry a duplicate name and the second
                // upload overwrites the first.
                log::warn!("file name {} was already allocated in this run", stamped);
            }
            stamped
        } else {
            candidate
        };

        self.used.insert(stem.clone());
        Ok(format!("{}.jpg", stem))
    }
}

fn format_timestamp(date: i64) -> Result<String, NamingError> {
    let datetime = OffsetDateTime::from_unix_timestamp(date)
        .map_err(|_| NamingError::TimestampOutOfRange(date))?;
    Ok(datetime.format(TIMESTAMP_FORMAT)?)
}
