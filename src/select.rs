use snapvault_api_structs::PhotoRecord;
use thiserror::Error;

/// VK's "w" size class, the largest rendition the API hands out.
pub const PREFERRED_KIND: &str = "w";

#[derive(Debug, PartialEq, Error)]
pub enum SelectError {
    #[error("photo record has no size variants")]
    EmptyVariantList,
}

/// The variant chosen for one photo record.
#[derive(Clone, Debug, PartialEq)]
pub struct Selected {
    pub url: String,
    pub size: String,
}

/// Picks the canonical variant for a photo record.
///
/// A variant of the preferred "w" kind wins outright. Otherwise the widest
/// variant is chosen; on width ties the last one in list order wins, which
/// is what `max_by_key` guarantees, so the fallback stays deterministic.
pub fn select_variant(record: &PhotoRecord) -> Result<Selected, SelectError> {
    if let Some(variant) = record.sizes.iter().find(|v| v.kind == PREFERRED_KIND) {
        return Ok(Selected {
            url: variant.url.clone(),
            size: PREFERRED_KIND.to_string(),
        });
    }

    let widest = record
        .sizes
        .iter()
        .max_by_key(|v| v.width)
        .ok_or(SelectError::EmptyVariantList)?;

    Ok(Selected {
        url: widest.url.clone(),
        size: size_tag_from_url(&widest.url),
    })
}

/// VK encodes the resolution class of non-"w" renditions as a trailing
/// `=`-delimited token of the URL. A URL without `=` is its own tag.
fn size_tag_from_url(url: &str) -> String {
    url.rsplit('=').next().unwrap_or(url).to_string()
}
