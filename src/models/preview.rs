use serde::{Deserialize, Serialize};
use strum::Display;

use crate::preview::normalize::get_domain;

/// Body of `POST /link-preview`. A missing or null `url` is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PreviewType {
    Website,
    Video,
    /// No metadata was extracted (the fetch failed).
    Unknown,
}

/// Link-sharing metadata pulled out of a page, before it is tied to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    pub kind: PreviewType,
}

/// Preview record returned by `POST /link-preview`.
///
/// All metadata fields are optional; a page may have no OG tags at all.
/// `error` is only serialized when `ok` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub ok: bool,
    pub input_url: String,
    pub final_url: String,
    pub domain: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: PreviewType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Preview {
    pub fn resolved(input_url: String, final_url: String, meta: PageMetadata) -> Self {
        Preview {
            ok: true,
            domain: get_domain(&final_url),
            input_url,
            final_url,
            title: meta.title,
            description: meta.description,
            image: meta.image,
            site_name: meta.site_name,
            kind: meta.kind,
            error: None,
        }
    }

    pub fn unavailable(input_url: String, final_url: String, error: impl Into<String>) -> Self {
        Preview {
            ok: false,
            domain: get_domain(&final_url),
            input_url,
            final_url,
            title: None,
            description: None,
            image: None,
            site_name: None,
            kind: PreviewType::Unknown,
            error: Some(error.into()),
        }
    }
}
