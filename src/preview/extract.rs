use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::models::{PageMetadata, PreviewType};

static META: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Parse Open Graph / Twitter Card tags from `html`.
///
/// `base_url` is the post-redirect URL the HTML came from; relative image
/// references are resolved against it. Entities are decoded by the parser.
pub fn extract_metadata(html: &str, base_url: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "og:title")
        .or_else(|| meta_content(&document, "twitter:title"))
        .or_else(|| title_tag(&document));

    let description = meta_content(&document, "og:description")
        .or_else(|| meta_content(&document, "twitter:description"))
        .or_else(|| meta_content(&document, "description"));

    let image = meta_content(&document, "og:image")
        .or_else(|| meta_content(&document, "twitter:image"))
        .and_then(|raw| absolutize(&raw, base_url));

    let site_name = meta_content(&document, "og:site_name");

    let is_video = meta_content(&document, "og:video").is_some()
        || meta_content(&document, "twitter:player").is_some();

    PageMetadata {
        title,
        description,
        image,
        site_name,
        kind: if is_video {
            PreviewType::Video
        } else {
            PreviewType::Website
        },
    }
}

/// Content of the first `<meta>` whose `property` or `name` equals `key`
/// (ASCII case-insensitive) and whose `content` is non-blank.
fn meta_content(doc: &Html, key: &str) -> Option<String> {
    doc.select(&META)
        .filter(|el| {
            let attrs = el.value();
            attrs
                .attr("property")
                .into_iter()
                .chain(attrs.attr("name"))
                .any(|v| v.trim().eq_ignore_ascii_case(key))
        })
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn title_tag(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

/// Resolve an image reference against the page URL.
///
/// Only http(s) results are returned; `data:`, `javascript:` and anything
/// that cannot be turned into an absolute web URL give `None`.
pub fn absolutize(raw: &str, base_url: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let resolved = if let Some(rest) = raw.strip_prefix("//") {
        Url::parse(&format!("https://{rest}")).ok()?
    } else {
        match Url::parse(raw) {
            Ok(absolute) if is_web(&absolute) => absolute,
            _ => Url::parse(base_url).ok()?.join(raw).ok()?,
        }
    };

    is_web(&resolved).then(|| resolved.to_string())
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}
