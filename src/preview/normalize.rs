use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

static HTTP_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());
static ANY_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Missing url")]
    MissingUrl,

    #[error("Only http/https URLs are allowed")]
    UnsupportedScheme,

    #[error("Invalid url")]
    InvalidUrl,
}

/// A request target that passed normalization and validation.
///
/// `input_url` keeps the normalized string exactly as the caller will see it
/// echoed back; `url` is the parsed form used for fetching.
#[derive(Debug, Clone)]
pub struct Target {
    pub input_url: String,
    pub url: Url,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let input_url = normalize_url(raw)?;
        ensure_http_scheme(&input_url)?;

        let url = Url::parse(&input_url).map_err(|_| UrlError::InvalidUrl)?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::InvalidUrl);
        }

        Ok(Target { input_url, url })
    }
}

/// Trim and add `https://` when the input carries no scheme at all.
///
/// Inputs with a foreign scheme (`ftp://...`) are returned untouched so that
/// [`ensure_http_scheme`] can reject them.
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::MissingUrl);
    }

    if HTTP_SCHEME.is_match(trimmed) || ANY_SCHEME.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

pub fn ensure_http_scheme(url: &str) -> Result<(), UrlError> {
    if HTTP_SCHEME.is_match(url) {
        Ok(())
    } else {
        Err(UrlError::UnsupportedScheme)
    }
}

/// Strip the scheme so the remainder can be appended to the mirror base.
pub fn strip_scheme(url: &str) -> &str {
    match HTTP_SCHEME.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

/// Hostname without a leading `www.`; empty when `url` does not parse.
pub fn get_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|host| match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(
            normalize_url("example.com/a").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn keeps_http_and_https_as_is() {
        for url in [
            "http://example.com",
            "https://example.com/a?b=c",
            "HTTPS://Example.com/Path",
        ] {
            assert_eq!(normalize_url(url).unwrap(), url);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            normalize_url("  example.com \n").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(normalize_url(""), Err(UrlError::MissingUrl));
        assert_eq!(normalize_url("   "), Err(UrlError::MissingUrl));
    }

    #[test]
    fn foreign_scheme_is_rejected() {
        assert_eq!(
            Target::parse("ftp://example.com").unwrap_err(),
            UrlError::UnsupportedScheme
        );
        assert_eq!(
            Target::parse("javascript://alert(1)").unwrap_err(),
            UrlError::UnsupportedScheme
        );
    }

    #[test]
    fn hostless_url_is_invalid() {
        assert_eq!(Target::parse("https://").unwrap_err(), UrlError::InvalidUrl);
    }

    #[test]
    fn target_keeps_normalized_string() {
        let target = Target::parse("example.com").unwrap();
        assert_eq!(target.input_url, "https://example.com");
        assert_eq!(target.url.host_str(), Some("example.com"));
    }

    #[test]
    fn strips_http_and_https_prefixes() {
        assert_eq!(strip_scheme("https://example.com/a"), "example.com/a");
        assert_eq!(strip_scheme("HTTP://example.com"), "example.com");
        assert_eq!(strip_scheme("example.com"), "example.com");
    }

    #[test]
    fn domain_drops_www_prefix() {
        assert_eq!(get_domain("https://www.Example.com/x"), "example.com");
        assert_eq!(get_domain("https://blog.example.com"), "blog.example.com");
    }

    #[test]
    fn domain_of_garbage_is_empty() {
        assert_eq!(get_domain("not a url"), "");
    }
}
