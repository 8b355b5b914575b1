use thiserror::Error;
use url::Url;

/// Why an article URL was not handed to the browser.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Check an article URL before opening it in the system browser.
///
/// Only absolute `http`/`https` URLs with a host pass. Anything else
/// (`file:`, `javascript:`, relative paths) could run a local handler.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().unwrap_or_default().is_empty() {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_urls_accepted() {
        assert!(validate_url_for_open("https://example.com/story").is_ok());
        assert!(validate_url_for_open(" http://news.example.org:8080/a?b=c ").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        for url in ["file:///etc/passwd", "javascript:alert(1)", "ftp://example.com"] {
            assert!(matches!(
                validate_url_for_open(url),
                Err(UrlValidationError::UnsupportedScheme(_))
            ));
        }
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            validate_url_for_open("/articles/3"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
