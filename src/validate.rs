use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("URL pattern should be valid"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern should be valid")
});

pub const MISSING_URL_MESSAGE: &str = "Informe a URL do site.";
pub const INVALID_URL_MESSAGE: &str =
    "URL inválida. Use um endereço começando com http:// ou https://.";
pub const INVALID_EMAIL_MESSAGE: &str = "E-mail inválido.";

/// Body of an analysis request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Whether a target URL uses http or https
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Whether an email has the basic `name@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

impl AnalysisRequest {
    /// Check the target URL and return it
    pub fn validated_url(&self) -> Result<&str> {
        match self.url.as_deref() {
            None | Some("") => Err(Error::Validation(MISSING_URL_MESSAGE.to_string())),
            Some(url) if !is_valid_url(url) => {
                Err(Error::Validation(INVALID_URL_MESSAGE.to_string()))
            }
            Some(url) => Ok(url),
        }
    }

    /// Check the email, when one was provided
    pub fn validate_email(&self) -> Result<()> {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() && !is_valid_email(email) => {
                Err(Error::Validation(INVALID_EMAIL_MESSAGE.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: Option<&str>, email: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            url: url.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_url_schemes() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/page?q=1"));
        assert!(!is_valid_url("ftp://x.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url(" https://example.com"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_validated_url() {
        assert_eq!(
            request(Some("https://example.com"), None).validated_url().unwrap(),
            "https://example.com"
        );

        let err = request(Some("ftp://x.com"), None).validated_url().unwrap_err();
        assert_eq!(err.to_string(), INVALID_URL_MESSAGE);

        let err = request(None, None).validated_url().unwrap_err();
        assert_eq!(err.to_string(), MISSING_URL_MESSAGE);
    }

    #[test]
    fn test_validate_email() {
        assert!(request(None, None).validate_email().is_ok());
        assert!(request(None, Some("")).validate_email().is_ok());
        assert!(request(None, Some("ana@example.com")).validate_email().is_ok());

        let err = request(None, Some("not-an-email")).validate_email().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
