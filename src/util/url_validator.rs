use thiserror::Error;
use url::Url;

/// Errors from validating a configured or user-facing URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host part.
    #[error("URL has no host")]
    MissingHost,
    /// The URL embeds a username or password.
    #[error("Credentials in URL are not allowed")]
    EmbeddedCredentials,
}

/// Validate the API or web base URL from configuration.
///
/// Local hosts are allowed since the backend commonly runs on
/// `localhost` during development. Rejects:
/// - non-HTTP(S) schemes
/// - URLs without a host
/// - `user:pass@` credentials, which would end up in logs
///
/// # Examples
///
/// ```
/// use civicfeed::util::validate_base_url;
///
/// assert!(validate_base_url("http://localhost:5000").is_ok());
/// assert!(validate_base_url("https://civic.example.org/v2/").is_ok());
/// assert!(validate_base_url("ftp://civic.example.org").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = parse_http(url_str)?;
    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::EmbeddedCredentials);
    }
    Ok(url)
}

/// Validate a URL before handing it to the system browser.
///
/// Only http(s) is passed on; `file:`, `javascript:` and friends are
/// refused.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    parse_http(url_str)
}

fn parse_http(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}
