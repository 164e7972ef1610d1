//! Input validation utilities
//!
//! Checks user-supplied values before they end up in request paths or the
//! configuration file.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate an asset id before it is spliced into a request path.
///
/// Maps Engine ids look like `01234567890123456789-12345678901234567890`;
/// only the character set is enforced here, the service decides the rest.
pub fn validate_asset_id(id: &str) -> crate::Result<()> {
    if id.trim().is_empty() {
        return Err(CliError::InvalidArguments("Asset ID cannot be empty".to_string()).into());
    }

    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(CliError::InvalidArguments(format!(
            "Invalid asset ID '{}': unexpected character '{}'",
            id, bad
        ))
        .into());
    }

    Ok(())
}

/// Validate access token format
pub fn validate_access_token(token: &str) -> crate::Result<()> {
    if token.trim().is_empty() {
        return Err(CliError::InvalidArguments("Access token cannot be empty".to_string()).into());
    }

    if token.chars().any(char::is_whitespace) {
        return Err(CliError::InvalidArguments(
            "Access token must not contain whitespace".to_string(),
        )
        .into());
    }

    Ok(())
}
