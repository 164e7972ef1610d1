//! Helpers that turn transport failures into [`ApiError`] with endpoint context.

use crate::error::ApiError;

/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, crate::api::client::DEFAULT_TIMEOUT_SECS);
    }

    ApiError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Convert a URL that could not be built into ApiError with endpoint context
pub fn convert_url_error(endpoint: &str, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidUrl {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

/// Classify a non-success response.
///
/// Google APIs report quota exhaustion either as 429 or as 403 with a
/// `rateLimitExceeded` / `userRateLimitExceeded` reason in the body.
pub fn convert_status_error(status: u16, endpoint: &str, body: String) -> ApiError {
    match status {
        404 => ApiError::NotFound {
            endpoint: endpoint.to_string(),
        },
        429 => ApiError::RateLimited {
            endpoint: endpoint.to_string(),
        },
        403 if body.contains("RateLimitExceeded") || body.contains("rateLimitExceeded") => {
            ApiError::RateLimited {
                endpoint: endpoint.to_string(),
            }
        }
        401 | 403 => ApiError::Unauthorized {
            status,
            endpoint: endpoint.to_string(),
            server_message: body,
        },
        408 | 504 => ApiError::Timeout {
            timeout_secs: crate::api::client::DEFAULT_TIMEOUT_SECS,
            endpoint: endpoint.to_string(),
        },
        _ => ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: body,
        },
    }
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_request_error(e, $endpoint))
    };
}

/// Helper macro for JSON parsing errors
#[macro_export]
macro_rules! map_json_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_json_error(e, $endpoint))
    };
}
