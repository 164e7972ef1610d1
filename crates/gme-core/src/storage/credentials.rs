//! Access token lookup
//!
//! Requests are authorized with an OAuth2 bearer token taken from the
//! GME_ACCESS_TOKEN environment variable (or `--access-token`, which clap
//! binds to the same variable). Nothing is written to disk.

use std::env;

pub const ACCESS_TOKEN_ENV: &str = "GME_ACCESS_TOKEN";

/// Returns the value of GME_ACCESS_TOKEN if set and non-empty, otherwise None.
pub fn get_access_token() -> Option<String> {
    env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty())
}

pub fn has_access_token() -> bool {
    get_access_token().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the variable
    #[test]
    fn test_get_access_token() {
        let original = env::var(ACCESS_TOKEN_ENV).ok();

        unsafe {
            env::set_var(ACCESS_TOKEN_ENV, "ya29.test_token");
        }
        assert_eq!(get_access_token(), Some("ya29.test_token".to_string()));
        assert!(has_access_token());

        unsafe {
            env::set_var(ACCESS_TOKEN_ENV, "");
        }
        assert_eq!(get_access_token(), None);

        unsafe {
            env::remove_var(ACCESS_TOKEN_ENV);
        }
        assert!(!has_access_token());

        // Restore original state
        unsafe {
            match original {
                Some(value) => env::set_var(ACCESS_TOKEN_ENV, value),
                None => env::remove_var(ACCESS_TOKEN_ENV),
            }
        }
    }
}
