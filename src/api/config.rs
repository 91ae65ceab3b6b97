//! API endpoint configuration. The base URL may be absolute or a path relative
//! to the origin serving the front-end (the deployment default is `/api`,
//! proxied by the dev server). Configuration values are public; do not store
//! secrets here.

use super::errors::ApiError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3040";
/// Default request timeout applied to every API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub api_base: String,
    pub origin: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Config pointing straight at an absolute API base, used by tests and
    /// deployments without a proxy.
    #[must_use]
    pub fn with_base(api_base: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            ..Self::default()
        }
    }

    /// Resolves the absolute API base URL.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if neither the base nor the origin form a valid URL.
    pub fn base_url(&self) -> Result<String, ApiError> {
        let api_base = self.api_base.trim();

        if let Ok(url) = Url::parse(api_base) {
            return match url.scheme() {
                "http" | "https" => Ok(api_base.trim_end_matches('/').to_string()),
                scheme => Err(ApiError::Config(format!(
                    "Unsupported API scheme: {scheme}"
                ))),
            };
        }

        let origin = Url::parse(self.origin.trim())
            .map_err(|err| ApiError::Config(format!("Invalid origin: {err}")))?;
        if origin.host().is_none() {
            return Err(ApiError::Config("Origin has no host".to_string()));
        }

        let joined = origin
            .join(api_base)
            .map_err(|err| ApiError::Config(format!("Invalid API base: {err}")))?;

        Ok(joined.as_str().trim_end_matches('/').to_string())
    }
}

/// Builds a URL from an explicit base URL and the provided path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relative_base_resolves_against_origin() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:3040/api");
    }

    #[test]
    fn absolute_base_is_used_as_is() {
        let config = ApiConfig::with_base("https://api.example.com/v1/");
        assert_eq!(config.base_url().unwrap(), "https://api.example.com/v1");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let config = ApiConfig::with_base("ftp://files.example.com");
        assert!(matches!(config.base_url(), Err(ApiError::Config(_))));
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let config = ApiConfig {
            origin: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.base_url(), Err(ApiError::Config(_))));
    }

    #[test]
    fn build_url_joins_with_single_slash() {
        assert_eq!(
            build_url_with_base("http://localhost/api/", "/users/me"),
            "http://localhost/api/users/me"
        );
        assert_eq!(
            build_url_with_base("http://localhost/api", "login?setCookie=true"),
            "http://localhost/api/login?setCookie=true"
        );
        assert_eq!(build_url_with_base("  ", "/logout"), "/logout");
    }
}
