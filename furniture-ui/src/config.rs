use std::env;

/// Environment variable holding the furniture service base URL.
pub const BASE_URL_VARIABLE: &str = "FURNITURE_SERVICE_BASE";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_UI_PORT: u16 = 8081;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub furniture_service_base: String,
}

impl UiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        Self {
            furniture_service_base: lookup(BASE_URL_VARIABLE)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| String::from(DEFAULT_BASE_URL)),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            furniture_service_base: String::from(DEFAULT_BASE_URL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_variable() {
        let config = UiConfig::from_lookup(|name| {
            assert_eq!(name, "FURNITURE_SERVICE_BASE");
            Some(String::from("http://furniture.internal:9000"))
        });

        assert_eq!(config.furniture_service_base, "http://furniture.internal:9000");
    }

    #[test]
    fn test_missing_or_blank_variable_uses_default() {
        assert_eq!(UiConfig::from_lookup(|_| None), UiConfig::default());
        assert_eq!(
            UiConfig::from_lookup(|_| Some(String::from("  "))),
            UiConfig::default()
        );
    }
}
