//! Deployment environment, which selects the API base URL.

use std::str::FromStr;

use serde::Deserialize;

/// Base URL of the HMRC sandbox.
pub const TEST_BASE_URL: &str = "https://test-api.service.hmrc.gov.uk";
/// Base URL of the live HMRC API.
pub const PRODUCTION_BASE_URL: &str = "https://api.service.hmrc.gov.uk";

/// Environment variable read by [`Environment::from_env`].
pub const ENVIRONMENT_VAR: &str = "HMRC_ENVIRONMENT";

/// Which HMRC deployment requests are sent to.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// The sandbox at `test-api.service.hmrc.gov.uk`.
    #[serde(alias = "sandbox")]
    Test,
    /// The live API. This is the default.
    #[default]
    #[serde(alias = "live")]
    Production,
}

impl Environment {
    /// The base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Test => TEST_BASE_URL,
            Environment::Production => PRODUCTION_BASE_URL,
        }
    }

    /// Reads the environment from `HMRC_ENVIRONMENT`.
    ///
    /// Falls back to [`Environment::Production`] when the variable is unset
    /// or holds an unrecognised value.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Unrecognised {} value {:?}, using production",
                    ENVIRONMENT_VAR,
                    value
                );
                Environment::Production
            }),
            None => Environment::Production,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "sandbox" => Ok(Environment::Test),
            "production" | "live" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_base_urls() {
        assert_eq!(
            Environment::Test.base_url(),
            "https://test-api.service.hmrc.gov.uk"
        );
        assert_eq!(
            Environment::Production.base_url(),
            "https://api.service.hmrc.gov.uk"
        );
    }

    #[test]
    fn default_is_production() {
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!("Sandbox".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!(" production ".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("LIVE".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("staging".parse::<Environment>(), Err(()));
    }

    #[test]
    fn env_value_falls_back_to_production() {
        assert_eq!(Environment::from_env_value(None), Environment::Production);
        assert_eq!(
            Environment::from_env_value(Some("staging")),
            Environment::Production
        );
        assert_eq!(Environment::from_env_value(Some("")), Environment::Production);
        assert_eq!(Environment::from_env_value(Some("sandbox")), Environment::Test);
    }

    #[test]
    fn deserialize_from_config_value() {
        let env: Environment = serde_json::from_str("\"sandbox\"").unwrap();
        assert_eq!(env, Environment::Test);
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
    }
}
