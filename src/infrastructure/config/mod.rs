//! Configuration loading with figment.
//!
//! Precedence (lowest to highest):
//! 1. Programmatic defaults
//! 2. Raw environment variables for the secrets and the model override
//! 3. `CAFEBOT_*` environment variables (nested via `__`) for tunables
//!
//! Validation runs before anything binds a socket and reports *all*
//! missing secrets at once rather than the first one found.

use figment::providers::{Env, Serialized};
use figment::Figment;

use crate::domain::errors::ConfigError;
use crate::domain::models::Config;

/// Environment variables that must be present and non-empty.
const REQUIRED_ENV: [&str; 4] = [
    "PINECONE_API_KEY",
    "OPENROUTER_API_KEY",
    "LINE_CHANNEL_ACCESS_TOKEN",
    "LINE_CHANNEL_SECRET",
];

/// Loads and validates process configuration once at startup.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the environment, failing fast if any
    /// required secret is absent.
    pub fn load() -> Result<Config, ConfigError> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&[
                "PINECONE_API_KEY",
                "OPENROUTER_API_KEY",
                "LINE_CHANNEL_ACCESS_TOKEN",
                "LINE_CHANNEL_SECRET",
                "OPENROUTER_MODEL",
            ]))
            .merge(Env::prefixed("CAFEBOT_").split("__"))
            .extract()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate a configuration. Collects every missing secret so the
    /// startup error names all of them in one message.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let values = [
            &config.pinecone_api_key,
            &config.openrouter_api_key,
            &config.line_channel_access_token,
            &config.line_channel_secret,
        ];

        let missing: Vec<String> = REQUIRED_ENV
            .iter()
            .zip(values)
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| (*name).to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        if config.retrieval.dimension == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.dimension must be positive".to_string(),
            ));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be positive".to_string(),
            ));
        }

        if config.generation.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_tokens must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> Config {
        Config {
            pinecone_api_key: "pc-key".to_string(),
            openrouter_api_key: "or-key".to_string(),
            line_channel_access_token: "line-token".to_string(),
            line_channel_secret: "line-secret".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_complete_config() {
        assert!(ConfigLoader::validate(&complete_config()).is_ok());
    }

    #[test]
    fn test_validate_reports_every_missing_secret() {
        let result = ConfigLoader::validate(&Config::default());
        match result {
            Err(ConfigError::MissingEnv(missing)) => {
                assert_eq!(
                    missing,
                    vec![
                        "PINECONE_API_KEY",
                        "OPENROUTER_API_KEY",
                        "LINE_CHANNEL_ACCESS_TOKEN",
                        "LINE_CHANNEL_SECRET",
                    ]
                );
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_single_missing_secret() {
        let mut config = complete_config();
        config.line_channel_secret = String::new();

        let result = ConfigLoader::validate(&config);
        match result {
            Err(ConfigError::MissingEnv(missing)) => {
                assert_eq!(missing, vec!["LINE_CHANNEL_SECRET"]);
            }
            other => panic!("expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = complete_config();
        config.retrieval.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_env_message_names_variables() {
        let err = ConfigError::MissingEnv(vec![
            "PINECONE_API_KEY".to_string(),
            "LINE_CHANNEL_SECRET".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("PINECONE_API_KEY"));
        assert!(message.contains("LINE_CHANNEL_SECRET"));
    }

    #[test]
    fn test_load_reads_secrets_and_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PINECONE_API_KEY", "pc");
            jail.set_env("OPENROUTER_API_KEY", "or");
            jail.set_env("LINE_CHANNEL_ACCESS_TOKEN", "token");
            jail.set_env("LINE_CHANNEL_SECRET", "secret");
            jail.set_env("OPENROUTER_MODEL", "some/other-model");
            jail.set_env("CAFEBOT_SERVER__PORT", "9000");
            jail.set_env("CAFEBOT_RETRIEVAL__TOP_K", "6");

            let config = ConfigLoader::load().expect("load should succeed");
            assert_eq!(config.pinecone_api_key, "pc");
            assert_eq!(config.openrouter_model, "some/other-model");
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.retrieval.top_k, 6);
            Ok(())
        });
    }

    #[test]
    fn test_load_fails_without_secrets() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PINECONE_API_KEY", "pc");

            let err = ConfigLoader::load().expect_err("load should fail");
            let message = err.to_string();
            assert!(message.contains("OPENROUTER_API_KEY"));
            assert!(message.contains("LINE_CHANNEL_ACCESS_TOKEN"));
            assert!(message.contains("LINE_CHANNEL_SECRET"));
            assert!(!message.contains("PINECONE_API_KEY"));
            Ok(())
        });
    }
}
