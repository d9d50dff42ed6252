//! # Packetsmith Configuration
//!
//! Layered configuration for the packetsmith tools.
//!
//! ## Hierarchy
//! 1. Default values
//! 2. `config/packetsmith.yaml`
//! 3. `config/<PACKETSMITH_ENV>.yaml`
//! 4. `PACKETSMITH_*` environment variables (`__` separates nested keys)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod builder;
mod error;
mod telemetry;
mod validation;

pub use builder::BuilderConfig;
pub use error::ConfigError;
pub use telemetry::{LogFormat, TelemetryConfig};

const BASE_FILE: &str = "config/packetsmith.yaml";
const ENV_PREFIX: &str = "PACKETSMITH_";

#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct PacketsmithConfig {
    #[validate(nested)]
    #[serde(default)]
    pub builder: BuilderConfig,

    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl PacketsmithConfig {
    /// Load configuration relative to the working directory.
    ///
    /// Missing files are skipped; defaults fill whatever they leave out.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_dir(".")
    }

    /// Same as [`PacketsmithConfig::load`] with `config/` resolved under `root`.
    pub fn load_from_dir<P: AsRef<Path>>(root: P) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let mut figment = Figment::from(Serialized::defaults(PacketsmithConfig::default()));

        let base = root.join(BASE_FILE);
        if base.exists() {
            figment = figment.merge(Yaml::file(base));
        }

        let env = std::env::var("PACKETSMITH_ENV").unwrap_or_else(|_| "production".into());
        let env_file = root.join(format!("config/{}.yaml", env));
        if env_file.exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from one file plus environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(PacketsmithConfig::default()))
            .merge(Yaml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["env"]))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use packetsmith_core::PayloadEncoding;

    fn jailed(
        result: Result<PacketsmithConfig, ConfigError>,
    ) -> figment::error::Result<PacketsmithConfig> {
        result.map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn default_config_validates() {
        let config = PacketsmithConfig::default();
        config.validate().expect("Default config should validate");
        assert_eq!(config.builder.encoding, PayloadEncoding::Identity);
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        Jail::expect_with(|jail| {
            let config = jailed(PacketsmithConfig::load_from_dir(jail.directory()))?;
            assert_eq!(config, PacketsmithConfig::default());
            Ok(())
        });
    }

    #[test]
    fn layers_base_env_file_and_variables() {
        Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join("config"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            jail.create_file(
                "config/packetsmith.yaml",
                "builder:\n  encoding: base64\ntelemetry:\n  log_level: info\n",
            )?;
            jail.create_file("config/staging.yaml", "telemetry:\n  log_format: json\n")?;
            jail.set_env("PACKETSMITH_ENV", "staging");
            jail.set_env("PACKETSMITH_TELEMETRY__METRICS", "true");

            let config = jailed(PacketsmithConfig::load_from_dir(jail.directory()))?;
            assert_eq!(config.builder.encoding, PayloadEncoding::Base64);
            assert_eq!(config.telemetry.log_level, "info");
            assert_eq!(config.telemetry.log_format, LogFormat::Json);
            assert!(config.telemetry.metrics);
            Ok(())
        });
    }

    #[test]
    fn accepts_encoding_aliases() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yaml", "builder:\n  encoding: binary\n")?;
            let config = jailed(PacketsmithConfig::load_from_path("custom.yaml"))?;
            assert_eq!(config.builder.encoding, PayloadEncoding::Base64);
            Ok(())
        });
    }

    #[test]
    fn rejects_invalid_log_level() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "telemetry:\n  log_level: loud\n")?;
            let err = PacketsmithConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err
                .to_string()
                .contains("Field 'telemetry.log_level':\n  - invalid_log_level"));
            Ok(())
        });
    }

    #[test]
    fn validation_error_is_reported_once() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "telemetry:\n  log_level: loud\n")?;
            let err = PacketsmithConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(std::error::Error::source(&err).is_none());
            assert_eq!(err.to_string().matches("invalid_log_level").count(), 1);
            Ok(())
        });
    }

    #[test]
    fn rejects_unknown_encoding() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "builder:\n  encoding: rot13\n")?;
            let err = PacketsmithConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Parsing(_)));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = PacketsmithConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
