//! Configuration management for the generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (acp-codegen.toml)
//! - Environment variables (ACP_CODEGEN__*)
//!
//! ## Example config file (acp-codegen.toml):
//! ```toml
//! [input]
//! schema_dir = "./schema"
//!
//! [output]
//! dir = "./src/generated"
//! schema_file = "schema.rs"
//! meta_file = "meta.rs"
//!
//! [codegen]
//! runtime_path = "acp_codegen"
//! emit_docs = true
//! record_derives = ["Debug", "Clone", "PartialEq", "Serialize", "Deserialize"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::CodegenConfig;

/// Main configuration for the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Where the schema files are read from
    #[serde(default)]
    pub input: InputConfig,

    /// Where generated files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Shape of the generated source
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding schema.json, meta.json and VERSION
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory generated files are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File name of the generated models
    #[serde(default = "default_schema_file")]
    pub schema_file: String,

    /// File name of the generated method constants
    #[serde(default = "default_meta_file")]
    pub meta_file: String,
}

// Default value functions
fn default_schema_dir() -> PathBuf {
    PathBuf::from("schema")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("src/generated")
}

fn default_schema_file() -> String {
    "schema.rs".to_string()
}

fn default_meta_file() -> String {
    "meta.rs".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            schema_file: default_schema_file(),
            meta_file: default_meta_file(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["acp-codegen.toml", ".acp-codegen.toml", "config/acp-codegen.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("com", "agentclientprotocol", "acp-codegen") {
            let xdg_config = config_dir.config_dir().join("acp-codegen.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // ACP_CODEGEN__CODEGEN__EMIT_DOCS=false
        builder = builder.add_source(
            Environment::with_prefix("ACP_CODEGEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.input.schema_dir.join("schema.json")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.input.schema_dir.join("meta.json")
    }

    pub fn version_path(&self) -> PathBuf {
        self.input.schema_dir.join("VERSION")
    }

    pub fn schema_output(&self) -> PathBuf {
        self.output.dir.join(&self.output.schema_file)
    }

    pub fn meta_output(&self) -> PathBuf {
        self.output.dir.join(&self.output.meta_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.input.schema_dir, PathBuf::from("schema"));
        assert_eq!(config.schema_output(), PathBuf::from("src/generated/schema.rs"));
        assert_eq!(config.meta_output(), PathBuf::from("src/generated/meta.rs"));
        assert_eq!(config.codegen.runtime_path, "acp_codegen");
        assert!(config.codegen.emit_docs);
    }

    #[test]
    fn test_serialize_config() {
        let config = GeneratorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[codegen]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[input]\nschema_dir = \"vendor/acp\"\n\n[codegen]\nruntime_path = \"crate\"\nemit_docs = false\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.input.schema_dir, PathBuf::from("vendor/acp"));
        assert_eq!(config.codegen.runtime_path, "crate");
        assert!(!config.codegen.emit_docs);
        // Untouched sections keep their defaults
        assert_eq!(config.output.schema_file, "schema.rs");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acp-codegen.toml");
        GeneratorConfig::default().save(&path).unwrap();

        let loaded = GeneratorConfig::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.codegen, CodegenConfig::default());
    }
}
