use config::{Config, ConfigError, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Load configuration from a file, the format is picked from its extension.
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut config_path = PathBuf::from(path);

    config_path =
        std::fs::canonicalize(&config_path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    let settings = Config::builder()
        .add_source(File::from(config_path))
        .build()?;

    settings.try_deserialize::<T>()
}

/// Load configuration from an in-memory document.
pub fn load_config_str<T>(content: &str, format: FileFormat) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from_str(content, format))
        .build()?
        .try_deserialize::<T>()
}
