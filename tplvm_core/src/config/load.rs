use super::{TplvmConfig, CONFIG_DIR};

use std::fs;
use std::path::PathBuf;

// Error Handling
use log::{info, warn};
use tplvm_error::{CastError, TomlError, TplvmError};

impl TplvmConfig {
    /*
     * Get config from crate directory
     */
    fn debug_path() -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("./tplvm.config.toml");
        return path;
    }
    /*
     * Get config from FHS path.
     */
    fn release_path() -> PathBuf {
        let mut path = PathBuf::from(CONFIG_DIR);
        path.push("config.toml");
        return path;
    }
    /*
     * Search the config file and fall back to defaults
     * if there is none.
     */
    pub fn get() -> Result<Self, TplvmError> {
        info!("Search config file.");

        #[cfg(debug_assertions)]
        let path = Self::debug_path();

        #[cfg(not(debug_assertions))]
        let path = Self::release_path();

        if !path.exists() {
            warn!(
                "No config file found at {:#?}, using defaults.",
                path.display().to_string()
            );
            return Ok(Self::default());
        }
        let path = path.display().to_string();
        let config = Self::from_file(&path)?;

        Ok(config)
    }
    pub fn from_file(path: &str) -> Result<Self, TplvmError> {
        let string = fs::read_to_string(path)?;
        Self::from_toml(&string)
    }
    pub fn from_toml(string: &str) -> Result<Self, TplvmError> {
        let res = toml::from_str::<Self>(&string);
        let item = match res {
            Ok(res) => res,
            Err(e) => {
                let err = CastError::TomlError(TomlError::new(e, &string));
                return Err(err.into());
            }
        };
        Ok(item)
    }
}
