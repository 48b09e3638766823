pub mod getters;
pub mod load;

use crate::label::Label;

// Config
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Error Handling
use log::{debug, info};
use owo_colors::OwoColorize;
use tplvm_error::TplvmError;

pub const MANAGED_DIR: &'static str = "/var/lib/qubes";
pub const CONFIG_DIR: &'static str = "/etc/tplvm";

/*
* The main tplvm cli configuration struct.
* Every field is optional and falls back to system defaults,
* see getters.
*/
#[derive(Default, Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TplvmConfig {
    /// Where template vms files live.
    pub templates_dir: Option<String>,
    /// Where app vms files live.
    pub appvms_dir: Option<String>,
    /// The registry file, listing every known vm.
    pub registry: Option<String>,
    pub default_template_label: Option<Label>,
    pub default_appvm_label: Option<Label>,
    /// Hypervisor process name, used to probe running vms.
    pub hypervisor: Option<String>,

    // Session defaults, overridden by command line flags.
    pub dry_run: Option<bool>,
    pub offline_mode: Option<bool>,
}

impl TplvmConfig {
    /// Ensure tplvm working directories exists.
    pub fn ensure_directories(&self) -> Result<(), TplvmError> {
        let directories = [self.get_templates_dir(), self.get_appvms_dir()];
        for directory in directories {
            let path = Path::new(&directory);
            if !path.exists() {
                fs::create_dir_all(&directory)?;
                debug!("created directory {:#?}", directory);
            }
        }
        info!("{} ensured tplvm filetree.", "[init]".yellow());
        Ok(())
    }
}
