use super::{Registry, Vm};
use crate::config::TplvmConfig;
use crate::session::Session;
use crate::template::TemplateVm;
use crate::vm::{VmAttrs, VmKind};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;

// Error Handling
use log::{debug, info};
use tplvm_error::{CastError, TomlError, TplvmError};

/*
* The registry file layout:
* a list of [[vm]] tables.
*/
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryFile {
    #[serde(default)]
    pub vm: Vec<VmAttrs>,
}

impl Registry {
    /*
     * Load the registry file pointed by configuration.
     * A missing file is an empty registry.
     */
    pub fn load(session: &Session) -> Result<Self, TplvmError> {
        let path = session.config().get_registry_path();
        let mut registry = match path.exists() {
            true => {
                let string = fs::read_to_string(&path)?;
                Self::from_toml(&string, session.config())?
            }
            false => {
                debug!("no registry at {:#?}", path.display().to_string());
                Self::default()
            }
        };
        registry.path = Some(path);
        Ok(registry)
    }

    /*
     * Templates are resolved and inserted first,
     * so that app vms find their template whatever the file order.
     */
    pub fn from_toml(string: &str, config: &TplvmConfig) -> Result<Self, TplvmError> {
        let mut file = match toml::from_str::<RegistryFile>(string) {
            Ok(res) => res,
            Err(e) => {
                let err = CastError::TomlError(TomlError::new(e, string));
                return Err(err.into());
            }
        };
        file.vm.sort_by_key(|e| e.kind.load_order());

        let mut registry = Self::default();
        for attrs in &file.vm {
            match attrs.kind {
                VmKind::Template => {
                    registry.insert_template(TemplateVm::from_attrs(attrs, config))?;
                }
                VmKind::App | VmKind::Standalone => {
                    let core = attrs.resolve(config)?;
                    let firewall = match (&attrs.firewall, &core.template) {
                        (Some(firewall), _) => firewall.to_owned(),
                        (None, Some(template)) => {
                            registry.get_template(template)?.get_firewall_defaults()
                        }
                        (None, None) => Default::default(),
                    };
                    registry.insert_vm(Vm { core, firewall })?;
                }
            }
        }
        Ok(registry)
    }

    pub fn to_file(&self) -> RegistryFile {
        let mut vm: Vec<VmAttrs> = self.templates().map(|e| VmAttrs::from(&e.core)).collect();
        for e in self.vms() {
            let mut attrs = VmAttrs::from(&e.core);
            attrs.firewall = Some(e.firewall.to_owned());
            vm.push(attrs);
        }
        RegistryFile { vm }
    }

    pub fn to_toml(&self) -> Result<String, TplvmError> {
        Ok(toml::to_string_pretty(&self.to_file())?)
    }

    /*
     * Persist the registry where it was loaded from.
     * Skipped in dry-run sessions.
     */
    pub fn save(&self, session: &Session) -> Result<(), TplvmError> {
        let path = match &self.path {
            Some(path) => path.to_owned(),
            None => session.config().get_registry_path(),
        };
        if session.dry_run() {
            info!(
                "{} would save registry to {:#?}",
                "[dry-run]".magenta(),
                path.display().to_string()
            );
            return Ok(());
        }
        if let Some(parent) = Path::new(&path).parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)?;
        debug!("saved registry to {:#?}", path.display().to_string());
        Ok(())
    }
}
