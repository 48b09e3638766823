use super::{VmAttrs, VmCore, VmKind};
use crate::config::TplvmConfig;

use std::path::PathBuf;
use uuid::Uuid;

// Error Handling
use log::trace;
use tplvm_error::{LibError, TplvmError};

impl VmAttrs {
    /*
     * Resolve a template definition.
     * Never fails: name validity and unicity are checked by the registry.
     *
     * - dir_path defaults to "<templates_dir>/<name>".
     * - label defaults to the system template label.
     */
    pub fn resolve_template(&self, config: &TplvmConfig) -> VmCore {
        let dir_path = match &self.dir_path {
            Some(dir) => PathBuf::from(dir),
            None => config.get_templates_dir().join(&self.name),
        };
        let label = self
            .label
            .unwrap_or_else(|| config.get_default_template_label());

        let vm = VmCore {
            name: self.name.to_owned(),
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            kind: VmKind::Template,
            label,
            dir_path,
            template: None,
        };
        trace!("resolved template {:#?}", vm);
        vm
    }

    /*
     * Resolve an app vm or standalone vm definition.
     * An app vm without template is rejected.
     */
    pub fn resolve_appvm(&self, config: &TplvmConfig) -> Result<VmCore, TplvmError> {
        if self.kind == VmKind::App && self.template.is_none() {
            let message = format!("App vm {:#?} has no template.", self.name);
            let help = "Set the template the vm is based on, ex: template = \"fedora-30\"";
            return Err(LibError::builder().msg(&message).help(help).build().into());
        }
        let dir_path = match &self.dir_path {
            Some(dir) => PathBuf::from(dir),
            None => config.get_appvms_dir().join(&self.name),
        };
        let label = self
            .label
            .unwrap_or_else(|| config.get_default_appvm_label());

        Ok(VmCore {
            name: self.name.to_owned(),
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
            kind: self.kind,
            label,
            dir_path,
            template: match self.kind {
                VmKind::App => self.template.to_owned(),
                _ => None,
            },
        })
    }

    pub fn resolve(&self, config: &TplvmConfig) -> Result<VmCore, TplvmError> {
        match self.kind {
            VmKind::Template => Ok(self.resolve_template(config)),
            VmKind::App | VmKind::Standalone => self.resolve_appvm(config),
        }
    }
}
