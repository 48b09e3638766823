use super::{TplvmConfig, MANAGED_DIR};
use crate::label::Label;

use std::path::PathBuf;

impl TplvmConfig {
    pub fn get_templates_dir(&self) -> PathBuf {
        match &self.templates_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(MANAGED_DIR).join("vm-templates"),
        }
    }
    pub fn get_appvms_dir(&self) -> PathBuf {
        match &self.appvms_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(MANAGED_DIR).join("appvms"),
        }
    }
    pub fn get_registry_path(&self) -> PathBuf {
        match &self.registry {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(MANAGED_DIR).join("registry.toml"),
        }
    }
    pub fn get_default_template_label(&self) -> Label {
        self.default_template_label.unwrap_or(Label::Black)
    }
    pub fn get_default_appvm_label(&self) -> Label {
        self.default_appvm_label.unwrap_or(Label::Red)
    }
    pub fn get_hypervisor(&self) -> String {
        self.hypervisor
            .to_owned()
            .unwrap_or("qemu-system-x86_64".to_owned())
    }
}
