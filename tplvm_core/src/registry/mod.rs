pub mod create;
pub mod delete;
pub mod load;

use crate::firewall::FirewallPolicy;
use crate::template::{AppVmRef, TemplateVm};
use crate::vm::{VmCore, VmKind};

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Error Handling
use log::trace;
use miette::Error;
use tplvm_error::{LibError, TplvmError, WrapError};

/// Longest vm name accepted.
pub const MAX_NAME_LEN: usize = 31;

/*
* A non-template vm known to the registry.
*/
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Vm {
    pub core: VmCore,
    pub firewall: FirewallPolicy,
}

/*
* Every vm known to tplvm, by name.
*
* The registry owns the vms and is the only one
* to edit templates dependents.
*/
#[derive(Debug, Default)]
pub struct Registry {
    /// Where the registry is persisted.
    path: Option<PathBuf>,
    templates: BTreeMap<String, TemplateVm>,
    vms: BTreeMap<String, Vm>,
}

impl Registry {
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
    pub fn templates(&self) -> impl Iterator<Item = &TemplateVm> {
        self.templates.values()
    }
    pub fn vms(&self) -> impl Iterator<Item = &Vm> {
        self.vms.values()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name) || self.vms.contains_key(name)
    }
    pub fn get_template(&self, name: &str) -> Result<&TemplateVm, TplvmError> {
        match self.templates.get(name) {
            Some(vm) => Ok(vm),
            None => Err(self.unknown_template(name)),
        }
    }
    pub fn get_vm(&self, name: &str) -> Result<&Vm, TplvmError> {
        match self.vms.get(name) {
            Some(vm) => Ok(vm),
            None => {
                let message = format!("Couldn't find vm {:#?}", name);
                let names = self.vms.keys().cloned().collect::<Vec<String>>().join(",");
                let help = format!("Available vms are:\n[{names}]");
                Err(LibError::builder().msg(&message).help(&help).build().into())
            }
        }
    }
    fn unknown_template(&self, name: &str) -> TplvmError {
        let message = format!("Couldn't find template {:#?}", name);
        let names = self
            .templates
            .keys()
            .cloned()
            .collect::<Vec<String>>()
            .join(",");
        let help = format!("Available templates are:\n[{names}]");
        LibError::builder().msg(&message).help(&help).build().into()
    }
    /*
     * A vm name is also its directory name:
     * it must start with a letter, hold no path separator
     * and fit in a window manager title.
     */
    pub fn verify_name(name: &str) -> Result<(), TplvmError> {
        let help = "Vm names start with a letter, followed by letters, digits, '_', '.' or '-'.\n\
            ex: fedora-30";
        if name.is_empty() {
            return Err(LibError::builder()
                .msg("Vm name can't be empty")
                .help(help)
                .build()
                .into());
        }
        if name.len() > MAX_NAME_LEN {
            let message = format!(
                "Vm name {:#?} is longer than {} characters.",
                name, MAX_NAME_LEN
            );
            return Err(LibError::builder().msg(&message).help(help).build().into());
        }
        let re = Regex::new(r"^[a-zA-Z][a-zA-Z0-9_.-]*$").map_err(|e| {
            WrapError::builder()
                .msg("Couldn't build vm name pattern")
                .help("The built-in vm name pattern doesn't compile.")
                .origin(Error::from_err(e))
                .build()
        })?;
        if !re.is_match(name) || name.contains("..") {
            let message = format!("Invalid vm name {:#?}.", name);
            return Err(LibError::builder().msg(&message).help(help).build().into());
        }
        Ok(())
    }
    fn ensure_name_is_free(&self, name: &str) -> Result<(), TplvmError> {
        Self::verify_name(name)?;
        if self.contains(name) {
            let message = format!("A vm named {:#?} already exists.", name);
            return Err(LibError::builder()
                .msg(&message)
                .help("Choose another name or remove the existing vm first.")
                .build()
                .into());
        }
        Ok(())
    }
    /// Name of the vm whose files live in `dir`.
    fn owner_of_dir(&self, dir: &Path) -> Option<&str> {
        let template = self
            .templates()
            .find(|e| e.core.dir_path == dir)
            .map(|e| e.name());
        template.or_else(|| {
            self.vms()
                .find(|e| e.core.dir_path == dir)
                .map(|e| e.core.name.as_str())
        })
    }
    fn ensure_dir_is_free(&self, dir: &Path) -> Result<(), TplvmError> {
        if let Some(owner) = self.owner_of_dir(dir) {
            let message = format!(
                "Directory {:#?} already holds the files of vm {:#?}.",
                dir.display().to_string(),
                owner
            );
            return Err(LibError::builder()
                .msg(&message)
                .help("Choose another directory with --dir, or none to use the default one.")
                .build()
                .into());
        }
        Ok(())
    }
    /// Checks shared by every vm added to the registry.
    fn ensure_vm_is_new(&self, vm: &VmCore) -> Result<(), TplvmError> {
        self.ensure_name_is_free(&vm.name)?;
        self.ensure_dir_is_free(&vm.dir_path)
    }

    /*
     * Add a resolved template.
     */
    pub fn insert_template(&mut self, vm: TemplateVm) -> Result<(), TplvmError> {
        self.ensure_vm_is_new(&vm.core)?;
        trace!("registered template {:#?}", vm.name());
        self.templates.insert(vm.name().to_owned(), vm);
        Ok(())
    }
    /*
     * Add a resolved app vm or standalone vm.
     * App vms are registered as dependents of their template,
     * which must already be known.
     */
    pub fn insert_vm(&mut self, vm: Vm) -> Result<(), TplvmError> {
        self.ensure_vm_is_new(&vm.core)?;
        if vm.core.kind == VmKind::Template {
            let message = format!("{:#?} is a template.", vm.core.name);
            return Err(LibError::builder()
                .msg(&message)
                .help("Templates are inserted with insert_template.")
                .build()
                .into());
        }
        if vm.core.kind == VmKind::App {
            let template_name = vm.core.template.to_owned().unwrap_or_default();
            if !self.templates.contains_key(&template_name) {
                return Err(self.unknown_template(&template_name));
            }
            if let Some(template) = self.templates.get_mut(&template_name) {
                template.dependents_mut().register(AppVmRef::from(&vm.core));
            }
        }
        trace!("registered vm {:#?}", vm.core.name);
        self.vms.insert(vm.core.name.to_owned(), vm);
        Ok(())
    }
}
