use super::Registry;
use crate::session::Session;
use crate::storage::{FileStorage, Storage};
use crate::vm::{VmCore, VmState};

use owo_colors::OwoColorize;

// Error Handling
use log::info;
use tplvm_error::{LibError, PreconditionError, TplvmError};

impl Registry {
    /*
     * Remove a vm from the registry and delete its files.
     *
     * A template is only removed once no app vm depends on it,
     * its storage is left untouched otherwise.
     * Running vms are never removed.
     */
    pub fn remove(&mut self, session: &Session, name: &str) -> Result<(), TplvmError> {
        if let Some(template) = self.templates.get(name) {
            if !template.dependents().is_empty() {
                let message = format!(
                    "Template {:#?} is used by {} vm(s).",
                    name,
                    template.dependents().len()
                );
                let help = format!(
                    "Remove or move the dependent vms first:\n[{}]",
                    template.dependents().names().join(",")
                );
                return Err(LibError::builder().msg(&message).help(&help).build().into());
            }
            self.ensure_not_running(session, &template.core)?;
            if session.dry_run() {
                info!(
                    "{} would delete {:#?}",
                    "[dry-run]".magenta(),
                    template.storage().dir().display().to_string()
                );
            } else {
                template.storage().remove_files()?;
            }
            self.templates.remove(name);
            info!("{} removed template {:#?}", "[rm]".green(), name);
            return Ok(());
        }

        let vm = self.get_vm(name)?;
        self.ensure_not_running(session, &vm.core)?;
        let storage = FileStorage::new(&vm.core.dir_path);
        if session.dry_run() {
            info!(
                "{} would delete {:#?}",
                "[dry-run]".magenta(),
                storage.dir().display().to_string()
            );
        } else {
            storage.remove_files()?;
        }
        if let Some(vm) = self.vms.remove(name) {
            if let Some(template_name) = &vm.core.template {
                if let Some(template) = self.templates.get_mut(template_name) {
                    template.dependents_mut().unregister(&vm.core.uuid);
                }
            }
        }
        info!("{} removed vm {:#?}", "[rm]".green(), name);
        Ok(())
    }

    fn ensure_not_running(&self, session: &Session, vm: &VmCore) -> Result<(), TplvmError> {
        if session.state_of(vm)? == VmState::Running {
            let message = format!("Attempt to remove running vm {:#?}!", vm.name);
            return Err(PreconditionError::builder()
                .msg(&message)
                .vm(&vm.name)
                .help("Shut the vm down first.")
                .build()
                .into());
        }
        Ok(())
    }
}
