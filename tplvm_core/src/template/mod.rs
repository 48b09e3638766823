pub mod dependents;

// Reexports
pub use dependents::{AppVmRef, Dependents};

use crate::config::TplvmConfig;
use crate::firewall::FirewallPolicy;
use crate::session::Session;
use crate::storage::{FileStorage, Storage};
use crate::vm::{VmAttrs, VmCore, VmKind, VmState};

use owo_colors::OwoColorize;
use std::path::PathBuf;

// Error Handling
use log::{debug, info};
use tplvm_error::{PreconditionError, TplvmError};

/*
* A vm whose root filesystem is shared read-only by app vms,
* and may only be updated while it is stopped.
*
* Changes written by the running template land in a copy-on-write overlay
* ("root-cow.img") that is folded into the base image on commit.
*/
#[derive(Debug)]
pub struct TemplateVm {
    pub core: VmCore,
    storage: Box<dyn Storage>,
    appvms: Dependents,
}

impl TemplateVm {
    pub fn new(mut core: VmCore, storage: Box<dyn Storage>) -> Self {
        core.kind = VmKind::Template;
        core.template = None;
        Self {
            core,
            storage,
            appvms: Dependents::default(),
        }
    }
    /*
     * Resolve a template definition
     * and back it with image files in its directory.
     */
    pub fn from_attrs(attrs: &VmAttrs, config: &TplvmConfig) -> Self {
        let core = attrs.resolve_template(config);
        let storage = FileStorage::new(&core.dir_path);
        Self::new(core, Box::new(storage))
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }
    pub fn kind(&self) -> VmKind {
        VmKind::Template
    }
    /// Type string the registry dispatches on.
    pub fn type_name(&self) -> String {
        self.kind().to_string()
    }
    pub fn is_updateable(&self) -> bool {
        true
    }
    pub fn is_template(&self) -> bool {
        true
    }
    pub fn get_firewall_defaults(&self) -> FirewallPolicy {
        FirewallPolicy::template_defaults()
    }
    pub fn rootcow_img(&self) -> PathBuf {
        self.storage.rootcow_img()
    }
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn dependents(&self) -> &Dependents {
        &self.appvms
    }
    /// Registry only.
    pub(crate) fn dependents_mut(&mut self) -> &mut Dependents {
        &mut self.appvms
    }

    /*
     * Duplicate the source vm images into this template directory,
     * then commit to create the template overlay.
     *
     * Must run before the new template is registered or started.
     * Copied files are left in place if the copy fails midway.
     */
    pub fn clone_disk_files(
        &self,
        session: &Session,
        source: &dyn Storage,
        verbose: bool,
    ) -> Result<(), TplvmError> {
        if session.dry_run() {
            info!(
                "{} would clone disk files from {:#?} into {:#?}",
                "[dry-run]".magenta(),
                source.dir().display().to_string(),
                self.storage.dir().display().to_string()
            );
            return Ok(());
        }
        debug!("clone_disk_files() for {:#?}", self.name());

        self.storage.clone_disk_files(source, verbose)?;

        // Create root-cow.img
        self.commit(session, verbose)?;
        Ok(())
    }

    /*
     * Make the template changes permanent
     * and start over with an empty overlay.
     *
     * Refused while the template runs, unless the session is offline
     * and running states are unknown.
     */
    pub fn commit(&self, session: &Session, verbose: bool) -> Result<(), TplvmError> {
        if session.dry_run() {
            info!(
                "{} would commit template {:#?}, COW: {:#?}",
                "[dry-run]".magenta(),
                self.name(),
                self.rootcow_img().display().to_string()
            );
            return Ok(());
        }
        debug!("commit() for {:#?}", self.name());

        if !session.offline_mode() && session.state_of(&self.core)? == VmState::Running {
            let message = format!(
                "Attempt to commit changes on running template vm {:#?}!",
                self.name()
            );
            let help = "Shut the template down before committing its changes.";
            return Err(PreconditionError::builder()
                .msg(&message)
                .vm(self.name())
                .help(help)
                .build()
                .into());
        }

        if verbose {
            eprintln!(
                "{} committing template updates... COW: {}...",
                "[commit]".yellow(),
                self.rootcow_img().display()
            );
        }

        self.storage.commit_template_changes()?;
        info!("{} committed template {:#?}", "[commit]".green(), self.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::{Call, RecordingStorage};
    use crate::vm::state::FixedProbe;
    use miette::Result;
    use pretty_assertions::assert_eq;

    fn session(state: VmState, dry_run: bool, offline_mode: bool) -> Session {
        Session::builder()
            .dry_run(dry_run)
            .offline_mode(offline_mode)
            .probe(Box::new(FixedProbe(state)))
            .build()
    }
    fn template(name: &str, storage: &RecordingStorage) -> TemplateVm {
        let attrs = VmAttrs {
            name: name.to_owned(),
            kind: VmKind::Template,
            ..Default::default()
        };
        let core = attrs.resolve_template(&TplvmConfig::default());
        TemplateVm::new(core, Box::new(storage.clone()))
    }

    #[test]
    fn template_identity() {
        let storage = RecordingStorage::new("/var/lib/qubes/vm-templates/fedora-30");
        let vm = template("fedora-30", &storage);
        assert_eq!(vm.type_name(), "TemplateVM");
        assert!(vm.is_template());
        assert!(vm.is_updateable());
        assert_eq!(
            vm.rootcow_img(),
            PathBuf::from("/var/lib/qubes/vm-templates/fedora-30/root-cow.img")
        );
        assert!(vm.dependents().is_empty());
    }

    #[test]
    fn firewall_defaults_ignore_state() {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let mut vm = template("fedora-30", &storage);
        let expected = FirewallPolicy {
            rules: vec![],
            allow: false,
            allow_dns: false,
            allow_icmp: false,
            allow_update_proxy: true,
        };
        assert_eq!(vm.get_firewall_defaults(), expected);

        vm.dependents_mut().register(AppVmRef {
            uuid: uuid::Uuid::new_v4(),
            name: "work".to_owned(),
        });
        assert_eq!(vm.get_firewall_defaults(), expected);
    }

    #[test]
    fn commit_running_template_is_refused() {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        let res = vm.commit(&session(VmState::Running, false, false), false);
        assert!(matches!(res, Err(TplvmError::PreconditionViolation(_))));
        assert!(storage.calls().is_empty());
    }

    #[test]
    fn commit_stopped_template() -> Result<()> {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        vm.commit(&session(VmState::Stopped, false, false), false)?;
        assert_eq!(storage.calls(), vec![Call::Commit]);
        Ok(())
    }

    #[test]
    fn commit_offline_skips_running_guard() -> Result<()> {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        // The probe is never asked in offline mode.
        vm.commit(&session(VmState::Running, false, true), false)?;
        assert_eq!(storage.calls(), vec![Call::Commit]);
        Ok(())
    }

    #[test]
    fn commit_unknown_state_as_stopped() -> Result<()> {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        vm.commit(&session(VmState::Unknown, false, false), false)?;
        assert_eq!(storage.calls(), vec![Call::Commit]);
        Ok(())
    }

    #[test]
    fn commit_twice_calls_backend_twice() -> Result<()> {
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);
        let session = session(VmState::Stopped, false, false);

        vm.commit(&session, false)?;
        vm.commit(&session, false)?;
        assert_eq!(storage.calls(), vec![Call::Commit, Call::Commit]);
        Ok(())
    }

    #[test]
    fn commit_propagates_backend_failure() {
        let mut storage = RecordingStorage::new("/tmp/fedora-30");
        storage.fail_commit = true;
        let vm = template("fedora-30", &storage);

        let res = vm.commit(&session(VmState::Stopped, false, false), false);
        assert!(matches!(res, Err(TplvmError::StorageError(_))));
    }

    #[test]
    fn dry_run_touches_nothing() -> Result<()> {
        let source = RecordingStorage::new("/tmp/fedora-29");
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        for state in [VmState::Stopped, VmState::Unknown] {
            let session = session(state, true, false);
            vm.clone_disk_files(&session, &source, false)?;
            vm.commit(&session, true)?;
        }
        assert!(storage.calls().is_empty());
        assert!(source.calls().is_empty());
        Ok(())
    }

    #[test]
    fn clone_then_commit() -> Result<()> {
        let source = RecordingStorage::new("/tmp/fedora-29");
        let storage = RecordingStorage::new("/tmp/fedora-30");
        let vm = template("fedora-30", &storage);

        vm.clone_disk_files(&session(VmState::Stopped, false, false), &source, false)?;
        assert_eq!(
            storage.calls(),
            vec![
                Call::Clone {
                    from: PathBuf::from("/tmp/fedora-29")
                },
                Call::Commit
            ]
        );
        Ok(())
    }

    #[test]
    fn failed_clone_never_commits() {
        let source = RecordingStorage::new("/tmp/fedora-29");
        let mut storage = RecordingStorage::new("/tmp/fedora-30");
        storage.fail_clone = true;
        let vm = template("fedora-30", &storage);

        let res = vm.clone_disk_files(&session(VmState::Stopped, false, false), &source, false);
        assert!(matches!(res, Err(TplvmError::StorageError(_))));
        assert_eq!(
            storage.calls(),
            vec![Call::Clone {
                from: PathBuf::from("/tmp/fedora-29")
            }]
        );
    }
}
