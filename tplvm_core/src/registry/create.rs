use super::{Registry, Vm};
use crate::session::Session;
use crate::storage::{FileStorage, Storage};
use crate::template::TemplateVm;
use crate::vm::{VmAttrs, VmKind};

use owo_colors::OwoColorize;

// Error Handling
use log::info;
use tplvm_error::{LibError, TplvmError};

impl Registry {
    /*
     * Register a template whose images already sit in its directory.
     */
    pub fn add_template(
        &mut self,
        session: &Session,
        attrs: &VmAttrs,
    ) -> Result<&TemplateVm, TplvmError> {
        let template = TemplateVm::from_attrs(attrs, session.config());
        let name = template.name().to_owned();
        self.insert_template(template)?;
        info!("{} added template {:#?}", "[add]".green(), name);
        self.get_template(&name)
    }

    /*
     * Create a new template from the images of an existing
     * template or standalone vm.
     *
     * The new template is only registered once its images are cloned
     * and its overlay created.
     */
    pub fn clone_template(
        &mut self,
        session: &Session,
        source: &str,
        attrs: &VmAttrs,
        verbose: bool,
    ) -> Result<&TemplateVm, TplvmError> {
        self.ensure_name_is_free(&attrs.name)?;
        let template = TemplateVm::from_attrs(attrs, session.config());
        // Never copy over the files of a registered vm.
        self.ensure_dir_is_free(&template.core.dir_path)?;

        if let Some(src) = self.templates.get(source) {
            template.clone_disk_files(session, src.storage(), verbose)?;
        } else if let Some(src) = self.vms.get(source) {
            if src.core.kind != VmKind::Standalone {
                let message = format!("Can't clone app vm {:#?} into a template.", source);
                let help = "App vms have no root image of their own, clone their template instead.";
                return Err(LibError::builder().msg(&message).help(help).build().into());
            }
            let storage = FileStorage::new(&src.core.dir_path);
            template.clone_disk_files(session, &storage as &dyn Storage, verbose)?;
        } else {
            return Err(self.unknown_template(source));
        }

        let name = template.name().to_owned();
        self.insert_template(template)?;
        info!(
            "{} cloned {:#?} into template {:#?}",
            "[clone]".green(),
            source,
            name
        );
        self.get_template(&name)
    }

    /*
     * Create an app vm based on a template.
     * Its firewall is seeded with the template defaults.
     */
    pub fn add_appvm(&mut self, session: &Session, attrs: &VmAttrs) -> Result<&Vm, TplvmError> {
        let attrs = VmAttrs {
            kind: VmKind::App,
            ..attrs.to_owned()
        };
        let core = attrs.resolve(session.config())?;
        let template_name = core.template.to_owned().unwrap_or_default();
        let firewall = match &attrs.firewall {
            Some(firewall) => firewall.to_owned(),
            None => self.get_template(&template_name)?.get_firewall_defaults(),
        };
        let name = core.name.to_owned();
        self.insert_vm(Vm { core, firewall })?;
        info!(
            "{} added app vm {:#?} based on {:#?}",
            "[add]".green(),
            name,
            template_name
        );
        self.get_vm(&name)
    }

    pub fn commit(&self, session: &Session, name: &str, verbose: bool) -> Result<(), TplvmError> {
        self.get_template(name)?.commit(session, verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TplvmConfig;
    use crate::firewall::FirewallPolicy;
    use crate::registry::tests::{appvm, template};
    use crate::vm::state::FixedProbe;
    use crate::vm::VmState;
    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn attrs(name: &str) -> VmAttrs {
        VmAttrs {
            name: name.to_owned(),
            kind: VmKind::Template,
            ..Default::default()
        }
    }

    #[test]
    fn clone_template_from_stopped_template() -> Result<()> {
        let root = std::env::temp_dir().join(format!("tplvm-test-{}", Uuid::new_v4()));
        let config = TplvmConfig {
            templates_dir: Some(root.display().to_string()),
            ..Default::default()
        };
        let session = Session::builder()
            .config(config)
            .probe(Box::new(FixedProbe(VmState::Stopped)))
            .build();

        // An installed template.
        let mut registry = Registry::default();
        let source = registry.add_template(&session, &attrs("fedora-29"))?;
        fs::create_dir_all(source.storage().dir()).into_diagnostic()?;
        let mut file = File::create(source.storage().root_img()).into_diagnostic()?;
        file.write_all(&[42u8; 8192]).into_diagnostic()?;

        let clone = registry.clone_template(&session, "fedora-29", &attrs("fedora-30"), false)?;
        assert_eq!(clone.core.dir_path, root.join("fedora-30"));
        assert_eq!(
            fs::read(clone.storage().root_img()).into_diagnostic()?,
            vec![42u8; 8192]
        );
        let cow = fs::read(clone.rootcow_img()).into_diagnostic()?;
        assert_eq!(cow.len(), 8192);
        assert!(cow.iter().all(|e| *e == 0));

        fs::remove_dir_all(&root).into_diagnostic()?;
        Ok(())
    }

    #[test]
    fn failed_clone_registers_nothing() -> Result<()> {
        let root = std::env::temp_dir().join(format!("tplvm-test-{}", Uuid::new_v4()));
        let config = TplvmConfig {
            templates_dir: Some(root.display().to_string()),
            ..Default::default()
        };
        let session = Session::builder()
            .config(config)
            .probe(Box::new(FixedProbe(VmState::Stopped)))
            .build();

        // No images on disk.
        let mut registry = Registry::default();
        registry.add_template(&session, &attrs("fedora-29"))?;
        let res = registry.clone_template(&session, "fedora-29", &attrs("fedora-30"), false);
        assert!(matches!(res, Err(TplvmError::StorageError(_))));
        assert!(!registry.contains("fedora-30"));

        fs::remove_dir_all(&root).ok();
        Ok(())
    }

    #[test]
    fn clone_into_registered_dir_is_refused() -> Result<()> {
        let root = std::env::temp_dir().join(format!("tplvm-test-{}", Uuid::new_v4()));
        let config = TplvmConfig {
            templates_dir: Some(root.display().to_string()),
            ..Default::default()
        };
        let session = Session::builder()
            .config(config)
            .probe(Box::new(FixedProbe(VmState::Stopped)))
            .build();

        let mut registry = Registry::default();
        registry.add_template(&session, &attrs("fedora-29"))?;
        let source = registry.add_template(&session, &attrs("fedora-30"))?;
        fs::create_dir_all(source.storage().dir()).into_diagnostic()?;
        fs::write(source.storage().root_img(), b"fedora-30").into_diagnostic()?;
        fs::write(source.rootcow_img(), b"changes").into_diagnostic()?;

        let target = VmAttrs {
            dir_path: Some(root.join("fedora-30").display().to_string()),
            ..attrs("fedora-31")
        };
        let res = registry.clone_template(&session, "fedora-29", &target, false);
        assert!(matches!(res, Err(TplvmError::LibError(_))));
        assert!(!registry.contains("fedora-31"));

        let untouched = registry.get_template("fedora-30")?;
        assert_eq!(
            fs::read(untouched.storage().root_img()).into_diagnostic()?,
            b"fedora-30"
        );
        assert_eq!(fs::read(untouched.rootcow_img()).into_diagnostic()?, b"changes");

        fs::remove_dir_all(&root).into_diagnostic()?;
        Ok(())
    }

    #[test]
    fn clone_with_invalid_name_is_refused() {
        let session = Session::builder().dry_run(true).build();
        let mut registry = Registry::default();
        let res = registry.clone_template(&session, "fedora-29", &attrs("../fedora-30"), false);
        assert!(matches!(res, Err(TplvmError::LibError(_))));
    }

    #[test]
    fn clone_unknown_source_fails() {
        let session = Session::builder().dry_run(true).build();
        let mut registry = Registry::default();
        let res = registry.clone_template(&session, "fedora-29", &attrs("fedora-30"), false);
        assert!(matches!(res, Err(TplvmError::LibError(_))));
    }

    #[test]
    fn dry_run_clone_registers_in_memory_only() -> Result<()> {
        let session = Session::builder().dry_run(true).build();
        let mut registry = Registry::default();
        registry.insert_template(template("fedora-29"))?;

        let clone = registry.clone_template(&session, "fedora-29", &attrs("fedora-30"), true)?;
        assert_eq!(
            clone.core.dir_path,
            PathBuf::from("/var/lib/qubes/vm-templates/fedora-30")
        );
        assert!(!clone.storage().dir().exists());
        Ok(())
    }

    #[test]
    fn clone_appvm_is_refused() -> Result<()> {
        let session = Session::builder().dry_run(true).build();
        let mut registry = Registry::default();
        registry.insert_template(template("fedora-30"))?;
        registry.insert_vm(appvm("work", "fedora-30"))?;
        let res = registry.clone_template(&session, "work", &attrs("work-template"), false);
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn appvm_inherits_template_firewall() -> Result<()> {
        let session = Session::builder().dry_run(true).build();
        let mut registry = Registry::default();
        registry.insert_template(template("fedora-30"))?;

        let attrs = VmAttrs {
            name: "work".to_owned(),
            template: Some("fedora-30".to_owned()),
            ..Default::default()
        };
        let vm = registry.add_appvm(&session, &attrs)?;
        assert_eq!(vm.firewall, FirewallPolicy::template_defaults());
        assert_eq!(vm.core.kind, VmKind::App);
        assert_eq!(registry.get_template("fedora-30")?.dependents().len(), 1);
        Ok(())
    }
}
