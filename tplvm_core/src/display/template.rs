use super::utils::{display_label, display_names, display_some_bytes, display_state};
use crate::label::Label;
use crate::session::Session;
use crate::template::TemplateVm;
use crate::vm::VmState;

use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::MetadataExt;
use tabled::{settings::Style, Table, Tabled};

// Error Handling
use tplvm_error::TplvmError;

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq, Tabled)]
pub struct TemplateTable {
    pub name: String,
    #[tabled(display("display_label"))]
    pub label: Label,
    #[tabled(display("display_state"))]
    pub state: VmState,
    pub dir: String,
    /// Disk space taken by the overlay,
    /// its apparent size is always the root image size.
    #[tabled(rename = "cow usage", display("display_some_bytes"))]
    pub cow_usage: Option<u64>,
    #[tabled(display("display_names"))]
    pub dependents: Vec<String>,
}

impl TemplateTable {
    pub fn from(vm: &TemplateVm, session: &Session) -> Result<Self, TplvmError> {
        let cow_usage = fs::metadata(vm.rootcow_img())
            .ok()
            .map(|e| e.blocks() * 512);
        let table = TemplateTable {
            name: vm.name().to_owned(),
            label: vm.core.label,
            state: session.state_of(&vm.core)?,
            dir: vm.core.dir_path.display().to_string(),
            cow_usage,
            dependents: vm.dependents().names(),
        };
        Ok(table)
    }
    pub fn display(items: Vec<Self>) -> Result<(), TplvmError> {
        let mut res = Table::new(&items);
        res.with(Style::rounded());
        println!("{}", res);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TplvmConfig;
    use crate::storage::Storage;
    use crate::vm::{VmAttrs, VmKind};
    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use uuid::Uuid;

    #[test]
    fn fresh_overlay_uses_no_space() -> Result<()> {
        let root = std::env::temp_dir().join(format!("tplvm-test-{}", Uuid::new_v4()));
        let config = TplvmConfig {
            templates_dir: Some(root.display().to_string()),
            ..Default::default()
        };
        let session = Session::builder().config(config).offline_mode(true).build();
        let attrs = VmAttrs {
            name: "fedora-30".to_owned(),
            kind: VmKind::Template,
            ..Default::default()
        };
        let vm = TemplateVm::from_attrs(&attrs, session.config());
        fs::create_dir_all(vm.storage().dir()).into_diagnostic()?;
        let cow = File::create(vm.rootcow_img()).into_diagnostic()?;
        cow.set_len(1 << 30).into_diagnostic()?;

        let table = TemplateTable::from(&vm, &session)?;
        assert_eq!(table.state, VmState::Unknown);
        assert!(table.cow_usage.is_some_and(|e| e < 1 << 30));

        fs::remove_dir_all(&root).into_diagnostic()?;
        Ok(())
    }
}
