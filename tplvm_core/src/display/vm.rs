use super::utils::{display_label, display_some_name, display_state};
use crate::label::Label;
use crate::registry::Vm;
use crate::session::Session;
use crate::vm::{VmKind, VmState};

use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

// Error Handling
use tplvm_error::TplvmError;

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq, Tabled)]
pub struct VmTable {
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: VmKind,
    #[tabled(display("display_label"))]
    pub label: Label,
    #[tabled(display("display_state"))]
    pub state: VmState,
    #[tabled(display("display_some_name"))]
    pub template: Option<String>,
    pub dir: String,
}

impl VmTable {
    pub fn from(vm: &Vm, session: &Session) -> Result<Self, TplvmError> {
        let table = VmTable {
            name: vm.core.name.to_owned(),
            kind: vm.core.kind,
            label: vm.core.label,
            state: session.state_of(&vm.core)?,
            template: vm.core.template.to_owned(),
            dir: vm.core.dir_path.display().to_string(),
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
