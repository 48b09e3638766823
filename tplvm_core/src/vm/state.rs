use super::VmCore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::Display;

// Process
use pipelight_exec::Finder;

// Error Handling
use log::trace;
use tplvm_error::{LibError, TplvmError};

/*
* Vm process state, as far as tplvm can tell.
* Unknown when running states can't be queried (offline sessions).
*/
#[derive(
    Default, Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VmState {
    Stopped,
    Running,
    #[default]
    Unknown,
}

impl FromStr for VmState {
    type Err = TplvmError;
    fn from_str(s: &str) -> Result<Self, TplvmError> {
        let res = match s {
            "stopped" | "halted" => VmState::Stopped,
            "running" => VmState::Running,
            "unknown" => VmState::Unknown,
            _ => {
                let message = format!("Unknown vm state {:#?}", s);
                let help = "Must be one of: stopped, running, unknown";
                return Err(LibError::builder().msg(&message).help(help).build().into());
            }
        };
        Ok(res)
    }
}

/*
* Reads a vm running state.
* The state belongs to the vm process lifecycle, probes only read it
* and the result may be stale as soon as it is returned.
*/
pub trait StateProbe: fmt::Debug {
    fn state(&self, vm: &VmCore) -> Result<VmState, TplvmError>;
}

/*
* Looks for a hypervisor process bound to the vm uuid
* in the process table.
*/
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProcessProbe {
    pub hypervisor: String,
}

impl ProcessProbe {
    pub fn new(hypervisor: &str) -> Self {
        Self {
            hypervisor: hypervisor.to_owned(),
        }
    }
}

impl StateProbe for ProcessProbe {
    fn state(&self, vm: &VmCore) -> Result<VmState, TplvmError> {
        let finder = Finder::new()
            .seed(&self.hypervisor)
            .seed(&vm.uuid.to_string())
            .search_no_parents()?;

        let state = match finder.matches {
            Some(matches) if !matches.is_empty() => VmState::Running,
            _ => VmState::Stopped,
        };
        trace!("vm {:#?} is {}", vm.name, state);
        Ok(state)
    }
}

/// Always reports the same state.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub VmState);

#[cfg(test)]
impl StateProbe for FixedProbe {
    fn state(&self, _vm: &VmCore) -> Result<VmState, TplvmError> {
        Ok(self.0)
    }
}
