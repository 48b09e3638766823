pub mod resolve;
pub mod state;

// Reexports
pub use state::{ProcessProbe, StateProbe, VmState};

use crate::firewall::FirewallPolicy;
use crate::label::Label;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};
use uuid::Uuid;

/*
* The vm kinds the registry knows about.
* Dispatch on this tag rather than on a type hierarchy.
*/
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum VmKind {
    #[serde(rename = "TemplateVM")]
    #[strum(serialize = "TemplateVM")]
    Template,
    #[default]
    #[serde(rename = "AppVM")]
    #[strum(serialize = "AppVM")]
    App,
    #[serde(rename = "StandaloneVM")]
    #[strum(serialize = "StandaloneVM")]
    Standalone,
}

impl VmKind {
    pub fn is_template(&self) -> bool {
        matches!(self, VmKind::Template)
    }
    /// Whether the vm root filesystem changes persist across reboots.
    pub fn is_updateable(&self) -> bool {
        match self {
            VmKind::Template | VmKind::Standalone => true,
            VmKind::App => false,
        }
    }
    /// Templates must be loaded before the vms that depend on them.
    pub fn load_order(&self) -> u32 {
        match self {
            VmKind::Template => 50,
            VmKind::Standalone => 60,
            VmKind::App => 100,
        }
    }
}

/*
* A partial vm definition as written in the registry file
* or given on the command line.
* Missing values are computed by the resolver.
*/
#[derive(Default, Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct VmAttrs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: VmKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_path: Option<String>,
    /// Template name, for app vms only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Not resolved, kept as is by the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<FirewallPolicy>,
}

/*
* A fully resolved vm definition.
*/
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct VmCore {
    pub name: String,
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub kind: VmKind,
    pub label: Label,
    pub dir_path: PathBuf,
    pub template: Option<String>,
}

impl From<&VmCore> for VmAttrs {
    fn from(e: &VmCore) -> Self {
        Self {
            name: e.name.to_owned(),
            uuid: Some(e.uuid),
            kind: e.kind,
            label: Some(e.label),
            dir_path: Some(e.dir_path.display().to_string()),
            template: e.template.to_owned(),
            firewall: None,
        }
    }
}
