use crate::vm::VmCore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A back reference to an app vm. Never owns the vm.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AppVmRef {
    pub uuid: Uuid,
    pub name: String,
}

impl From<&VmCore> for AppVmRef {
    fn from(e: &VmCore) -> Self {
        Self {
            uuid: e.uuid,
            name: e.name.to_owned(),
        }
    }
}

/*
* The app vms based on a template, keyed by uuid.
* Membership is maintained by the registry only.
*/
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Dependents {
    vms: BTreeMap<Uuid, AppVmRef>,
}

impl Dependents {
    /// Returns false if the vm was already registered.
    pub fn register(&mut self, vm: AppVmRef) -> bool {
        self.vms.insert(vm.uuid, vm).is_none()
    }
    pub fn unregister(&mut self, uuid: &Uuid) -> Option<AppVmRef> {
        self.vms.remove(uuid)
    }
    pub fn list(&self) -> impl Iterator<Item = &AppVmRef> {
        self.vms.values()
    }
    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.vms.contains_key(uuid)
    }
    pub fn len(&self) -> usize {
        self.vms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
    /// Sorted vm names, for display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.list().map(|e| e.name.to_owned()).collect();
        names.sort();
        names
    }
}
