pub mod cli;
pub mod config;
pub mod display;
pub mod exec;
pub mod firewall;
pub mod label;
pub mod registry;
pub mod session;
pub mod storage;
pub mod template;
pub mod vm;

// Reexports
pub use config::TplvmConfig;
pub use firewall::{FirewallPolicy, FirewallRule};
pub use label::Label;
pub use registry::{Registry, Vm};
pub use session::Session;
pub use storage::{FileStorage, Storage};
pub use template::{AppVmRef, Dependents, TemplateVm};
pub use vm::{VmAttrs, VmCore, VmKind, VmState};
