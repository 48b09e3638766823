use crate::label::Label;
use clap::{Args, Parser, Subcommand, ValueHint};
use clap_verbosity_flag::Verbosity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub commands: Commands,
    #[command(flatten)]
    pub verbose: Verbosity,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionArgs {
    /// Preview actions: nothing is written to disk.
    #[arg(long, global = true)]
    pub dry_run: bool,
    /// Do not query vm running states.
    #[arg(long, global = true)]
    pub offline: bool,
    /// Use this configuration file instead of the default one.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<String>,
}

#[derive(Debug, Subcommand, Clone, Eq, PartialEq)]
pub enum Commands {
    /// Init/Ensure system global configuration (directories).
    Init,

    /// Operations on template vms
    #[command(subcommand)]
    Template(TemplateArgs),

    /// Operations on app vms
    #[command(subcommand)]
    Appvm(AppvmArgs),
}

#[derive(Debug, Subcommand, Clone, Eq, PartialEq)]
pub enum TemplateArgs {
    /// List templates.
    Ls,
    /// Register a template whose images are already installed.
    #[command(arg_required_else_help = true)]
    Add(NewVmArgs),
    /// Create a template from an existing template or standalone vm.
    #[command(arg_required_else_help = true)]
    Clone(CloneArgs),
    /// Make the template changes permanent.
    #[command(arg_required_else_help = true)]
    Commit(NameArgs),
    /// Remove a template and its images.
    #[command(arg_required_else_help = true)]
    Rm(NameArgs),
    /// Print the firewall policy given to new app vms.
    #[command(arg_required_else_help = true)]
    Firewall(NameArgs),
}

#[derive(Debug, Subcommand, Clone, Eq, PartialEq)]
pub enum AppvmArgs {
    /// List app vms.
    Ls,
    /// Create an app vm based on a template.
    #[command(arg_required_else_help = true)]
    Create(CreateAppvmArgs),
    /// Remove an app vm.
    #[command(arg_required_else_help = true)]
    Rm(NameArgs),
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NameArgs {
    #[arg(value_name = "VM_NAME")]
    pub name: String,
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewVmArgs {
    #[arg(value_name = "VM_NAME")]
    pub name: String,
    #[arg(short, long, value_name = "LABEL")]
    pub label: Option<Label>,
    /// Storage directory, defaults to "<templates_dir>/<name>".
    #[arg(short, long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dir: Option<String>,
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CloneArgs {
    #[arg(value_name = "SOURCE_VM")]
    pub source: String,
    #[command(flatten)]
    pub vm: NewVmArgs,
}

#[derive(Default, Debug, Args, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateAppvmArgs {
    #[arg(value_name = "VM_NAME")]
    pub name: String,
    #[arg(short, long, value_name = "TEMPLATE_NAME")]
    pub template: String,
    #[arg(short, long, value_name = "LABEL")]
    pub label: Option<Label>,
}
