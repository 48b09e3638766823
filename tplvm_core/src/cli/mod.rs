mod types;
pub use types::*;

use crate::config::TplvmConfig;
use crate::display::{TemplateTable, VmTable};
use crate::registry::Registry;
use crate::session::Session;
use crate::vm::{VmAttrs, VmKind};

use clap::Parser;
use owo_colors::OwoColorize;

// Logger
use env_logger::Builder;
use log::LevelFilter;

// Error Handling
use miette::{IntoDiagnostic, Result};

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        Self::switch(cli)?;
        Ok(())
    }
    fn set_logger(cli: &Cli) {
        let verbosity = cli.verbose.log_level_filter();
        std::env::set_var("TPLVM_LOG", verbosity.to_string().to_lowercase());
        // Tests may init the logger more than once.
        Builder::from_env("TPLVM_LOG").try_init().ok();
    }
    fn make_session(cli: &Cli) -> Result<Session> {
        let config = match &cli.session.config {
            Some(path) => TplvmConfig::from_file(path)?,
            None => TplvmConfig::get()?,
        };
        // Flags only override config when set.
        let session = Session::builder()
            .maybe_dry_run(cli.session.dry_run.then_some(true))
            .maybe_offline_mode(cli.session.offline.then_some(true))
            .config(config)
            .build();
        Ok(session)
    }
    pub fn switch(cli: Cli) -> Result<()> {
        Self::set_logger(&cli);
        // Progress lines on stderr.
        let verbose = cli.verbose.log_level_filter() >= LevelFilter::Info;

        let session = Self::make_session(&cli)?;
        if session.dry_run() {
            eprintln!("{} nothing will be written to disk.", "[dry-run]".magenta());
        }

        match cli.commands {
            /*
             * Create the required tplvm working directories.
             */
            Commands::Init => {
                if !session.dry_run() {
                    session.config().ensure_directories()?;
                }
            }
            /*
             * Operations on template vms
             */
            Commands::Template(args) => match args {
                TemplateArgs::Ls => {
                    let registry = Registry::load(&session)?;
                    let mut table = vec![];
                    for vm in registry.templates() {
                        table.push(TemplateTable::from(vm, &session)?);
                    }
                    TemplateTable::display(table)?;
                }
                TemplateArgs::Add(args) => {
                    let mut registry = Registry::load(&session)?;
                    registry.add_template(&session, &VmAttrs::from(&args))?;
                    registry.save(&session)?;
                }
                TemplateArgs::Clone(args) => {
                    let mut registry = Registry::load(&session)?;
                    let vm = registry.clone_template(
                        &session,
                        &args.source,
                        &VmAttrs::from(&args.vm),
                        verbose,
                    )?;
                    let message = format!(
                        "Cloned {} into {}",
                        args.source.bold().blue(),
                        vm.name().bold().green()
                    );
                    registry.save(&session)?;
                    println!("{}", message);
                }
                TemplateArgs::Commit(args) => {
                    let registry = Registry::load(&session)?;
                    registry.commit(&session, &args.name, verbose)?;
                }
                TemplateArgs::Rm(args) => {
                    let mut registry = Registry::load(&session)?;
                    registry.remove(&session, &args.name)?;
                    registry.save(&session)?;
                }
                TemplateArgs::Firewall(args) => {
                    let registry = Registry::load(&session)?;
                    let policy = registry.get_template(&args.name)?.get_firewall_defaults();
                    println!("{}", serde_json::to_string_pretty(&policy).into_diagnostic()?);
                }
            },
            /*
             * Operations on app vms
             */
            Commands::Appvm(args) => match args {
                AppvmArgs::Ls => {
                    let registry = Registry::load(&session)?;
                    let mut table = vec![];
                    for vm in registry.vms() {
                        table.push(VmTable::from(vm, &session)?);
                    }
                    VmTable::display(table)?;
                }
                AppvmArgs::Create(args) => {
                    let mut registry = Registry::load(&session)?;
                    registry.add_appvm(&session, &VmAttrs::from(&args))?;
                    registry.save(&session)?;
                }
                AppvmArgs::Rm(args) => {
                    let mut registry = Registry::load(&session)?;
                    registry.remove(&session, &args.name)?;
                    registry.save(&session)?;
                }
            },
        };

        Ok(())
    }
}

impl From<&NewVmArgs> for VmAttrs {
    fn from(e: &NewVmArgs) -> Self {
        Self {
            name: e.name.to_owned(),
            kind: VmKind::Template,
            label: e.label,
            dir_path: e.dir.to_owned(),
            ..Default::default()
        }
    }
}
impl From<&CreateAppvmArgs> for VmAttrs {
    fn from(e: &CreateAppvmArgs) -> Self {
        Self {
            name: e.name.to_owned(),
            kind: VmKind::App,
            label: e.label,
            template: Some(e.template.to_owned()),
            ..Default::default()
        }
    }
}
