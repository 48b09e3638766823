use crate::config::TplvmConfig;
use crate::vm::{ProcessProbe, StateProbe, VmCore, VmState};

use bon::bon;

// Error Handling
use log::{debug, trace};
use miette::Error;
use tplvm_error::{TplvmError, WrapError};

/*
* Everything an operation needs to know about the process it runs in.
*
* Flags are fixed at construction and read-only afterwards,
* so that independent sessions (tests, previews) never interfere.
*/
#[derive(Debug)]
pub struct Session {
    /// Simulation mode: mutating operations are skipped
    /// but reported as successful.
    dry_run: bool,
    /// Administrative mode where vm running states can't be queried.
    offline_mode: bool,
    config: TplvmConfig,
    probe: Box<dyn StateProbe>,
}

#[bon]
impl Session {
    /*
     * Flags fall back to the config file values, then to false.
     * The probe defaults to a process table lookup
     * of the configured hypervisor.
     */
    #[builder]
    pub fn new(
        dry_run: Option<bool>,
        offline_mode: Option<bool>,
        config: Option<TplvmConfig>,
        probe: Option<Box<dyn StateProbe>>,
    ) -> Self {
        let config = config.unwrap_or_default();
        let dry_run = dry_run.or(config.dry_run).unwrap_or(false);
        let offline_mode = offline_mode.or(config.offline_mode).unwrap_or(false);
        let probe = probe
            .unwrap_or_else(|| Box::new(ProcessProbe::new(&config.get_hypervisor())));
        let session = Self {
            dry_run,
            offline_mode,
            config,
            probe,
        };
        debug!(
            "session: dry_run={}, offline_mode={}",
            session.dry_run, session.offline_mode
        );
        session
    }
}

impl Session {
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
    pub fn offline_mode(&self) -> bool {
        self.offline_mode
    }
    pub fn config(&self) -> &TplvmConfig {
        &self.config
    }
    /*
     * Running state of a vm.
     * Always Unknown in offline mode, the probe is not even called.
     */
    pub fn state_of(&self, vm: &VmCore) -> Result<VmState, TplvmError> {
        if self.offline_mode {
            trace!("offline session, state of {:#?} is unknown", vm.name);
            return Ok(VmState::Unknown);
        }
        self.probe.state(vm).map_err(|e| {
            let message = format!("Couldn't get the running state of vm {:#?}", vm.name);
            let err = WrapError::builder()
                .msg(&message)
                .help("Run with --offline to skip running state checks.")
                .origin(Error::from_err(e))
                .build();
            TplvmError::from(err)
        })
    }
}
