use tplvm_core::cli::Cli;

// Error Handling
use log::trace;
use miette::Result;

/**
The binary entrypoint.
*/
fn main() -> Result<()> {
    make_handler()?;
    trace!("Launch process.");
    Cli::run()?;
    trace!("Process clean exit.");
    Ok(())
}

/**
Set up a verbose and colorful error/panic handler,
so that refused operations abort loudly.
*/
pub fn make_handler() -> Result<()> {
    miette::set_panic_hook();
    Ok(())
}
