use owo_colors::OwoColorize;
use pipelight_exec::{Process, Status};

// Error handling
use log::{trace, warn};
use tplvm_error::{LibError, TplvmError};

/*
* Single quote a string for the shell.
* Embedded single quotes are closed, escaped and reopened.
*/
pub fn shell_quote<T: AsRef<str>>(s: T) -> String {
    format!("'{}'", s.as_ref().replace('\'', r"'\''"))
}

/*
* Run shell commands one after the other.
* Stops on the first failing command.
*/
pub fn exec_cmds(tag: &str, cmds: Vec<String>) -> Result<(), TplvmError> {
    for cmd in cmds {
        let mut proc = Process::new();
        let res = proc.stdin(&cmd).term().run()?;

        match res.state.status {
            Some(Status::Failed) => {
                let tag = format!("[{tag}]");
                let message = format!("{}: command failed ", tag.red());
                let help = format!(
                    "{} -> {} ",
                    res.io.stdin.clone().unwrap_or_default().trim(),
                    res.io.stderr.clone().unwrap_or_default().trim(),
                );
                warn!("{}:{}", &message, &help);
                return Err(LibError::builder().msg(&message).help(&help).build().into());
            }
            _ => {
                let tag = format!("[{tag}]");
                let message = format!("{}: command succeded ", tag.green());
                trace!("{}:{}", &message, res.io.stdin.clone().unwrap_or_default().trim());
            }
        }
    }
    Ok(())
}
