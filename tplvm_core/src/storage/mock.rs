use super::{Storage, PRIVATE_IMG, ROOTCOW_IMG, ROOT_IMG};

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use miette::Error;
use tplvm_error::{StorageError, TplvmError};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Call {
    Clone { from: PathBuf },
    Commit,
    Remove,
}

/*
* A storage driver touching nothing,
* that records every call in a log shared with the test.
*/
#[derive(Debug, Clone, Default)]
pub struct RecordingStorage {
    pub dir: PathBuf,
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub fail_clone: bool,
    pub fail_commit: bool,
}

impl RecordingStorage {
    pub fn new(dir: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
            ..Default::default()
        }
    }
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().to_owned()
    }
    fn failure(&self, msg: &str) -> TplvmError {
        let e = std::io::Error::new(std::io::ErrorKind::Other, "simulated backend failure");
        StorageError::builder()
            .msg(msg)
            .path(&self.dir.display().to_string())
            .origin(Error::from_err(e))
            .build()
            .into()
    }
}

impl Storage for RecordingStorage {
    fn dir(&self) -> PathBuf {
        self.dir.to_owned()
    }
    fn root_img(&self) -> PathBuf {
        self.dir.join(ROOT_IMG)
    }
    fn rootcow_img(&self) -> PathBuf {
        self.dir.join(ROOTCOW_IMG)
    }
    fn private_img(&self) -> PathBuf {
        self.dir.join(PRIVATE_IMG)
    }
    fn clone_disk_files(&self, source: &dyn Storage, _verbose: bool) -> Result<(), TplvmError> {
        self.calls.borrow_mut().push(Call::Clone { from: source.dir() });
        if self.fail_clone {
            return Err(self.failure("Couldn't copy image"));
        }
        Ok(())
    }
    fn commit_template_changes(&self) -> Result<(), TplvmError> {
        self.calls.borrow_mut().push(Call::Commit);
        if self.fail_commit {
            return Err(self.failure("Couldn't create overlay"));
        }
        Ok(())
    }
    fn remove_files(&self) -> Result<(), TplvmError> {
        self.calls.borrow_mut().push(Call::Remove);
        Ok(())
    }
}
