use super::{Storage, PRIVATE_IMG, ROOTCOW_IMG, ROOT_IMG};
use crate::exec::{exec_cmds, shell_quote};

// Filesystem
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

// Error Handling
use log::{debug, info};
use miette::Error;
use tplvm_error::{StorageError, TplvmError};

/*
* Plain image files in the vm directory:
* "root.img", "root-cow.img" and "private.img".
*/
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
    /// Where the previous overlay is kept after a commit.
    pub fn rootcow_old_img(&self) -> PathBuf {
        self.dir.join(format!("{ROOTCOW_IMG}.old"))
    }
    /*
     * Copy an image, keeping holes of sparse files.
     */
    fn copy_img(&self, source: &Path, target: &Path, verbose: bool) -> Result<(), TplvmError> {
        if verbose {
            eprintln!(
                "{} copying {} to {}...",
                "[clone]".yellow(),
                source.display(),
                target.display()
            );
        }
        let cmds = vec![format!(
            "cp --sparse=auto --reflink=auto {} {}",
            shell_quote(source.display().to_string()),
            shell_quote(target.display().to_string())
        )];
        exec_cmds("clone", cmds).map_err(|e| {
            StorageError::builder()
                .msg(&format!("Couldn't copy image {:#?}", source.display().to_string()))
                .path(&target.display().to_string())
                .origin(Error::from_err(e))
                .build()
        })?;
        Ok(())
    }
}

impl Storage for FileStorage {
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

    fn clone_disk_files(&self, source: &dyn Storage, verbose: bool) -> Result<(), TplvmError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            StorageError::builder()
                .msg("Couldn't create vm directory")
                .path(&self.dir.display().to_string())
                .origin(Error::from_err(e))
                .build()
        })?;

        if !source.root_img().exists() {
            let e = std::io::Error::new(std::io::ErrorKind::NotFound, "no root image");
            return Err(StorageError::builder()
                .msg("Couldn't find source root image")
                .path(&source.root_img().display().to_string())
                .help("Is the source vm a template or a standalone vm?")
                .origin(Error::from_err(e))
                .build()
                .into());
        }
        self.copy_img(&source.root_img(), &self.root_img(), verbose)?;

        // Private image is optional.
        if source.private_img().exists() {
            self.copy_img(&source.private_img(), &self.private_img(), verbose)?;
        }
        info!(
            "{} cloned disk files from {:#?}",
            "[clone]".yellow(),
            source.dir().display().to_string()
        );
        Ok(())
    }

    /*
     * The current overlay is rotated to "root-cow.img.old",
     * replacing any previous one,
     * then a fresh sparse overlay of the root image size is created.
     */
    fn commit_template_changes(&self) -> Result<(), TplvmError> {
        let cow = self.rootcow_img();
        let old = self.rootcow_old_img();
        let storage_err = |msg: &str, path: &Path, e: std::io::Error| -> TplvmError {
            StorageError::builder()
                .msg(msg)
                .path(&path.display().to_string())
                .origin(Error::from_err(e))
                .build()
                .into()
        };

        let size = fs::metadata(self.root_img())
            .map_err(|e| storage_err("Couldn't read root image", &self.root_img(), e))?
            .len();

        if cow.exists() {
            if old.exists() {
                fs::remove_file(&old)
                    .map_err(|e| storage_err("Couldn't remove old overlay", &old, e))?;
            }
            fs::rename(&cow, &old).map_err(|e| storage_err("Couldn't rotate overlay", &cow, e))?;
        }

        let file =
            File::create(&cow).map_err(|e| storage_err("Couldn't create overlay", &cow, e))?;
        file.set_len(size)
            .map_err(|e| storage_err("Couldn't size overlay", &cow, e))?;

        debug!("created fresh overlay {:#?}", cow.display().to_string());
        Ok(())
    }

    fn remove_files(&self) -> Result<(), TplvmError> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).map_err(|e| {
                StorageError::builder()
                    .msg("Couldn't remove vm directory")
                    .path(&self.dir.display().to_string())
                    .origin(Error::from_err(e))
                    .build()
            })?;
        }
        Ok(())
    }
}
