mod file;
#[cfg(test)]
pub mod mock;

// Reexports
pub use file::FileStorage;

use std::fmt;
use std::path::PathBuf;

// Error Handling
use tplvm_error::TplvmError;

pub const ROOT_IMG: &'static str = "root.img";
pub const ROOTCOW_IMG: &'static str = "root-cow.img";
pub const PRIVATE_IMG: &'static str = "private.img";

/*
* The storage driver of a vm.
*
* A vm only holds a handle to its driver,
* the driver alone writes the vm images.
*/
pub trait Storage: fmt::Debug {
    /// The vm directory holding every image.
    fn dir(&self) -> PathBuf;
    /// The base root filesystem image.
    fn root_img(&self) -> PathBuf;
    /// The copy-on-write overlay of the root image.
    fn rootcow_img(&self) -> PathBuf;
    fn private_img(&self) -> PathBuf;

    /// Duplicate `source` images into this vm directory.
    /// Not transactional: files copied before a failure are left as is.
    fn clone_disk_files(&self, source: &dyn Storage, verbose: bool) -> Result<(), TplvmError>;

    /// Fold the overlay into the base image
    /// and start over with an empty overlay.
    fn commit_template_changes(&self) -> Result<(), TplvmError>;

    /// Delete the vm directory and every image in it.
    fn remove_files(&self) -> Result<(), TplvmError>;
}
