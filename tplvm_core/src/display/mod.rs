pub mod template;
pub mod utils;
pub mod vm;

pub use template::TemplateTable;
pub use vm::VmTable;
