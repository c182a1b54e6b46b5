use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Reads import tables and architectures of PE binaries.
pub trait BinaryInspector: Send + Sync {
    /// Lowercased names of the dlls `binary` imports, in import-table order.
    fn dependencies(&self, binary: &Path) -> Result<Vec<String>>;

    /// Object file format as reported by objdump, e.g. `pei-x86-64`.
    fn file_format(&self, binary: &Path) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn shallow_search_dirs(&self) -> Vec<PathBuf>;
    fn deep_search_dirs(&self) -> Vec<PathBuf>;
    fn ignored_dlls(&self) -> &[String];
    fn shallow_search_enabled(&self) -> bool;
    fn deep_search_enabled(&self) -> bool;
    fn copy_vc_redist(&self) -> bool;
    fn allow_missing(&self) -> bool;
    fn dry_run(&self) -> bool;
}
