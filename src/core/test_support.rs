use crate::domain::ports::BinaryInspector;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory import tables keyed by file name, formats keyed by full path.
pub struct FakeInspector {
    deps: HashMap<String, Vec<String>>,
    formats: HashMap<PathBuf, String>,
    default_format: String,
    inspected: Mutex<Vec<PathBuf>>,
}

impl Default for FakeInspector {
    fn default() -> Self {
        Self {
            deps: HashMap::new(),
            formats: HashMap::new(),
            default_format: "pei-x86-64".to_string(),
            inspected: Mutex::new(Vec::new()),
        }
    }
}

impl FakeInspector {
    pub fn with_deps(mut self, binary_name: &str, deps: &[&str]) -> Self {
        self.deps.insert(
            binary_name.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    pub fn with_format(mut self, path: &Path, format: &str) -> Self {
        self.formats.insert(path.to_path_buf(), format.to_string());
        self
    }

    /// Paths whose format was asked for, in call order.
    pub fn inspected(&self) -> Vec<PathBuf> {
        self.inspected.lock().unwrap().clone()
    }
}

impl BinaryInspector for FakeInspector {
    fn dependencies(&self, binary: &Path) -> Result<Vec<String>> {
        let name = binary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.deps.get(&name).cloned().unwrap_or_default())
    }

    fn file_format(&self, binary: &Path) -> Result<String> {
        self.inspected.lock().unwrap().push(binary.to_path_buf());
        Ok(self
            .formats
            .get(binary)
            .cloned()
            .unwrap_or_else(|| self.default_format.clone()))
    }
}
