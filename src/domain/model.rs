use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyPresent,
    Ignored,
    SystemDll,
    VcRedist,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::AlreadyPresent => "already exists",
            SkipReason::Ignored => "assigned to be ignored",
            SkipReason::SystemDll => "system dll",
            SkipReason::VcRedist => "VC redistributable dll",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedDll {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub required_by: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDll {
    pub name: String,
    pub reason: SkipReason,
    pub required_by: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDll {
    pub name: String,
    pub required_by: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    pub target: PathBuf,
    pub target_dir: PathBuf,
    pub binary_format: String,
    pub objdump: Option<PathBuf>,
    pub dry_run: bool,
    pub deployed: Vec<DeployedDll>,
    pub skipped: Vec<SkippedDll>,
    pub missing: Vec<MissingDll>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl DeployReport {
    pub fn new(target: PathBuf, target_dir: PathBuf, binary_format: String, dry_run: bool) -> Self {
        Self {
            target,
            target_dir,
            binary_format,
            objdump: None,
            dry_run,
            deployed: Vec::new(),
            skipped: Vec::new(),
            missing: Vec::new(),
            finished_at: None,
        }
    }

    pub fn deployed_names(&self) -> Vec<&str> {
        self.deployed.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
