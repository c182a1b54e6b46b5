pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use core::{deployer::Deployer, objdump::ObjdumpInspector};
pub use domain::model::DeployReport;
pub use utils::error::{DeployError, Result};
