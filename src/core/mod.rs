pub mod deployer;
pub mod objdump;
pub mod report;
pub mod search;
pub mod system_dlls;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::DeployReport;
pub use crate::domain::ports::{BinaryInspector, ConfigProvider};
pub use crate::utils::error::Result;
