use crate::config::search_paths::compose_search_dirs;
use crate::config::toml_config::TomlConfig;
use crate::core::objdump::AUTO;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "deploy-dll")]
#[command(version, about = "Deploy dll for exe or dll.")]
pub struct CliConfig {
    /// The target file to deploy dll for. This can be an exe or dll.
    pub binary_file: PathBuf,

    /// Do not search in system variable PATH
    #[arg(long)]
    pub skip_env_path: bool,

    /// Copy Microsoft Visual C/C++ redistributable dlls.
    #[arg(long)]
    pub copy_vc_redist: bool,

    /// Show verbose information during execution
    #[arg(short, long)]
    pub verbose: bool,

    /// Search for dll in those dirs
    #[arg(long)]
    pub shallow_search_dir: Vec<String>,

    /// Disable shallow search
    #[arg(long)]
    pub no_shallow_search: bool,

    /// Search for dll recursively in those dirs
    #[arg(long)]
    pub deep_search_dir: Vec<String>,

    /// Disable recursive search
    #[arg(long)]
    pub no_deep_search: bool,

    /// CMAKE_PREFIX_PATH for cmake to search for packages
    #[arg(long)]
    pub cmake_prefix_path: Vec<String>,

    /// Dll files that won't be deployed
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Location of objdump file. Valid values: [auto] [system] [builtin] path [default: [auto]]
    #[arg(long)]
    pub objdump_file: Option<String>,

    /// If one or more dll failed to be found, skip it and go on
    #[arg(long)]
    pub allow_missing: bool,

    /// TOML file with additional search settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Resolve every dll without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of the deployment to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl CliConfig {
    /// 最終使用的 objdump 設定，未指定時為 [auto]
    pub fn objdump_spec(&self) -> &str {
        self.objdump_file.as_deref().unwrap_or(AUTO)
    }

    /// 合併設定檔：清單接在命令列之後，布林值取 OR
    pub fn merge_file_config(&mut self, file: &TomlConfig) -> Result<()> {
        // 命令列有明確指定（包含 [auto]）時以命令列為準
        if self.objdump_file.is_none() {
            self.objdump_file = file.objdump_file()?.map(str::to_string);
        }

        self.shallow_search_dir
            .extend(file.search.shallow_dirs.iter().cloned());
        self.deep_search_dir
            .extend(file.search.deep_dirs.iter().cloned());
        self.cmake_prefix_path
            .extend(file.search.cmake_prefix_path.iter().cloned());
        self.ignore.extend(file.deploy.ignore.iter().cloned());

        self.skip_env_path |= file.search.skip_env_path;
        self.no_shallow_search |= file.search.no_shallow_search;
        self.no_deep_search |= file.search.no_deep_search;
        self.copy_vc_redist |= file.deploy.copy_vc_redist;
        self.allow_missing |= file.deploy.allow_missing;
        self.dry_run |= file.deploy.dry_run;

        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn shallow_search_dirs(&self) -> Vec<PathBuf> {
        compose_search_dirs(
            &self.shallow_search_dir,
            &self.cmake_prefix_path,
            self.skip_env_path,
        )
    }

    fn deep_search_dirs(&self) -> Vec<PathBuf> {
        compose_search_dirs(
            &self.deep_search_dir,
            &self.cmake_prefix_path,
            self.skip_env_path,
        )
    }

    fn ignored_dlls(&self) -> &[String] {
        &self.ignore
    }

    fn shallow_search_enabled(&self) -> bool {
        !self.no_shallow_search
    }

    fn deep_search_enabled(&self) -> bool {
        !self.no_deep_search
    }

    fn copy_vc_redist(&self) -> bool {
        self.copy_vc_redist
    }

    fn allow_missing(&self) -> bool {
        self.allow_missing
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("binary_file", &self.binary_file.to_string_lossy())?;
        validation::validate_objdump_spec("objdump_file", self.objdump_spec())?;
        validation::validate_paths("shallow_search_dir", &self.shallow_search_dir)?;
        validation::validate_paths("deep_search_dir", &self.deep_search_dir)?;
        validation::validate_paths("cmake_prefix_path", &self.cmake_prefix_path)?;
        validation::validate_file_extensions("ignore", &self.ignore, &["dll"])?;
        Ok(())
    }
}
