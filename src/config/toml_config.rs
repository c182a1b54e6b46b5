use crate::config::search_paths::compose_search_dirs;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub objdump: Option<ObjdumpConfig>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub deploy: DeployOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjdumpConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub shallow_dirs: Vec<String>,
    #[serde(default)]
    pub deep_dirs: Vec<String>,
    #[serde(default)]
    pub cmake_prefix_path: Vec<String>,
    #[serde(default)]
    pub skip_env_path: bool,
    #[serde(default)]
    pub no_shallow_search: bool,
    #[serde(default)]
    pub no_deep_search: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployOptions {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub copy_vc_redist: bool,
    #[serde(default)]
    pub allow_missing: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeployError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DeployError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("environment variable pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 取得 objdump 設定，沒有 `[objdump]` 區段時為 None
    pub fn objdump_file(&self) -> Result<Option<&str>> {
        match &self.objdump {
            Some(section) => {
                let file = validation::validate_required_field("objdump.file", &section.file)?;
                Ok(Some(file.as_str()))
            }
            None => Ok(None),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn shallow_search_dirs(&self) -> Vec<PathBuf> {
        compose_search_dirs(
            &self.search.shallow_dirs,
            &self.search.cmake_prefix_path,
            self.search.skip_env_path,
        )
    }

    fn deep_search_dirs(&self) -> Vec<PathBuf> {
        compose_search_dirs(
            &self.search.deep_dirs,
            &self.search.cmake_prefix_path,
            self.search.skip_env_path,
        )
    }

    fn ignored_dlls(&self) -> &[String] {
        &self.deploy.ignore
    }

    fn shallow_search_enabled(&self) -> bool {
        !self.search.no_shallow_search
    }

    fn deep_search_enabled(&self) -> bool {
        !self.search.no_deep_search
    }

    fn copy_vc_redist(&self) -> bool {
        self.deploy.copy_vc_redist
    }

    fn allow_missing(&self) -> bool {
        self.deploy.allow_missing
    }

    fn dry_run(&self) -> bool {
        self.deploy.dry_run
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(file) = self.objdump_file()? {
            validation::validate_objdump_spec("objdump.file", file)?;
        }
        validation::validate_paths("search.shallow_dirs", &self.search.shallow_dirs)?;
        validation::validate_paths("search.deep_dirs", &self.search.deep_dirs)?;
        validation::validate_paths("search.cmake_prefix_path", &self.search.cmake_prefix_path)?;
        validation::validate_file_extensions("deploy.ignore", &self.deploy.ignore, &["dll"])?;
        Ok(())
    }
}
