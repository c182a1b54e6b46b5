use crate::core::search::DllSearcher;
use crate::core::system_dlls::{is_system_dll, is_vc_redist_dll};
use crate::domain::model::{DeployReport, DeployedDll, MissingDll, SkipReason, SkippedDll};
use crate::domain::ports::{BinaryInspector, ConfigProvider};
use crate::utils::error::{DeployError, Result};
use crate::utils::fs::is_file;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct Deployer<I: BinaryInspector, C: ConfigProvider> {
    inspector: I,
    config: C,
}

struct Session {
    target_dir: PathBuf,
    binary_format: String,
    shallow_dirs: Vec<PathBuf>,
    deep_dirs: Vec<PathBuf>,
    ignored: HashSet<String>,
    visited: HashSet<String>,
    unresolved: HashSet<String>,
    report: DeployReport,
}

impl Session {
    fn skip(&mut self, dep: &str, reason: SkipReason, required_by: &Path) {
        tracing::debug!("Skip {} ({})", dep, reason);
        self.report.skipped.push(SkippedDll {
            name: dep.to_string(),
            reason,
            required_by: required_by.to_path_buf(),
        });
    }
}

impl<I: BinaryInspector, C: ConfigProvider> Deployer<I, C> {
    pub fn new(inspector: I, config: C) -> Self {
        Self { inspector, config }
    }

    /// Copies every dll `target` needs, directly or transitively, into the
    /// directory containing `target`.
    pub fn run(&self, target: &Path) -> Result<DeployReport> {
        if !is_file(target) {
            return Err(DeployError::TargetNotFileError {
                path: target.to_path_buf(),
            });
        }

        let target_dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let binary_format = self.inspector.file_format(target)?;
        tracing::info!("Binary format: \"{}\"", binary_format);

        let dry_run = self.config.dry_run();
        let mut session = Session {
            report: DeployReport::new(
                target.to_path_buf(),
                target_dir.clone(),
                binary_format.clone(),
                dry_run,
            ),
            target_dir,
            binary_format,
            shallow_dirs: self.config.shallow_search_dirs(),
            deep_dirs: self.config.deep_search_dirs(),
            ignored: self
                .config
                .ignored_dlls()
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            visited: HashSet::new(),
            unresolved: HashSet::new(),
        };

        tracing::debug!("Shallow search dirs: {:?}", session.shallow_dirs);
        tracing::debug!("Deep search dirs: {:?}", session.deep_dirs);

        self.deploy_dependencies(target, &mut session)?;

        let mut report = session.report;
        report.finished_at = Some(chrono::Utc::now());
        Ok(report)
    }

    fn deploy_dependencies(&self, binary: &Path, session: &mut Session) -> Result<()> {
        tracing::debug!(
            "Deploying for \"{}\" at \"{}\"",
            binary.display(),
            session.target_dir.display()
        );
        let deps = self.inspector.dependencies(binary)?;
        tracing::debug!("\"{}\" requires {:?}", binary.display(), deps);

        for dep in deps {
            let destination = session.target_dir.join(&dep);

            if std::fs::metadata(&destination).is_ok() || session.visited.contains(&dep) {
                session.skip(&dep, SkipReason::AlreadyPresent, binary);
                continue;
            }
            if session.ignored.contains(&dep) {
                session.skip(&dep, SkipReason::Ignored, binary);
                continue;
            }
            if is_system_dll(&dep) {
                session.skip(&dep, SkipReason::SystemDll, binary);
                continue;
            }
            if !self.config.copy_vc_redist() && is_vc_redist_dll(&dep) {
                session.skip(&dep, SkipReason::VcRedist, binary);
                continue;
            }

            // 已確認找不到的 dll 不再重搜，但每個需要它的 binary 都要記錄
            let found = if session.unresolved.contains(&dep) {
                None
            } else {
                tracing::debug!("Searching {} for \"{}\"", dep, binary.display());
                self.search(&dep, session)
            };

            let Some(source) = found else {
                if self.config.allow_missing() {
                    session.unresolved.insert(dep.clone());
                    tracing::warn!(
                        "Failed to find dll \"{}\", required by \"{}\"",
                        dep,
                        binary.display()
                    );
                    session.report.missing.push(MissingDll {
                        name: dep,
                        required_by: binary.to_path_buf(),
                    });
                    continue;
                }
                return Err(DeployError::DllNotFound {
                    dll: dep,
                    required_by: binary.to_path_buf(),
                });
            };

            session.visited.insert(dep.clone());

            let next = if session.report.dry_run {
                tracing::info!("Would copy \"{}\" to \"{}\"", source.display(), destination.display());
                source.clone()
            } else {
                tracing::info!("Copying \"{}\" to \"{}\"", source.display(), destination.display());
                std::fs::copy(&source, &destination).map_err(|e| DeployError::CopyError {
                    from: source.clone(),
                    to: destination.clone(),
                    source: e,
                })?;
                destination.clone()
            };

            session.report.deployed.push(DeployedDll {
                name: dep,
                source,
                destination,
                required_by: binary.to_path_buf(),
            });

            self.deploy_dependencies(&next, session)?;
        }

        Ok(())
    }

    // shallow 優先，找不到才走 deep
    fn search(&self, dep: &str, session: &Session) -> Option<PathBuf> {
        let searcher = DllSearcher::new(&self.inspector, &session.binary_format);

        if self.config.shallow_search_enabled() {
            if let Some(found) = searcher.search_shallow(dep, &session.shallow_dirs) {
                return Some(found);
            }
        }
        if self.config.deep_search_enabled() {
            if let Some(found) = searcher.search_deep(dep, &session.deep_dirs) {
                return Some(found);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::core::test_support::FakeInspector;
    use tempfile::TempDir;

    struct Fixture {
        app_dir: TempDir,
        lib_dir: TempDir,
    }

    impl Fixture {
        fn new(libs: &[&str]) -> Self {
            let app_dir = TempDir::new().unwrap();
            let lib_dir = TempDir::new().unwrap();
            std::fs::write(app_dir.path().join("app.exe"), b"MZ").unwrap();
            for lib in libs {
                std::fs::write(lib_dir.path().join(lib), lib.as_bytes()).unwrap();
            }
            Self { app_dir, lib_dir }
        }

        fn target(&self) -> PathBuf {
            self.app_dir.path().join("app.exe")
        }

        fn config(&self, extra: &str) -> TomlConfig {
            let content = format!(
                "[search]\nshallow_dirs = [\"{}\"]\nskip_env_path = true\nno_deep_search = true\n{}",
                self.lib_dir.path().display().to_string().replace('\\', "/"),
                extra
            );
            TomlConfig::from_toml_str(&content).unwrap()
        }
    }

    #[test]
    fn test_deploys_transitive_dependencies() {
        let fixture = Fixture::new(&["qt6widgets.dll", "qt6core.dll", "libzip.dll", "zlib1.dll"]);
        let inspector = FakeInspector::default()
            .with_deps(
                "app.exe",
                &["kernel32.dll", "qt6widgets.dll", "libzip.dll", "api-ms-win-crt-runtime-l1-1-0.dll"],
            )
            .with_deps("qt6widgets.dll", &["qt6core.dll", "user32.dll"])
            .with_deps("qt6core.dll", &[])
            .with_deps("libzip.dll", &["zlib1.dll"]);

        let deployer = Deployer::new(inspector, fixture.config(""));
        let report = deployer.run(&fixture.target()).unwrap();

        assert_eq!(
            report.deployed_names(),
            vec!["qt6widgets.dll", "qt6core.dll", "libzip.dll", "zlib1.dll"]
        );
        for name in report.deployed_names() {
            assert!(fixture.app_dir.path().join(name).exists());
        }
        assert!(report
            .skipped
            .iter()
            .any(|s| s.name == "kernel32.dll" && s.reason == SkipReason::SystemDll));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::VcRedist));
        assert!(report.is_complete());
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_existing_and_ignored_dlls_are_skipped() {
        let fixture = Fixture::new(&["zlib1.dll", "qt6network.dll"]);
        std::fs::write(fixture.app_dir.path().join("zlib1.dll"), b"local").unwrap();
        let inspector =
            FakeInspector::default().with_deps("app.exe", &["zlib1.dll", "qt6network.dll"]);

        let deployer = Deployer::new(
            inspector,
            fixture.config("[deploy]\nignore = [\"Qt6Network.dll\"]\n"),
        );
        let report = deployer.run(&fixture.target()).unwrap();

        assert!(report.deployed.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::AlreadyPresent);
        assert_eq!(report.skipped[1].reason, SkipReason::Ignored);
        assert_eq!(
            std::fs::read(fixture.app_dir.path().join("zlib1.dll")).unwrap(),
            b"local"
        );
        assert!(!fixture.app_dir.path().join("qt6network.dll").exists());
    }

    #[test]
    fn test_copy_vc_redist_when_requested() {
        let fixture = Fixture::new(&["api-ms-win-crt-heap-l1-1-0.dll"]);
        let inspector =
            FakeInspector::default().with_deps("app.exe", &["api-ms-win-crt-heap-l1-1-0.dll"]);

        let deployer = Deployer::new(inspector, fixture.config("[deploy]\ncopy_vc_redist = true\n"));
        let report = deployer.run(&fixture.target()).unwrap();

        assert_eq!(report.deployed_names(), vec!["api-ms-win-crt-heap-l1-1-0.dll"]);
    }

    #[test]
    fn test_missing_dll_fails() {
        let fixture = Fixture::new(&[]);
        let inspector = FakeInspector::default().with_deps("app.exe", &["libgomp-1.dll"]);

        let deployer = Deployer::new(inspector, fixture.config(""));
        let err = deployer.run(&fixture.target()).unwrap_err();

        assert!(matches!(err, DeployError::DllNotFound { ref dll, .. } if dll == "libgomp-1.dll"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_allow_missing_continues() {
        let fixture = Fixture::new(&["zlib1.dll"]);
        let inspector =
            FakeInspector::default().with_deps("app.exe", &["libgomp-1.dll", "zlib1.dll"]);

        let deployer =
            Deployer::new(inspector, fixture.config("[deploy]\nallow_missing = true\n"));
        let report = deployer.run(&fixture.target()).unwrap();

        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].name, "libgomp-1.dll");
        assert_eq!(report.deployed_names(), vec!["zlib1.dll"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_missing_dll_recorded_for_every_binary_needing_it() {
        let fixture = Fixture::new(&["liba.dll", "libb.dll"]);
        let inspector = FakeInspector::default()
            .with_deps("app.exe", &["liba.dll", "libb.dll"])
            .with_deps("liba.dll", &["libgomp-1.dll"])
            .with_deps("libb.dll", &["libgomp-1.dll"]);

        let deployer =
            Deployer::new(inspector, fixture.config("[deploy]\nallow_missing = true\n"));
        let report = deployer.run(&fixture.target()).unwrap();

        assert!(!report
            .skipped
            .iter()
            .any(|s| s.name == "libgomp-1.dll" && s.reason == SkipReason::AlreadyPresent));

        let required_by: Vec<PathBuf> = report
            .missing
            .iter()
            .filter(|m| m.name == "libgomp-1.dll")
            .map(|m| m.required_by.clone())
            .collect();
        assert_eq!(
            required_by,
            vec![
                fixture.app_dir.path().join("liba.dll"),
                fixture.app_dir.path().join("libb.dll")
            ]
        );
        assert_eq!(report.deployed_names(), vec!["liba.dll", "libb.dll"]);
    }

    #[test]
    fn test_dry_run_copies_nothing_and_terminates_on_cycles() {
        let fixture = Fixture::new(&["liba.dll", "libb.dll"]);
        let inspector = FakeInspector::default()
            .with_deps("app.exe", &["liba.dll"])
            .with_deps("liba.dll", &["libb.dll"])
            .with_deps("libb.dll", &["liba.dll"]);

        let deployer = Deployer::new(inspector, fixture.config("[deploy]\ndry_run = true\n"));
        let report = deployer.run(&fixture.target()).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.deployed_names(), vec!["liba.dll", "libb.dll"]);
        assert!(!fixture.app_dir.path().join("liba.dll").exists());
        assert_eq!(
            report.deployed[0].source,
            fixture.lib_dir.path().join("liba.dll")
        );
    }

    #[test]
    fn test_target_must_be_a_file() {
        let fixture = Fixture::new(&[]);
        let deployer = Deployer::new(FakeInspector::default(), fixture.config(""));

        let err = deployer
            .run(&fixture.app_dir.path().join("missing.exe"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
