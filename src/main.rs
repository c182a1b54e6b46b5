use anyhow::Context;
use clap::Parser;
use dll_deployer::core::report::write_json_report;
use dll_deployer::utils::{logger, validation::Validate};
use dll_deployer::{CliConfig, DeployError, DeployReport, Deployer, ObjdumpInspector, TomlConfig};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path.display());
        let file_config = TomlConfig::from_file(&path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
        file_config.validate()?;
        config.merge_file_config(&file_config)?;
    }

    match run(config) {
        Ok(report) => {
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Deployment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            if e.user_friendly_message() != e.to_string() {
                eprintln!("   {}", e.user_friendly_message());
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn run(mut config: CliConfig) -> Result<DeployReport, DeployError> {
    config.validate()?;

    let target = absolute_target(&config.binary_file, config.verbose)?;
    config.binary_file = target.clone();

    let inspector = ObjdumpInspector::locate(config.objdump_spec())?;
    tracing::info!("Using objdump at {}", inspector.path().display());
    let objdump = inspector.path().to_path_buf();

    let report_path = config.report.clone();
    let deployer = Deployer::new(inspector, config);
    let mut report = deployer.run(&target)?;
    report.objdump = Some(objdump);

    if let Some(path) = report_path {
        write_json_report(&report, &path)?;
        tracing::info!("📁 Report saved to: {}", path.display());
    }

    Ok(report)
}

fn absolute_target(binary_file: &std::path::Path, verbose: bool) -> Result<PathBuf, DeployError> {
    if !binary_file.is_file() {
        return Err(DeployError::TargetNotFileError {
            path: binary_file.to_path_buf(),
        });
    }

    if binary_file.is_absolute() {
        return Ok(binary_file.to_path_buf());
    }

    let absolute = std::env::current_dir()?.join(binary_file);
    if verbose {
        tracing::debug!(
            "The given binary path \"{}\" is a relative path, converted to \"{}\"",
            binary_file.display(),
            absolute.display()
        );
    }
    Ok(absolute)
}

fn print_summary(report: &DeployReport) {
    for missing in &report.missing {
        println!(
            "Failed to find dll \"{}\", required by \"{}\"",
            missing.name,
            missing.required_by.display()
        );
    }

    let verb = if report.dry_run { "Would deploy" } else { "Deployed" };
    println!(
        "✅ {} {} dll(s) for \"{}\"",
        verb,
        report.deployed.len(),
        report.target.display()
    );
    for dll in &report.deployed {
        println!("  {} <- {}", dll.name, dll.source.display());
    }
}
