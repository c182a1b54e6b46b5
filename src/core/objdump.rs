use crate::domain::ports::BinaryInspector;
use crate::utils::error::{DeployError, Result};
use crate::utils::fs::is_file;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const AUTO: &str = "[auto]";
pub const SYSTEM: &str = "[system]";
pub const BUILTIN: &str = "[builtin]";

const DLL_NAME_MARKER: &str = "dll name: ";
const FILE_FORMAT_MARKER: &str = "file format ";

/// Resolves an objdump spec (`[auto]`, `[system]`, `[builtin]` or a path)
/// to an executable.
pub fn locate_objdump(spec: &str) -> Result<PathBuf> {
    locate_objdump_with(spec, system_objdump)
}

fn locate_objdump_with<F>(spec: &str, system_lookup: F) -> Result<PathBuf>
where
    F: Fn() -> Option<PathBuf>,
{
    match spec {
        SYSTEM => system_lookup().ok_or(DeployError::SystemObjdumpNotFound),
        BUILTIN => builtin_objdump(),
        AUTO => match system_lookup() {
            Some(path) => Ok(path),
            None => {
                tracing::debug!("objdump not found on PATH, trying the builtin one");
                builtin_objdump()
            }
        },
        path => {
            if !is_file(path) {
                return Err(DeployError::ObjdumpFileMissing {
                    path: PathBuf::from(path),
                });
            }
            Ok(PathBuf::from(path))
        }
    }
}

fn system_objdump() -> Option<PathBuf> {
    let finder = if cfg!(target_os = "windows") { "where" } else { "which" };
    let output = Command::new(finder).arg("objdump").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout).replace('\r', "");

    stdout
        .lines()
        .map(str::trim)
        .find(|line| is_file(line))
        .map(PathBuf::from)
}

fn builtin_objdump() -> Result<PathBuf> {
    let current_exe = std::env::current_exe()?;
    let install_prefix = current_exe.parent().unwrap_or_else(|| Path::new("."));
    let path = install_prefix.join(format!("objdump{}", std::env::consts::EXE_SUFFIX));

    if !is_file(&path) {
        return Err(DeployError::BuiltinObjdumpNotFound { path });
    }
    Ok(path)
}

/// Extracts `name` from a lowercased `dll name: name.dll` line, without the
/// extension.
pub fn parse_dll_name(line: &str) -> Result<&str> {
    let parse_error = || DeployError::DllNameParseError {
        line: line.to_string(),
    };

    let start = line.find(DLL_NAME_MARKER).ok_or_else(parse_error)? + DLL_NAME_MARKER.len();
    let end = line.find(".dll").ok_or_else(parse_error)?;

    if start + 1 >= end {
        return Err(parse_error());
    }
    Ok(&line[start..end])
}

/// Dll names from the output of `objdump -x`.
pub fn parse_dependencies(output: &str) -> Result<Vec<String>> {
    let output = output.replace('\r', "").to_lowercase();

    output
        .lines()
        .filter(|line| line.contains(DLL_NAME_MARKER))
        .map(|line| parse_dll_name(line).map(|name| format!("{name}.dll")))
        .collect()
}

/// Format from the output of `objdump -f`, e.g. `pei-x86-64`.
pub fn parse_file_format(output: &str) -> Option<String> {
    output.replace('\r', "").lines().find_map(|line| {
        line.rfind(FILE_FORMAT_MARKER)
            .map(|loc| line[loc + FILE_FORMAT_MARKER.len()..].trim_end().to_string())
    })
}

#[derive(Debug, Clone)]
pub struct ObjdumpInspector {
    objdump: PathBuf,
}

impl ObjdumpInspector {
    pub fn new(objdump: PathBuf) -> Self {
        Self { objdump }
    }

    pub fn locate(spec: &str) -> Result<Self> {
        locate_objdump(spec).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.objdump
    }

    fn run(&self, args: &[&OsStr]) -> Result<String> {
        let output = Command::new(&self.objdump).args(args).output()?;

        if !output.status.success() {
            let command = std::iter::once(self.objdump.as_os_str())
                .chain(args.iter().copied())
                .map(|part| part.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");
            return Err(DeployError::ObjdumpFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl BinaryInspector for ObjdumpInspector {
    fn dependencies(&self, binary: &Path) -> Result<Vec<String>> {
        let output = self.run(&[
            binary.as_os_str(),
            OsStr::new("-x"),
            OsStr::new("--section=.rdata"),
        ])?;
        parse_dependencies(&output)
    }

    fn file_format(&self, binary: &Path) -> Result<String> {
        let output = self.run(&[OsStr::new("-f"), binary.as_os_str()])?;
        parse_file_format(&output).ok_or_else(|| DeployError::FileFormatParseError {
            file: binary.to_path_buf(),
            output,
        })
    }
}
