use crate::utils::fs::can_be_dir;
use std::path::PathBuf;

/// `<prefix>/bin` for every prefix that exists. Each value may itself be a
/// `;`-separated list, as CMAKE_PREFIX_PATH usually is.
pub fn existing_cmake_prefix_bins(prefixes: &[String]) -> Vec<PathBuf> {
    prefixes
        .iter()
        .flat_map(|value| value.split(';'))
        .filter(|prefix| !prefix.is_empty())
        .map(|prefix| PathBuf::from(format!("{prefix}/bin")))
        .filter(|bin| can_be_dir(bin))
        .collect()
}

/// Existing directories listed in `PATH`. Entries are `;`-separated, the
/// Windows convention.
pub fn existing_env_path() -> Vec<PathBuf> {
    match std::env::var("PATH") {
        Ok(path) => split_existing_dirs(&path),
        Err(_) => Vec::new(),
    }
}

fn split_existing_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(';')
        .filter(|dir| can_be_dir(dir))
        .map(PathBuf::from)
        .collect()
}

/// 搜尋順序：明確指定的目錄、CMake prefix 的 bin、最後才是 PATH
pub fn compose_search_dirs(
    explicit: &[String],
    cmake_prefix_path: &[String],
    skip_env_path: bool,
) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = explicit.iter().map(PathBuf::from).collect();
    dirs.extend(existing_cmake_prefix_bins(cmake_prefix_path));

    if cfg!(target_os = "windows") && !skip_env_path {
        dirs.extend(existing_env_path());
    }

    dirs
}
