use crate::utils::fs::is_file;
use std::collections::HashSet;
use std::sync::OnceLock;

const SYSTEM_PREFIXES: [&str; 5] = [
    "C:/Windows/",
    "C:/Windows/system32/",
    "C:/Windows/System32/Wbem/",
    "C:/Windows/System32/WindowsPowerShell/v1.0/",
    "C:/Windows/System32/OpenSSH/",
];

// Dlls shipped with Windows, used when cross compiling from another OS.
const KNOWN_SYSTEM_DLLS: &str = include_str!("../data/system_dlls.txt");

fn known_system_dlls() -> &'static HashSet<&'static str> {
    static LIST: OnceLock<HashSet<&'static str>> = OnceLock::new();
    LIST.get_or_init(|| {
        KNOWN_SYSTEM_DLLS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    })
}

pub fn is_vc_redist_dll(name: &str) -> bool {
    name.starts_with("api-ms-win")
}

pub fn is_system_dll(name: &str) -> bool {
    if cfg!(target_os = "windows") {
        SYSTEM_PREFIXES
            .iter()
            .any(|prefix| is_file(format!("{prefix}{name}")))
    } else {
        is_known_system_dll(name)
    }
}

pub fn is_known_system_dll(name: &str) -> bool {
    known_system_dlls().contains(name.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_system_dlls() {
        assert!(is_known_system_dll("kernel32.dll"));
        assert!(is_known_system_dll("USER32.dll"));
        assert!(is_known_system_dll("msvcrt.dll"));
        assert!(!is_known_system_dll("qt6core.dll"));
        assert!(!is_known_system_dll("libzip.dll"));
        assert_eq!(known_system_dlls().len(), 3392);
    }

    #[test]
    fn test_vc_redist() {
        assert!(is_vc_redist_dll("api-ms-win-crt-runtime-l1-1-0.dll"));
        assert!(!is_vc_redist_dll("vcomp140.dll"));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_cross_compile_fallback() {
        assert!(is_system_dll("ws2_32.dll"));
        assert!(!is_system_dll("libgomp-1.dll"));
    }
}
