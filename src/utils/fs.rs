use std::path::Path;

pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    std::fs::metadata(path)
        .map(|md| md.is_file())
        .unwrap_or(false)
}

pub fn can_be_dir<P: AsRef<Path>>(path: P) -> bool {
    std::fs::metadata(path)
        .map(|md| md.is_dir())
        .unwrap_or(false)
}
