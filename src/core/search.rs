use crate::domain::ports::BinaryInspector;
use crate::utils::fs::is_file;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds dlls whose architecture matches the binary being deployed.
pub struct DllSearcher<'a, I: BinaryInspector> {
    inspector: &'a I,
    expected_format: &'a str,
}

impl<'a, I: BinaryInspector> DllSearcher<'a, I> {
    pub fn new(inspector: &'a I, expected_format: &'a str) -> Self {
        Self {
            inspector,
            expected_format,
        }
    }

    pub fn is_valid(&self, candidate: &Path) -> bool {
        if !is_file(candidate) {
            return false;
        }

        match self.inspector.file_format(candidate) {
            Ok(format) if format == self.expected_format => true,
            Ok(format) => {
                tracing::debug!(
                    "Skipped \"{}\" because DLL architecture mismatch. Expected {}, but found {}",
                    candidate.display(),
                    self.expected_format,
                    format
                );
                false
            }
            Err(e) => {
                tracing::warn!("Skipped \"{}\" because {}", candidate.display(), e);
                false
            }
        }
    }

    /// 候選檔可平行驗證，但結果一定是順序上第一個合格者
    fn first_valid(&self, candidates: Vec<PathBuf>) -> Option<PathBuf> {
        candidates
            .into_par_iter()
            .find_first(|candidate| self.is_valid(candidate))
    }

    pub fn search_shallow(&self, name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
        let candidates = dirs.iter().map(|dir| dir.join(name)).collect();
        self.first_valid(candidates)
    }

    /// 依走訪順序逐一驗證，找到第一個合格者就停止走訪
    pub fn search_deep(&self, name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
        dirs.iter().find_map(|dir| {
            WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry.path().join(name)),
                    Err(e) => {
                        tracing::debug!("Failed to search in {:?} because {}", e.path(), e);
                        None
                    }
                })
                .find(|candidate| self.is_valid(candidate))
        })
    }
}
