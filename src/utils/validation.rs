use crate::utils::error::{DeployError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// objdump 位置：`[auto]`、`[system]`、`[builtin]` 或實際路徑
pub fn validate_objdump_spec(field_name: &str, spec: &str) -> Result<()> {
    validate_non_empty_string(field_name, spec)?;

    if spec.starts_with('[') && !matches!(spec, "[auto]" | "[system]" | "[builtin]") {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: spec.to_string(),
            reason: "Valid values: [auto] [system] [builtin] or a path".to_string(),
        });
    }

    validate_path(field_name, spec)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_paths(field_name: &str, paths: &[String]) -> Result<()> {
    for path in paths {
        validate_path(field_name, path)?;
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension.to_lowercase().as_str()) {
                return Err(DeployError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DeployError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_objdump_spec() {
        assert!(validate_objdump_spec("objdump_file", "[auto]").is_ok());
        assert!(validate_objdump_spec("objdump_file", "[system]").is_ok());
        assert!(validate_objdump_spec("objdump_file", "[builtin]").is_ok());
        assert!(validate_objdump_spec("objdump_file", "/usr/bin/x86_64-w64-mingw32-objdump").is_ok());
        assert!(validate_objdump_spec("objdump_file", "[bundled]").is_err());
        assert!(validate_objdump_spec("objdump_file", "  ").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["Qt6Core.dll".to_string(), "zlib1.DLL".to_string()];
        assert!(validate_file_extensions("ignore", &files, &["dll"]).is_ok());

        let invalid_files = vec!["libzip.so".to_string()];
        assert!(validate_file_extensions("ignore", &invalid_files, &["dll"]).is_err());

        let no_extension = vec!["kernel32".to_string()];
        assert!(validate_file_extensions("ignore", &no_extension, &["dll"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("[auto]".to_string());
        assert_eq!(validate_required_field("objdump.file", &present).unwrap(), "[auto]");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("objdump.file", &missing),
            Err(DeployError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_paths() {
        assert!(validate_paths("search.shallow_dirs", &["C:/Qt/bin".to_string()]).is_ok());
        assert!(validate_paths("search.shallow_dirs", &["bad\0dir".to_string()]).is_err());
    }
}
