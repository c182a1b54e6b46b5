use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to copy \"{from}\" to \"{to}\": {source}")]
    CopyError {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The given target \"{path}\" is not a file")]
    TargetNotFileError { path: PathBuf },

    #[error("Failed to find objdump in your system")]
    SystemObjdumpNotFound,

    #[error("Builtin objdump executable {path} not found")]
    BuiltinObjdumpNotFound { path: PathBuf },

    #[error("Given objdump file {path} doesn't exist")]
    ObjdumpFileMissing { path: PathBuf },

    #[error("{command} failed with error code {status}: {stderr}")]
    ObjdumpFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse dll name from output \"{line}\"")]
    DllNameParseError { line: String },

    #[error("Failed to parse file format of {file} from objdump output, it says: \n{output}")]
    FileFormatParseError { file: PathBuf, output: String },

    #[error("Failed to find dll \"{dll}\", required by \"{required_by}\"")]
    DllNotFound { dll: String, required_by: PathBuf },

    #[error("Configuration error in field '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("GUI toolkit error: {message}")]
    GuiError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Toolchain,
    Search,
    FileSystem,
    Gui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::MissingConfigError { .. }
            | DeployError::TargetNotFileError { .. } => ErrorCategory::Configuration,
            DeployError::SystemObjdumpNotFound
            | DeployError::BuiltinObjdumpNotFound { .. }
            | DeployError::ObjdumpFileMissing { .. }
            | DeployError::ObjdumpFailed { .. }
            | DeployError::DllNameParseError { .. }
            | DeployError::FileFormatParseError { .. } => ErrorCategory::Toolchain,
            DeployError::DllNotFound { .. } => ErrorCategory::Search,
            DeployError::ZipError(_)
            | DeployError::IoError(_)
            | DeployError::SerializationError(_)
            | DeployError::CopyError { .. } => ErrorCategory::FileSystem,
            DeployError::GuiError { .. } => ErrorCategory::Gui,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Search => ErrorSeverity::High,
            ErrorCategory::Toolchain => ErrorSeverity::Critical,
            ErrorCategory::FileSystem => ErrorSeverity::Critical,
            ErrorCategory::Gui => ErrorSeverity::Medium,
        }
    }

    /// 對應到原工具的結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::SystemObjdumpNotFound => 2,
            DeployError::BuiltinObjdumpNotFound { .. } => 3,
            DeployError::ObjdumpFileMissing { .. } => 4,
            DeployError::TargetNotFileError { .. } => 5,
            DeployError::DllNameParseError { .. } => 8,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::DllNotFound { dll, .. } => {
                format!("Could not locate {} in any search directory", dll)
            }
            DeployError::SystemObjdumpNotFound
            | DeployError::BuiltinObjdumpNotFound { .. }
            | DeployError::ObjdumpFileMissing { .. } => {
                "objdump is required to read import tables but none was found".to_string()
            }
            DeployError::ObjdumpFailed { .. }
            | DeployError::DllNameParseError { .. }
            | DeployError::FileFormatParseError { .. } => {
                "objdump could not inspect the binary".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DeployError::DllNotFound { .. } => {
                "Add the directory containing the dll with --shallow-search-dir or --deep-search-dir, or pass --allow-missing"
            }
            DeployError::SystemObjdumpNotFound => {
                "Install binutils (mingw-w64) and make sure objdump is on PATH, or pass --objdump-file"
            }
            DeployError::BuiltinObjdumpNotFound { .. } => {
                "Place an objdump executable next to deploy-dll, or use --objdump-file [system]"
            }
            DeployError::ObjdumpFileMissing { .. } => "Check the path given to --objdump-file",
            DeployError::TargetNotFileError { .. } => "Pass the path of an existing .exe or .dll",
            DeployError::ObjdumpFailed { .. }
            | DeployError::DllNameParseError { .. }
            | DeployError::FileFormatParseError { .. } => {
                "Make sure the target is a PE binary and objdump supports its architecture"
            }
            DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::MissingConfigError { .. } => "Fix the configuration and run again",
            DeployError::CopyError { .. } | DeployError::IoError(_) => {
                "Check file permissions of the target directory"
            }
            DeployError::ZipError(_) | DeployError::SerializationError(_) => {
                "Check that the output location is writable"
            }
            DeployError::GuiError { .. } => "Run the headless build or check the display environment",
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
