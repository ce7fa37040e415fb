use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Modpack archive error: {0}")]
    Archive(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Registry lookup failed for '{project}': {reason}")]
    Lookup { project: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot derive a project id from download URL '{0}'")]
    InvalidLocator(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    pub fn lookup(project: impl Into<String>, reason: impl ToString) -> Self {
        AuditError::Lookup {
            project: project.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
