use std::path::PathBuf;

/// Structural failure while decomposing a definition block. Aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid struct format: definition `{name}` has no `{{` body")]
    MissingBody { name: String },
    #[error("invalid struct format: definition `{name}` is missing its closing `}}`")]
    Unterminated { name: String },
    #[error("invalid struct format: `{name}` is not a valid definition name")]
    InvalidName { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{count} field(s) could not be parsed in: {}", .definitions.join(", "))]
    DroppedFields { count: usize, definitions: Vec<String> },
    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: crate::path_de::PathedError },
}
