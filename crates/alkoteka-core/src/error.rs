use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read targets file {path}: {source}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse targets file: {0}")]
    TargetsFileParse(#[from] serde_yaml::Error),

    #[error("crawl target '{0}' is not configured")]
    UnknownTarget(String),

    #[error("crawl target '{target}' has no {field} configured")]
    MissingEndpoint { target: String, field: &'static str },

    #[error("failed to read links file {path}: {source}")]
    SeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid category links in {path}")]
    NoValidSeeds { path: String },

    #[error("config validation error: {0}")]
    Validation(String),
}

/// A record that failed schema validation.
///
/// `path` is the dotted field path (`price.discount_label`) and `expected`
/// describes the violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed at {path}: expected {expected}")]
pub struct ValidationError {
    pub path: String,
    pub expected: String,
}

impl ValidationError {
    pub(crate) fn new(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
        }
    }
}
