use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub targets_path: PathBuf,
    pub links_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Upper bound on pages walked per paginated endpoint.
    pub max_pages: u32,
    /// Abort the whole run on the first record that fails validation
    /// instead of dropping just that record.
    pub strict_validation: bool,
}
