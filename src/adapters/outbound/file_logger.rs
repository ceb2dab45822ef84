use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Installs the fast_log file appender for `path` and returns the logger agents write through.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path).map_err(|e| format!("Failed to initialize fast_log for {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
