use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every message out to each sink in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        for sink in &self.sinks {
            sink.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        for sink in &self.sinks {
            sink.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        for sink in &self.sinks {
            sink.error(msg);
        }
    }
}

/// Console logger, plus a file sink when `path` is given and fast_log can be initialised.
pub fn init_combined_logger(path: Option<&str>) -> DynLogger {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![file_logger, console])),
        Err(e) => {
            console.warn(&format!("{}; logging to console only", e));
            console
        }
    }
}
