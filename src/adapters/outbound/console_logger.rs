use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        println!("{} {}", Utc::now().format("%H:%M:%S"), msg);
    }

    fn warn(&self, msg: &str) {
        println!("{} WARN: {}", Utc::now().format("%H:%M:%S"), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("{} ERROR: {}", Utc::now().format("%H:%M:%S"), msg);
    }
}

/// Console-backed logger; also the fallback when the log file cannot be opened.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge {})
}
