use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;
use tokio::sync::mpsc;

enum Level {
    Info,
    Warn,
    Error,
}

struct LogMessage {
    level: Level,
    msg: String,
}

struct BufferedLogger {
    sender: mpsc::Sender<LogMessage>,
}

impl BufferedLogger {
    fn push(&self, level: Level, msg: &str) {
        // Dropped when the buffer is full; agents never wait on log I/O.
        let _ = self.sender.try_send(LogMessage { level, msg: msg.to_string() });
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
}

/// Decouples agents from a slow sink. A background task drains up to `capacity`
/// queued messages into `sink`. Must be called inside a tokio runtime.
pub fn init_buffered_logger(sink: DynLogger, capacity: usize) -> DynLogger {
    let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity);

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.level {
                Level::Info => sink.info(&msg.msg),
                Level::Warn => sink.warn(&msg.msg),
                Level::Error => sink.error(&msg.msg),
            }
        }
    });

    Arc::new(BufferedLogger { sender: tx })
}
