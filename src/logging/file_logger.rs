use chrono::Local;
use parking_lot::Mutex;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Log de auditoria só de append. Uma linha por evento, espelhada no `tracing`.
///
/// Compartilhe via `Arc<FileLogger>`: o lock pertence à instância.
#[derive(Debug)]
pub struct FileLogger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLogger {
    /// Creates the parent directory of `path` if it does not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_info(&self, message: &str) {
        info!(target: "paygateway", "{}", message);
        self.log(LogLevel::Info, message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(target: "paygateway", "{}", message);
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        let entry = match cause {
            Some(cause) => format_cause(message, cause),
            None => message.to_string(),
        };

        error!(target: "paygateway", "{}", entry);
        self.log(LogLevel::Error, &entry);
    }

    fn log(&self, level: LogLevel, message: &str) {
        let entry = format!(
            "{} [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            single_line(message)
        );

        let _guard = self.lock.lock();
        if let Err(e) = self.append(&entry) {
            error!(
                target: "paygateway",
                "failed to write log file {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn append(&self, entry: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}

fn format_cause(message: &str, cause: &(dyn Error + 'static)) -> String {
    let mut entry = format!("{}. Exception: {}", message, cause);

    let mut source = cause.source();
    while let Some(inner) = source {
        let _ = write!(entry, ". Caused by: {}", inner);
        source = inner.source();
    }

    let backtrace = Backtrace::force_capture().to_string();
    let frames: Vec<&str> = backtrace.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let _ = write!(entry, ". StackTrace: {}", frames.join(" | "));

    entry
}

// Uma linha por evento: quebras de linha viram espaço.
fn single_line(message: &str) -> String {
    message
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn read_lines(logger: &FileLogger) -> Vec<String> {
        fs::read_to_string(logger.path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn assert_line(line: &str, level: &str, message: &str) {
        // "YYYY-MM-DD HH:MM:SS" is 19 characters.
        let (timestamp, rest) = line.split_at(19);
        assert!(
            chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "bad timestamp in {line:?}"
        );
        assert_eq!(rest, format!(" [{}] {}", level, message));
    }

    #[test]
    fn test_creates_directory_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("gateway.log");

        let logger = FileLogger::new(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());

        logger.log_info("started");
        logger.log_warning("slow gateway");
        logger.log_error("payment failed", None);

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 3);
        assert_line(&lines[0], "INFO", "started");
        assert_line(&lines[1], "WARNING", "slow gateway");
        assert_line(&lines[2], "ERROR", "payment failed");
    }

    #[test]
    fn test_error_with_cause_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("gateway unreachable")]
        struct Outer(#[source] io::Error);

        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::new(dir.path().join("gateway.log")).unwrap();

        let cause = Outer(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        logger.log_error("Exception processing order ORDER-1", Some(&cause));

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(
            "[ERROR] Exception processing order ORDER-1. Exception: gateway unreachable. Caused by: connection refused"
        ));
    }

    #[test]
    fn test_error_with_cause_is_one_line_with_stack_trace() {
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::new(dir.path().join("gateway.log")).unwrap();

        let cause = io::Error::new(io::ErrorKind::TimedOut, "gateway timed out");
        logger.log_error("failed", Some(&cause));

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[ERROR] failed. Exception: gateway timed out. StackTrace: "));
        assert!(lines[0].split("StackTrace: ").nth(1).is_some_and(|trace| !trace.is_empty()));
    }

    #[test]
    fn test_multiline_message_is_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::new(dir.path().join("gateway.log")).unwrap();

        logger.log_error("Gateway rejected payment. Response: <html>\r\n<body>down</body>\n</html>", None);

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 1);
        assert_line(
            &lines[0],
            "ERROR",
            "Gateway rejected payment. Response: <html> <body>down</body> </html>",
        );
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(FileLogger::new(dir.path().join("gateway.log")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..50 {
                        logger.log_info(&format!("worker {} entry {}", worker, i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 400);
        for line in &lines {
            let (_, rest) = line.split_at(19);
            assert!(rest.starts_with(" [INFO] worker "), "{line:?}");
        }
    }
}
