use chrono::{DateTime, Local};
use std::{fmt, path::PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub command: String,
    pub params: Vec<String>,
    pub at: DateTime<Local>,
}

impl AuditLogEntry {
    pub fn now(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            command: command.into(),
            params,
            at: Local::now(),
        }
    }
}

impl fmt::Display for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command '{}' executed with params {:?} at {}",
            self.command,
            self.params,
            self.at.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }
}

/// Append-only command log. The file is opened per append and one append
/// runs at a time, so lines never interleave.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, entry: &AuditLogEntry) -> std::io::Result<()> {
        let line = format!("{entry}\n");
        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[test]
    fn entry_format() {
        let entry = AuditLogEntry {
            command: "exchange".to_string(),
            params: vec!["3".to_string()],
            at: Local.with_ymd_and_hms(2024, 6, 1, 12, 30, 5).unwrap(),
        };
        assert_eq!(
            "Command 'exchange' executed with params [\"3\"] at 2024-06-01 12:30:05.000000",
            entry.to_string()
        );
    }

    #[tokio::test]
    async fn appends_whole_lines_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange.log");
        let log = Arc::new(AuditLog::new(&path));

        let handles = (0..50)
            .map(|i| {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let entry = AuditLogEntry::now("exchange", vec![i.to_string()]);
                    log.append(&entry).await.unwrap();
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(50, lines.len());
        for i in 0..50 {
            let params = format!("params [\"{i}\"] at ");
            assert_eq!(1, lines.iter().filter(|l| l.contains(&params)).count());
        }
        assert!(lines
            .iter()
            .all(|l| l.starts_with("Command 'exchange' executed with params")));
    }

    #[tokio::test]
    async fn keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange.log");
        std::fs::write(&path, "earlier\n").unwrap();

        let log = AuditLog::new(&path);
        log.append(&AuditLogEntry::now("exchange", Vec::new()))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier\nCommand 'exchange' executed with params []"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("missing").join("exchange.log"));
        assert!(log
            .append(&AuditLogEntry::now("exchange", Vec::new()))
            .await
            .is_err());
    }
}
