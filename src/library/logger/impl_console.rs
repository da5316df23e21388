use crate::library::logger::interface::{LogLevel, Logger};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
    min_level: LogLevel,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset, min_level: LogLevel) -> Self {
        Self {
            namespace: None,
            timezone,
            min_level,
        }
    }

    fn format_line(&self, level: LogLevel, message: &str) -> String {
        let local_time = Utc::now().with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        match &self.namespace {
            Some(namespace) => format!(
                "[{}] {:<5} {}: {}",
                formatted,
                level.as_str(),
                namespace,
                message
            ),
            None => format!("[{}] {:<5} {}", formatted, level.as_str(), message),
        }
    }
}

impl Logger for LoggerConsole {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if level < self.min_level {
            return Ok(());
        }

        let line = self.format_line(level, message);
        match level {
            LogLevel::Warn | LogLevel::Error => eprintln!("{}", line),
            LogLevel::Debug | LogLevel::Info => println!("{}", line),
        }
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerConsole {
            namespace: Some(new_namespace),
            timezone: self.timezone,
            min_level: self.min_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_joined_with_colons() {
        let timezone = chrono::FixedOffset::east_opt(0).unwrap();
        let logger = LoggerConsole {
            namespace: Some("camera".to_string()),
            timezone,
            min_level: LogLevel::Info,
        };

        let line = logger.format_line(LogLevel::Warn, "frame dropped");

        assert!(line.ends_with("WARN  camera: frame dropped"), "{}", line);
    }
}
