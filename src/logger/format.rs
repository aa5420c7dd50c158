//! Access log format module
//!
//! Supports three line formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)

use chrono::{DateTime, Local};
use std::str::FromStr;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessLogFormat {
    #[default]
    Combined,
    Common,
    Json,
}

impl FromStr for AccessLogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(Self::Combined),
            "common" => Ok(Self::Common),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown access log format: {other}")),
        }
    }
}

/// One served request, as recorded in the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time spent in the handler, microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.common_line(),
            AccessLogFormat::Json => serde_json::json!({
                "remote_addr": self.remote_addr,
                "time": self.time.to_rfc3339(),
                "method": self.method,
                "path": self.path,
                "query": self.query,
                "http_version": self.http_version,
                "status": self.status,
                "body_bytes": self.body_bytes,
                "referer": self.referer,
                "user_agent": self.user_agent,
                "request_time_us": self.request_time_us,
            })
            .to_string(),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "10.0.0.7".to_string(),
            "GET".to_string(),
            "/users/42".to_string(),
        );
        entry.query = Some("tab=friends".to_string());
        entry.status = 200;
        entry.body_bytes = 512;
        entry.referer = Some("https://example.com/users".to_string());
        entry.user_agent = Some("curl/8.5".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(AccessLogFormat::Combined);
        assert!(log.starts_with("10.0.0.7 - - ["));
        assert!(log.contains("\"GET /users/42?tab=friends HTTP/1.1\" 200 512"));
        assert!(log.ends_with("\"https://example.com/users\" \"curl/8.5\""));
    }

    #[test]
    fn test_format_common_omits_headers() {
        let mut entry = create_test_entry();
        entry.query = None;
        entry.status = 422;
        entry.body_bytes = 13;
        let log = entry.format(AccessLogFormat::Common);
        assert!(log.ends_with("\"GET /users/42 HTTP/1.1\" 422 13"));
        assert!(!log.contains("curl/8.5"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format(AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "10.0.0.7");
        assert_eq!(value["path"], "/users/42");
        assert_eq!(value["query"], "tab=friends");
        assert_eq!(value["status"], 200);
        assert_eq!(value["request_time_us"], 1500);
    }

    #[test]
    fn test_parse_format_names() {
        assert_eq!("JSON".parse::<AccessLogFormat>(), Ok(AccessLogFormat::Json));
        assert_eq!("common".parse::<AccessLogFormat>(), Ok(AccessLogFormat::Common));
        assert!("fancy".parse::<AccessLogFormat>().is_err());
    }
}
