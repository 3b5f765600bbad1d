//! Error types for the updater
//!
//! Every failure is fatal for the current run; nothing here distinguishes
//! transient from permanent errors.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The registrar answered with a non-200 status or a non-SUCCESS body
    #[error("{operation} request was not successful{}: {body}", http_suffix(.http_status))]
    Api {
        /// Operation name (e.g. "ping")
        operation: &'static str,
        /// HTTP status, when the failure is at the HTTP layer
        http_status: Option<u16>,
        /// Raw response body
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode {operation} response: {message}")]
    Decode {
        /// Operation name
        operation: &'static str,
        /// Decoder message
        message: String,
    },

    /// The request body could not be serialized
    #[error("Failed to encode {operation} request: {message}")]
    Encode {
        /// Operation name
        operation: &'static str,
        /// Encoder message
        message: String,
    },

    /// More than one A record matched a subdomain
    #[error("Could not update DNS record as {count} records were found for subdomain '{subdomain}'")]
    Conflict {
        /// The subdomain label (empty for the root domain)
        subdomain: String,
        /// Number of matching records
        count: usize,
    },

    /// The public IP lookup failed, so no target was touched
    #[error("Failed to get public IP: {source}")]
    PublicIp {
        #[source]
        source: Box<Error>,
    },

    /// An error that aborted a specific target
    #[error("Failed to upsert DNS record for {target}: {source}")]
    Target {
        /// Fully qualified name of the target
        target: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an API error carrying the raw response body
    pub fn api(operation: &'static str, http_status: Option<u16>, body: impl Into<String>) -> Self {
        Self::Api {
            operation,
            http_status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: message.into(),
        }
    }

    /// Create an encode error
    pub fn encode(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Encode {
            operation,
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(subdomain: impl Into<String>, count: usize) -> Self {
        Self::Conflict {
            subdomain: subdomain.into(),
            count,
        }
    }

    /// Attach the fully qualified target name to an error
    pub fn for_target(self, target: impl Into<String>) -> Self {
        Self::Target {
            target: target.into(),
            source: Box::new(self),
        }
    }

    /// Mark an error as a failed public IP lookup
    pub fn for_public_ip(self) -> Self {
        Self::PublicIp {
            source: Box::new(self),
        }
    }

    /// Whether this error stems from configuration rather than runtime
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Target { source, .. } | Self::PublicIp { source } => source.is_config(),
            _ => false,
        }
    }
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_body() {
        let err = Error::api("ping", None, r#"{"status":"ERROR","message":"bad key"}"#);
        let text = err.to_string();
        assert!(text.contains("ping request was not successful"));
        assert!(text.contains("bad key"));
        assert!(!text.contains("HTTP"));
    }

    #[test]
    fn api_error_mentions_http_status() {
        let err = Error::api("create record", Some(503), "unavailable");
        assert_eq!(
            err.to_string(),
            "create record request was not successful (HTTP 503): unavailable"
        );
    }

    #[test]
    fn target_wraps_source() {
        let err = Error::conflict("www", 2).for_target("www.example.com");
        assert_eq!(
            err.to_string(),
            "Failed to upsert DNS record for www.example.com: \
             Could not update DNS record as 2 records were found for subdomain 'www'"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_config());
    }

    #[test]
    fn public_ip_failure_names_the_lookup() {
        let err = Error::transport("HTTP request failed: connection refused").for_public_ip();
        assert_eq!(
            err.to_string(),
            "Failed to get public IP: Transport error: HTTP request failed: connection refused"
        );
        assert!(!err.is_config());
    }

    #[test]
    fn encode_is_distinct_from_decode() {
        let err = Error::encode("ping", "key must be a string");
        assert!(matches!(err, Error::Encode { operation: "ping", .. }));
        assert_eq!(err.to_string(), "Failed to encode ping request: key must be a string");
    }
}
