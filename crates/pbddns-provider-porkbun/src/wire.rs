//! Porkbun JSON API v3 request and response bodies

use pbddns_core::DnsRecord;
use serde::{Deserialize, Serialize};

/// Application-level success marker
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Request body shared by every endpoint
///
/// Optional fields are omitted from the JSON when unset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiRequest {
    pub apikey: String,
    pub secretapikey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApiRequest {
    /// A request carrying only the credentials
    pub fn credentials(apikey: &str, secretapikey: &str) -> Self {
        Self {
            apikey: apikey.to_string(),
            secretapikey: secretapikey.to_string(),
            ..Self::default()
        }
    }

    /// The request as JSON with both keys removed, for logging
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.remove("apikey");
            map.remove("secretapikey");
        }
        value
    }
}

/// Responses that carry a `status` field
pub trait Envelope {
    fn status(&self) -> &str;
}

/// `ping` response
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub status: String,
    #[serde(rename = "yourIp", default)]
    pub your_ip: String,
}

/// `dns/retrieveByNameType` response
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsResponse {
    pub status: String,
    #[serde(default)]
    pub records: Option<Vec<DnsRecord>>,
}

/// `dns/create` and `dns/editByNameType` response
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl Envelope for PingResponse {
    fn status(&self) -> &str {
        &self.status
    }
}

impl Envelope for RecordsResponse {
    fn status(&self) -> &str {
        &self.status
    }
}

impl Envelope for StatusResponse {
    fn status(&self) -> &str {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let request = ApiRequest::credentials("pk", "sk");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "apikey": "pk", "secretapikey": "sk" })
        );
    }

    #[test]
    fn type_field_is_renamed() {
        let request = ApiRequest {
            record_type: Some("A".to_string()),
            ..ApiRequest::credentials("pk", "sk")
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "A");
        assert!(value.get("record_type").is_none());
    }

    #[test]
    fn redacted_drops_keys() {
        let request = ApiRequest {
            content: Some("1.2.3.4".to_string()),
            ..ApiRequest::credentials("pk", "sk")
        };
        assert_eq!(request.redacted(), serde_json::json!({ "content": "1.2.3.4" }));
    }

    #[test]
    fn records_may_be_null() {
        let response: RecordsResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","records":null}"#).unwrap();
        assert_eq!(response.records, None);

        let response: RecordsResponse = serde_json::from_str(r#"{"status":"SUCCESS"}"#).unwrap();
        assert_eq!(response.records, None);
    }

    #[test]
    fn records_with_null_fields_decode() {
        let body = r#"{"status":"SUCCESS","records":[{"id":"1","name":"www.example.com","type":"A",
                       "content":"192.0.2.1","ttl":null,"prio":null,"notes":null}]}"#;
        let response: RecordsResponse = serde_json::from_str(body).unwrap();
        let records = response.records.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "192.0.2.1");
        assert_eq!(records[0].ttl, "");
    }

    #[test]
    fn error_body_decodes_as_ping() {
        let response: PingResponse =
            serde_json::from_str(r#"{"status":"ERROR","message":"Invalid API key."}"#).unwrap();
        assert_eq!(response.status(), "ERROR");
        assert!(response.your_ip.is_empty());
    }
}
