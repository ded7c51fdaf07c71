use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request for the identity service's dispatcher to post on a profile's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegatedPostRequest {
    pub from: String,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
}

/// Publication created through the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_availability_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proofs: Option<String>,
}

/// Value carried by a successful dispatcher result, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "__typename")]
pub enum RelayPayload {
    #[serde(rename = "CreateDataAvailabilityPublicationResult")]
    Created(CreatedPost),
    RelayError {
        reason: String,
    },
    #[serde(other)]
    Unknown,
}

/// Failure side of the dispatcher's result wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RelayFailure {
    pub message: String,
}

impl RelayFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result wrapper returned by delegated post creation. Must be unwrapped.
pub type SubmissionResult = std::result::Result<RelayPayload, RelayFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_discriminated_by_typename() {
        let created: RelayPayload = serde_json::from_value(json!({
            "__typename": "CreateDataAvailabilityPublicationResult",
            "id": "0x01-0x02-DA-abc",
            "dataAvailabilityId": "abc"
        }))
        .unwrap();
        assert!(matches!(created, RelayPayload::Created(ref p) if p.id == "0x01-0x02-DA-abc"));

        let relay_error: RelayPayload =
            serde_json::from_value(json!({"__typename": "RelayError", "reason": "REJECTED"}))
                .unwrap();
        assert_eq!(
            relay_error,
            RelayPayload::RelayError {
                reason: "REJECTED".into()
            }
        );

        let other: RelayPayload =
            serde_json::from_value(json!({"__typename": "RelayerResult", "txHash": "0x"})).unwrap();
        assert_eq!(other, RelayPayload::Unknown);
    }

    #[test]
    fn test_request_uses_remote_field_names() {
        let json = serde_json::to_value(DelegatedPostRequest {
            from: "0x01".into(),
            content_uri: "ar://abc".into(),
        })
        .unwrap();
        assert_eq!(json, json!({"from": "0x01", "contentURI": "ar://abc"}));
    }
}
