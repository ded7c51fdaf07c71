//! Moderation gate policy.
//!
//! The deployed NSFW checker answers with a bare `nsfwContent` array: one
//! element means nothing was flagged, anything else means flagged with the
//! human-readable reason in element `[1]`. When the service also sends an
//! explicit `clean` flag that flag wins.

use safeupload_client::ModerationResponse;
use serde_json::Value;

const UNSPECIFIED_REASON: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationVerdict {
    Clean,
    Rejected { reasons: Vec<String> },
}

impl ModerationVerdict {
    pub fn from_response(response: &ModerationResponse) -> Self {
        if let Some(clean) = response.clean {
            if clean {
                return Self::Clean;
            }
            let reasons = response
                .reasons
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| vec![UNSPECIFIED_REASON.to_string()]);
            return Self::Rejected { reasons };
        }

        match response.nsfw_content.as_deref() {
            Some([_]) => Self::Clean,
            Some(verdicts) => Self::Rejected {
                reasons: vec![verdicts
                    .get(1)
                    .map(render_reason)
                    .unwrap_or_else(|| UNSPECIFIED_REASON.to_string())],
            },
            None => Self::Rejected {
                reasons: vec![UNSPECIFIED_REASON.to_string()],
            },
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Reasons joined for display. `None` when clean.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Clean => None,
            Self::Rejected { reasons } => Some(reasons.join(", ")),
        }
    }
}

fn render_reason(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy(content: Value) -> ModerationResponse {
        ModerationResponse {
            nsfw_content: serde_json::from_value(content).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_element_is_clean() {
        let verdict = ModerationVerdict::from_response(&legacy(json!(["frames"])));
        assert!(verdict.is_clean());
        assert_eq!(verdict.reason(), None);
    }

    #[test]
    fn test_two_elements_rejected_with_second_as_reason() {
        let verdict = ModerationVerdict::from_response(&legacy(json!(["frames", "Hentai: 0.88"])));
        assert_eq!(
            verdict,
            ModerationVerdict::Rejected {
                reasons: vec!["Hentai: 0.88".into()]
            }
        );
    }

    #[test]
    fn test_non_string_reason_rendered_as_json() {
        let verdict =
            ModerationVerdict::from_response(&legacy(json!(["frames", {"porn": 0.9}, "extra"])));
        assert_eq!(verdict.reason().as_deref(), Some(r#"{"porn":0.9}"#));
    }

    #[test]
    fn test_empty_or_missing_verdicts_are_rejected() {
        let empty = ModerationVerdict::from_response(&legacy(json!([])));
        assert_eq!(empty.reason().as_deref(), Some("unspecified"));

        let missing = ModerationVerdict::from_response(&ModerationResponse::default());
        assert!(!missing.is_clean());
    }

    #[test]
    fn test_explicit_flag_overrides_array_length() {
        let response = ModerationResponse {
            nsfw_content: Some(vec![json!("a"), json!("b")]),
            clean: Some(true),
            reasons: None,
        };
        assert!(ModerationVerdict::from_response(&response).is_clean());

        let response = ModerationResponse {
            nsfw_content: Some(vec![json!("a")]),
            clean: Some(false),
            reasons: Some(vec!["violence".into(), "gore".into()]),
        };
        assert_eq!(
            ModerationVerdict::from_response(&response).reason().as_deref(),
            Some("violence, gore")
        );
    }
}
