//! The combined response of one aggregation.

use serde::Serialize;

use crate::upstream::{AccessDecision, Identity, SupplementalContext};

/// Response assembled from both mandatory results and the optional context.
///
/// Only the coordinator builds one, and only after both mandatory calls
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedResponse {
    #[serde(rename = "user")]
    identity: Identity,

    #[serde(rename = "permissions")]
    access: AccessDecision,

    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<SupplementalContext>,
}

impl AggregatedResponse {
    pub(crate) fn assemble(
        identity: Identity,
        access: AccessDecision,
        context: Option<SupplementalContext>,
    ) -> Self {
        Self {
            identity,
            access,
            context,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn access(&self) -> AccessDecision {
        self.access
    }

    pub fn context(&self) -> Option<&SupplementalContext> {
        self.context.as_ref()
    }

    /// True when the optional context had to be left out.
    pub fn is_degraded(&self) -> bool {
        self.context.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> Identity {
        Identity {
            id: "123".into(),
            name: "Name".into(),
        }
    }

    #[test]
    fn test_full_wire_shape() {
        let response = AggregatedResponse::assemble(
            identity(),
            AccessDecision { allowed: true },
            Some(SupplementalContext {
                summary: "some chat info".into(),
            }),
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "user": { "id": "123", "name": "Name" },
                "permissions": { "allowed": true },
                "context": { "summary": "some chat info" }
            })
        );
    }

    #[test]
    fn test_context_field_omitted_when_absent() {
        let response = AggregatedResponse::assemble(identity(), AccessDecision { allowed: false }, None);
        let value = serde_json::to_value(&response).unwrap();

        assert!(response.is_degraded());
        assert!(value.get("context").is_none());
        assert_eq!(value["permissions"]["allowed"], json!(false));
    }
}
