// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};

use crate::error::TransformError;

const METRICS_FIELD: &str = "metrics";
const TOPIC_ARN_FIELD: &str = "TopicArn";
const MESSAGE_FIELD: &str = "Message";
const AUDIT_DETAILS_FIELD: &str = "auditDetails";

/// A decoded record payload, classified by which fields it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Device metrics export: `{"metrics": [...]}`
    Metrics(Vec<Value>),
    /// Audit results carried in a notification envelope from the configured topic
    Audit(Vec<Value>),
    /// Anything else. Yields an output record with no events.
    Unrecognized(Unrecognized),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unrecognized {
    NotAnObject,
    UnknownShape,
    /// Envelope published to a topic other than the configured audit topic
    ForeignTopic(String),
    /// Envelope received while no audit topic is configured
    AuditDisabled,
}

impl Payload {
    /// Base64-decodes and parses raw record data, then classifies it.
    pub fn decode(data: &str, audit_topic_arn: Option<&str>) -> Result<Self, TransformError> {
        let bytes = STANDARD.decode(data.as_bytes())?;
        let value: Value = serde_json::from_slice(&bytes)?;
        Self::classify(value, audit_topic_arn)
    }

    /// `metrics` wins over `TopicArn` when a payload carries both.
    pub fn classify(value: Value, audit_topic_arn: Option<&str>) -> Result<Self, TransformError> {
        let Value::Object(mut object) = value else {
            return Ok(Payload::Unrecognized(Unrecognized::NotAnObject));
        };

        if let Some(metrics) = object.remove(METRICS_FIELD) {
            return into_array(metrics, METRICS_FIELD).map(Payload::Metrics);
        }

        let Some(topic) = object.get(TOPIC_ARN_FIELD) else {
            return Ok(Payload::Unrecognized(Unrecognized::UnknownShape));
        };

        let Some(expected) = audit_topic_arn else {
            return Ok(Payload::Unrecognized(Unrecognized::AuditDisabled));
        };

        if topic.as_str() != Some(expected) {
            let topic = match topic {
                Value::String(topic) => topic.clone(),
                other => other.to_string(),
            };
            return Ok(Payload::Unrecognized(Unrecognized::ForeignTopic(topic)));
        }

        audit_details(&object).map(Payload::Audit)
    }

    /// The sub-events to emit, in payload order.
    pub fn events(&self) -> &[Value] {
        match self {
            Payload::Metrics(events) | Payload::Audit(events) => events,
            Payload::Unrecognized(_) => &[],
        }
    }
}

fn audit_details(envelope: &Map<String, Value>) -> Result<Vec<Value>, TransformError> {
    let message = envelope
        .get(MESSAGE_FIELD)
        .and_then(Value::as_str)
        .ok_or(TransformError::Shape(MESSAGE_FIELD))?;

    let Value::Object(mut message) = serde_json::from_str::<Value>(message)? else {
        return Err(TransformError::Shape(AUDIT_DETAILS_FIELD));
    };

    let details = message
        .remove(AUDIT_DETAILS_FIELD)
        .ok_or(TransformError::Shape(AUDIT_DETAILS_FIELD))?;
    into_array(details, AUDIT_DETAILS_FIELD)
}

fn into_array(value: Value, field: &'static str) -> Result<Vec<Value>, TransformError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(TransformError::Shape(field)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const AUDIT_TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:device-defender-audit";

    fn envelope(topic: &str, message: &Value) -> Value {
        json!({
            "Type": "Notification",
            "TopicArn": topic,
            "Message": message.to_string(),
        })
    }

    #[test]
    fn test_classify_metrics() {
        let payload = Payload::classify(
            json!({"metrics": [{"name": "aws:num-messages-sent"}, {"name": "aws:num-connections"}]}),
            None,
        )
        .unwrap();
        assert_eq!(
            payload,
            Payload::Metrics(vec![
                json!({"name": "aws:num-messages-sent"}),
                json!({"name": "aws:num-connections"})
            ])
        );
        assert_eq!(payload.events().len(), 2);
    }

    #[test]
    fn test_metrics_take_precedence_over_topic() {
        let payload = Payload::classify(
            json!({"metrics": [], "TopicArn": AUDIT_TOPIC}),
            Some(AUDIT_TOPIC),
        )
        .unwrap();
        assert_eq!(payload, Payload::Metrics(vec![]));
    }

    #[test]
    fn test_metrics_not_an_array() {
        let err = Payload::classify(json!({"metrics": {"a": 1}}), None).unwrap_err();
        assert!(matches!(err, TransformError::Shape("metrics")));
    }

    #[test]
    fn test_classify_audit() {
        let message = json!({
            "taskId": "3b5a8e9c",
            "auditDetails": [
                {"checkName": "LOGGING_DISABLED_CHECK", "checkRunStatus": "COMPLIANT"},
                {"checkName": "CA_CERTIFICATE_EXPIRING_CHECK", "checkRunStatus": "COMPLIANT"}
            ]
        });
        let payload =
            Payload::classify(envelope(AUDIT_TOPIC, &message), Some(AUDIT_TOPIC)).unwrap();
        match payload {
            Payload::Audit(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0]["checkName"], "LOGGING_DISABLED_CHECK");
            }
            other => panic!("expected audit payload, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_topic_is_unrecognized() {
        let message = json!({"auditDetails": [{"checkName": "X"}]});
        let payload = Payload::classify(
            envelope("arn:aws:sns:us-east-1:123456789012:other", &message),
            Some(AUDIT_TOPIC),
        )
        .unwrap();
        assert_eq!(
            payload,
            Payload::Unrecognized(Unrecognized::ForeignTopic(
                "arn:aws:sns:us-east-1:123456789012:other".to_string()
            ))
        );
        assert!(payload.events().is_empty());
    }

    #[test]
    fn test_envelope_without_audit_topic_configured() {
        let message = json!({"auditDetails": [{"checkName": "X"}]});
        let payload = Payload::classify(envelope(AUDIT_TOPIC, &message), None).unwrap();
        assert_eq!(payload, Payload::Unrecognized(Unrecognized::AuditDisabled));
    }

    #[test]
    fn test_non_string_topic_is_foreign() {
        let payload =
            Payload::classify(json!({"TopicArn": 42, "Message": "{}"}), Some(AUDIT_TOPIC))
                .unwrap();
        assert_eq!(
            payload,
            Payload::Unrecognized(Unrecognized::ForeignTopic("42".to_string()))
        );
    }

    #[test]
    fn test_audit_envelope_missing_message() {
        let err =
            Payload::classify(json!({"TopicArn": AUDIT_TOPIC}), Some(AUDIT_TOPIC)).unwrap_err();
        assert!(matches!(err, TransformError::Shape("Message")));
    }

    #[test]
    fn test_audit_message_not_json() {
        let err = Payload::classify(
            json!({"TopicArn": AUDIT_TOPIC, "Message": "not json"}),
            Some(AUDIT_TOPIC),
        )
        .unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_audit_message_missing_details() {
        let err = Payload::classify(
            envelope(AUDIT_TOPIC, &json!({"taskId": "3b5a8e9c"})),
            Some(AUDIT_TOPIC),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::Shape("auditDetails")));
    }

    #[test]
    fn test_unknown_shapes() {
        assert_eq!(
            Payload::classify(json!({"something": "else"}), Some(AUDIT_TOPIC)).unwrap(),
            Payload::Unrecognized(Unrecognized::UnknownShape)
        );
        assert_eq!(
            Payload::classify(json!([1, 2, 3]), None).unwrap(),
            Payload::Unrecognized(Unrecognized::NotAnObject)
        );
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = Payload::decode("not base64!", None).unwrap_err();
        assert!(matches!(err, TransformError::Base64(_)));
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        let data = STANDARD.encode("{\"metrics\": [");
        let err = Payload::decode(&data, None).unwrap_err();
        assert!(matches!(err, TransformError::Json(_)));
    }

    #[test]
    fn test_decode_metrics() {
        let data = STANDARD.encode(r#"{"metrics":[{"a":1}]}"#);
        let payload = Payload::decode(&data, None).unwrap();
        assert_eq!(payload, Payload::Metrics(vec![json!({"a": 1})]));
    }
}
