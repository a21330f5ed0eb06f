// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while transforming a single Firehose record
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Record data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Record payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload field `{0}` is missing or has an unexpected type")]
    Shape(&'static str),
}

impl TransformError {
    /// True for failures to decode the raw bytes, as opposed to a well-formed payload of the
    /// wrong shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, TransformError::Base64(_) | TransformError::Json(_))
    }
}

/// Errors raised while loading configuration at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}
