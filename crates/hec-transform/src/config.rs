// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::env;
use std::str::FromStr;

const SOURCE_TYPE_VAR: &str = "SPLUNK_SOURCE_TYPE";
const AUDIT_TOPIC_VAR: &str = "AUDIT_SNS_TOPIC_ARN";
const FAILURE_POLICY_VAR: &str = "TRANSFORM_FAILURE_POLICY";
const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// What happens to the rest of a batch when one record cannot be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Mark the failing record `ProcessingFailed` and carry on with its siblings.
    #[default]
    Isolate,
    /// Stop at the first failure and return only the records transformed before it.
    AbortBatch,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "abort" => Ok(FailurePolicy::AbortBatch),
            _ => Err(ConfigError::InvalidValue {
                name: FAILURE_POLICY_VAR,
                value: s.to_string(),
            }),
        }
    }
}

/// Transformer configuration, loaded once at process start
#[derive(Debug, Clone)]
pub struct Config {
    /// Value stamped into the `sourcetype` field of every HEC event
    pub source_type: String,
    /// Topic whose notification envelopes carry audit results; audit support is off when unset
    pub audit_topic_arn: Option<String>,
    pub failure_policy: FailurePolicy,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    pub fn new(source_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            audit_topic_arn: None,
            failure_policy: FailurePolicy::default(),
            log_level: "info".to_string(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let source_type = env::var(SOURCE_TYPE_VAR)
            .ok()
            .filter(|val| !val.trim().is_empty())
            .ok_or(ConfigError::Missing(SOURCE_TYPE_VAR))?;

        let audit_topic_arn = env::var(AUDIT_TOPIC_VAR)
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());

        let failure_policy = match env::var(FAILURE_POLICY_VAR) {
            Ok(val) => val.parse::<FailurePolicy>()?,
            Err(_) => FailurePolicy::default(),
        };

        let log_level = env::var(LOG_LEVEL_VAR)
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            source_type,
            audit_topic_arn,
            failure_policy,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn audit_enabled(&self) -> bool {
        self.audit_topic_arn.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_type.trim().is_empty() {
            return Err(ConfigError::Missing(SOURCE_TYPE_VAR));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                name: LOG_LEVEL_VAR,
                value: self.log_level.clone(),
            });
        }

        Ok(())
    }
}
