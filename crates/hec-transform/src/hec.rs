// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Splunk HTTP Event Collector event encoding.
//!
//! HEC accepts several events in one request body as back-to-back JSON objects with no
//! separator and no enclosing array, so that is exactly what gets written here.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct HecEvent<'a> {
    pub sourcetype: &'a str,
    pub event: &'a Value,
}

/// Serializes each event as `{"sourcetype":..,"event":..}` and concatenates them.
pub fn encode_events(source_type: &str, events: &[Value]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    for event in events {
        serde_json::to_writer(
            &mut buf,
            &HecEvent {
                sourcetype: source_type,
                event,
            },
        )?;
    }
    Ok(buf)
}
