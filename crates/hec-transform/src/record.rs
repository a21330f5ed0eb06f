// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Request and response shapes of the Kinesis Data Firehose record transformation contract.

use serde::{Deserialize, Serialize};

/// One invocation's worth of records handed over by the delivery stream.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<InputRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub record_id: String,
    /// Base64 text, decoded per record so one bad record can't reject the whole batch
    pub data: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OutputBatch {
    pub records: Vec<OutputRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub record_id: String,
    pub result: RecordResult,
    pub data: String,
}

impl OutputRecord {
    pub fn ok(record_id: &str, data: String) -> Self {
        Self {
            record_id: record_id.to_string(),
            result: RecordResult::Ok,
            data,
        }
    }

    /// Echoes the untouched source data back so the stream can route it to its error output.
    pub fn failed(input: &InputRecord) -> Self {
        Self {
            record_id: input.record_id.clone(),
            result: RecordResult::ProcessingFailed,
            data: input.data.clone(),
        }
    }
}
