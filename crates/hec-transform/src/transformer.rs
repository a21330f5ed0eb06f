// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, error, info, warn};

use crate::config::{Config, FailurePolicy};
use crate::error::TransformError;
use crate::hec::encode_events;
use crate::payload::Payload;
use crate::record::{InputBatch, InputRecord, OutputBatch, OutputRecord};

#[derive(Debug)]
pub struct TransformedRecord {
    pub record: OutputRecord,
    /// Number of HEC events encoded into `record.data`
    pub events: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Output records produced, failed ones included
    pub records: usize,
    pub events: usize,
    pub failed: usize,
    /// Set when `FailurePolicy::AbortBatch` cut the batch short
    pub aborted: bool,
}

/// Decodes one record, flattens its sub-events into HEC events and re-encodes them.
pub fn transform_record(
    input: &InputRecord,
    config: &Config,
) -> Result<TransformedRecord, TransformError> {
    let payload = Payload::decode(&input.data, config.audit_topic_arn.as_deref())?;
    if let Payload::Unrecognized(reason) = &payload {
        debug!(
            "Record {} has an unrecognized payload ({reason:?}), emitting no events",
            input.record_id
        );
    }

    let events = payload.events();
    let encoded = encode_events(&config.source_type, events)?;
    debug!(
        "Record {} encoded {} event(s): {}",
        input.record_id,
        events.len(),
        String::from_utf8_lossy(&encoded)
    );

    Ok(TransformedRecord {
        record: OutputRecord::ok(&input.record_id, STANDARD.encode(&encoded)),
        events: events.len(),
    })
}

/// Transforms every record of a batch, one output record per input record unless the batch
/// is aborted.
pub fn transform(batch: &InputBatch, config: &Config) -> OutputBatch {
    transform_batch(batch, config).0
}

pub fn transform_batch(batch: &InputBatch, config: &Config) -> (OutputBatch, BatchSummary) {
    let total = batch.records.len();
    match &batch.invocation_id {
        Some(invocation_id) => {
            info!("{total} record(s) available for processing in invocation {invocation_id}")
        }
        None => info!("{total} record(s) available for processing"),
    }

    let mut records = Vec::with_capacity(total);
    let mut summary = BatchSummary::default();

    for (index, input) in batch.records.iter().enumerate() {
        match transform_record(input, config) {
            Ok(transformed) => {
                summary.events += transformed.events;
                records.push(transformed.record);
            }
            Err(e) => match config.failure_policy {
                FailurePolicy::AbortBatch => {
                    error!(
                        "Error encountered transforming record {}: {e}. Abandoning it and {} remaining record(s)",
                        input.record_id,
                        total - index - 1
                    );
                    summary.records = records.len();
                    summary.aborted = true;
                    return (OutputBatch { records }, summary);
                }
                FailurePolicy::Isolate => {
                    warn!(
                        "Error encountered transforming record {}: {e}. Marking it ProcessingFailed",
                        input.record_id
                    );
                    summary.failed += 1;
                    records.push(OutputRecord::failed(input));
                }
            },
        }
    }

    summary.records = records.len();
    if summary.failed == 0 {
        info!(
            "Successfully transformed {} record(s) containing {} events",
            summary.records, summary.events
        );
    } else {
        error!(
            "Transformed {} of {} record(s) containing {} events, {} record(s) failed processing",
            summary.records - summary.failed,
            summary.records,
            summary.events,
            summary.failed
        );
    }

    (OutputBatch { records }, summary)
}
