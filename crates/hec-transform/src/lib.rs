// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Kinesis Data Firehose record transformation for Splunk HTTP Event Collector delivery.
//!
//! Each Firehose record carries a base64-encoded JSON payload: either a device metrics export
//! (`{"metrics": [...]}`) or an audit notification envelope whose `Message` holds
//! `{"auditDetails": [...]}`. Every element of those arrays becomes its own
//! `{"sourcetype": .., "event": ..}` HEC event, and the events of one record are re-encoded
//! back-to-back into the matching output record.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod error;
pub mod hec;
pub mod payload;
pub mod record;
pub mod transformer;

pub use config::{Config, FailurePolicy};
pub use error::{ConfigError, TransformError};
pub use record::{InputBatch, InputRecord, OutputBatch, OutputRecord, RecordResult};
pub use transformer::{transform, transform_batch, BatchSummary};
