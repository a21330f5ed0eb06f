// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use hec_transform::{transform, Config, InputBatch, OutputBatch};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            // No subscriber yet, so this goes straight to stderr for CloudWatch.
            eprintln!("Error loading transformer configuration: {e}");
            return Err(e.into());
        }
    };

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", config.log_level);

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_new(env_filter).map_err(|e| {
            anyhow::anyhow!("could not parse log level in configuration: {e}")
        })?)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {e}"))?;

    debug!("Logging subsystem enabled");
    info!(
        "Starting record transformer with sourcetype {} (audit payloads {}, failure policy {:?})",
        config.source_type,
        if config.audit_enabled() {
            "enabled"
        } else {
            "disabled"
        },
        config.failure_policy
    );

    let res = run(service_fn(move |event: LambdaEvent<InputBatch>| {
        let config = Arc::clone(&config);
        async move { Ok::<OutputBatch, Error>(transform(&event.payload, &config)) }
    }))
    .await;

    if let Err(e) = &res {
        error!("Lambda runtime exited with an error: {e}");
    }
    res
}
