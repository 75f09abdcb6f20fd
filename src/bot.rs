use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use crate::core::{client::Client, context::Ctx, driver::Driver};

const CHANNEL_CAPACITY: usize = 100;

/// Runs a [`Client`] on top of a [`Driver`].
pub struct AyiouBot {
    client: Arc<Client>,
}

impl AyiouBot {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> Arc<Client> {
        self.client.clone()
    }

    /// Drive the event loop until the driver stops producing input.
    ///
    /// Each invocation runs in its own task; in-flight invocations are
    /// awaited before the driver is allowed to finish.
    pub async fn run<D: Driver>(self, driver: D) -> Result<()> {
        let (inbound_tx, mut inbound_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let driver_task = tokio::spawn(Box::new(driver).run(inbound_tx, outbound_rx));
        info!(
            "Ayiou is running with {} commands",
            self.client.command_count()
        );

        let mut tasks = JoinSet::new();
        while let Some(line) = inbound_rx.recv().await {
            let Some(ctx) = Ctx::parse(&line, self.client.prefixes(), outbound_tx.clone()) else {
                debug!("Ignoring non-command input: {}", line);
                continue;
            };

            let client = self.client.clone();
            tasks.spawn(async move {
                let name = ctx.invoked_name().to_string();
                if let Err(err) = client.dispatch(ctx).await {
                    error!("Command '{}' failed: {:#}", name, err);
                }
            });

            // reap finished invocations without waiting
            while let Some(result) = tasks.try_join_next() {
                log_task_failure(result);
            }
        }

        while let Some(result) = tasks.join_next().await {
            log_task_failure(result);
        }
        drop(outbound_tx);

        driver_task.await??;
        info!("Ayiou is shutting down.");
        Ok(())
    }
}

/// Invocations that panicked or were cancelled never reach the dispatch log.
fn log_task_failure(result: Result<(), JoinError>) {
    if let Err(err) = result {
        error!("Command task failed: {}", err);
    }
}
