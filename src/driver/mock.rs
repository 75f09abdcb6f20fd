use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::core::{driver::Driver, message::Reply};

/// Replies collected by a [`MockDriver`].
#[derive(Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<Reply>>>);

impl Outbox {
    pub fn replies(&self) -> Vec<Reply> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn push(&self, reply: Reply) {
        self.0.lock().push(reply);
    }
}

/// In-memory driver for tests.
///
/// It pushes predefined inbound lines and records every outbound reply.
pub struct MockDriver {
    inbound: Vec<String>,
    outbox: Outbox,
}

impl MockDriver {
    pub fn new<I, S>(inbound: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbound: inbound.into_iter().map(Into::into).collect(),
            outbox: Outbox::default(),
        }
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }
}

#[async_trait::async_trait]
impl Driver for MockDriver {
    async fn run(
        self: Box<Self>,
        inbound_tx: mpsc::Sender<String>,
        mut outbound_rx: mpsc::Receiver<Reply>,
    ) -> anyhow::Result<()> {
        for line in self.inbound {
            if inbound_tx.send(line).await.is_err() {
                break;
            }
        }
        drop(inbound_tx);

        while let Some(reply) = outbound_rx.recv().await {
            self.outbox.push(reply);
        }
        Ok(())
    }
}
