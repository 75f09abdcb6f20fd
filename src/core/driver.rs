use tokio::sync::mpsc;

use crate::core::message::Reply;

/// Driver trait for transport layer abstraction.
///
/// Implementors own the transport only: they push raw inbound lines into
/// `inbound_tx` and deliver every reply arriving on `outbound_rx`. A driver
/// returns once its input is exhausted and `outbound_rx` has been drained.
#[async_trait::async_trait]
pub trait Driver: Send + 'static {
    async fn run(
        self: Box<Self>,
        inbound_tx: mpsc::Sender<String>,
        outbound_rx: mpsc::Receiver<Reply>,
    ) -> anyhow::Result<()>;
}
