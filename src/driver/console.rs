use tokio::io::{self, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::info;

use crate::core::{driver::Driver, message::Reply};

/// Reads commands from stdin and prints replies to stdout.
pub struct ConsoleDriver {
    output_format: String,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self {
            output_format: "\x1b[36m[bot]\x1b[0m {}".to_string(),
        }
    }

    /// `{}` is replaced with the rendered reply.
    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    fn print(&self, reply: &Reply) {
        println!("{}", self.output_format.replace("{}", &reply.render()));
    }
}

impl Default for ConsoleDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Driver for ConsoleDriver {
    async fn run(
        self: Box<Self>,
        inbound_tx: mpsc::Sender<String>,
        mut outbound_rx: mpsc::Receiver<Reply>,
    ) -> anyhow::Result<()> {
        info!("Console driver started. Type a command...");
        let mut lines = io::BufReader::new(io::stdin()).lines();
        let mut inbound_tx = Some(inbound_tx);

        loop {
            tokio::select! {
                line = lines.next_line(), if inbound_tx.is_some() => {
                    match line? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => {
                            let closed = match &inbound_tx {
                                Some(tx) => tx.send(line).await.is_err(),
                                None => true,
                            };
                            if closed {
                                inbound_tx = None;
                            }
                        }
                        // EOF: stop reading, keep flushing replies
                        None => inbound_tx = None,
                    }
                }
                reply = outbound_rx.recv() => match reply {
                    Some(reply) => self.print(&reply),
                    None => break,
                },
            }
        }

        info!("Console driver stopped");
        Ok(())
    }
}
