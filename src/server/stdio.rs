//! Line-delimited stdin/stdout loop.
//!
//! Stdout carries protocol frames only; all logging goes to stderr.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::server::protocol::handle_line;
use crate::server::tools::ToolHost;
use crate::transport::Transport;

/// Serve requests until stdin closes.
pub async fn serve_stdio<T: Transport>(host: &ToolHost<T>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(response) = handle_line(host, &line).await else {
            continue;
        };
        let mut frame = serde_json::to_vec(&response)?;
        frame.push(b'\n');
        stdout.write_all(&frame).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
