//! Stdio transport
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Each request runs as its own task, so responses may be written out of
//! order; the `id` is what correlates them. End of input stops reading but
//! lets in-flight calls finish (each is still bounded by the executor
//! timeout). Only `shutdown` cancels them.

use rhmcp_application::{CallContext, Dispatcher};
use rhmcp_domain::JsonRpcResponse;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct StdioServer {
    dispatcher: Dispatcher,
}

impl StdioServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve the process's stdin/stdout until EOF or `shutdown`.
    pub async fn run(&self, shutdown: CancellationToken) -> io::Result<()> {
        info!("Serving MCP over stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), shutdown)
            .await
    }

    /// Serve an arbitrary line source and sink.
    pub async fn serve<R, W>(&self, reader: R, writer: W, shutdown: CancellationToken) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer = Arc::new(Mutex::new(writer));
        let mut lines = reader.lines();
        let mut tasks = JoinSet::new();

        loop {
            let line = tokio::select! {
                _ = shutdown.cancelled() => break,
                line = lines.next_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let dispatcher = self.dispatcher.clone();
            let ctx = CallContext::new(shutdown.child_token());
            let writer = writer.clone();
            tasks.spawn(async move {
                if let Some(response) = dispatcher.handle_frame(&line, &ctx).await
                    && let Err(e) = write_response(&writer, &response).await
                {
                    warn!("Failed to write response: {}", e);
                }
            });

            // Reap finished tasks so the set does not grow without bound.
            while tasks.try_join_next().is_some() {}
        }

        // Call tokens are children of `shutdown`, so a shutdown during the
        // drain still cancels whatever is left.
        while tasks.join_next().await.is_some() {}
        writer.lock().await.flush().await
    }
}

async fn write_response<W>(writer: &Mutex<W>, response: &JsonRpcResponse) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response).map_err(io::Error::other)?;
    line.push('\n');

    let mut writer = writer.lock().await;
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::{EchoExecutor, dispatcher};
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn run_lines(server: &StdioServer, input: &str) -> Vec<Value> {
        let (client, server_end) = tokio::io::duplex(64 * 1024);
        server
            .serve(input.as_bytes(), server_end, CancellationToken::new())
            .await
            .unwrap();

        let mut output = String::new();
        let mut reader = BufReader::new(client);
        while reader.read_line(&mut output).await.unwrap() > 0 {}
        output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_request() {
        let server = StdioServer::new(dispatcher(EchoExecutor::instant(), true));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );

        let mut responses = run_lines(&server, input).await;
        responses.sort_by_key(|r| r["id"].as_i64());

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "robinhood-mcp");
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_garbage_line_gets_parse_error() {
        let server = StdioServer::new(dispatcher(EchoExecutor::instant(), true));
        let responses = run_lines(&server, "{not json\n").await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_tool_call_result_is_written() {
        let server = StdioServer::new(dispatcher(EchoExecutor::instant(), true));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/execute","params":{"name":"getAccount","arguments":{}}}"#,
            "\n",
        );

        let responses = run_lines(&server, input).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "a");
        assert_eq!(responses[0]["result"]["argv"], json!(["account", "get_account"]));
    }

    #[tokio::test]
    async fn test_eof_lets_in_flight_calls_finish() {
        let server = StdioServer::new(dispatcher(
            EchoExecutor::delayed(Duration::from_millis(200)),
            true,
        ));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/execute","params":{"name":"getAccount"}}"#,
            "\n",
        );

        let responses = run_lines(&server, input).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["result"]["argv"], json!(["account", "get_account"]));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_calls() {
        let server = StdioServer::new(dispatcher(
            EchoExecutor::delayed(Duration::from_secs(30)),
            true,
        ));
        let (mut input, input_end) = tokio::io::duplex(4096);
        let (output, output_end) = tokio::io::duplex(64 * 1024);
        input
            .write_all(
                concat!(
                    r#"{"jsonrpc":"2.0","id":8,"method":"tools/execute","params":{"name":"getAccount"}}"#,
                    "\n",
                )
                .as_bytes(),
            )
            .await
            .unwrap();

        let shutdown = CancellationToken::new();
        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                shutdown.cancel();
            }
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            server.serve(BufReader::new(input_end), output_end, shutdown),
        )
        .await
        .expect("server should stop promptly on shutdown")
        .unwrap();
        drop(input);

        let mut line = String::new();
        BufReader::new(output).read_line(&mut line).await.unwrap();
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["id"], 8);
        assert_eq!(response["error"]["data"]["kind"], "cancelled");
    }
}
