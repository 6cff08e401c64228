//! Pinboard RPC Server: JSON-RPC over stdin/stdout for a desktop or web front end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"service.add", "params":{"name":"...","url":"...","categories":["..."]}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! `metadata.fetch` additionally carries the HTTP-style `status` of the fetch.
//! Logs go to stderr; stdout carries only protocol lines.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinboard::app::App;
use pinboard::rpc_handler::{handle_fetch_metadata, handle_method};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// `PINBOARD_DATA_DIR`, else the executable's directory, else the working directory.
fn database_path() -> PathBuf {
    if let Ok(dir) = std::env::var("PINBOARD_DATA_DIR") {
        PathBuf::from(dir).join("pinboard.db")
    } else if let Ok(exe) = std::env::current_exe() {
        exe.parent()
            .map(|p| p.join("pinboard.db"))
            .unwrap_or_else(|| PathBuf::from("pinboard.db"))
    } else {
        PathBuf::from("pinboard.db")
    }
}

async fn write_line(stdout: &mut tokio::io::Stdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pinboard=info,pinboard_rpc=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let db_path = database_path();
    tracing::info!(path = %db_path.display(), "opening pinboard database");
    let app = Mutex::new(App::new(&db_path.to_string_lossy())?);

    let mut stdout = tokio::io::stdout();
    write_line(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed request");
                write_line(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            write_line(&mut stdout, &json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = if method == "metadata.fetch" {
            // Clone the fetcher so the app lock is not held across the request.
            let fetcher = app.lock().map(|a| a.metadata_fetcher.clone()).map_err(|e| e.to_string());
            let fetcher = match fetcher {
                Ok(fetcher) => fetcher,
                Err(err) => {
                    write_line(&mut stdout, &json!({"id": id, "error": err})).await?;
                    continue;
                }
            };
            match handle_fetch_metadata(&fetcher, &params).await {
                (200, body) => json!({"id": id, "status": 200, "result": body}),
                (status, body) => json!({"id": id, "status": status, "error": body["error"]}),
            }
        } else {
            match handle_method(&app, method, &params) {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => {
                    tracing::debug!(method, error = %err, "rpc call failed");
                    json!({"id": id, "error": err})
                }
            }
        };
        write_line(&mut stdout, &response).await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
