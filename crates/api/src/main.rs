//! Employee Console - operator console for the AI Employee agent
//!
//! Reads one command per line from stdin. Each command runs on its own task
//! so a slow transition never blocks views or mutations on other targets.

use std::sync::Arc;

use anyhow::Context as _;
use console_lib::utils::logging::init_tracing;
use console_lib::{parse, run_line, AppContext, Command, Outcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = console_infra::config::load().context("failed to load console configuration")?;
    init_tracing(&config.logging).context("failed to initialize logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => info!(error = %e, "No .env loaded"),
    }

    let ctx = Arc::new(AppContext::new(config)?);
    ctx.start().await?;

    let (output, mut rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(text) = rx.recv().await {
            if stdout.write_all(format!("{text}\n").as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let _ = output.send(format!(
        "Connected to {} - type 'help' for commands",
        ctx.config.api.base_url
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                };

                // Quit is handled inline so the loop stops reading at once.
                if is_quit(&line) {
                    break;
                }

                let ctx = Arc::clone(&ctx);
                let output = output.clone();
                in_flight.spawn(async move {
                    if let Outcome::Continue(text) = run_line(&ctx, &line).await {
                        if !text.is_empty() {
                            let _ = output.send(text);
                        }
                    }
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    if !in_flight.is_empty() {
        info!(pending = in_flight.len(), "Waiting for in-flight commands");
        while in_flight.join_next().await.is_some() {}
    }

    ctx.shutdown().await?;
    drop(output);
    let _ = printer.await;

    info!("Console stopped");
    Ok(())
}

fn is_quit(line: &str) -> bool {
    matches!(parse(line), Ok(Some(Command::Quit)))
}
