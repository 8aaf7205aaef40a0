//! Handler process entry point.
//!
//! # Responsibility
//! - Read configuration and establish the shared store connection once.
//! - Serve one voice request per stdin line until input closes.
//!
//! # Invariants
//! - Startup failures (configuration, store) abort with a non-zero exit code.
//! - Per-request failures are answered with an error envelope; serving continues.

mod envelope;

use envelope::{ErrorEnvelope, RequestEnvelope, ResponseEnvelope};
use log::{error, info};
use recipe_voice_core::{
    core_version, init_from_config, ConnectionHolder, Database, HandlerConfig, IntentDispatcher,
    InvocationContext,
};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

static CONNECTION: ConnectionHolder = ConnectionHolder::new();

fn main() -> ExitCode {
    let config = match HandlerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("recipe_voice_handler: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_from_config(&config) {
        eprintln!("recipe_voice_handler: logging disabled: {err}");
    }

    let database = match CONNECTION.get_or_connect(&config.store) {
        Ok(database) => database,
        Err(err) => {
            error!("event=handler_start module=handler status=error error_code=store_connect_failed error={err}");
            eprintln!("recipe_voice_handler: cannot connect to store: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=handler_ready module=handler status=ok version={} database={} session_id={}",
        core_version(),
        database.name(),
        database.session_id()
    );

    match serve(database, config.request_timeout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=handler_io module=handler status=error error={err}");
            eprintln!("recipe_voice_handler: {err}");
            ExitCode::FAILURE
        }
    }
}

fn serve(database: Arc<Database>, request_timeout: Duration) -> io::Result<()> {
    let dispatcher = IntentDispatcher::new(database);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<RequestEnvelope>(&line) {
            Ok(envelope) => {
                let ctx = InvocationContext::with_timeout(request_timeout);
                match dispatcher.dispatch(&ctx, &envelope.into_request()) {
                    Ok(response) => encode(&ResponseEnvelope::from(response)),
                    Err(err) => encode(&ErrorEnvelope::from(&err)),
                }
            }
            Err(err) => encode(&ErrorEnvelope::new(
                "invalid_envelope",
                format!("cannot decode request: {err}"),
            )),
        };

        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }

    Ok(())
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        serde_json::json!({"error": {"code": "encode_failed", "message": err.to_string()}})
            .to_string()
    })
}
