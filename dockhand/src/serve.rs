//! JSON-lines request loop over stdio.
//!
//! One request per line: `{"tool": "lint", "arguments": {...}}`. Each request
//! yields exactly one response line `{"text": "..."}`. Blank lines are skipped.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dispatch::Dispatcher;
use crate::io::environment::EnvironmentCheck;
use crate::io::executor::CommandExecutor;
use crate::io::gh::HostingCli;

#[derive(Debug, Deserialize)]
pub struct Request {
    pub tool: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub text: String,
}

/// Serve requests until EOF. Returns the number of requests answered.
pub fn serve<V, E, H, R, W>(
    dispatcher: &Dispatcher<V, E, H>,
    mut input: R,
    mut output: W,
) -> Result<usize>
where
    V: EnvironmentCheck,
    E: CommandExecutor,
    H: HostingCli,
    R: BufRead,
    W: Write,
{
    let mut answered = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input
            .read_until(b'\n', &mut buf)
            .context("read request line")?
            == 0
        {
            break;
        }
        let text = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => respond(dispatcher, line),
            Err(err) => {
                warn!(err = %err, "request line is not utf-8");
                format!("❌ Malformed request: {err}")
            }
        };
        let mut payload =
            serde_json::to_string(&Response { text }).context("serialize response")?;
        payload.push('\n');
        output
            .write_all(payload.as_bytes())
            .context("write response")?;
        output.flush().context("flush response")?;
        answered += 1;
    }
    Ok(answered)
}

fn respond<V, E, H>(dispatcher: &Dispatcher<V, E, H>, line: &str) -> String
where
    V: EnvironmentCheck,
    E: CommandExecutor,
    H: HostingCli,
{
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(tool = %request.tool, "request");
            dispatcher.handle_request(&request.tool, &request.arguments)
        }
        Err(err) => {
            warn!(err = %err, "malformed request line");
            format!("❌ Malformed request: {err}")
        }
    }
}
