//! Line protocol that drives the switch the way a smart-home bridge does.
//!
//! One command per line on stdin: `on`, `off`, `status`, `quit`. `on` and
//! `off` return immediately; `status` prints `on`, `off` or `error: ...`.
//! Requests still running when the bridge stops are drained by the caller.

use std::future::Future;

use anyhow::{Context, Result};
use radio_core::{RadioSwitch, TaskSpawner};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeCommand {
    On,
    Off,
    Status,
    Quit,
}

impl BridgeCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "status" => Some(Self::Status),
            "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Serves commands from stdin until EOF, `quit`, or `shutdown` resolves.
pub async fn run<S: TaskSpawner>(switch: RadioSwitch<S>, shutdown: impl Future<Output = ()>) -> Result<()> {
    log::info!(
        "Bridge ready for {:?}: on | off | status | quit",
        switch.name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = &mut shutdown => {
                log::info!("Shutdown signal received");
                break;
            }
        };

        let Some(line) = line else {
            log::info!("Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match BridgeCommand::parse(&line) {
            Some(BridgeCommand::On) => switch.set_on(true),
            Some(BridgeCommand::Off) => switch.set_on(false),
            Some(BridgeCommand::Status) => match switch.query_on_state().await {
                Ok(on) => println!("{}", if on { "on" } else { "off" }),
                Err(e) => println!("error: {}", e),
            },
            Some(BridgeCommand::Quit) => break,
            None => println!("error: unknown command {:?}", line.trim()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_trimmed_and_case_insensitive() {
        assert_eq!(BridgeCommand::parse("on"), Some(BridgeCommand::On));
        assert_eq!(BridgeCommand::parse("  OFF\r"), Some(BridgeCommand::Off));
        assert_eq!(BridgeCommand::parse("Status"), Some(BridgeCommand::Status));
        assert_eq!(BridgeCommand::parse("exit"), Some(BridgeCommand::Quit));
        assert_eq!(BridgeCommand::parse("louder"), None);
    }
}
