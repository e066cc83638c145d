//! Terminal host for a query session.
//!
//! Reads user lines, routes slash commands to the controller's toggles and
//! disconnect, and prints each assistant reply as it lands in the transcript.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use talkql_client::QueryService;
use talkql_core::{ConnectionInfo, Role, TranscriptEntry};
use talkql_session::{NavigationPort, QuerySessionController};

/// Placeholder prompt shown until the first message is sent.
pub const WELCOME: &str =
    "Start by asking a question about your tables or request a quick visualization.";

const HELP: &str = "\
Commands:
  /viz on|off     request chart output with each answer
  /table on|off   render results as tables
  /disconnect     disconnect the database and leave
  /help           show this help
  /quit           leave without disconnecting";

/// Navigation port for the terminal: leaving ends the input loop.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    left: AtomicBool,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_left(&self) -> bool {
        self.left.load(Ordering::SeqCst)
    }
}

impl NavigationPort for TerminalNavigator {
    fn leave_session(&self) {
        tracing::info!("Leaving session");
        self.left.store(true, Ordering::SeqCst);
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Visualization(bool),
    Tabular(bool),
    Disconnect,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if !line.starts_with('/') {
        return Command::Send(line.to_string());
    }

    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("/viz", Some(value)) => parse_switch(value).map_or_else(
            || Command::Unknown(line.to_string()),
            Command::Visualization,
        ),
        ("/table", Some(value)) => {
            parse_switch(value).map_or_else(|| Command::Unknown(line.to_string()), Command::Tabular)
        }
        ("/disconnect", None) => Command::Disconnect,
        ("/help", None) => Command::Help,
        ("/quit", None) | ("/exit", None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Banner naming the connected source.
pub fn render_header(info: &ConnectionInfo) -> String {
    format!("[{}] Connected: {}", info.badge(), info.source_name)
}

/// Render one transcript entry for the terminal.
pub fn render_entry(entry: &TranscriptEntry) -> String {
    match entry.role {
        Role::User => format!("you> {}", entry.content),
        Role::Assistant => {
            let mut tags = Vec::new();
            if entry.tabular_mode_was_enabled == Some(true) {
                tags.push("table");
            }
            if entry.shows_visualization() {
                tags.push("chart");
            }
            let mut out = if tags.is_empty() {
                format!("talkql> {}", entry.content)
            } else {
                format!("talkql [{}]> {}", tags.join(", "), entry.content)
            };
            if let (true, Some(payload)) = (entry.shows_visualization(), &entry.visualization_payload)
            {
                let pretty =
                    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
                out.push_str("\n--- visualization ---\n");
                out.push_str(&pretty);
            }
            out
        }
    }
}

/// Run the input loop until input ends, the user quits, or the session asks
/// to leave.
pub async fn run<S, R, W>(
    controller: &mut QuerySessionController<S, TerminalNavigator>,
    navigator: &TerminalNavigator,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: QueryService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Some(info) = controller.connection() {
        writeln!(out, "{}", render_header(info))?;
    }
    if controller.shows_welcome() {
        writeln!(out, "{}", WELCOME)?;
    }

    let mut lines = input.lines();
    while !navigator.has_left() {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Send(text) => {
                let before = controller.transcript().len();
                writeln!(out, "(querying...)")?;
                if let Err(e) = controller.send_message(&text).await {
                    writeln!(out, "! {}", e)?;
                    continue;
                }
                for entry in &controller.transcript()[before..] {
                    if entry.role == Role::Assistant {
                        writeln!(out, "{}", render_entry(entry))?;
                    }
                }
            }
            Command::Visualization(on) => {
                controller.set_visualization(on);
                writeln!(out, "visualization {}", if on { "on" } else { "off" })?;
            }
            Command::Tabular(on) => {
                controller.set_tabular_mode(on);
                writeln!(out, "tabular mode {}", if on { "on" } else { "off" })?;
            }
            Command::Disconnect => {
                // Failures are logged by the session and otherwise ignored.
                if controller.disconnect().await.is_ok() {
                    writeln!(out, "Disconnected.")?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(cmd) => writeln!(out, "Unknown command: {} (try /help)", cmd)?,
        }
    }
    Ok(())
}
