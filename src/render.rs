//! Plain-text rendering of supervisor updates for the terminal.

use serde_json::Value;

use crate::agents::AgentUpdate;
use crate::llm::ChatMessage;

const TITLE_WIDTH: usize = 80;

/// `==== Ai Message ====` style banner, centered to a fixed width.
fn title_banner(title: &str) -> String {
    let title = format!(" {} ", title);
    let pad = TITLE_WIDTH.saturating_sub(title.len()) / 2;
    let left = "=".repeat(pad);
    let right = if title.len() % 2 == 1 {
        format!("{}=", left)
    } else {
        left.clone()
    };
    format!("{}{}{}", left, title, right)
}

fn format_args(arguments: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("    {}: {}", key, s),
                other => format!("    {}: {}", key, other),
            })
            .collect(),
        _ if arguments.trim().is_empty() => Vec::new(),
        _ => vec![format!("    {}", arguments)],
    }
}

/// Human-readable form of one message.
pub fn render_message(message: &ChatMessage) -> String {
    let mut out = title_banner(&format!("{} Message", message.role));
    if let Some(name) = &message.name {
        out.push_str(&format!("\nName: {}", name));
    }
    out.push_str("\n\n");
    out.push_str(message.text_content().unwrap_or_default());

    let calls = message.requested_calls();
    if !calls.is_empty() {
        let mut out = out.trim_end().to_string();
        out.push_str("\nTool Calls:");
        for call in calls {
            out.push_str(&format!("\n  {} ({})", call.function.name, call.id));
            out.push_str(&format!("\n Call ID: {}", call.id));
            out.push_str("\n  Args:");
            for line in format_args(&call.function.arguments) {
                out.push('\n');
                out.push_str(&line);
            }
        }
        return out;
    }
    out
}

/// Render one node update: a header, then the node's messages (only the last
/// one with `last_message_only`).
pub fn render_update(update: &AgentUpdate, last_message_only: bool) -> String {
    let messages = if last_message_only {
        let start = update.messages.len().saturating_sub(1);
        &update.messages[start..]
    } else {
        &update.messages[..]
    };

    let mut out = format!("Update from node {}:\n\n\n", update.node);
    for message in messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out.push_str("\n\n");
    out
}
