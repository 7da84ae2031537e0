//! Chat command implementations (chat, quick)

use anyhow::{Context, Result};
use pitstop_core::chat::{ActionKind, ChatResponse};
use pitstop_core::IntentRouter;

use super::{render_json, Session};

fn render_response(response: &ChatResponse, json: bool) -> Result<String> {
    if json {
        return render_json(response);
    }

    let mut out = format!("💬 {}\n", response.message);
    for action in &response.auto_actions {
        out.push_str(&format!("\n   ✅ {} (apply: {})", action.label, action.id));
    }
    if !response.actions.is_empty() {
        out.push('\n');
        for action in &response.actions {
            let marker = match action.kind {
                ActionKind::Update => "✏️ ",
                ActionKind::Query => "❓",
                ActionKind::Navigate => "➡️ ",
            };
            out.push_str(&format!("\n   {} {} [{}]", marker, action.label, action.id));
        }
    }
    Ok(out)
}

pub fn cmd_chat(session: &Session, utterance: &[String], json: bool) -> Result<String> {
    let router = IntentRouter::new(&session.config).context("Failed to build intent rules")?;
    let response = router.respond(&session.context(), &utterance.join(" "));
    render_response(&response, json)
}

pub fn cmd_quick(session: &Session, action: &str, json: bool) -> Result<String> {
    let router = IntentRouter::new(&session.config).context("Failed to build intent rules")?;
    let response = router.quick_action(&session.context(), action);
    render_response(&response, json)
}
