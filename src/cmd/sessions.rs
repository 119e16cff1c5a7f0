//! `parley sessions`: list checkpointed interview sessions.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use parley::session::Session;
use parley::store::FileStore;

fn progress_line(session: &Session) -> String {
    if session.is_done() {
        "finished".to_string()
    } else {
        format!(
            "suspended ({}/{} questions, {}/{} follow-ups)",
            session.questions_asked,
            session.max_questions,
            session.followups_asked,
            session.max_followups,
        )
    }
}

pub fn cmd_sessions(state_dir: &Path) -> Result<()> {
    if !state_dir.exists() {
        println!("No sessions found.");
        return Ok(());
    }

    let store =
        FileStore::new(state_dir).context("Failed to open session checkpoint directory")?;
    let sessions = store.list().context("Failed to list sessions")?;

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    for session in sessions {
        println!(
            "{}  {}  {}  {}",
            style(&session.id).dim(),
            style(&session.role).yellow(),
            progress_line(&session),
            session.updated_at.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    Ok(())
}
