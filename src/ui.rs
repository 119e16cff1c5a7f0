//! Terminal presentation for the interview loop.
//!
//! Styled question/judgement output via `console`, a spinner over generation
//! calls via `indicatif`, and answer input via `dialoguer`.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct InterviewUI;

impl InterviewUI {
    pub fn new() -> Self {
        Self
    }

    /// Print the session header shown once at interview start.
    pub fn banner(&self, role: &str, session_id: &str) {
        println!("{}", style("Parley interview").bold());
        println!("  Role:    {}", style(role).yellow());
        println!("  Session: {}", style(session_id).dim());
        println!();
    }

    /// Spinner shown while a generation call is in flight.
    ///
    /// The caller finishes the bar once the call returns.
    pub fn thinking(&self, msg: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .expect("progress bar template is a valid static string"),
        );
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    pub fn question(&self, question: &str) {
        println!("{} {}", style("Interviewer:").cyan().bold(), question);
    }

    /// Read one answer line from the candidate. Blank input is allowed here;
    /// the engine rejects it and the caller re-prompts.
    pub fn read_answer(&self) -> anyhow::Result<String> {
        let answer: String = dialoguer::Input::new()
            .with_prompt("Answer")
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    pub fn blank_answer_notice(&self) {
        println!("{}", style("Please give a non-empty answer.").red());
    }

    pub fn judgement(&self, judgement: &str) {
        println!();
        println!("{}", style("Judgement").bold().green());
        println!("{judgement}");
    }
}

impl Default for InterviewUI {
    fn default() -> Self {
        Self::new()
    }
}
