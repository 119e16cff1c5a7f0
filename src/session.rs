//! The interview session record and its state machine vocabulary.
//!
//! A [`Session`] is the unit of one interview run. It is mutated exclusively
//! by the engine and persisted as a whole by the checkpoint store, so every
//! field the engine needs to resume — counters, transcript, limits, the
//! pending question — lives here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow states of the interview engine.
///
/// `AskingPrimary` is the initial state on session creation; `Done` is
/// terminal. A checkpointed session is only ever observed in
/// `AwaitingAnswer` (suspended on a pending question) or `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    AskingPrimary,
    AskingFollowup,
    AwaitingAnswer,
    Judging,
    Done,
}

/// One line of the interview transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Question,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

impl TranscriptLine {
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Question,
            text: text.into(),
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Answer,
            text: text.into(),
        }
    }

    /// Render as the `QUESTION: ...` / `ANSWER: ...` form fed into prompts.
    pub fn render(&self) -> String {
        match self.kind {
            LineKind::Question => format!("QUESTION: {}", self.text),
            LineKind::Answer => format!("ANSWER: {}", self.text),
        }
    }
}

fn render_lines(lines: &[TranscriptLine]) -> String {
    lines
        .iter()
        .map(TranscriptLine::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// State of one interview run, checkpointed between suspension points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub role: String,
    pub resume_context: String,
    /// Number of primary questions to ask before judging.
    pub max_questions: u32,
    /// Number of follow-ups to ask per primary question.
    pub max_followups: u32,
    pub state: EngineState,
    /// Full ordered history of the interview; append-only.
    pub transcript: Vec<TranscriptLine>,
    /// Lines belonging to the current primary question and its follow-ups
    /// only; reset whenever a new primary question is asked.
    pub current_thread: Vec<TranscriptLine>,
    pub questions_asked: u32,
    /// Follow-ups issued for the current primary question.
    pub followups_asked: u32,
    /// The question currently awaiting a human answer, if suspended.
    pub pending_question: Option<String>,
    /// The final judgement; set exactly once, in the terminal state.
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        resume_context: impl Into<String>,
        max_questions: u32,
        max_followups: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            role: role.into(),
            resume_context: resume_context.into(),
            max_questions,
            max_followups,
            state: EngineState::AskingPrimary,
            transcript: Vec::new(),
            current_thread: Vec::new(),
            questions_asked: 0,
            followups_asked: 0,
            pending_question: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == EngineState::Done
    }

    /// Record a freshly generated primary question and suspend on it.
    ///
    /// Starts a new question thread, bumps the primary counter, and resets
    /// the follow-up counter for the new thread.
    pub fn record_primary_question(&mut self, question: impl Into<String>) {
        let question = question.into();
        let line = TranscriptLine::question(question.clone());
        self.transcript.push(line.clone());
        self.current_thread = vec![line];
        self.questions_asked += 1;
        self.followups_asked = 0;
        self.pending_question = Some(question);
        self.state = EngineState::AwaitingAnswer;
        self.touch();
    }

    /// Record a freshly generated follow-up question and suspend on it.
    pub fn record_followup_question(&mut self, question: impl Into<String>) {
        let question = question.into();
        let line = TranscriptLine::question(question.clone());
        self.transcript.push(line.clone());
        self.current_thread.push(line);
        self.followups_asked += 1;
        self.pending_question = Some(question);
        self.state = EngineState::AwaitingAnswer;
        self.touch();
    }

    /// Record the human's answer to the pending question.
    pub fn record_answer(&mut self, answer: impl Into<String>) {
        let line = TranscriptLine::answer(answer);
        self.transcript.push(line.clone());
        self.current_thread.push(line);
        self.pending_question = None;
        self.touch();
    }

    /// Record the final judgement and move to the terminal state.
    pub fn finish(&mut self, judgement: impl Into<String>) {
        self.result = Some(judgement.into());
        self.pending_question = None;
        self.state = EngineState::Done;
        self.touch();
    }

    /// The full transcript rendered for prompt context.
    pub fn history_text(&self) -> String {
        render_lines(&self.transcript)
    }

    /// The current question thread rendered for follow-up prompt context.
    pub fn thread_text(&self) -> String {
        render_lines(&self.current_thread)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
