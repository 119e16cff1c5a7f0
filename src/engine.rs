//! The interview orchestration engine.
//!
//! A finite-state workflow that asks primary questions, probes answers with
//! follow-ups, collects human answers, and renders a final judgement. The
//! engine makes progress only when explicitly invoked: `start` runs until the
//! first question is pending, `answer` consumes exactly one human answer and
//! runs until the next suspension point or the terminal judgement.
//!
//! Suspension is nothing more than returning from the step with the pending
//! question recorded in the session; all live state is externalized to the
//! checkpoint store, so a session can be resumed across process restarts.
//!
//! Commit discipline: a step mutates a working copy of the session and only
//! persists it via `save` after generation succeeds. A failed generation or a
//! failed save leaves the previous checkpoint untouched, so re-invoking the
//! same step is safe.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::errors::EngineError;
use crate::generator::TextGenerator;
use crate::prompts;
use crate::session::{EngineState, Session};
use crate::store::CheckpointStore;

/// Parameters for creating a new interview session.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub session_id: String,
    pub role: String,
    pub resume_context: String,
    pub max_questions: u32,
    pub max_followups: u32,
}

impl StartRequest {
    fn validate(&self) -> Result<(), EngineError> {
        if self.session_id.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "session id must not be empty".to_string(),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "role must not be empty".to_string(),
            ));
        }
        if self.resume_context.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration(
                "resume text must not be empty".to_string(),
            ));
        }
        if self.max_questions == 0 {
            return Err(EngineError::InvalidConfiguration(
                "max questions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a driver gets back from each engine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The engine is suspended on a question awaiting a human answer.
    AwaitingAnswer { session_id: String, question: String },
    /// The interview is over; the judgement is final.
    Finished { session_id: String, judgement: String },
}

/// Decide where to go after an answer has been recorded.
///
/// Priority order: judge once both budgets are exactly met, otherwise exhaust
/// follow-ups on the current question, otherwise move to the next primary
/// question. Rule ordering is deliberate and must not be reordered: the
/// follow-up budget of the final question is spent before judgement fires.
fn route_after_answer(session: &Session) -> EngineState {
    if session.questions_asked == session.max_questions
        && session.followups_asked == session.max_followups
    {
        EngineState::Judging
    } else if session.followups_asked < session.max_followups {
        EngineState::AskingFollowup
    } else {
        EngineState::AskingPrimary
    }
}

/// Drives [`Session`]s through the interview state machine, one external
/// call at a time.
pub struct InterviewEngine {
    store: Arc<dyn CheckpointStore>,
    generator: Arc<dyn TextGenerator>,
}

impl InterviewEngine {
    pub fn new(store: Arc<dyn CheckpointStore>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }

    /// Create a session and run until the first question is pending.
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    pub async fn start(&self, request: StartRequest) -> Result<StepOutcome, EngineError> {
        request.validate()?;

        let mut session = Session::new(
            &request.session_id,
            &request.role,
            &request.resume_context,
            request.max_questions,
            request.max_followups,
        );
        self.store.create(&session)?;
        info!(
            role = %session.role,
            max_questions = session.max_questions,
            max_followups = session.max_followups,
            "interview session created"
        );

        self.advance(&mut session).await
    }

    /// Resume a suspended session with the human's answer and run until the
    /// next suspension point or the terminal state.
    ///
    /// Calling this on a finished session returns the stored judgement
    /// without any further generation. Blank answers are rejected before any
    /// state is touched.
    #[instrument(skip(self, answer))]
    pub async fn answer(
        &self,
        session_id: &str,
        answer: &str,
    ) -> Result<StepOutcome, EngineError> {
        let mut session = self.store.load(session_id)?;

        if let Some(judgement) = &session.result {
            debug!("answer on finished session; returning stored judgement");
            return Ok(StepOutcome::Finished {
                session_id: session.id.clone(),
                judgement: judgement.clone(),
            });
        }

        if answer.trim().is_empty() {
            return Err(EngineError::InvalidAnswer);
        }

        if session.state != EngineState::AwaitingAnswer {
            return Err(EngineError::NotAwaitingAnswer {
                session_id: session.id.clone(),
            });
        }

        session.record_answer(answer);
        session.state = route_after_answer(&session);
        debug!(next_state = ?session.state, "answer recorded, routed");

        self.advance(&mut session).await
    }

    /// Re-enter a checkpointed session without supplying an answer.
    ///
    /// Used after a process restart or a failed generation step: a session
    /// suspended on a question reports that question again, a finished
    /// session reports its judgement, and a session caught before a
    /// generation call re-runs that call.
    #[instrument(skip(self))]
    pub async fn resume(&self, session_id: &str) -> Result<StepOutcome, EngineError> {
        let mut session = self.store.load(session_id)?;
        self.advance(&mut session).await
    }

    /// Run generation states until the session suspends or finishes.
    ///
    /// Each committed transition ends with a `save`, so a later reader always
    /// observes a fully transitioned session.
    async fn advance(&self, session: &mut Session) -> Result<StepOutcome, EngineError> {
        loop {
            match session.state {
                EngineState::AskingPrimary => {
                    let prompt = prompts::primary_question(session);
                    let question = self.generator.generate(&prompt).await?;
                    session.record_primary_question(question);
                    self.store.save(session)?;
                    info!(
                        questions_asked = session.questions_asked,
                        "primary question pending"
                    );
                }
                EngineState::AskingFollowup => {
                    let prompt = prompts::followup_question(session);
                    let question = self.generator.generate(&prompt).await?;
                    session.record_followup_question(question);
                    self.store.save(session)?;
                    info!(
                        followups_asked = session.followups_asked,
                        "follow-up question pending"
                    );
                }
                EngineState::Judging => {
                    let prompt = prompts::judgement(session);
                    let judgement = self.generator.generate(&prompt).await?;
                    session.finish(judgement.clone());
                    self.store.save(session)?;
                    info!("interview finished, judgement recorded");
                    return Ok(StepOutcome::Finished {
                        session_id: session.id.clone(),
                        judgement,
                    });
                }
                EngineState::AwaitingAnswer => {
                    let question = session.pending_question.clone().ok_or_else(|| {
                        EngineError::NotAwaitingAnswer {
                            session_id: session.id.clone(),
                        }
                    })?;
                    return Ok(StepOutcome::AwaitingAnswer {
                        session_id: session.id.clone(),
                        question,
                    });
                }
                EngineState::Done => {
                    let judgement = session.result.clone().unwrap_or_default();
                    return Ok(StepOutcome::Finished {
                        session_id: session.id.clone(),
                        judgement,
                    });
                }
            }
        }
    }
}
