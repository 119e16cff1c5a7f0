//! `parley run` and `parley resume`: the interactive interview loop.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use parley::config::GeneratorConfig;
use parley::engine::{InterviewEngine, StartRequest, StepOutcome};
use parley::errors::EngineError;
use parley::resume::load_resume;
use parley::store::FileStore;
use parley::ui::InterviewUI;

fn build_engine(state_dir: &Path, generator: &GeneratorConfig) -> Result<InterviewEngine> {
    let store =
        FileStore::new(state_dir).context("Failed to open session checkpoint directory")?;
    Ok(InterviewEngine::new(Arc::new(store), generator.build()))
}

/// Start a new interview and run it to the judgement.
pub async fn cmd_run(
    state_dir: &Path,
    role: &str,
    resume_path: &Path,
    max_questions: u32,
    max_followups: u32,
    generator: &GeneratorConfig,
) -> Result<()> {
    let engine = build_engine(state_dir, generator)?;
    let resume_context = load_resume(resume_path)?;
    let session_id = uuid::Uuid::new_v4().to_string();

    let ui = InterviewUI::new();
    ui.banner(role, &session_id);

    let bar = ui.thinking("Preparing the first question...");
    let outcome = engine
        .start(StartRequest {
            session_id,
            role: role.to_string(),
            resume_context,
            max_questions,
            max_followups,
        })
        .await;
    bar.finish_and_clear();

    drive(&engine, &ui, outcome?).await
}

/// Continue a checkpointed interview from its suspension point.
pub async fn cmd_resume(
    state_dir: &Path,
    session_id: &str,
    generator: &GeneratorConfig,
) -> Result<()> {
    let engine = build_engine(state_dir, generator)?;
    let ui = InterviewUI::new();

    let bar = ui.thinking("Restoring session...");
    let outcome = engine.resume(session_id).await;
    bar.finish_and_clear();

    drive(&engine, &ui, outcome?).await
}

/// Question/answer loop: print the pending question, collect an answer, feed
/// it to the engine, repeat until the judgement lands. Blank answers are
/// rejected by the engine without touching state; we just re-prompt.
async fn drive(
    engine: &InterviewEngine,
    ui: &InterviewUI,
    mut outcome: StepOutcome,
) -> Result<()> {
    loop {
        match outcome {
            StepOutcome::AwaitingAnswer {
                session_id,
                question,
            } => {
                ui.question(&question);
                outcome = loop {
                    let answer = ui.read_answer()?;
                    let bar = ui.thinking("Interviewer is thinking...");
                    let step = engine.answer(&session_id, &answer).await;
                    bar.finish_and_clear();
                    match step {
                        Ok(next) => break next,
                        Err(EngineError::InvalidAnswer) => ui.blank_answer_notice(),
                        Err(e) => return Err(e.into()),
                    }
                };
            }
            StepOutcome::Finished { judgement, .. } => {
                ui.judgement(&judgement);
                return Ok(());
            }
        }
    }
}
