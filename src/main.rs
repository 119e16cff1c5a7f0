use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use parley::config::{Backend, GeneratorConfig, default_state_dir};

mod cmd;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version, about = "AI-powered interview orchestrator")]
pub struct Cli {
    /// Directory holding session checkpoints
    #[arg(long, global = true, env = "PARLEY_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Generation backend: ollama or command
    #[arg(long, global = true, default_value = "ollama")]
    pub backend: String,

    /// Model name for the ollama backend
    #[arg(long, global = true, default_value = "llama3")]
    pub model: String,

    /// Base URL of the ollama server
    #[arg(long, global = true, default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// LLM CLI for the command backend
    #[arg(long, global = true, env = "PARLEY_LLM_CMD", default_value = "claude")]
    pub llm_cmd: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Conduct a new interview from a resume and a target role
    Run {
        /// Role the candidate is applying for
        #[arg(long)]
        role: String,

        /// Path to the candidate's resume (PDF or plain text)
        #[arg(long)]
        resume: PathBuf,

        /// Number of primary questions to ask
        #[arg(long, default_value = "1")]
        max_questions: u32,

        /// Number of follow-ups per primary question
        #[arg(long, default_value = "1")]
        max_followups: u32,
    },
    /// Continue a checkpointed interview from where it suspended
    Resume {
        /// Session identifier (see `parley sessions`)
        session_id: String,
    },
    /// List checkpointed interview sessions
    Sessions,
}

impl Cli {
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let backend: Backend = self.backend.parse()?;
        Ok(GeneratorConfig {
            backend,
            base_url: self.ollama_url.clone(),
            model: self.model.clone(),
            command: self.llm_cmd.clone(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PARLEY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let state_dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);

    match &cli.command {
        Commands::Run {
            role,
            resume,
            max_questions,
            max_followups,
        } => {
            cmd::cmd_run(
                &state_dir,
                role,
                resume,
                *max_questions,
                *max_followups,
                &cli.generator_config()?,
            )
            .await?;
        }
        Commands::Resume { session_id } => {
            cmd::cmd_resume(&state_dir, session_id, &cli.generator_config()?).await?;
        }
        Commands::Sessions => cmd::cmd_sessions(&state_dir)?,
    }

    Ok(())
}
