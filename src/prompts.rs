//! Prompt templates for the three generation calls.
//!
//! Prompts are rendered with plain string formatting; there is no template
//! engine. Each template pins the interviewer persona to the target role and
//! feeds back the running transcript so the model never repeats itself.

use crate::session::Session;

/// Prompt for the next primary question, tied to a fresh resume entry.
pub fn primary_question(session: &Session) -> String {
    format!(
        r#"You are an interviewer for the following role: {role}.
This is the candidate's resume: {resume}.
This is the interview so far: {history}.
Ask your next question, based on a different entry of the candidate's resume.
Don't repeat your questions.
Output just the question and no extra text."#,
        role = session.role,
        resume = session.resume_context,
        history = session.history_text(),
    )
}

/// Prompt for a follow-up probing the current question's subject.
pub fn followup_question(session: &Session) -> String {
    format!(
        r#"You are an interviewer for the following role: {role}.
This is the candidate's resume: {resume}.
This is the interview so far: {history}.
Ask a follow-up question based on the recent history around the current subject, which is the following: {thread}.
Don't repeat your questions.
Output just the question and no extra text."#,
        role = session.role,
        resume = session.resume_context,
        history = session.history_text(),
        thread = session.thread_text(),
    )
}

/// Prompt for the final pass/fail judgement.
pub fn judgement(session: &Session) -> String {
    format!(
        r#"You are an interviewer for the following role: {role}.
This is the interview so far: {history}.
Based on the candidate's answers, would you recommend them for the role? Why or why not?"#,
        role = session.role,
        history = session.history_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn session_with_history() -> Session {
        let mut s = Session::new("s1", "Data Engineer", "Built pipelines at Acme.", 2, 1);
        s.record_primary_question("Tell me about the Acme pipelines.");
        s.record_answer("They moved 2TB a day.");
        s
    }

    #[test]
    fn test_primary_prompt_includes_role_resume_and_history() {
        let s = session_with_history();
        let prompt = primary_question(&s);
        assert!(prompt.contains("Data Engineer"));
        assert!(prompt.contains("Built pipelines at Acme."));
        assert!(prompt.contains("QUESTION: Tell me about the Acme pipelines."));
        assert!(prompt.contains("ANSWER: They moved 2TB a day."));
        assert!(prompt.contains("different entry"));
    }

    #[test]
    fn test_followup_prompt_includes_current_thread() {
        let s = session_with_history();
        let prompt = followup_question(&s);
        assert!(prompt.contains("follow-up question"));
        assert!(prompt.contains("current subject"));
        assert!(prompt.contains("ANSWER: They moved 2TB a day."));
    }

    #[test]
    fn test_judgement_prompt_omits_resume() {
        let s = session_with_history();
        let prompt = judgement(&s);
        assert!(prompt.contains("would you recommend them"));
        assert!(prompt.contains("QUESTION: Tell me about the Acme pipelines."));
        assert!(!prompt.contains("Built pipelines at Acme."));
    }

    #[test]
    fn test_prompts_instruct_question_only_output() {
        let s = session_with_history();
        assert!(primary_question(&s).contains("Output just the question"));
        assert!(followup_question(&s).contains("Output just the question"));
    }
}
