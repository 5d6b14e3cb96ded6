//! Opportunistic assistant answers and reflection prompts.
//!
//! Every remote failure collapses into a fixed message; nothing here
//! returns an error to the caller.

use crate::text::{is_blank, truncate_chars};
use crate::transport::TransportResult;
use async_trait::async_trait;
use log::warn;

pub const ANSWER_UNAVAILABLE: &str = "AI answer unavailable. Check backend connection.";
pub const REFLECTION_UNAVAILABLE: &str = "Reflection unavailable.";

pub const ANSWER_CHAR_BUDGET: usize = 100;
pub const REFLECTION_QUESTION_CHAR_BUDGET: usize = 30;
pub const REFLECTION_ANSWER_CHAR_BUDGET: usize = 50;

/// Remote question-answering and reflection service.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn ask(&self, question: &str, topic: &str) -> TransportResult<String>;
    async fn reflection_question(&self, topic: &str) -> TransportResult<String>;
}

/// Asks `question` about `topic`; `None` for blank questions.
pub async fn ask_opportunistic<A>(api: &A, question: &str, topic: &str) -> Option<String>
where
    A: AssistantApi + ?Sized,
{
    if is_blank(question) {
        return None;
    }
    let answer = match api.ask(question.trim(), topic).await {
        Ok(answer) => truncate_chars(&answer, ANSWER_CHAR_BUDGET),
        Err(err) => {
            warn!("event=assistant_ask module=assistant status=error error={err}");
            ANSWER_UNAVAILABLE.to_string()
        }
    };
    Some(answer)
}

/// Reflection question for `topic`, or the unavailable message.
pub async fn reflection_prompt<A>(api: &A, topic: &str) -> String
where
    A: AssistantApi + ?Sized,
{
    match api.reflection_question(topic).await {
        Ok(question) => truncate_chars(&question, REFLECTION_QUESTION_CHAR_BUDGET),
        Err(err) => {
            warn!("event=assistant_reflection module=assistant status=error error={err}");
            REFLECTION_UNAVAILABLE.to_string()
        }
    }
}

/// Appends a reflection block to `draft`.
///
/// Returns `None` when `answer` is blank.
pub fn compose_reflection(draft: &str, question: &str, answer: &str) -> Option<String> {
    let answer = truncate_chars(answer.trim(), REFLECTION_ANSWER_CHAR_BUDGET);
    if answer.is_empty() {
        return None;
    }
    let block = format!("Ref:\n{question}\n{answer}");
    if draft.is_empty() {
        Some(block)
    } else {
        Some(format!("{draft}\n{block}"))
    }
}
