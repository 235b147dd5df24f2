//! Rewrite service
//!
//! Turns an Original into an Improvement with three serial chat completions:
//! suggest headlines, let an editor pick and revise one, then rewrite the
//! summary to match the chosen headline.

use std::sync::Arc;

use crate::app::prompts;
use crate::domain::entities::{Improvement, Original};
use crate::domain::ports::{ChatMessage, LlmClient};
use crate::error::LlmError;

pub struct RewriteService<L>
where
    L: LlmClient + ?Sized,
{
    llm: Arc<L>,
}

impl<L> RewriteService<L>
where
    L: LlmClient + ?Sized,
{
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    /// Step one: newline-separated headline candidates
    pub async fn suggest_titles(
        &self,
        original_title: &str,
        previous_titles: &[String],
        custom_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let system = match custom_prompt {
            Some(prompt) => prompt.to_string(),
            None => prompts::suggestion_prompt(previous_titles),
        };

        self.llm
            .complete(&[
                ChatMessage::system(system),
                ChatMessage::user(prompts::suggestion_request(original_title)),
            ])
            .await
    }

    /// Step two: pick and revise the best candidate.
    ///
    /// Without `suggestions`, step one runs first on `original_title`.
    pub async fn rewrite_title(
        &self,
        original_title: &str,
        suggestions: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let suggestions = match suggestions {
            Some(s) => s.to_string(),
            None => self.suggest_titles(original_title, &[], None).await?,
        };

        let winner = self
            .llm
            .complete(&[
                ChatMessage::system(custom_prompt.unwrap_or(prompts::editor_prompt())),
                ChatMessage::user(suggestions),
            ])
            .await?;

        non_empty(strip_quotes(&winner))
    }

    /// Step three: a summary that fits `new_title`.
    ///
    /// A custom prompt replaces the default instructions; the titles and the
    /// original summary are still sent as the user message.
    pub async fn rewrite_summary(
        &self,
        original_title: &str,
        original_summary: &str,
        new_title: &str,
        custom_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let messages = match custom_prompt {
            Some(prompt) => vec![
                ChatMessage::system(prompt),
                ChatMessage::user(format!(
                    "Title:{}\nSummary:{}\n---\nTitle:{}\nSummary:",
                    original_title, original_summary, new_title
                )),
            ],
            None => vec![ChatMessage::user(prompts::summary_prompt(
                original_title,
                original_summary,
                new_title,
            ))],
        };

        let summary = self.llm.complete(&messages).await?;
        non_empty(strip_quotes(&summary))
    }

    /// Run the whole chain for one Original
    pub async fn rewrite(
        &self,
        original: Original,
        previous_titles: &[String],
    ) -> Result<Improvement, LlmError> {
        let suggestions = self
            .suggest_titles(&original.title, previous_titles, None)
            .await?;
        let title = self
            .rewrite_title(&original.title, Some(&suggestions), None)
            .await?;
        let summary = self
            .rewrite_summary(&original.title, &original.summary, &title, None)
            .await?;

        tracing::info!(original = %original.id, "Rewrote \"{}\" as \"{}\"", original.title, title);
        Ok(Improvement::new(original, title, summary))
    }
}

/// Trim spaces and surrounding quote characters the model likes to add
pub fn strip_quotes(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == ' ' || c == '"' || c == '\'')
        .to_string()
}

fn non_empty(text: String) -> Result<String, LlmError> {
    if text.is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text)
    }
}
