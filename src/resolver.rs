//! Remote-first reply resolution with a local fallback.
//!
//! `Resolver::resolve` never fails: transport errors, error statuses,
//! unrecognized bodies and prompt rendering errors all end in the fallback
//! generator, and an empty extraction ends in a fixed apology.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{APOLOGY_MESSAGE, INSTRUCTION_END, SEQUENCE_END};
use crate::fallback;
use crate::inference::{InferenceClient, InferenceError};
use crate::profile::Profile;
use crate::prompt;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to render prompt: {0}")]
    Prompt(#[from] minijinja::Error),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("unrecognized inference response shape: {0}")]
    UnrecognizedShape(String),
}

#[derive(Clone)]
pub struct Resolver {
    client: Arc<dyn InferenceClient>,
}

impl Resolver {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Produces a non-empty reply to `message` for this profile.
    pub async fn resolve(&self, message: &str, profile: &Profile) -> String {
        match self.try_remote(message, profile).await {
            Ok(reply) => {
                info!("Resolved reply from inference endpoint");
                reply
            }
            Err(e) => {
                warn!(error = %e, "Inference failed, using fallback reply");
                fallback::fallback_reply(message, profile)
            }
        }
    }

    async fn try_remote(&self, message: &str, profile: &Profile) -> Result<String, ResolveError> {
        let prompt = prompt::build_prompt(message, profile)?;
        debug!(prompt_len = prompt.len(), "Constructed advice prompt");

        let shape = self.client.complete(&prompt).await?;
        let raw = match shape.into_text() {
            Some(text) => text,
            None => {
                return Err(ResolveError::UnrecognizedShape(
                    "no generated text field".to_string(),
                ))
            }
        };

        Ok(extract_reply(&raw, &prompt))
    }
}

/// Pulls the model's answer out of raw generated text.
///
/// Text after the first `[/INST]` wins; otherwise an echoed prompt prefix is
/// stripped; otherwise the text is used as-is. Blank results become the
/// apology message.
pub fn extract_reply(raw: &str, prompt: &str) -> String {
    let cleaned = if let Some((_, after)) = raw.split_once(INSTRUCTION_END) {
        after
            .trim()
            .trim_start_matches(SEQUENCE_END)
            .trim_end_matches(SEQUENCE_END)
            .trim()
    } else if let Some(rest) = raw.strip_prefix(prompt) {
        rest.trim()
    } else {
        raw
    };

    if cleaned.trim().is_empty() {
        APOLOGY_MESSAGE.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::CompletionShape;
    use async_trait::async_trait;
    use serde_json::json;

    struct Canned(fn() -> Result<CompletionShape, InferenceError>);

    #[async_trait]
    impl InferenceClient for Canned {
        async fn complete(&self, _prompt: &str) -> Result<CompletionShape, InferenceError> {
            (self.0)()
        }
    }

    fn resolver(f: fn() -> Result<CompletionShape, InferenceError>) -> Resolver {
        Resolver::new(Arc::new(Canned(f)))
    }

    #[test]
    fn test_extract_after_marker() {
        let raw = "<s>[INST] question [/INST]  The answer.  </s>";
        assert_eq!(extract_reply(raw, "unrelated"), "The answer.");
    }

    #[test]
    fn test_extract_after_echoed_prompt_marker() {
        let prompt = "<s>[INST] question [/INST]</s>";
        let raw = format!("{}\n\nUse Zapier.", prompt);
        assert_eq!(extract_reply(&raw, prompt), "Use Zapier.");
    }

    #[test]
    fn test_extract_strips_prompt_prefix() {
        let prompt = "Tell me things.";
        assert_eq!(extract_reply("Tell me things.\n  Things. ", prompt), "Things.");
    }

    #[test]
    fn test_extract_verbatim() {
        assert_eq!(extract_reply("  plain reply\n", "prompt"), "  plain reply\n");
    }

    #[test]
    fn test_extract_blank_becomes_apology() {
        assert_eq!(extract_reply("", "p"), APOLOGY_MESSAGE);
        assert_eq!(extract_reply("p   ", "p"), APOLOGY_MESSAGE);
        assert_eq!(extract_reply("x [/INST] </s>", "p"), APOLOGY_MESSAGE);
    }

    #[tokio::test]
    async fn test_resolve_uses_remote_text() {
        let r = resolver(|| Ok(CompletionShape::Output("Try Intercom.".to_string())));
        assert_eq!(r.resolve("hi", &Profile::default()).await, "Try Intercom.");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_status() {
        let r = resolver(|| Err(InferenceError::Status { status: 503, body: "loading".to_string() }));
        let profile = Profile { industry: "retail".to_string(), ..Profile::default() };
        let reply = r.resolve("Can you suggest something?", &profile).await;

        assert!(reply.contains("Inventory AI"));
        assert!(reply.contains("Customer Behavior Analytics"));
        assert!(reply.contains("Pricing Optimization AI"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_unrecognized_shape() {
        let r = resolver(|| Ok(CompletionShape::Unrecognized(json!({"error": "busy"}))));
        let reply = r.resolve("hello", &Profile::default()).await;
        assert_eq!(reply, fallback::fallback_reply("hello", &Profile::default()));
    }
}
