//! One user's questionnaire and chat.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::catalog::Question;
use crate::constants::{ANALYZING_MESSAGE, KICKOFF_MESSAGE};
use crate::fallback;
use crate::profile::Field;
use crate::quiz::{Advance, FlowController, Progress, QuizError};
use crate::resolver::Resolver;
use crate::store::{Message, ProfileStore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("message is empty")]
    EmptyMessage,
}

pub struct Session {
    pub id: Uuid,
    store: ProfileStore,
    flow: FlowController,
    resolver: Resolver,
}

/// Serializable view of a session for the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot<'a> {
    pub id: Uuid,
    #[serde(flatten)]
    pub store: &'a ProfileStore,
    pub progress: Progress,
    pub section: Option<&'static str>,
    pub current_question: Option<&'static Question>,
    pub pending_selections: &'a [String],
}

impl Session {
    pub fn new(resolver: Resolver) -> Self {
        Self::with_flow(resolver, FlowController::default())
    }

    pub fn with_flow(resolver: Resolver, flow: FlowController) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: ProfileStore::new(),
            flow,
            resolver,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn flow(&self) -> &FlowController {
        &self.flow
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let open = !self.flow.is_finished();
        let question = open.then(|| self.flow.current_question());
        let pending = match question.map(|q| q.id) {
            Some(Field::Multi(field)) => self.flow.pending(field),
            _ => &[],
        };
        SessionSnapshot {
            id: self.id,
            store: &self.store,
            progress: self.flow.progress(),
            section: open.then(|| self.flow.section().title),
            current_question: question,
            pending_selections: pending,
        }
    }

    pub async fn answer(&mut self, value: &str) -> Result<Advance, SessionError> {
        let step = self.flow.answer(&mut self.store, value)?;
        self.after_step(step).await;
        Ok(step)
    }

    pub fn toggle(&mut self, value: &str) -> Result<Vec<String>, SessionError> {
        Ok(self.flow.toggle(value)?.to_vec())
    }

    pub async fn commit(&mut self) -> Result<Advance, SessionError> {
        let step = self.flow.commit(&mut self.store)?;
        self.after_step(step).await;
        Ok(step)
    }

    pub fn back(&mut self) {
        self.flow.back();
    }

    async fn after_step(&mut self, step: Advance) {
        if step == Advance::Finished {
            self.complete_quiz().await;
        }
    }

    /// Seeds the transcript once the last question is answered. Both
    /// completion flags end up set no matter how resolution goes.
    #[instrument(skip(self), fields(session = %self.id))]
    async fn complete_quiz(&mut self) {
        info!("Questionnaire finished, generating initial advice");
        self.store.append_message(Message::assistant(ANALYZING_MESSAGE));
        self.store.append_message(Message::user(KICKOFF_MESSAGE));

        let profile = self.store.profile().clone();
        let reply = AssertUnwindSafe(self.resolver.resolve(KICKOFF_MESSAGE, &profile))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!("Initial resolution panicked, using starter recommendations");
                fallback::initial_recommendations(&profile)
            });

        self.store.append_message(Message::assistant(reply));
        self.store.mark_initial_response_generated();
        self.store.mark_quiz_completed();
    }

    /// Appends the user's message and the resolved reply.
    #[instrument(skip(self, content), fields(session = %self.id))]
    pub async fn send_message(&mut self, content: &str) -> Result<Message, SessionError> {
        if content.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.store.append_message(Message::user(content));

        let reply = Message::assistant(self.resolver.resolve(content, self.store.profile()).await);
        self.store.append_message(reply.clone());
        Ok(reply)
    }

    pub fn reset_chat(&mut self) {
        info!(session = %self.id, "Resetting chat");
        self.store.reset_chat();
    }

    pub fn reset_quiz(&mut self) {
        info!(session = %self.id, "Resetting questionnaire");
        self.store.reset_profile();
        self.flow.reset();
    }
}
