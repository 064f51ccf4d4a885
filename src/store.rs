//! Per-session state: profile, transcript, completion flags.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::profile::{FieldValue, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), timestamp: Local::now() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), timestamp: Local::now() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStore {
    profile: Profile,
    transcript: Vec<Message>,
    quiz_completed: bool,
    initial_response_generated: bool,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn quiz_completed(&self) -> bool {
        self.quiz_completed
    }

    pub fn initial_response_generated(&self) -> bool {
        self.initial_response_generated
    }

    pub fn set_field(&mut self, value: FieldValue) {
        self.profile.set(value);
    }

    pub fn append_message(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn reset_chat(&mut self) {
        self.transcript.clear();
        self.initial_response_generated = false;
    }

    /// Clears every answer and both completion flags. The transcript is kept.
    pub fn reset_profile(&mut self) {
        self.profile = Profile::default();
        self.quiz_completed = false;
        self.initial_response_generated = false;
    }

    pub fn mark_quiz_completed(&mut self) {
        self.quiz_completed = true;
    }

    pub fn mark_initial_response_generated(&mut self) {
        self.initial_response_generated = true;
    }
}
