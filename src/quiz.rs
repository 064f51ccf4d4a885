//! Questionnaire flow: a sectioned cursor over the catalog plus the pending
//! multi-select picks for the questions already visited.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{self, Question, Section};
use crate::profile::{Field, FieldValue, MultiField, SingleField};
use crate::store::ProfileStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("'{value}' is not an option for {field}")]
    UnknownOption { field: &'static str, value: String },
    #[error("{0} is a multi-select question")]
    ExpectedMultiSelect(&'static str),
    #[error("{0} is a single-select question")]
    ExpectedSingleSelect(&'static str),
    #[error("select at least one option for {0}")]
    NothingSelected(&'static str),
    #[error("the questionnaire is already finished")]
    Finished,
}

/// Result of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct FlowController {
    sections: &'static [Section],
    section: usize,
    question: usize,
    pending: HashMap<MultiField, Vec<String>>,
    finished: bool,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(catalog::SECTIONS)
    }
}

impl FlowController {
    /// `sections` must be non-empty and every section must hold a question.
    pub fn new(sections: &'static [Section]) -> Self {
        Self {
            sections,
            section: 0,
            question: 0,
            pending: HashMap::new(),
            finished: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.sections);
    }

    pub fn section(&self) -> &'static Section {
        &self.sections[self.section]
    }

    pub fn current_question(&self) -> &'static Question {
        &self.sections[self.section].questions[self.question]
    }

    pub fn position(&self) -> (usize, usize) {
        (self.section, self.question)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pending(&self, field: MultiField) -> &[String] {
        self.pending.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn progress(&self) -> Progress {
        let total = catalog::total_questions(self.sections);
        if self.finished {
            return Progress { completed: total, total };
        }
        let before: usize = self.sections[..self.section]
            .iter()
            .map(|s| s.questions.len())
            .sum();
        Progress {
            completed: before + self.question,
            total,
        }
    }

    fn ensure_open(&self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        Ok(())
    }

    fn current_multi(&self) -> Result<(MultiField, &'static Question), QuizError> {
        let question = self.current_question();
        match question.id {
            Field::Multi(field) => Ok((field, question)),
            Field::Single(field) => Err(QuizError::ExpectedSingleSelect(field.key())),
        }
    }

    fn current_single(&self) -> Result<(SingleField, &'static Question), QuizError> {
        let question = self.current_question();
        match question.id {
            Field::Single(field) => Ok((field, question)),
            Field::Multi(field) => Err(QuizError::ExpectedMultiSelect(field.key())),
        }
    }

    fn check_option(question: &Question, value: &str) -> Result<(), QuizError> {
        if question.has_option(value) {
            Ok(())
        } else {
            Err(QuizError::UnknownOption {
                field: question.id.key(),
                value: value.to_string(),
            })
        }
    }

    /// Records a single-select answer and moves on.
    pub fn answer(&mut self, store: &mut ProfileStore, value: &str) -> Result<Advance, QuizError> {
        self.ensure_open()?;
        let (field, question) = self.current_single()?;
        Self::check_option(question, value)?;

        store.set_field(FieldValue::Single(field, value.to_string()));
        Ok(self.advance())
    }

    /// Toggles a multi-select pick. At the selection limit the oldest pick is
    /// evicted to make room.
    pub fn toggle(&mut self, value: &str) -> Result<&[String], QuizError> {
        self.ensure_open()?;
        let (field, question) = self.current_multi()?;
        Self::check_option(question, value)?;

        let picks = self.pending.entry(field).or_default();
        if let Some(idx) = picks.iter().position(|v| v == value) {
            picks.remove(idx);
        } else {
            if let Some(max) = question.max_selections {
                while !picks.is_empty() && picks.len() >= max {
                    let evicted = picks.remove(0);
                    debug!(field = field.key(), %evicted, "Selection limit reached, evicting oldest");
                }
            }
            picks.push(value.to_string());
        }
        Ok(picks.as_slice())
    }

    /// Commits the pending picks for the current multi-select question.
    pub fn commit(&mut self, store: &mut ProfileStore) -> Result<Advance, QuizError> {
        self.ensure_open()?;
        let (field, _) = self.current_multi()?;
        let picks = self.pending(field);
        if picks.is_empty() {
            return Err(QuizError::NothingSelected(field.key()));
        }

        store.set_field(FieldValue::Multi(field, picks.to_vec()));
        Ok(self.advance())
    }

    fn advance(&mut self) -> Advance {
        if self.question + 1 < self.sections[self.section].questions.len() {
            self.question += 1;
        } else if self.section + 1 < self.sections.len() {
            self.section += 1;
            self.question = 0;
        } else {
            self.finished = true;
            return Advance::Finished;
        }
        Advance::Moved
    }

    /// Steps back one question. Does nothing at the first question.
    pub fn back(&mut self) {
        if self.finished {
            return;
        }
        if self.question > 0 {
            self.question -= 1;
        } else if self.section > 0 {
            self.section -= 1;
            self.question = self.sections[self.section].questions.len() - 1;
        }
    }
}
