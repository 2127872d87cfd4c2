//! Prompter that replays a fixed list of answers
//!
//! Used to drive the workflow without a terminal. Every prompt is recorded so
//! callers can check what was asked and in which order.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::error::{Error, Result};
use crate::generation::{InputOptions, PickOption, Prompter};

/// A single scripted reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Choose the option with this label
    Pick(String),
    /// Type this text
    Input(String),
    /// Accept the pre-filled value of an input box
    AcceptDefault,
    /// Dismiss the prompt
    Cancel,
}

impl ScriptedAnswer {
    pub fn pick(label: impl Into<String>) -> Self {
        Self::Pick(label.into())
    }

    pub fn input(text: impl Into<String>) -> Self {
        Self::Input(text.into())
    }
}

/// What the workflow asked, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRecord {
    Pick {
        placeholder: String,
        labels: Vec<String>,
    },
    Input {
        prompt: String,
        value: Option<String>,
    },
    Rejected {
        prompt: String,
        message: String,
    },
}

#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<ScriptedAnswer>>,
    transcript: Mutex<Vec<PromptRecord>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Everything asked so far
    pub fn transcript(&self) -> Vec<PromptRecord> {
        self.lock_transcript().clone()
    }

    /// Answers that were never consumed
    pub fn remaining(&self) -> usize {
        self.lock_answers().len()
    }

    fn lock_answers(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedAnswer>> {
        self.answers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_transcript(&self) -> std::sync::MutexGuard<'_, Vec<PromptRecord>> {
        self.transcript.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_answer(&self) -> Option<ScriptedAnswer> {
        self.lock_answers().pop_front()
    }

    fn record(&self, record: PromptRecord) {
        self.lock_transcript().push(record);
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn pick(&self, placeholder: &str, options: &[PickOption]) -> Result<usize> {
        self.record(PromptRecord::Pick {
            placeholder: placeholder.to_string(),
            labels: options.iter().map(|o| o.label.clone()).collect(),
        });

        match self.next_answer() {
            Some(ScriptedAnswer::Pick(label)) => options
                .iter()
                .position(|o| o.label == label)
                .ok_or_else(|| Error::rejected("selection", format!("no option labelled '{label}'"))),
            Some(ScriptedAnswer::Cancel) | None => Err(Error::UserCancelled),
            Some(other) => Err(Error::rejected(
                "selection",
                format!("scripted answer {other:?} does not fit a pick prompt"),
            )),
        }
    }

    async fn input(&self, options: InputOptions<'_>) -> Result<String> {
        self.record(PromptRecord::Input {
            prompt: options.prompt.to_string(),
            value: options.value.map(str::to_string),
        });

        loop {
            let value = match self.next_answer() {
                Some(ScriptedAnswer::Input(text)) => text,
                Some(ScriptedAnswer::AcceptDefault) => options.value.unwrap_or_default().to_string(),
                Some(ScriptedAnswer::Cancel) | None => return Err(Error::UserCancelled),
                Some(other) => {
                    return Err(Error::rejected(
                        options.prompt,
                        format!("scripted answer {other:?} does not fit an input prompt"),
                    ));
                }
            };

            match options.validate.and_then(|validate| validate(value.as_str())) {
                Some(message) => self.record(PromptRecord::Rejected {
                    prompt: options.prompt.to_string(),
                    message,
                }),
                None => return Ok(value),
            }
        }
    }
}
