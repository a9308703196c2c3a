//! Interactive prompt drivers
//!
//! The resolution engine never talks to a terminal directly; it asks a
//! [`PromptDriver`] passed in by the caller. The real driver blocks on a
//! terminal prompt. The scripted driver answers from a pre-loaded queue and
//! records every prompt message, which makes the interactive path
//! deterministic in tests.

use dialoguer::Input;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A record of one prompt that fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    /// The message shown to the user
    pub message: String,
}

/// Source of answers for interactive prompts.
///
/// `ask` returns `None` when the prompt was cancelled (EOF, interrupt, or an
/// exhausted scripted queue); the engine treats that as fatal.
pub trait PromptDriver {
    /// Ask the user for a value, showing `message`
    fn ask(&self, message: &str) -> Option<String>;
}

/// Prompt driver backed by a real blocking terminal prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDriver;

impl PromptDriver for TerminalDriver {
    fn ask(&self, message: &str) -> Option<String> {
        Input::<String>::new()
            .with_prompt(message)
            .interact_text()
            .ok()
    }
}

/// Prompt driver answering from a canned queue, recording every prompt
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    answers: Mutex<VecDeque<String>>,
    history: Mutex<Vec<PromptRecord>>,
}

impl ScriptedDriver {
    /// Create a driver with no scripted answers (every prompt cancels)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver pre-loaded with answers, consumed in order
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Messages of every prompt that fired, in order
    pub fn history(&self) -> Vec<PromptRecord> {
        self.history.lock().expect("prompt history poisoned").clone()
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask(&self, message: &str) -> Option<String> {
        self.history
            .lock()
            .expect("prompt history poisoned")
            .push(PromptRecord {
                message: message.to_string(),
            });
        self.answers
            .lock()
            .expect("scripted answers poisoned")
            .pop_front()
    }
}
