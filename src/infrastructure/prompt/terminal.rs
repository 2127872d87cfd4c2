//! Interactive prompts for terminals, built on cliclack

use async_trait::async_trait;
use std::io;

use crate::core::error::{Error, Result};
use crate::generation::{InputOptions, PickOption, Prompter};

/// Prompts with cliclack menus and input boxes
///
/// Ctrl-C cancels the current prompt. cliclack blocks on the terminal,
/// so each prompt runs under [`tokio::task::block_in_place`], which needs the
/// multi-threaded runtime.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

/// An interrupted prompt means the user backed out
fn prompt_error(error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::Interrupted => Error::UserCancelled,
        _ => Error::Io(error),
    }
}

fn pick_blocking(placeholder: &str, options: &[PickOption]) -> Result<usize> {
    let mut select = cliclack::select(placeholder);
    for (index, option) in options.iter().enumerate() {
        select = select.item(
            index,
            &option.label,
            option.description.as_deref().unwrap_or_default(),
        );
    }
    select.interact().map_err(prompt_error)
}

fn input_blocking(options: &InputOptions<'_>) -> Result<String> {
    loop {
        let mut input = cliclack::input(options.prompt).required(false);
        if let Some(value) = options.value.filter(|v| !v.is_empty()) {
            input = input.default_input(value);
        }
        let answer: String = input.interact().map_err(prompt_error)?;

        match options.validate.and_then(|validate| validate(answer.as_str())) {
            Some(message) => cliclack::log::error(message)?,
            None => return Ok(answer),
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn pick(&self, placeholder: &str, options: &[PickOption]) -> Result<usize> {
        tokio::task::block_in_place(|| pick_blocking(placeholder, options))
    }

    async fn input(&self, options: InputOptions<'_>) -> Result<String> {
        tokio::task::block_in_place(|| input_blocking(&options))
    }
}
