//! Test doubles for driving the pipeline without a terminal or real processes

use crate::runtime::{CommandOutput, CommandRunner, CommandSpec};
use crate::collector::Prompter;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// Records every command it is asked to run and replays canned outputs
///
/// Without queued responses each command "succeeds" with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    responses: Mutex<VecDeque<CommandOutput>>,
    fail_spawn: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next command
    pub fn respond(self, output: CommandOutput) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(output);
        self
    }

    /// Make every command fail to spawn
    pub fn fail_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(spec.clone());

        if self.fail_spawn {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", spec.program),
            ));
        }

        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Ok(next.unwrap_or(CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        }))
    }
}

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// Pick the option whose label matches
    Choice(&'static str),
    Confirm(bool),
    Number(u16),
    /// Accept whatever default the prompt offers
    Default,
    /// Simulate Ctrl+C at this prompt
    Interrupt,
}

/// Answers prompts from a fixed script and records the messages it was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Prompt messages in the order they were asked
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers left unused
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> io::Result<Answer> {
        self.asked.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Interrupt) => Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
            Some(answer) => Ok(answer),
            None => Err(unexpected(message, "no scripted answer left")),
        }
    }
}

fn unexpected(message: &str, detail: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("prompt '{}': {}", message, detail),
    )
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(default.unwrap_or_default().to_string()),
            other => Err(unexpected(message, format!("expected text, got {:?}", other))),
        }
    }

    fn select<T: Clone + Eq>(&mut self, message: &str, options: &[(T, &'static str)]) -> io::Result<T> {
        match self.next(message)? {
            Answer::Choice(label) => options
                .iter()
                .find(|(_, l)| *l == label)
                .map(|(value, _)| value.clone())
                .ok_or_else(|| unexpected(message, format!("no option labelled '{}'", label))),
            Answer::Default => options
                .first()
                .map(|(value, _)| value.clone())
                .ok_or_else(|| unexpected(message, "no options")),
            other => Err(unexpected(message, format!("expected choice, got {:?}", other))),
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => Err(unexpected(message, format!("expected confirm, got {:?}", other))),
        }
    }

    fn number(&mut self, message: &str, default: u16) -> io::Result<u16> {
        match self.next(message)? {
            Answer::Number(value) => Ok(value),
            Answer::Default => Ok(default),
            other => Err(unexpected(message, format!("expected number, got {:?}", other))),
        }
    }
}
