//! [`Prompter`] backed by cliclack

use crate::collector::Prompter;
use std::io;

/// Asks questions on the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl Prompter for ClackPrompter {
    fn text(&mut self, message: &str, default: Option<&str>) -> io::Result<String> {
        let mut input = cliclack::input(message);
        match default {
            Some("") => input = input.required(false),
            Some(default) => input = input.placeholder(default).default_input(default),
            None => {}
        }
        input.interact()
    }

    fn select<T: Clone + Eq>(
        &mut self,
        message: &str,
        options: &[(T, &'static str)],
    ) -> io::Result<T> {
        let mut select = cliclack::select(message);
        for (value, label) in options {
            select = select.item(value.clone(), *label, "");
        }
        select.interact()
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        cliclack::confirm(message).initial_value(default).interact()
    }

    fn number(&mut self, message: &str, default: u16) -> io::Result<u16> {
        let default = default.to_string();
        let input: String = cliclack::input(message)
            .placeholder(&default)
            .default_input(&default)
            .validate(|input: &String| match input.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(()),
                _ => Err("Enter a port number between 1 and 65535"),
            })
            .interact()?;

        input
            .trim()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}
