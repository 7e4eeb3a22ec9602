//! Interrupt tracking shared between the signal handler and the pipeline

use crate::error::{Result, ScaffoldError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Flags {
    interrupted: AtomicBool,
    armed: AtomicBool,
    child_attached: AtomicBool,
}

/// What an interrupt should do at the moment it arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Record it; a prompt or the foreground child reacts
    Record,
    /// End the process now
    Exit,
}

/// Records interrupts and decides whether they still cancel the run
///
/// The token starts armed: an interrupt while prompting cancels the run. Once
/// files are being written the token is disarmed and an interrupt ends the
/// process, leaving whatever was written. While a child owns the terminal the
/// interrupt is left to the child and only recorded.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flags: Arc<Flags>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            flags: Arc::new(Flags {
                interrupted: AtomicBool::new(false),
                armed: AtomicBool::new(true),
                child_attached: AtomicBool::new(false),
            }),
        }
    }

    /// Record an interrupt
    pub fn interrupt(&self) {
        self.flags.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn interrupted(&self) -> bool {
        self.flags.interrupted.load(Ordering::SeqCst)
    }

    pub fn disarm(&self) {
        self.flags.armed.store(false, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.flags.armed.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_armed() && self.interrupted()
    }

    /// `Err(Cancelled)` if an interrupt arrived while armed
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ScaffoldError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Mark the terminal as owned by a foreground child until the guard drops
    pub fn attach_child(&self) -> ChildGuard {
        self.flags.child_attached.store(true, Ordering::SeqCst);
        ChildGuard {
            token: self.clone(),
        }
    }

    pub fn child_attached(&self) -> bool {
        self.flags.child_attached.load(Ordering::SeqCst)
    }

    /// Record an interrupt and decide whether it ends the process
    pub fn on_interrupt(&self) -> InterruptAction {
        self.interrupt();
        if self.is_armed() || self.child_attached() {
            InterruptAction::Record
        } else {
            InterruptAction::Exit
        }
    }

    /// Route Ctrl+C to this token, restoring the terminal cursor first
    #[cfg(feature = "tui")]
    pub fn install_ctrlc_handler(&self) -> std::result::Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            let _ = console::Term::stderr().show_cursor();
            if token.on_interrupt() == InterruptAction::Exit {
                let _ = cliclack::outro_cancel("Operation cancelled.");
                std::process::exit(ScaffoldError::Cancelled.exit_code());
            }
        })
    }
}

/// Returned by [`CancelToken::attach_child`]
#[derive(Debug)]
pub struct ChildGuard {
    token: CancelToken,
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.token
            .flags
            .child_attached
            .store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_while_armed_cancels() {
        let token = CancelToken::new();
        assert!(token.check().is_ok());

        token.clone().interrupt();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(ScaffoldError::Cancelled)));
    }

    #[test]
    fn test_interrupt_after_disarm_does_not_cancel_steps() {
        let token = CancelToken::new();
        token.disarm();
        token.interrupt();

        assert!(token.interrupted());
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_interrupt_while_prompting_is_recorded() {
        let token = CancelToken::new();
        assert_eq!(token.on_interrupt(), InterruptAction::Record);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_interrupt_while_writing_exits() {
        let token = CancelToken::new();
        token.disarm();
        assert_eq!(token.on_interrupt(), InterruptAction::Exit);
    }

    #[test]
    fn test_interrupt_is_left_to_attached_child() {
        let token = CancelToken::new();
        token.disarm();

        {
            let _guard = token.attach_child();
            assert!(token.child_attached());
            assert_eq!(token.on_interrupt(), InterruptAction::Record);
        }

        assert!(!token.child_attached());
        assert_eq!(token.on_interrupt(), InterruptAction::Exit);
    }
}
