//! Best-effort clipboard copy of redacted prompt text.
//!
//! Injected into the hook processor as a capability so tests can substitute
//! a fake. Failure is never an error path: the caller turns it into a status
//! note in the block message.

use std::io::{self, Write};
use std::process::{Command, Stdio};

/// A clipboard the hook processor can copy redacted text into.
pub trait Clipboard {
    fn copy(&self, text: &str) -> io::Result<()>;
}

/// System clipboard via the platform's paste utility.
pub struct SystemClipboard;

/// Candidate clipboard commands, tried in order.
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> io::Result<()> {
        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no clipboard utility found");

        for (program, args) in CLIPBOARD_COMMANDS {
            let spawned = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    last_err = e;
                    continue;
                }
            };

            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }

            let status = child.wait()?;
            if status.success() {
                return Ok(());
            }
            last_err = io::Error::other(format!("{program} exited with {status}"));
        }

        Err(last_err)
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::cell::RefCell;

    /// Records copied text, or fails on demand.
    pub struct FakeClipboard {
        pub copied: RefCell<Vec<String>>,
        pub fail: bool,
    }

    impl FakeClipboard {
        pub fn new() -> Self {
            Self {
                copied: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                copied: RefCell::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("clipboard unavailable"));
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }
}
