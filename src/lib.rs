//! secret-gate - secret-filtering hook for AI coding agents.
//!
//! Inspects text passed on stdin - either raw content or a JSON-encoded
//! tool-use event - and prevents secrets (API keys, credentials, sensitive
//! file contents) from reaching the downstream consumer. Tool events are
//! allowed, denied, or redirected to redacted copies; raw text is scrubbed
//! in place.

pub mod audit;
pub mod cache;
pub mod clipboard;
pub mod config;
pub mod decision;
pub mod hooks;
pub mod input;
pub mod output;
pub mod rules;

pub use cache::RedactCache;
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::{Config, ConfigError};
pub use decision::Decision;
pub use hooks::HookProcessor;
pub use input::{Classified, HookEvent, classify};
pub use output::{Outcome, render};
pub use rules::{FilterResult, RuleSet};
