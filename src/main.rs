//! secret-gate entry point.

use secret_gate::audit::{self, ActivityEntry};
use secret_gate::cache::RedactCache;
use secret_gate::clipboard::SystemClipboard;
use secret_gate::config::Config;
use secret_gate::decision::Decision;
use secret_gate::hooks::HookProcessor;
use secret_gate::input::{self, Classified, HookEvent};
use secret_gate::output::{self, Outcome};

use chrono::Utc;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                print!("{HELP}");
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" | "version" => {
                println!("secret-gate version {VERSION}");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
    }

    let start = Instant::now();

    let mut raw_input = String::new();
    if std::io::stdin().read_to_string(&mut raw_input).is_err() {
        eprintln!("Error reading input");
        return ExitCode::FAILURE;
    }

    // A broken rule set means no partial enforcement: abort before any
    // decision is made.
    let cwd = input::extract_cwd(&raw_input);
    let config = match Config::load(cwd.as_deref().map(Path::new)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load rules: {e}");
            return ExitCode::FAILURE;
        }
    };
    let rules = match config.compile() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to compile rules: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cache = RedactCache::from_env();
    let clipboard = SystemClipboard;
    let processor = HookProcessor::new(&rules, &cache, &clipboard);

    let (kind, decision) = match input::classify(&raw_input) {
        Classified::Hook(event) => (event_kind(&event), processor.process(event)),
        Classified::RawText(text) => {
            let result = rules.filter_content(&text);
            let kind = if result.changed { "raw_text" } else { "raw_text_clean" };
            (kind, Decision::PassThrough(result.content))
        }
    };

    let outcome = output::render(&decision);
    let filtered = kind == "raw_text"
        || matches!(
            decision,
            Decision::Deny { .. } | Decision::DenyWithRedirect { .. } | Decision::Blocked { .. }
        );

    if filtered {
        let (output_len, outcome_name) = match &outcome {
            Outcome::Emit(payload) => (payload.len(), outcome_name(&decision)),
            Outcome::Reject(message) => (message.len(), "blocked"),
        };
        let entry = ActivityEntry {
            timestamp: Utc::now(),
            kind: kind.to_string(),
            outcome: outcome_name.to_string(),
            input_bytes: raw_input.len(),
            output_bytes: output_len,
            duration_ms: start.elapsed().as_millis(),
        };
        let _ = audit::record(&entry);
    }

    match outcome {
        Outcome::Emit(payload) => {
            print!("{payload}");
            ExitCode::SUCCESS
        }
        Outcome::Reject(message) => {
            eprintln!("{message}");
            // Exit code 2 rejects the submission entirely.
            ExitCode::from(2)
        }
    }
}

fn event_kind(event: &HookEvent) -> &'static str {
    match event {
        HookEvent::PreToolUse { .. } => "PreToolUse",
        HookEvent::UserPromptSubmit { .. } => "UserPromptSubmit",
        HookEvent::SessionEnd => "SessionEnd",
        HookEvent::Unrecognized { .. } => "Unrecognized",
    }
}

fn outcome_name(decision: &Decision) -> &'static str {
    match decision {
        Decision::Allow => "allow",
        Decision::AllowWithRedirect { .. } => "allow_redirect",
        Decision::Deny { .. } => "deny",
        Decision::DenyWithRedirect { .. } => "deny_redirect",
        Decision::PassThrough(_) => "pass_through",
        Decision::Blocked { .. } => "blocked",
    }
}

const HELP: &str = "\
secret-gate - sensitive-content filter for agent tool use

USAGE:
    secret-gate [OPTIONS]

OPTIONS:
    -h, --help, help       Show this help message
    -v, --version, version Show version information

DESCRIPTION:
    Reads one input from stdin. A JSON hook event (PreToolUse,
    UserPromptSubmit, SessionEnd) is evaluated against the rule set and a
    permission decision is printed as JSON. Anything else is treated as raw
    text and printed back with sensitive values redacted.

    Filtered by default:
    - API keys, secret keys, access tokens
    - Database connection URLs
    - Private key blocks
    - KEY=value environment assignments
    - OpenAI (sk-...), Slack (xox...-...), GitHub (ghp_...) tokens

EXAMPLES:
    echo \"API_KEY=secret123\" | secret-gate
    cat config.txt | secret-gate

CONFIGURATION:
    Built-in defaults, then ~/.secret-gate/config.toml, then
    .secret-gate.toml in the working directory; later layers win.

EXIT CODES:
    0  allowed (possibly rewritten output on stdout)
    1  rule set failed to load
    2  submission rejected (message on stderr)
";
