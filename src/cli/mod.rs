//! CLI module for ledgerdoc
//!
//! Provides command-line interface for:
//! - run: serve JSON-line invocations against an in-memory ledger
//! - digest: compute SHA-256 / HMAC-SHA256 digests

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DigestFormat};
pub use commands::{digest, execute, load_config, run, run_command, serve};
pub use errors::{CliError, CliResult};
pub use io::{read_invocations, write_response, InputLine, Invocation};
