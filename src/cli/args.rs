//! CLI argument definitions using clap
//!
//! Commands:
//! - ledgerdoc run [--config <path>]
//! - ledgerdoc digest --message <text> [--secret <key>] [--format base64|hex|HEX]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ledgerdoc - document chaincode over an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledgerdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve invocations read from stdin, one JSON object per line
    Run {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a SHA-256 or HMAC-SHA256 digest
    Digest {
        /// Text to digest
        #[arg(long)]
        message: String,

        /// HMAC key; plain SHA-256 when omitted
        #[arg(long)]
        secret: Option<String>,

        #[arg(long, value_enum, default_value_t = DigestFormat::Base64)]
        format: DigestFormat,
    },
}

/// Digest output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigestFormat {
    #[value(name = "base64")]
    Base64,
    #[value(name = "hex")]
    Hex,
    #[value(name = "HEX")]
    HexUpper,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_without_config() {
        let cli = Cli::try_parse_from(["ledgerdoc", "run"]).unwrap();
        assert!(matches!(cli.command, Command::Run { config: None }));
    }

    #[test]
    fn test_digest_formats() {
        let cli = Cli::try_parse_from([
            "ledgerdoc", "digest", "--message", "abc", "--format", "HEX",
        ])
        .unwrap();
        match cli.command {
            Command::Digest { message, secret, format } => {
                assert_eq!(message, "abc");
                assert!(secret.is_none());
                assert_eq!(format, DigestFormat::HexUpper);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
