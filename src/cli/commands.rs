//! CLI command implementations
//!
//! `run` serves invocations against a fresh in-memory ledger: each line is
//! one transaction, committed when the envelope reports success and rolled
//! back otherwise.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::api::{error_response, Chaincode, PeerResponse, ResponseCode, INIT_FUNCTION};
use crate::config::Config;
use crate::crypto;
use crate::ledger::MemoryLedger;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::args::{Command, DigestFormat};
use super::errors::CliResult;
use super::io::{read_invocations, write_response, Invocation};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run { config } => serve_stdio(config.as_deref()),
        Command::Digest {
            message,
            secret,
            format,
        } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{}", digest(&message, secret.as_deref(), format))?;
            Ok(())
        }
    }
}

/// Load configuration, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_logging();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("app_version", config.app_version.as_str()),
            ("user_namespace", config.user_namespace.as_str()),
        ],
    );
    Ok(config)
}

fn serve_stdio(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let chaincode = Chaincode::new(&config);
    let mut ledger = MemoryLedger::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&chaincode, &mut ledger, stdin.lock(), &mut stdout.lock())
}

/// Serving loop over arbitrary line input and output
pub fn serve<R: BufRead, W: Write>(
    chaincode: &Chaincode,
    ledger: &mut MemoryLedger,
    input: R,
    output: &mut W,
) -> CliResult<()> {
    log_event(Event::Serving);

    let mut served = 0usize;
    for line in read_invocations(input) {
        let response = match line? {
            Ok(invocation) => execute(chaincode, ledger, &invocation),
            Err(e) => error_response(
                ResponseCode::ArgumentError,
                &format!("Invalid invocation: {}", e),
            ),
        };
        write_response(output, &response)?;
        served += 1;
    }

    log_event_with_fields(Event::ServingComplete, &[("served", served.to_string().as_str())]);
    Ok(())
}

/// Run one invocation as its own transaction
pub fn execute(chaincode: &Chaincode, ledger: &mut MemoryLedger, invocation: &Invocation) -> PeerResponse {
    let mut tx = ledger.begin();
    let response = if invocation.function == INIT_FUNCTION {
        chaincode.init(&mut tx, &invocation.args)
    } else {
        chaincode.invoke(&mut tx, &invocation.function, &invocation.args)
    };
    if response.is_ok() {
        tx.commit();
    } else {
        tx.rollback();
    }
    response
}

/// Digest text in the requested encoding
pub fn digest(message: &str, secret: Option<&str>, format: DigestFormat) -> String {
    let bytes = match secret {
        Some(secret) => crypto::compute_hmac256_bytes(message, secret),
        None => crypto::compute_sha256_bytes(message),
    };
    match format {
        DigestFormat::Base64 => crypto::base64_encode(&bytes),
        DigestFormat::Hex => crypto::hex_encode(&bytes, false),
        DigestFormat::HexUpper => crypto::hex_encode(&bytes, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Envelope;
    use std::io::Cursor;

    fn envelopes(output: Vec<u8>) -> Vec<Envelope> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_serve_commits_successful_invocations() {
        let chaincode = Chaincode::new(&Config::default());
        let mut ledger = MemoryLedger::new();
        let input = Cursor::new(
            "{\"function\":\"Init\",\"args\":[\"7\"]}\n\
             {\"function\":\"Read\",\"args\":[\"selftest\"]}\n",
        );
        let mut output = Vec::new();
        serve(&chaincode, &mut ledger, input, &mut output).unwrap();

        let out = envelopes(output);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].code, "1000");
        assert_eq!(out[1].data, serde_json::json!(7));
    }

    #[test]
    fn test_serve_rejects_malformed_lines() {
        let chaincode = Chaincode::new(&Config::default());
        let mut ledger = MemoryLedger::new();
        let mut output = Vec::new();
        serve(&chaincode, &mut ledger, Cursor::new("{oops\n"), &mut output).unwrap();

        let out = envelopes(output);
        assert_eq!(out[0].code, "2000");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_failed_invocation_rolls_back() {
        let chaincode = Chaincode::new(&Config::default());
        let mut ledger = MemoryLedger::new();
        let invocation = Invocation {
            function: "InitUserInfo".into(),
            args: vec!["a@b.c".into(), "".into(), "h".into()],
        };
        let response = execute(&chaincode, &mut ledger, &invocation);
        assert!(!response.is_ok());
        assert_eq!(ledger.committed_writes(), 0);
    }

    #[test]
    fn test_digest() {
        assert_eq!(
            digest("abc", None, DigestFormat::Hex),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest("abc", None, DigestFormat::Base64),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
        assert_eq!(
            digest("what do ya want for nothing?", Some("Jefe"), DigestFormat::Hex),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
