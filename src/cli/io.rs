//! JSON line I/O for the serving loop
//!
//! - Input: one invocation object per line
//! - Output: one envelope per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::PeerResponse;

use super::errors::CliResult;

/// A single invocation read from input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A non-blank input line, parsed or rejected
pub type InputLine = Result<Invocation, serde_json::Error>;

/// Read invocations line by line. Blank lines are skipped.
pub fn read_invocations<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<InputLine>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(Ok(serde_json::from_str(&line))),
        Err(e) => Some(Err(e.into())),
    })
}

/// Write one peer response as a JSON line
pub fn write_response<W: Write>(out: &mut W, response: &PeerResponse) -> CliResult<()> {
    if response.envelope().is_some() {
        out.write_all(&response.payload)?;
    } else {
        serde_json::to_writer(
            &mut *out,
            &json!({ "status": response.status, "message": response.message }),
        )?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_skips_blank_lines() {
        let input = Cursor::new("{\"function\":\"Read\",\"args\":[\"k\"]}\n\n   \nnot json\n");
        let lines: Vec<_> = read_invocations(input).map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].as_ref().unwrap(),
            &Invocation { function: "Read".into(), args: vec!["k".into()] }
        );
        assert!(lines[1].is_err());
    }

    #[test]
    fn test_write_transport_error() {
        let mut out = Vec::new();
        write_response(&mut out, &PeerResponse::error("boom")).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"message\":\"boom\",\"status\":500}\n"
        );
    }
}
