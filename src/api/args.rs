//! Positional argument validation
//!
//! Handlers receive a flat list of strings. Arity and non-emptiness are
//! checked here before any storage access.

use crate::service::{ServiceError, ServiceResult};

const ORDINALS: [&str; 3] = ["1st", "2nd", "3rd"];

fn ordinal(position: usize) -> String {
    match ORDINALS.get(position) {
        Some(s) => (*s).to_string(),
        None => format!("{}th", position + 1),
    }
}

/// Exactly `N` arguments, all non-empty
pub fn positional<'a, const N: usize>(
    args: &'a [String],
    expecting: &str,
) -> ServiceResult<[&'a str; N]> {
    if args.len() != N {
        return Err(ServiceError::InvalidArgument(format!(
            "Incorrect number of arguments. Expecting {}",
            expecting
        )));
    }

    let mut out: [&'a str; N] = [""; N];
    for (i, arg) in args.iter().enumerate() {
        if arg.is_empty() {
            return Err(ServiceError::InvalidArgument(format!(
                "{} argument must be a non-empty string",
                ordinal(i)
            )));
        }
        out[i] = arg.as_str();
    }
    Ok(out)
}
