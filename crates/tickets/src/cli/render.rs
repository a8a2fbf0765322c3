//! JSON output. Everything printed to stdout goes through here.

use std::io::Write;

use serde::Serialize;

/// Pretty JSON for one value, newline-terminated.
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = to_json(value)?;
    std::io::stdout().lock().write_all(out.as_bytes())?;
    Ok(())
}
