//! JSON output for CLI commands
//!
//! One JSON document per invocation on stdout, UTF-8 only.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write `value` as JSON to stdout
pub fn write_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_json_to(&mut stdout, value, pretty)
}

fn write_json_to<W: Write, T: Serialize>(writer: &mut W, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
