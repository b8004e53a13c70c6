//! JSON output for the CLI
//!
//! - One JSON object per invocation on stdout
//! - Logs never go to stdout

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(writer, &response)
}

/// Write an error response carrying a detail payload
pub fn write_error<W: Write>(writer: &mut W, code: &str, details: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "details": details
    });
    write_line(writer, &response)
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Locked stdout handle
pub fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_response_one_line() {
        let mut buffer = Vec::new();
        write_response(&mut buffer, json!({ "namespaces": 2 })).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.matches('\n').count(), 1);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["namespaces"], 2);
    }

    #[test]
    fn test_write_error() {
        let mut buffer = Vec::new();
        write_error(&mut buffer, "SOME_CODE", json!([1, 2])).unwrap();

        let parsed: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "SOME_CODE");
        assert_eq!(parsed["details"], json!([1, 2]));
    }
}
