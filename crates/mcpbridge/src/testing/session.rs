//! In-memory stdio sessions.

use std::io::Cursor;

use mcpbridge_backend::Sender;
use mcpbridge_core::CancellationToken;
use mcpbridge_server::Bridge;
use mcpbridge_transport::{CodecError, TransportError};

/// Feeds `lines` to the bridge as one input stream and returns the parsed
/// response lines.
///
/// Each entry is written followed by a newline, so an empty entry is a
/// blank input line.
pub fn run_lines<S: Sender>(
    bridge: &Bridge<S>,
    lines: &[&str],
) -> Result<Vec<serde_json::Value>, TransportError> {
    let mut input = String::new();
    for line in lines {
        input.push_str(line);
        input.push('\n');
    }
    let mut output = Vec::new();
    bridge.run(&CancellationToken::new(), Cursor::new(input), &mut output)?;
    parse_responses(&output).map_err(|e| TransportError::Codec(CodecError::Json(e)))
}

/// Parses newline-delimited JSON output, one value per line.
pub fn parse_responses(output: &[u8]) -> Result<Vec<serde_json::Value>, serde_json::Error> {
    output
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(serde_json::from_slice::<serde_json::Value>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSender;

    #[test]
    fn parses_each_line() {
        let values = parse_responses(b"{\"id\":1}\n{\"id\":2}\n").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1]["id"], 2);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_responses(b"not json\n").is_err());
    }

    #[test]
    fn runs_a_ping() {
        let bridge = Bridge::new(MockSender::failing("unused"));
        let responses =
            run_lines(&bridge, &[r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#]).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["result"], serde_json::json!({}));
    }
}
