//! IPC message protocol for solidview
//!
//! Defines all message types exchanged between the session core and the
//! presentation shell. Messages travel as newline-delimited JSON: the shell
//! sends [`ShellToCore`] commands, the core answers with [`CoreToShell`]
//! display instructions.

pub mod commands;
pub mod error;
pub mod messages;
pub mod types;

pub use commands::*;
pub use error::IpcError;
pub use messages::*;
pub use types::*;

/// Encode one message as a single JSON line (without the trailing newline).
pub fn encode<T: serde::Serialize>(message: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode one JSON line into a message.
pub fn decode<T: serde::de::DeserializeOwned>(line: &str) -> Result<T, IpcError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(IpcError::InvalidFormat("empty line".to_string()));
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let line = r#"{"type":"Selection","data":{"EnterMode":{"kind":"Edge"}}}"#;
        let msg: ShellToCore = decode(line).unwrap();
        assert!(matches!(
            msg,
            ShellToCore::Selection(SelectionCommand::EnterMode {
                kind: SelectionKind::Edge
            })
        ));
    }

    #[test]
    fn test_unit_command_wire_format() {
        let msg: ShellToCore = decode(r#"{"type":"LayoutReady"}"#).unwrap();
        assert!(matches!(msg, ShellToCore::LayoutReady));

        let msg: ShellToCore = decode(r#"{"type":"Primitive","data":"MakeBox"}"#).unwrap();
        assert!(matches!(msg, ShellToCore::Primitive(PrimitiveCommand::MakeBox)));
    }

    #[test]
    fn test_error_message_encoding() {
        let text = encode(&CoreToShell::Error {
            code: "unknown_handle".to_string(),
            message: "No shape registered under handle 7".to_string(),
        })
        .unwrap();
        assert!(text.starts_with(r#"{"type":"Error""#));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_decode_rejects_blank_and_garbage() {
        assert!(matches!(
            decode::<ShellToCore>("   "),
            Err(IpcError::InvalidFormat(_))
        ));
        assert!(matches!(
            decode::<ShellToCore>("{not json"),
            Err(IpcError::Serialize(_))
        ));
    }
}
