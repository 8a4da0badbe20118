//! Line-oriented command loop.

use std::io::{BufRead, Write};

use kernel::GeometryKernel;
use solidview_ipc::ShellToCore;
use solidview_session::{Session, ShellError};

use crate::commands::{Dispatcher, Flow};
use crate::shell::IpcShell;

/// Error code sent back for lines that do not decode as a command.
pub const INVALID_MESSAGE: &str = "invalid_message";

/// Read commands from `input` until `Quit` or end of input.
///
/// Command failures are reported to the shell and the loop goes on; only a
/// broken input stream or a shell that can no longer be written to ends it
/// with an error.
pub fn run<R, K, W>(
    input: R,
    session: &mut Session<K, IpcShell<W>>,
    dispatcher: &mut Dispatcher,
) -> Result<(), ShellError>
where
    R: BufRead,
    K: GeometryKernel,
    W: Write,
{
    for line in input.lines() {
        let line = line.map_err(|e| ShellError::Disconnected(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match solidview_ipc::decode::<ShellToCore>(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Ignoring malformed command: {}", e);
                session
                    .shell_mut()
                    .send_error(INVALID_MESSAGE, &e.to_string())?;
                continue;
            }
        };

        let handled = dispatcher.handle(session, command);
        for error in &handled.errors {
            tracing::warn!("Command failed: {}", error);
            session
                .shell_mut()
                .send_error(error.code(), &error.to_string())?;
        }
        if handled.flow == Flow::Quit {
            return Ok(());
        }
    }

    tracing::info!("Input closed, ending session");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::BRepKernel;
    use solidview_config::SessionConfig;
    use solidview_ipc::CoreToShell;
    use std::io::Cursor;

    fn run_script(script: &str) -> Vec<CoreToShell> {
        let config = SessionConfig::default();
        let shell =
            IpcShell::connect(Vec::new(), &config.display, config.tessellation.clone()).unwrap();
        let mut session = Session::new(BRepKernel, shell, &config);
        let mut dispatcher = Dispatcher::new();

        run(Cursor::new(script), &mut session, &mut dispatcher).unwrap();

        let out = std::mem::take(session.shell_mut().writer_mut());
        std::str::from_utf8(&out)
            .unwrap()
            .lines()
            .map(|line| solidview_ipc::decode(line).unwrap())
            .collect()
    }

    #[test]
    fn test_box_then_redraw() {
        let sent = run_script(concat!(
            r#"{"type":"Primitive","data":"MakeBox"}"#,
            "\n\n",
            r#"{"type":"LayoutReady"}"#,
            "\n",
            r#"{"type":"LayoutReady"}"#,
            "\n",
        ));
        assert!(matches!(sent[0], CoreToShell::Initialize { .. }));
        assert!(matches!(sent[1], CoreToShell::Display { handle: 0, .. }));
        assert!(matches!(sent[2], CoreToShell::RequestRedraw));
        assert_eq!(sent.len(), 3);
    }

    #[test]
    fn test_malformed_line_reports_and_continues() {
        let sent = run_script(concat!(
            "{not json\n",
            r#"{"type":"Delete","data":{"handle":5}}"#,
            "\n",
        ));
        assert!(matches!(&sent[1], CoreToShell::Error { code, .. } if code == INVALID_MESSAGE));
        assert!(matches!(&sent[2], CoreToShell::Error { code, .. } if code == "unknown_handle"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let sent = run_script(concat!(
            r#"{"type":"Quit"}"#,
            "\n",
            r#"{"type":"Primitive","data":"MakeSphere"}"#,
            "\n",
        ));
        assert_eq!(sent.len(), 1);
    }
}
