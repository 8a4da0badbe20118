//! Presentation shell reached over a newline-delimited JSON stream.

use std::io::Write;

use kernel::{Mesh, Shape, coarse_bounds, tessellation};
use solidview_config::{DisplayConfig, TessellationConfig};
use solidview_ipc::{Color, CoreToShell, MeshPayload, ViewportInfo};
use solidview_session::{Handle, PresentationShell, SelectionSnapshot, ShellError};

/// Writes [`CoreToShell`] messages, one JSON object per line.
///
/// Shapes are tessellated here, at a deflection proportional to their size,
/// so the shell process only ever sees triangles and line strips.
pub struct IpcShell<W: Write> {
    writer: W,
    tessellation: TessellationConfig,
}

impl<W: Write> IpcShell<W> {
    /// Announce the viewport to the shell. Failing here means the shell
    /// never came up.
    pub fn connect(
        writer: W,
        display: &DisplayConfig,
        tessellation: TessellationConfig,
    ) -> Result<Self, ShellError> {
        let mut shell = Self {
            writer,
            tessellation,
        };
        let viewport = ViewportInfo {
            width: display.width,
            height: display.height,
            scale: display.scale,
        };
        shell
            .send(&CoreToShell::Initialize { viewport })
            .map_err(|e| ShellError::Initialization(e.to_string()))?;
        let (width, height, scale) = (display.width, display.height, display.scale);
        tracing::info!("Shell connected ({}x{} @ {})", width, height, scale);
        Ok(shell)
    }

    pub fn send(&mut self, message: &CoreToShell) -> Result<(), ShellError> {
        let line =
            solidview_ipc::encode(message).map_err(|e| ShellError::Disconnected(e.to_string()))?;
        writeln!(self.writer, "{}", line)
            .and_then(|()| self.writer.flush())
            .map_err(|e| ShellError::Disconnected(e.to_string()))
    }

    /// Report a failed command to the user.
    pub fn send_error(&mut self, code: &str, message: &str) -> Result<(), ShellError> {
        self.send(&CoreToShell::Error {
            code: code.to_string(),
            message: message.to_string(),
        })
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn mesh(&self, handle: Handle, shape: &Shape) -> Result<MeshPayload, ShellError> {
        let bounds = coarse_bounds(shape);
        let extent = if bounds.is_void() {
            0.0
        } else {
            bounds.max_extent()
        };
        let deflection = self.tessellation.display_deflection(extent);
        let mesh = tessellation::tessellate(shape, deflection).map_err(|e| {
            ShellError::Rejected {
                handle,
                reason: e.to_string(),
            }
        })?;
        Ok(to_payload(&mesh))
    }
}

impl<W: Write> PresentationShell for IpcShell<W> {
    fn display(
        &mut self,
        handle: Handle,
        shape: &Shape,
        color: Option<Color>,
        transparency: f32,
    ) -> Result<(), ShellError> {
        let mesh = self.mesh(handle, shape)?;
        tracing::trace!(
            "Sending {} triangles for handle {}",
            mesh.triangle_count(),
            handle
        );
        self.send(&CoreToShell::Display {
            handle: handle.into(),
            color,
            transparency,
            mesh,
        })
    }

    fn undisplay(&mut self, handle: Handle) -> Result<(), ShellError> {
        self.send(&CoreToShell::Undisplay {
            handle: handle.into(),
        })
    }

    fn notify_selection_changed(&mut self, selection: &SelectionSnapshot) -> Result<(), ShellError> {
        self.send(&CoreToShell::SelectionChanged(selection.to_info()))
    }

    fn request_redraw(&mut self) -> Result<(), ShellError> {
        self.send(&CoreToShell::RequestRedraw)
    }
}

fn to_payload(mesh: &Mesh) -> MeshPayload {
    MeshPayload {
        positions: mesh
            .positions
            .iter()
            .map(|p| p.as_vec3().to_array())
            .collect(),
        indices: mesh.triangles.iter().flatten().copied().collect(),
        polylines: mesh.polylines.clone(),
        points: mesh.points.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use kernel::{BRepKernel, Frame, GeometryKernel, Primitive};
    use std::io;

    fn lines(bytes: &[u8]) -> Vec<CoreToShell> {
        std::str::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| solidview_ipc::decode(line).unwrap())
            .collect()
    }

    fn connected() -> IpcShell<Vec<u8>> {
        IpcShell::connect(
            Vec::new(),
            &DisplayConfig::default(),
            TessellationConfig::default(),
        )
        .unwrap()
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_connect_sends_viewport() {
        let mut shell = connected();
        let sent = lines(&std::mem::take(shell.writer_mut()));
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            CoreToShell::Initialize { viewport } => {
                assert_eq!(viewport.width, solidview_config::DEFAULT_WIDTH);
                assert_eq!(viewport.height, solidview_config::DEFAULT_HEIGHT);
            }
            other => panic!("Expected Initialize, got {:?}", other),
        }
    }

    #[test]
    fn test_connect_failure_is_initialization_error() {
        let result = IpcShell::connect(
            Closed,
            &DisplayConfig::default(),
            TessellationConfig::default(),
        );
        assert!(matches!(result, Err(ShellError::Initialization(_))));
    }

    #[test]
    fn test_display_box_mesh() {
        let mut shell = connected();
        let shape = BRepKernel
            .construct(&Primitive::Box {
                frame: Frame::WORLD,
                dx: 3.0,
                dy: 4.0,
                dz: 5.0,
            })
            .unwrap();
        shell
            .display(Handle(0), &shape, Some(Color::AZURE), 0.0)
            .unwrap();

        let sent = lines(&std::mem::take(shell.writer_mut()));
        match &sent[1] {
            CoreToShell::Display {
                handle,
                color,
                mesh,
                ..
            } => {
                assert_eq!(*handle, 0);
                assert_eq!(*color, Some(Color::AZURE));
                assert_eq!(mesh.triangle_count(), 12);
                assert!(mesh.positions.contains(&[3.0, 4.0, 5.0]));
            }
            other => panic!("Expected Display, got {:?}", other),
        }
    }

    #[test]
    fn test_free_vertex_becomes_point() {
        let mut shell = connected();
        let vertex = Shape::vertex(DVec3::new(1.0, 2.0, 3.0));
        shell.display(Handle(4), &vertex, None, 0.0).unwrap();

        let sent = lines(&std::mem::take(shell.writer_mut()));
        match &sent[1] {
            CoreToShell::Display { mesh, .. } => {
                assert_eq!(mesh.points, vec![0]);
                assert_eq!(mesh.positions, vec![[1.0, 2.0, 3.0]]);
            }
            other => panic!("Expected Display, got {:?}", other),
        }
    }

    #[test]
    fn test_undisplay_redraw_and_error() {
        let mut shell = connected();
        shell.undisplay(Handle(9)).unwrap();
        shell.request_redraw().unwrap();
        shell.send_error("unknown_handle", "gone").unwrap();

        let sent = lines(&std::mem::take(shell.writer_mut()));
        assert!(matches!(sent[1], CoreToShell::Undisplay { handle: 9 }));
        assert!(matches!(sent[2], CoreToShell::RequestRedraw));
        assert!(matches!(&sent[3], CoreToShell::Error { code, .. } if code == "unknown_handle"));
    }

    #[test]
    fn test_selection_snapshot_is_forwarded() {
        let mut shell = connected();
        shell
            .notify_selection_changed(&SelectionSnapshot::default())
            .unwrap();
        let sent = lines(&std::mem::take(shell.writer_mut()));
        assert!(matches!(&sent[1], CoreToShell::SelectionChanged(info) if info.shapes.is_empty()));
    }
}
