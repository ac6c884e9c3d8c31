//! Preview surface implementations.
//!
//! The desktop preview delegates rendering to an external player process
//! (ffplay by default) that reads raw frames on stdin. `NullPreview`
//! discards frames for headless runs and integration tests.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::traits::{CameraError, Format, FourCC, Frame, PreviewSurface, Result};

/// Default rendering backend binary.
pub const DEFAULT_RENDERER: &str = "ffplay";

/// Map a capture pixel format to the renderer's rawvideo pixel format name.
///
/// Returns `None` for compressed formats, which cannot be fed through the
/// rawvideo path.
fn renderer_pixel_format(fourcc: FourCC) -> Option<&'static str> {
    match fourcc {
        FourCC::YUYV => Some("yuyv422"),
        FourCC::RGB3 => Some("rgb24"),
        _ => None,
    }
}

/// Desktop preview backed by an external renderer process.
///
/// `start` spawns the renderer with a rawvideo input on stdin;
/// `push_frame` writes one frame down the pipe; `stop` closes the pipe
/// and reaps the child. The `Drop` impl makes sure the child is never
/// leaked, whichever way the caller unwinds.
pub struct FfplayPreview {
    renderer: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_thread: Option<JoinHandle<()>>,
}

impl Default for FfplayPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl FfplayPreview {
    /// Create a preview using the default renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_renderer(DEFAULT_RENDERER)
    }

    /// Create a preview using a specific renderer binary by name.
    #[must_use]
    pub fn with_renderer(renderer: &str) -> Self {
        Self {
            renderer: renderer.to_owned(),
            child: None,
            stdin: None,
            stderr_thread: None,
        }
    }

    fn renderer_args(format: &Format) -> Result<Vec<String>> {
        let pixel_format = renderer_pixel_format(format.fourcc).ok_or_else(|| {
            CameraError::PreviewError(format!(
                "no rawvideo pixel format for {:?}",
                format.fourcc
            ))
        })?;

        Ok(vec![
            "-hide_banner".to_owned(),
            "-loglevel".to_owned(),
            "warning".to_owned(),
            "-f".to_owned(),
            "rawvideo".to_owned(),
            "-pixel_format".to_owned(),
            pixel_format.to_owned(),
            "-video_size".to_owned(),
            format!("{}x{}", format.width, format.height),
            "-window_title".to_owned(),
            "Camera Preview".to_owned(),
            "-i".to_owned(),
            "-".to_owned(),
        ])
    }
}

impl PreviewSurface for FfplayPreview {
    fn start(&mut self, format: &Format) -> Result<()> {
        let args = Self::renderer_args(format)?;
        debug!("starting renderer: {} {}", self.renderer, args.join(" "));

        let mut child = Command::new(&self.renderer)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    CameraError::PreviewError(format!(
                        "renderer `{}` not found on PATH",
                        self.renderer
                    ))
                } else {
                    CameraError::Io(err)
                }
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            CameraError::PreviewError("renderer did not expose a stdin pipe".to_owned())
        })?;

        // Drain renderer diagnostics so the pipe never fills up.
        if let Some(stderr) = child.stderr.take() {
            let renderer = self.renderer.clone();
            self.stderr_thread = Some(thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(std::result::Result::ok) {
                    warn!("{renderer}: {line}");
                }
            }));
        }

        self.child = Some(child);
        self.stdin = Some(stdin);
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            CameraError::PreviewError("preview surface not started".to_owned())
        })?;

        stdin.write_all(&frame.data).map_err(|err| {
            CameraError::PreviewError(format!("renderer pipe closed: {err}"))
        })
    }

    fn stop(&mut self) -> Result<()> {
        // Closing stdin signals end of input to the renderer.
        self.stdin.take();

        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                child.kill()?;
            }
            let status = child.wait()?;
            debug!("renderer exited: {status}");
        }

        if let Some(handle) = self.stderr_thread.take() {
            let _ = handle.join();
        }

        Ok(())
    }
}

impl Drop for FfplayPreview {
    fn drop(&mut self) {
        if self.child.is_some() {
            let _ = self.stop();
        }
    }
}

/// Preview surface that counts and discards frames.
///
/// Useful when no display is reachable, and as the surface for
/// integration tests against virtual cameras.
#[derive(Debug, Default)]
pub struct NullPreview {
    started: bool,
    frames: u64,
}

impl NullPreview {
    /// Create a new null preview.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented since `start`.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames
    }
}

impl PreviewSurface for NullPreview {
    fn start(&mut self, _format: &Format) -> Result<()> {
        self.started = true;
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, _frame: &Frame) -> Result<()> {
        if !self.started {
            return Err(CameraError::PreviewError(
                "preview surface not started".to_owned(),
            ));
        }
        self.frames += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.started = false;
        Ok(())
    }
}
