//! The preview startup sequence.
//!
//! Configure the device, open the preview surface, start streaming, then
//! pump frames to the surface until shutdown is requested. The pump loop
//! is what keeps the process alive; the shutdown flag is set from the
//! termination-signal handler.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::traits::{CameraDevice, CaptureStream, PreviewSurface, Result, StreamConfig};

/// Preview resolution requested from the camera.
pub const PREVIEW_SIZE: (u32, u32) = (1280, 720);

/// Number of capture buffers in the streaming queue.
pub const BUFFER_COUNT: u32 = 4;

/// Run the preview session until `shutdown` is set.
///
/// Steps, strictly in order: apply `config` to the device, start the
/// preview surface, start streaming, pump frames. Any failure propagates
/// immediately and the remaining steps never run. On shutdown the stream
/// is dropped (stopping capture) before the surface is torn down.
pub fn run<D, P>(
    device: &mut D,
    preview: &mut P,
    config: &StreamConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    D: CameraDevice,
    P: PreviewSurface,
{
    let actual = device.configure(config)?;
    preview.start(&actual.main)?;

    let mut stream = device.start_stream(BUFFER_COUNT)?;

    while !shutdown.load(Ordering::SeqCst) {
        let frame = match stream.next_frame() {
            Ok(frame) => frame,
            // The termination signal can interrupt the blocking read.
            Err(_) if shutdown.load(Ordering::SeqCst) => break,
            Err(err) => return Err(err),
        };
        preview.push_frame(&frame)?;
    }

    // Capture stops before the surface goes away.
    drop(stream);
    preview.stop()?;
    Ok(())
}
