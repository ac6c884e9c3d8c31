//! V4L2 device implementation using the v4l crate.

use log::warn;
use std::path::Path;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream as V4lCaptureStream;
use v4l::video::Capture;
use v4l::Device;

use crate::traits::{
    CameraDevice, CameraError, CaptureStream, DeviceCapabilities, Format, FourCC, Frame,
    FrameMetadata, Result, StreamConfig,
};
use std::time::Duration;

/// V4L2 device implementation wrapping the v4l crate.
///
/// The handle owns the device file descriptor for its lifetime; the
/// descriptor is released when the handle is dropped.
pub struct V4L2Device {
    device: Device,
    capabilities: DeviceCapabilities,
}

impl V4L2Device {
    /// Open a V4L2 device by index (e.g., 0 for /dev/video0).
    pub fn open(index: u32) -> Result<Self> {
        if !Path::new(&format!("/dev/video{index}")).exists() {
            return Err(CameraError::DeviceNotFound(index));
        }

        let device = Device::new(index as usize)
            .map_err(|err| CameraError::DeviceOpenFailed(err.to_string()))?;

        let caps = device
            .query_caps()
            .map_err(|err| CameraError::DeviceOpenFailed(err.to_string()))?;

        let capabilities = DeviceCapabilities {
            driver: caps.driver,
            card: caps.card,
            bus_info: caps.bus,
            can_capture: caps
                .capabilities
                .contains(v4l::capability::Flags::VIDEO_CAPTURE),
            can_stream: caps.capabilities.contains(v4l::capability::Flags::STREAMING),
        };

        if !capabilities.can_capture || !capabilities.can_stream {
            return Err(CameraError::DeviceOpenFailed(format!(
                "{} does not support streaming capture",
                capabilities.card
            )));
        }

        Ok(Self {
            device,
            capabilities,
        })
    }
}

impl CameraDevice for V4L2Device {
    type Stream<'a> = V4L2Stream<'a>;

    fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    fn configure(&mut self, config: &StreamConfig) -> Result<StreamConfig> {
        let mut fmt = self
            .device
            .format()
            .map_err(|err| CameraError::ConfigurationRejected(err.to_string()))?;

        fmt.width = config.main.width;
        fmt.height = config.main.height;
        fmt.fourcc = config.main.fourcc.into();

        let fmt = self
            .device
            .set_format(&fmt)
            .map_err(|err| CameraError::ConfigurationRejected(err.to_string()))?;

        let actual = Format {
            width: fmt.width,
            height: fmt.height,
            fourcc: FourCC::from(fmt.fourcc),
            stride: fmt.stride,
            size: fmt.size,
        };

        if actual.width != config.main.width || actual.height != config.main.height {
            warn!(
                "driver adjusted preview size: requested {}x{}, got {}x{}",
                config.main.width, config.main.height, actual.width, actual.height
            );
        }

        Ok(StreamConfig { main: actual })
    }

    fn start_stream(&mut self, buffer_count: u32) -> Result<Self::Stream<'_>> {
        let stream = Stream::with_buffers(&self.device, Type::VideoCapture, buffer_count)
            .map_err(|err| CameraError::StreamError(err.to_string()))?;

        Ok(V4L2Stream { stream })
    }
}

/// V4L2 capture stream wrapping mmap-based streaming.
///
/// Dropping the stream issues STREAMOFF and releases the buffers.
pub struct V4L2Stream<'a> {
    stream: Stream<'a>,
}

impl CaptureStream for V4L2Stream<'_> {
    fn next_frame(&mut self) -> Result<Frame> {
        let (buf, meta) = self
            .stream
            .next()
            .map_err(|err| CameraError::StreamError(err.to_string()))?;

        // Safe conversions: V4L2 timestamps are always non-negative in practice
        #[allow(clippy::cast_sign_loss)]
        let secs = meta.timestamp.sec.max(0) as u64;
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let nanos = (meta.timestamp.usec.max(0) as u32).saturating_mul(1000);

        Ok(Frame {
            data: buf.to_vec(),
            metadata: FrameMetadata {
                sequence: meta.sequence,
                timestamp: Duration::new(secs, nanos),
                bytes_used: meta.bytesused,
            },
        })
    }
}
