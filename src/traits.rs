//! Core traits and types for the camera preview pipeline.

use std::time::Duration;

/// Pixel format representation (e.g., YUYV, MJPG, RGB3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create a new `FourCC` from a 4-byte array.
    #[must_use]
    pub const fn new(code: &[u8; 4]) -> Self {
        Self(*code)
    }

    /// YUYV pixel format (4:2:2 packed).
    pub const YUYV: Self = Self::new(b"YUYV");
    /// MJPEG pixel format (Motion JPEG).
    pub const MJPG: Self = Self::new(b"MJPG");
    /// RGB3 pixel format (24-bit RGB).
    pub const RGB3: Self = Self::new(b"RGB3");
}

impl From<v4l::FourCC> for FourCC {
    fn from(fourcc: v4l::FourCC) -> Self {
        Self(fourcc.repr)
    }
}

impl From<FourCC> for v4l::FourCC {
    fn from(fourcc: FourCC) -> Self {
        Self::new(&fourcc.0)
    }
}

/// Video format specification for one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format.
    pub fourcc: FourCC,
    /// Bytes per line (stride).
    pub stride: u32,
    /// Total frame size in bytes.
    pub size: u32,
}

impl Format {
    /// Create a new format specification.
    #[must_use]
    pub const fn new(width: u32, height: u32, fourcc: FourCC) -> Self {
        let stride = width * 2; // YUYV is 2 bytes per pixel
        let size = stride * height;
        Self {
            width,
            height,
            fourcc,
            stride,
            size,
        }
    }
}

/// Stream configuration requested from the camera.
///
/// Built once, applied once. `configure` returns the configuration the
/// driver actually accepted, which may differ from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Format of the main (preview) stream.
    pub main: Format,
}

impl StreamConfig {
    /// Build a preview configuration for the given `(width, height)` size.
    ///
    /// The preview stream uses YUYV, the packed format every UVC and Pi
    /// camera pipeline can deliver without an encoder in the path.
    #[must_use]
    pub const fn preview(size: (u32, u32)) -> Self {
        Self {
            main: Format::new(size.0, size.1, FourCC::YUYV),
        }
    }
}

/// Device capability flags.
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    /// Driver name.
    pub driver: String,
    /// Card/device name.
    pub card: String,
    /// Bus information.
    pub bus_info: String,
    /// Whether the device can capture video.
    pub can_capture: bool,
    /// Whether the device supports streaming.
    pub can_stream: bool,
}

/// Metadata for a captured frame.
#[derive(Debug, Clone)]
pub struct FrameMetadata {
    /// Frame sequence number.
    pub sequence: u32,
    /// Capture timestamp.
    pub timestamp: Duration,
    /// Actual bytes used in the frame buffer.
    pub bytes_used: u32,
}

/// A captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw frame data.
    pub data: Vec<u8>,
    /// Frame metadata.
    pub metadata: FrameMetadata,
}

/// Error type for camera and preview operations.
#[derive(Debug)]
pub enum CameraError {
    /// Device with given index was not found.
    DeviceNotFound(u32),
    /// Failed to open device.
    DeviceOpenFailed(String),
    /// Requested stream configuration was rejected.
    ConfigurationRejected(String),
    /// Error during streaming operation.
    StreamError(String),
    /// Preview surface could not be started or has gone away.
    PreviewError(String),
    /// I/O error.
    Io(std::io::Error),
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeviceNotFound(idx) => write!(f, "Device {idx} not found"),
            Self::DeviceOpenFailed(msg) => write!(f, "Failed to open device: {msg}"),
            Self::ConfigurationRejected(msg) => {
                write!(f, "Stream configuration rejected: {msg}")
            }
            Self::StreamError(msg) => write!(f, "Stream error: {msg}"),
            Self::PreviewError(msg) => write!(f, "Preview error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type for camera and preview operations.
pub type Result<T> = std::result::Result<T, CameraError>;

/// Abstraction over camera device operations.
pub trait CameraDevice {
    /// The stream type returned by `start_stream`.
    type Stream<'a>: CaptureStream
    where
        Self: 'a;

    /// Get device capabilities.
    fn capabilities(&self) -> &DeviceCapabilities;

    /// Apply a stream configuration. Returns the configuration the driver
    /// actually set, which may differ from the request.
    fn configure(&mut self, config: &StreamConfig) -> Result<StreamConfig>;

    /// Start streaming with the specified number of capture buffers.
    ///
    /// Streaming stops when the returned stream is dropped.
    fn start_stream(&mut self, buffer_count: u32) -> Result<Self::Stream<'_>>;
}

/// Abstraction over capture stream operations.
pub trait CaptureStream {
    /// Capture the next frame from the stream.
    fn next_frame(&mut self) -> Result<Frame>;
}

/// Abstraction over a live preview rendering destination.
pub trait PreviewSurface {
    /// Start the rendering surface for streams of the given format.
    fn start(&mut self, format: &Format) -> Result<()>;

    /// Present one captured frame.
    fn push_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Tear the surface down. Called after streaming has stopped.
    fn stop(&mut self) -> Result<()>;
}
