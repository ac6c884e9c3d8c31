//! Pi-Cam-Preview: live desktop preview for a Raspberry Pi camera
//!
//! This library provides trait-based abstractions over the camera device
//! and the preview surface, plus the startup sequence that wires them
//! together: configure the device at the preview resolution, open the
//! surface, stream frames to it until a termination signal arrives, then
//! shut both down in order. The traits enable production use with real
//! hardware and testing with mock collaborators.

pub mod device;
pub mod preview;
pub mod session;
pub mod traits;

#[cfg(test)]
pub mod mock;

pub use device::V4L2Device;
pub use preview::{FfplayPreview, NullPreview};
pub use session::{run, BUFFER_COUNT, PREVIEW_SIZE};
pub use traits::{
    CameraDevice, CaptureStream, DeviceCapabilities, Format, FourCC, Frame, FrameMetadata,
    PreviewSurface, StreamConfig,
};
