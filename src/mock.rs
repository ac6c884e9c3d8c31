//! Mock collaborators for testing the preview sequence without hardware.
//!
//! The mocks share an event journal recording every call in order, so
//! tests can assert on cross-collaborator sequencing (configure before
//! preview start, streaming stop before surface teardown, and so on).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{
    CameraDevice, CameraError, CaptureStream, DeviceCapabilities, Format, Frame, FrameMetadata,
    PreviewSurface, Result, StreamConfig,
};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Device received a configuration with this main-stream size.
    Configured(u32, u32),
    /// Preview surface started for this size.
    PreviewStarted(u32, u32),
    /// Device entered streaming state.
    StreamStarted,
    /// Stream produced the frame with this sequence number.
    FrameDelivered(u32),
    /// Surface presented the frame with this sequence number.
    FramePresented(u32),
    /// Device left streaming state.
    StreamStopped,
    /// Preview surface torn down.
    PreviewStopped,
}

/// Shared, ordered record of collaborator calls.
pub type Journal = Arc<Mutex<Vec<Event>>>;

/// Create an empty journal.
#[must_use]
pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(journal: &Journal, event: Event) {
    journal.lock().expect("journal poisoned").push(event);
}

/// Mock camera device.
pub struct MockDevice {
    capabilities: DeviceCapabilities,
    config: Option<StreamConfig>,
    journal: Journal,
    frame_count: u32,
    fail_configure: bool,
    fail_stream: bool,
    stop_after: Option<(u32, Arc<AtomicBool>)>,
}

impl MockDevice {
    /// Create a mock device recording into `journal`.
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            capabilities: DeviceCapabilities {
                driver: "mock".to_owned(),
                card: "Mock Camera".to_owned(),
                bus_info: "mock:0".to_owned(),
                can_capture: true,
                can_stream: true,
            },
            config: None,
            journal,
            frame_count: 0,
            fail_configure: false,
            fail_stream: false,
            stop_after: None,
        }
    }

    /// Make `configure` fail.
    #[must_use]
    pub const fn failing_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    /// Make `start_stream` fail.
    #[must_use]
    pub const fn failing_stream(mut self) -> Self {
        self.fail_stream = true;
        self
    }

    /// Raise `flag` while delivering the `count`-th frame, so a pump loop
    /// driven by the flag terminates after exactly `count` frames.
    #[must_use]
    pub fn stop_after(mut self, count: u32, flag: Arc<AtomicBool>) -> Self {
        self.stop_after = Some((count, flag));
        self
    }
}

impl CameraDevice for MockDevice {
    type Stream<'a> = MockStream<'a>;

    fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    fn configure(&mut self, config: &StreamConfig) -> Result<StreamConfig> {
        if self.fail_configure {
            return Err(CameraError::ConfigurationRejected(
                "mock configure failure".to_owned(),
            ));
        }
        record(
            &self.journal,
            Event::Configured(config.main.width, config.main.height),
        );
        self.config = Some(config.clone());
        Ok(config.clone())
    }

    fn start_stream(&mut self, _buffer_count: u32) -> Result<Self::Stream<'_>> {
        if self.fail_stream {
            return Err(CameraError::StreamError("mock stream failure".to_owned()));
        }
        // Streaming before configuration is a sequencing bug.
        if self.config.is_none() {
            return Err(CameraError::StreamError(
                "stream started before configure".to_owned(),
            ));
        }
        record(&self.journal, Event::StreamStarted);
        Ok(MockStream { device: self })
    }
}

/// Mock capture stream. Records frame delivery and, on drop, the end of
/// the device's streaming state.
pub struct MockStream<'a> {
    device: &'a mut MockDevice,
}

impl CaptureStream for MockStream<'_> {
    fn next_frame(&mut self) -> Result<Frame> {
        let format = self
            .device
            .config
            .as_ref()
            .map_or_else(|| Format::new(640, 480, crate::traits::FourCC::YUYV), |c| c.main.clone());

        let seq = self.device.frame_count;
        self.device.frame_count += 1;

        if let Some((count, flag)) = &self.device.stop_after {
            if seq + 1 >= *count {
                flag.store(true, Ordering::SeqCst);
            }
        }

        record(&self.device.journal, Event::FrameDelivered(seq));

        let size = (format.width * format.height * 2) as usize; // YUYV
        Ok(Frame {
            data: vec![0x80; size],
            metadata: FrameMetadata {
                sequence: seq,
                timestamp: Duration::from_millis(u64::from(seq) * 33), // ~30fps
                bytes_used: format.size,
            },
        })
    }
}

impl Drop for MockStream<'_> {
    fn drop(&mut self) {
        record(&self.device.journal, Event::StreamStopped);
    }
}

/// Mock preview surface.
pub struct MockPreview {
    journal: Journal,
    started: bool,
    fail_start: bool,
}

impl MockPreview {
    /// Create a mock preview recording into `journal`.
    #[must_use]
    pub const fn new(journal: Journal) -> Self {
        Self {
            journal,
            started: false,
            fail_start: false,
        }
    }

    /// Make `start` fail, as when no display is reachable.
    #[must_use]
    pub const fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

impl PreviewSurface for MockPreview {
    fn start(&mut self, format: &Format) -> Result<()> {
        if self.fail_start {
            return Err(CameraError::PreviewError(
                "mock display unavailable".to_owned(),
            ));
        }
        record(
            &self.journal,
            Event::PreviewStarted(format.width, format.height),
        );
        self.started = true;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> Result<()> {
        if !self.started {
            return Err(CameraError::PreviewError(
                "push_frame before start".to_owned(),
            ));
        }
        record(&self.journal, Event::FramePresented(frame.metadata.sequence));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        record(&self.journal, Event::PreviewStopped);
        self.started = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FourCC;

    #[test]
    fn mock_device_reports_capabilities() {
        let device = MockDevice::new(new_journal());
        assert_eq!(device.capabilities().driver, "mock");
        assert!(device.capabilities().can_capture);
        assert!(device.capabilities().can_stream);
    }

    #[test]
    fn mock_device_echoes_configuration() {
        let mut device = MockDevice::new(new_journal());
        let config = StreamConfig::preview((1280, 720));
        let actual = device.configure(&config).expect("configure should succeed");
        assert_eq!(actual, config);
    }

    #[test]
    fn mock_stream_numbers_frames_sequentially() {
        let mut device = MockDevice::new(new_journal());
        device
            .configure(&StreamConfig::preview((64, 64)))
            .expect("configure should succeed");
        let mut stream = device.start_stream(4).expect("start_stream should succeed");

        let frame1 = stream.next_frame().expect("next_frame should succeed");
        assert_eq!(frame1.metadata.sequence, 0);
        assert!(!frame1.data.is_empty());

        let frame2 = stream.next_frame().expect("next_frame should succeed");
        assert_eq!(frame2.metadata.sequence, 1);
    }

    #[test]
    fn streaming_before_configure_is_rejected() {
        let mut device = MockDevice::new(new_journal());
        assert!(device.start_stream(4).is_err());
    }

    #[test]
    fn frame_size_matches_configured_format() {
        let mut device = MockDevice::new(new_journal());
        let config = StreamConfig {
            main: Format::new(64, 64, FourCC::YUYV),
        };
        device.configure(&config).expect("configure should succeed");
        let mut stream = device.start_stream(1).expect("start_stream should succeed");

        let frame = stream.next_frame().expect("next_frame should succeed");
        assert_eq!(frame.data.len(), 64 * 64 * 2);
    }
}
