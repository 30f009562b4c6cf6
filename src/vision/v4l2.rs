//! V4L2 camera source (feature `camera-v4l`)
//!
//! Requests packed RGB frames at the configured capture size. Devices that
//! only offer other pixel formats are rejected at connect time.

use ouroboros::self_referencing;

use super::source::{FrameSource, SourceConfig};
use crate::Frame;
use crate::error::SourceError;

pub struct V4l2Source {
    config: SourceConfig,
    path: String,
    state: Option<DeviceState>,
    frame_count: u64,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Source {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            path: config.device_path(),
            active_width: config.width,
            active_height: config.height,
            config,
            state: None,
            frame_count: 0,
        }
    }

    fn open_error(&self, reason: impl ToString) -> SourceError {
        SourceError::Open {
            device: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl FrameSource for V4l2Source {
    fn connect(&mut self) -> Result<(), SourceError> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.path).map_err(|e| self.open_error(e))?;
        let mut format = device.format().map_err(|e| self.open_error(e))?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!("V4l2Source: failed to set format on {}: {}", self.path, err);
                device.format().map_err(|e| self.open_error(e))?
            }
        };
        if format.fourcc != v4l::FourCC::new(b"RGB3") {
            return Err(self.open_error(format!(
                "device offers {} instead of RGB3",
                format.fourcc
            )));
        }

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!("V4l2Source: failed to set fps on {}: {}", self.path, err);
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;

        let state = DeviceStateTryBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
            },
        }
        .try_build()
        .map_err(|e| self.open_error(e))?;
        self.state = Some(state);

        log::info!(
            "V4l2Source: connected to {} ({}x{})",
            self.path,
            self.active_width,
            self.active_height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        use v4l::io::traits::CaptureStream;

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SourceError::NotConnected(self.path.clone()))?;
        let buf = state
            .with_stream_mut(|stream| stream.next().map(|(buf, _meta)| buf.to_vec()))
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let expected = (self.active_width * self.active_height * 3) as usize;
        let len = buf.len();
        // Drivers may pad the buffer past the image payload
        let pixels = if len > expected {
            buf[..expected].to_vec()
        } else {
            buf
        };
        let frame = Frame::from_raw(self.active_width, self.active_height, pixels).ok_or(
            SourceError::FrameSize {
                width: self.active_width,
                height: self.active_height,
                len,
            },
        )?;

        self.frame_count += 1;
        log::trace!("V4l2Source: captured frame {}", self.frame_count);
        Ok(frame)
    }

    fn name(&self) -> &str {
        &self.path
    }
}
