//! Camera frame hand-off types

use crate::error::VisionError;
use bytes::Bytes;

/// One camera frame: tightly packed RGB24 pixels, row-major, plus a
/// monotonically increasing sequence number assigned by the capture
/// source. Read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub seq: u64,
    pub pixels: Bytes,
}

impl Frame {
    pub fn new(width: u32, height: u32, seq: u64, pixels: Bytes) -> Result<Self, VisionError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| VisionError::Capture("Frame size would overflow".to_string()))?;

        if pixels.len() != expected {
            return Err(VisionError::Capture(format!(
                "Frame buffer is {} bytes, expected {} for {}x{} RGB24",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            seq,
            pixels,
        })
    }

    /// Read one pixel, None outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = ((y as usize * self.width as usize) + x as usize) * 3;
        Some([
            self.pixels[index],
            self.pixels[index + 1],
            self.pixels[index + 2],
        ])
    }
}

/// Capture-source boundary. The pipeline hands buffers back through
/// this as soon as it is done copying, never after inference, so the
/// capture side is never stalled by inference latency.
pub trait FrameRecycler: Send + Sync {
    fn recycle(&self, frame: Frame);
}

/// Recycler for capture sources that allocate per frame and do not
/// reuse buffers
pub struct DiscardRecycler;

impl FrameRecycler for DiscardRecycler {
    fn recycle(&self, _frame: Frame) {}
}
