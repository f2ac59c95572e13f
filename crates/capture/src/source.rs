use std::time::Instant;

/// Errors from opening a capture device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera access denied")]
    PermissionDenied,
    #[error("no capture device: {0}")]
    DeviceNotFound(String),
    #[error("capture backend error: {0}")]
    Backend(String),
    #[error("capture worker exited without reporting")]
    WorkerLost,
}

/// Largest width or height a capture may report. Matches the 2D texture limit
/// wgpu guarantees on every device.
pub const MAX_DIMENSION: u32 = 8192;

/// Byte length of an RGBA8 image.
pub fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// One RGBA8 image, rows top to bottom. The alpha channel is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    /// Opaque black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; rgba_len(width, height)];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == rgba_len(self.width, self.height)
    }
}

/// A device or generator that can be opened once to produce a live stream.
pub trait CaptureSource: Send {
    fn name(&self) -> &str;

    /// Acquire the device. Called exactly once, off the frame-loop thread.
    fn open(self: Box<Self>) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A continuously updating image.
pub trait CaptureStream: Send {
    fn resolution(&self) -> (u32, u32);

    /// Most recent image, or `None` when nothing new is available.
    fn next_frame(&mut self) -> Option<VideoFrame>;
}

/// Procedural moving colour bars with a sweep line.
#[derive(Debug, Clone)]
pub struct TestPattern {
    width: u32,
    height: u32,
}

impl TestPattern {
    pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

    /// Sizes are clamped to `1..=MAX_DIMENSION`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(1, MAX_DIMENSION),
            height: height.clamp(1, MAX_DIMENSION),
        }
    }

    /// Render the pattern as it looks `t` seconds after opening.
    pub fn frame_at(&self, t: f32) -> VideoFrame {
        const BARS: [[u8; 3]; 8] = [
            [235, 235, 235],
            [235, 235, 16],
            [16, 235, 235],
            [16, 235, 16],
            [235, 16, 235],
            [235, 16, 16],
            [16, 16, 235],
            [16, 16, 16],
        ];
        let (w, h) = (self.width, self.height);
        let shift = (t * 40.0) as i64;
        let sweep = ((t * 0.25).fract() * h as f32) as u32;

        let mut pixels = Vec::with_capacity(rgba_len(w, h));
        for y in 0..h {
            for x in 0..w {
                let rgb = if y == sweep {
                    [255, 255, 255]
                } else {
                    let column = (x as i64 + shift).rem_euclid(w as i64) as u32;
                    BARS[(column * BARS.len() as u32 / w) as usize]
                };
                pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
        VideoFrame {
            width: w,
            height: h,
            pixels,
        }
    }
}

impl Default for TestPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE.0, Self::DEFAULT_SIZE.1)
    }
}

impl CaptureSource for TestPattern {
    fn name(&self) -> &str {
        "test-pattern"
    }

    fn open(self: Box<Self>) -> Result<Box<dyn CaptureStream>, CaptureError> {
        tracing::info!(width = self.width, height = self.height, "test pattern opened");
        Ok(Box::new(TestPatternStream {
            pattern: *self,
            started: Instant::now(),
        }))
    }
}

struct TestPatternStream {
    pattern: TestPattern,
    started: Instant,
}

impl CaptureStream for TestPatternStream {
    fn resolution(&self) -> (u32, u32) {
        (self.pattern.width, self.pattern.height)
    }

    fn next_frame(&mut self) -> Option<VideoFrame> {
        Some(self.pattern.frame_at(self.started.elapsed().as_secs_f32()))
    }
}

/// A source whose device is missing. Opening always fails.
#[derive(Debug, Clone, Default)]
pub struct Unavailable;

impl CaptureSource for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn open(self: Box<Self>) -> Result<Box<dyn CaptureStream>, CaptureError> {
        Err(CaptureError::DeviceNotFound("no video input device".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_is_opaque_black() {
        let f = VideoFrame::blank(4, 2);
        assert!(f.is_valid());
        assert_eq!(f.pixel(3, 1), Some([0, 0, 0, 255]));
        assert_eq!(f.pixel(4, 0), None);
        assert_eq!(f.bytes_per_row(), 16);
    }

    #[test]
    fn test_pattern_frame_shape() {
        let p = TestPattern::new(64, 48);
        let f = p.frame_at(0.0);
        assert!(f.is_valid());
        assert_eq!((f.width, f.height), (64, 48));
        // Sweep line sits on row 0 at t=0.
        assert_eq!(f.pixel(10, 0), Some([255, 255, 255, 255]));
        // First bar is light grey, last bar is near-black.
        assert_eq!(f.pixel(0, 10), Some([235, 235, 235, 255]));
        assert_eq!(f.pixel(63, 10), Some([16, 16, 16, 255]));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn rgba_len_does_not_wrap() {
        assert_eq!(rgba_len(70_000, 70_000), 19_600_000_000);
        assert_eq!(rgba_len(u32::MAX, 1), u32::MAX as usize * 4);
    }

    #[test]
    fn test_pattern_clamps_to_texture_limit() {
        let p = TestPattern::new(70_000, 0);
        let stream = Box::new(p).open().expect("test pattern always opens");
        assert_eq!(stream.resolution(), (MAX_DIMENSION, 1));
    }

    #[test]
    fn test_pattern_moves_over_time() {
        let p = TestPattern::new(64, 48);
        assert_ne!(p.frame_at(0.0), p.frame_at(0.5));
    }

    #[test]
    fn test_pattern_opens() {
        let source: Box<dyn CaptureSource> = Box::new(TestPattern::new(32, 24));
        let mut stream = source.open().expect("test pattern always opens");
        assert_eq!(stream.resolution(), (32, 24));
        assert!(stream.next_frame().is_some_and(|f| f.is_valid()));
    }

    #[test]
    fn unavailable_fails() {
        let source: Box<dyn CaptureSource> = Box::new(Unavailable);
        assert!(matches!(source.open(), Err(CaptureError::DeviceNotFound(_))));
    }
}
