use crate::source::{CaptureStream, VideoFrame};

/// The live capture image as a texture source.
///
/// `version` starts at 0 and increases by one each time the texture is
/// marked dirty. A renderer keeps the last version it uploaded and re-uploads
/// whenever the texture's version is newer.
pub struct VideoTexture {
    stream: Box<dyn CaptureStream>,
    frame: VideoFrame,
    version: u64,
}

impl VideoTexture {
    pub fn new(stream: Box<dyn CaptureStream>) -> Self {
        let (width, height) = stream.resolution();
        Self {
            stream,
            frame: VideoFrame::blank(width.max(1), height.max(1)),
            version: 0,
        }
    }

    /// Pull the latest image from the stream and bump the version.
    ///
    /// The version is bumped even when the stream had nothing new, so the
    /// renderer samples the live image on every frame.
    pub fn mark_dirty(&mut self) {
        if let Some(frame) = self.stream.next_frame().filter(VideoFrame::is_valid) {
            self.frame = frame;
        }
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn frame(&self) -> &VideoFrame {
        &self.frame
    }

    pub fn size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    pub fn aspect(&self) -> f32 {
        self.frame.width as f32 / self.frame.height as f32
    }

    /// True if a renderer that last uploaded `uploaded` must upload again.
    pub fn needs_upload(&self, uploaded: Option<u64>) -> bool {
        uploaded.is_none_or(|v| v < self.version)
    }
}

impl std::fmt::Debug for VideoTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoTexture")
            .field("size", &self.size())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stream that yields a solid frame whose red channel counts calls.
    struct Counting {
        calls: u8,
        dry: bool,
    }

    impl CaptureStream for Counting {
        fn resolution(&self) -> (u32, u32) {
            (2, 2)
        }

        fn next_frame(&mut self) -> Option<VideoFrame> {
            if self.dry {
                return None;
            }
            self.calls += 1;
            let mut f = VideoFrame::blank(2, 2);
            f.pixels[0] = self.calls;
            Some(f)
        }
    }

    #[test]
    fn starts_blank_at_version_zero() {
        let tex = VideoTexture::new(Box::new(Counting {
            calls: 0,
            dry: false,
        }));
        assert_eq!(tex.version(), 0);
        assert_eq!(tex.size(), (2, 2));
        assert_eq!(tex.frame().pixel(0, 0), Some([0, 0, 0, 255]));
        assert!(tex.needs_upload(None));
        assert!(!tex.needs_upload(Some(0)));
    }

    #[test]
    fn mark_dirty_pulls_frame_and_bumps_version() {
        let mut tex = VideoTexture::new(Box::new(Counting {
            calls: 0,
            dry: false,
        }));
        tex.mark_dirty();
        tex.mark_dirty();
        assert_eq!(tex.version(), 2);
        assert_eq!(tex.frame().pixel(0, 0), Some([2, 0, 0, 255]));
        assert!(tex.needs_upload(Some(1)));
    }

    #[test]
    fn version_bumps_without_new_frame() {
        let mut tex = VideoTexture::new(Box::new(Counting {
            calls: 0,
            dry: true,
        }));
        tex.mark_dirty();
        assert_eq!(tex.version(), 1);
        assert_eq!(tex.frame().pixel(0, 0), Some([0, 0, 0, 255]));
    }
}
