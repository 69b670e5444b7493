//! The media concatenation seam.

use std::path::Path;

use async_trait::async_trait;
use audition_core::ffmpeg::{concat_stream_copy, FfmpegError, DEFAULT_FFMPEG_BIN};

/// Concatenates the inputs listed in a concat manifest into one output file.
#[async_trait]
pub trait MediaConcatenator: Send + Sync {
    /// Tool identifier for logs.
    fn name(&self) -> &str;

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError>;
}

/// Stream-copy concatenation with the ffmpeg concat demuxer.
#[derive(Debug, Clone)]
pub struct FfmpegConcatenator {
    ffmpeg_bin: String,
}

impl FfmpegConcatenator {
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    pub fn ffmpeg_bin(&self) -> &str {
        &self.ffmpeg_bin
    }
}

impl Default for FfmpegConcatenator {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_BIN)
    }
}

#[async_trait]
impl MediaConcatenator for FfmpegConcatenator {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), FfmpegError> {
        concat_stream_copy(&self.ffmpeg_bin, manifest, output).await
    }
}
