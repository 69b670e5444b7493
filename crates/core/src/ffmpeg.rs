//! FFmpeg command utilities.
//!
//! Recordings are joined with ffmpeg's concat demuxer in stream-copy mode:
//! no re-encoding, so the merge is fast and lossless, but every input must
//! share codec and container parameters. Segments recorded by the same
//! browser session satisfy this; mixing sources does not.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Error type for FFmpeg operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),
}

/// Render a concat-demuxer manifest listing `inputs` in order.
///
/// Each line is `file '<path>'`; single quotes inside a path are escaped as
/// `'\''` per the demuxer's quoting rules.
pub fn render_concat_manifest(inputs: &[PathBuf]) -> String {
    let mut manifest = String::new();
    for input in inputs {
        let escaped = input.to_string_lossy().replace('\'', r"'\''");
        manifest.push_str("file '");
        manifest.push_str(&escaped);
        manifest.push_str("'\n");
    }
    manifest
}

/// Arguments for a stream-copy concat of `manifest` into `output`.
pub fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(manifest.as_os_str().to_owned());
    args.extend(["-c", "copy"].into_iter().map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

/// Run ffmpeg to concatenate the files listed in `manifest` into `output`.
///
/// The child is killed if the returned future is dropped (for example when
/// the HTTP request times out).
pub async fn concat_stream_copy(
    ffmpeg_bin: &str,
    manifest: &Path,
    output: &Path,
) -> Result<(), FfmpegError> {
    if !manifest.exists() {
        return Err(FfmpegError::VideoNotFound(
            manifest.to_string_lossy().to_string(),
        ));
    }

    let output_result = tokio::process::Command::new(ffmpeg_bin)
        .args(["-hide_banner", "-loglevel", "error"])
        .args(concat_args(manifest, output))
        .kill_on_drop(true)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output_result.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output_result.status.code(),
            stderr: String::from_utf8_lossy(&output_result.stderr)
                .trim()
                .to_string(),
        });
    }

    Ok(())
}

/// Run `ffmpeg -version` and return the first line of its output.
pub async fn probe_version(ffmpeg_bin: &str) -> Result<String, FfmpegError> {
    let output = tokio::process::Command::new(ffmpeg_bin)
        .arg("-version")
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;

    if !output.status.success() {
        return Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string())
}
