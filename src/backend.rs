//! Conversion backends behind one invoker boundary.
//!
//! Image-to-image conversions are re-encoded in process; everything else is
//! handed to an external ffmpeg, one blocking invocation at a time.

use crate::error::Error;
use crate::filetypes::{self, Group};
use crate::utils;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Manifest name the hls muxer is pointed at; the orchestrator renames it
/// to the canonical name afterwards.
const DEFAULT_MANIFEST: &str = "index.m3u8";

const SEGMENT_SECONDS: &str = "10";
const THUMBNAIL_OFFSET: &str = "00:00:01";

pub trait Backend {
    /// Transcodes `input` into `output`, formats inferred from extensions.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), Error>;

    /// Segments `input` into `out_dir` and returns the manifest it wrote.
    /// The directory must already exist.
    fn package(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, Error>;

    /// Writes a single still frame of `input` to `output`.
    fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), Error>;
}

pub struct MediaBackend {
    ffmpeg: Option<PathBuf>,
}

impl MediaBackend {
    pub fn new() -> Self {
        Self {
            ffmpeg: utils::find_ffmpeg(),
        }
    }

    fn ffmpeg(&self) -> Result<&Path, Error> {
        self.ffmpeg.as_deref().ok_or(Error::BackendUnavailable)
    }
}

impl Backend for MediaBackend {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), Error> {
        if is_raster(input) && is_raster(output) {
            return raster_convert(input, output);
        }

        let status = Command::new(self.ffmpeg()?)
            .args(["-hide_banner", "-y", "-loglevel", "error", "-i"])
            .arg(input)
            .arg(output)
            .status()?;

        exit_ok(status)
    }

    fn package(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, Error> {
        let manifest = out_dir.join(DEFAULT_MANIFEST);

        let status = Command::new(self.ffmpeg()?)
            .args(["-hide_banner", "-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-codec", "copy", "-start_number", "0"])
            .args(["-hls_time", SEGMENT_SECONDS])
            .args(["-hls_list_size", "0", "-hls_playlist_type", "vod"])
            .arg("-hls_segment_filename")
            .arg(out_dir.join("%03d.ts"))
            .args(["-f", "hls"])
            .arg(&manifest)
            .status()?;

        exit_ok(status)?;
        Ok(manifest)
    }

    fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), Error> {
        let status = Command::new(self.ffmpeg()?)
            .args(["-hide_banner", "-y", "-loglevel", "error"])
            .args(["-ss", THUMBNAIL_OFFSET, "-i"])
            .arg(input)
            .args(["-frames:v", "1"])
            .arg(output)
            .status()?;

        exit_ok(status)
    }
}

fn exit_ok(status: ExitStatus) -> Result<(), Error> {
    if status.success() {
        Ok(())
    } else {
        Err(Error::ConversionFailed(format!(
            "ffmpeg exited with code {}.",
            status.code().unwrap_or(1)
        )))
    }
}

fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(filetypes::normalize_alias)
        .and_then(|ext| filetypes::resolve_group(&ext))
        == Some(Group::Image)
}

fn raster_convert(input: &Path, output: &Path) -> Result<(), Error> {
    let img = image::open(input).map_err(|e| {
        Error::ConversionFailed(format!("could not decode {} ({e}).", input.display()))
    })?;

    img.save(output).map_err(|e| {
        Error::ConversionFailed(format!("could not encode {} ({e}).", output.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_detection_follows_the_image_group() {
        assert!(is_raster(Path::new("photo.png")));
        assert!(is_raster(Path::new("photo.JPEG")));
        assert!(!is_raster(Path::new("clip.mp4")));
        assert!(!is_raster(Path::new("noext")));
    }

    #[test]
    fn reencodes_raster_images_in_process() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("photo.png");
        image::RgbImage::new(4, 4).save(&src).unwrap();

        let dst = dir.path().join("photo.jpg");
        raster_convert(&src, &dst).unwrap();

        assert!(dst.exists());
    }

    #[test]
    fn undecodable_images_report_conversion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("photo.png");
        std::fs::write(&src, b"not an image").unwrap();

        let result = raster_convert(&src, &dir.path().join("photo.jpg"));
        assert!(matches!(result, Err(Error::ConversionFailed(_))));
    }
}
