//! Per-file strategy selection.
//!
//! The selection is a total function over group, current extension and
//! requested output; combinations outside the table are reported as
//! unsupported conversions instead of silently falling through.

use crate::error::Error;
use crate::filetypes::{self, Group, PACKAGE_EXT};
use crate::request::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Current extension already equals the requested output type.
    Skip,
    /// Single backend transcode (or in-process raster re-encode).
    DirectConvert,
    /// Segment a video into a package folder with a canonical manifest.
    Package,
    /// Convert a packaging manifest back into a single file one level up.
    Unpackage,
    /// Write a still frame; idempotent for package manifests.
    ExtractThumbnail,
}

pub fn select(group: Group, extension: &str, output: &Output) -> Result<Strategy, Error> {
    let extension = filetypes::normalize_alias(extension);

    match output {
        Output::Thumbnail => {
            if extension == PACKAGE_EXT || group == Group::Video {
                Ok(Strategy::ExtractThumbnail)
            } else {
                Err(unsupported(group, &extension, output))
            }
        }
        Output::Filetype(out) => {
            if extension == out.as_str() {
                return Ok(Strategy::Skip);
            }

            if out == PACKAGE_EXT {
                return if group == Group::Video {
                    Ok(Strategy::Package)
                } else {
                    Err(unsupported(group, &extension, output))
                };
            }

            if extension == PACKAGE_EXT {
                return Ok(Strategy::Unpackage);
            }

            Ok(Strategy::DirectConvert)
        }
    }
}

fn unsupported(group: Group, extension: &str, output: &Output) -> Error {
    Error::UnsupportedConversion {
        group: group.name().to_owned(),
        extension: extension.to_owned(),
        output: output.token().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filetype(ext: &str) -> Output {
        Output::Filetype(ext.to_owned())
    }

    #[test]
    fn matching_extension_skips() {
        assert_eq!(
            select(Group::Video, "mp4", &filetype("mp4")).unwrap(),
            Strategy::Skip
        );
    }

    #[test]
    fn alias_pairs_count_as_already_converted() {
        assert_eq!(
            select(Group::Image, "jpeg", &filetype("jpg")).unwrap(),
            Strategy::Skip
        );
    }

    #[test]
    fn image_and_audio_inputs_convert_directly() {
        assert_eq!(
            select(Group::Image, "png", &filetype("jpg")).unwrap(),
            Strategy::DirectConvert
        );
        assert_eq!(
            select(Group::Audio, "wav", &filetype("mp3")).unwrap(),
            Strategy::DirectConvert
        );
    }

    #[test]
    fn plain_video_conversion_is_direct() {
        assert_eq!(
            select(Group::Video, "mkv", &filetype("mp4")).unwrap(),
            Strategy::DirectConvert
        );
        assert_eq!(
            select(Group::Video, "gif", &filetype("webm")).unwrap(),
            Strategy::DirectConvert
        );
    }

    #[test]
    fn video_to_manifest_packages() {
        assert_eq!(
            select(Group::Video, "mp4", &filetype(PACKAGE_EXT)).unwrap(),
            Strategy::Package
        );
    }

    #[test]
    fn manifest_to_plain_output_unpackages() {
        assert_eq!(
            select(Group::Video, PACKAGE_EXT, &filetype("mp4")).unwrap(),
            Strategy::Unpackage
        );
    }

    #[test]
    fn thumbnail_output_extracts_from_video_or_manifest() {
        assert_eq!(
            select(Group::Video, "mp4", &Output::Thumbnail).unwrap(),
            Strategy::ExtractThumbnail
        );
        assert_eq!(
            select(Group::Video, PACKAGE_EXT, &Output::Thumbnail).unwrap(),
            Strategy::ExtractThumbnail
        );
    }

    #[test]
    fn non_video_combinations_outside_the_table_are_unsupported() {
        assert!(matches!(
            select(Group::Image, "png", &Output::Thumbnail),
            Err(Error::UnsupportedConversion { .. })
        ));
        assert!(matches!(
            select(Group::Audio, "mp3", &filetype(PACKAGE_EXT)),
            Err(Error::UnsupportedConversion { .. })
        ));
        assert!(matches!(
            select(Group::Image, "png", &filetype(PACKAGE_EXT)),
            Err(Error::UnsupportedConversion { .. })
        ));
    }
}
