//! Error taxonomy for the conversion pipeline.
//!
//! Validation errors are fatal and reported before any filesystem mutation.
//! Backend errors are fatal for single-file runs; folder batches record them
//! per file and keep going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no input file provided. type \"uniconvert --help\" for more information.")]
    MissingInput,

    #[error("no output filetype provided. type \"uniconvert --filetypes\" for a list of supported filetypes.")]
    MissingOutput,

    /// Any other bad argument shape.
    #[error("{0}")]
    Usage(String),

    #[error("input not found ({0}).")]
    NotFound(String),

    #[error("input filetype not supported (.{0}). type \"uniconvert --filetypes\" for a list of supported filetypes.")]
    UnsupportedInput(String),

    #[error("output filetype not supported (.{0}). type \"uniconvert --filetypes\" for a list of supported filetypes.")]
    UnsupportedOutput(String),

    /// A group/extension/output combination outside the strategy table.
    #[error("cannot convert {group} input .{extension} to {output}. type \"uniconvert --filetypes\" for a list of supported filetypes.")]
    UnsupportedConversion {
        group: String,
        extension: String,
        output: String,
    },

    #[error("ffmpeg not found, please install ffmpeg to PATH.")]
    BackendUnavailable,

    /// The backend ran but reported failure.
    #[error("{0}")]
    ConversionFailed(String),

    #[error("{0}")]
    Update(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
