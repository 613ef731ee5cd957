use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a valid MIDI file: {0}")]
    Parse(#[from] midly::Error),

    #[error("track {index} does not exist (file has {count} tracks)")]
    TrackOutOfRange { index: usize, count: usize },

    #[error("invalid track selection '{0}'")]
    InvalidSelection(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
