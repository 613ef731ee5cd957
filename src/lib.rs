pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod prompt;
pub mod serialize;
pub mod session;

pub use config::ConvertConfig;
pub use error::{ConvertError, Result};
pub use events::{NO_NOTE, NoteEvent, NoteRange, note_range};
pub use extract::{DEFAULT_TRANSPOSE, TrackSummary, extract_file, extract_track, load_smf};
pub use serialize::{OutputMode, SongDeclaration, render_song, write_song};
pub use session::{Conversion, convert};
