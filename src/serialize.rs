//! Rendering note events as a C static initializer for the firmware build.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConvertError, Result};
use crate::events::NoteEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Keep what is already in the file and add the new song after it.
    #[default]
    Append,
    Truncate,
}

/// Names used in the generated declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDeclaration {
    pub name_suffix: String,
    pub header: String,
    pub element_type: String,
    pub length_type: String,
}

impl Default for SongDeclaration {
    fn default() -> Self {
        Self {
            name_suffix: "1".to_string(),
            header: "song.h".to_string(),
            element_type: "note_t".to_string(),
            length_type: "long".to_string(),
        }
    }
}

impl SongDeclaration {
    pub fn length_name(&self) -> String {
        format!("song_len{}", self.name_suffix)
    }

    pub fn data_name(&self) -> String {
        format!("song_data{}", self.name_suffix)
    }
}

pub fn render_song(decl: &SongDeclaration, events: &[NoteEvent]) -> String {
    let records: Vec<String> = events
        .iter()
        .map(|event| {
            let (press, release, hold_time) = event.fields();
            format!("{{{press}, {release}, {hold_time}}}")
        })
        .collect();

    format!(
        "#include \"{header}\"\n\
         {length_type} {length_name} = {len};\n\
         {element_type} {data_name}[] = {{{records}}};\n",
        header = decl.header,
        length_type = decl.length_type,
        length_name = decl.length_name(),
        len = events.len(),
        element_type = decl.element_type,
        data_name = decl.data_name(),
        records = records.join(", "),
    )
}

pub fn write_song<W: Write>(
    sink: &mut W,
    decl: &SongDeclaration,
    events: &[NoteEvent],
) -> Result<()> {
    sink.write_all(render_song(decl, events).as_bytes())?;
    sink.flush()?;
    Ok(())
}

pub fn open_output(path: &Path, mode: OutputMode) -> Result<File> {
    let mut options = OpenOptions::new();
    match mode {
        OutputMode::Append => options.create(true).append(true),
        OutputMode::Truncate => options.create(true).write(true).truncate(true),
    };
    options.open(path).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens `path` according to `mode`, writes the song and closes the file.
pub fn write_song_file(
    path: &Path,
    mode: OutputMode,
    decl: &SongDeclaration,
    events: &[NoteEvent],
) -> Result<()> {
    let mut file = open_output(path, mode)?;
    write_song(&mut file, decl, events).map_err(|err| match err {
        ConvertError::Io(source) => ConvertError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(
        path = %path.display(),
        records = events.len(),
        array = %decl.data_name(),
        "wrote song table"
    );
    Ok(())
}
