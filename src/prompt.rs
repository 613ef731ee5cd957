//! Console side of a conversion: listing tracks, asking for one, and echoing
//! what was found. Generic over the reader/writer so it runs without a
//! terminal.

use std::io::{BufRead, Write};

use midly::Track;

use crate::error::{ConvertError, Result};
use crate::events::NoteRange;
use crate::extract::{TrackSummary, describe_event};

pub fn list_tracks<W: Write>(out: &mut W, summaries: &[TrackSummary]) -> Result<()> {
    for summary in summaries {
        writeln!(out, "{}.{}", summary.index, summary)?;
    }
    Ok(())
}

/// Reads a single line and parses it as a track index. There is no retry:
/// anything other than an index below `track_count` is an error.
pub fn choose_track<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    track_count: usize,
) -> Result<usize> {
    write!(out, "Choose track: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    let index: usize = answer
        .parse()
        .map_err(|_| ConvertError::InvalidSelection(answer.to_string()))?;
    if index >= track_count {
        return Err(ConvertError::TrackOutOfRange {
            index,
            count: track_count,
        });
    }
    Ok(index)
}

pub fn dump_track<W: Write>(out: &mut W, summary: &TrackSummary, track: &Track) -> Result<()> {
    writeln!(out, "{summary}")?;
    for event in track {
        writeln!(out, "  {}", describe_event(event))?;
    }
    Ok(())
}

pub fn report_range<W: Write>(out: &mut W, range: Option<NoteRange>) -> Result<()> {
    writeln!(out, "Note Range:")?;
    match range {
        Some(NoteRange { min, max }) => {
            writeln!(out, "min {min}")?;
            writeln!(out, "max {max}")?;
        }
        None => writeln!(out, "no notes pressed")?,
    }
    Ok(())
}
