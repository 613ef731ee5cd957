//! Reading a Standard MIDI File and turning one of its tracks into a list of
//! [`NoteEvent`]s.

use std::fs;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Track, TrackEvent, TrackEventKind};
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::events::NoteEvent;

/// One octave down, to fit the target instrument's keyboard.
pub const DEFAULT_TRANSPOSE: i8 = -12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub index: usize,
    pub name: Option<String>,
    pub event_count: usize,
    pub note_count: usize,
}

impl std::fmt::Display for TrackSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "'{name}'")?,
            None => write!(f, "<unnamed>")?,
        }
        write!(
            f,
            " ({} events, {} note messages)",
            self.event_count, self.note_count
        )
    }
}

pub fn read_midi_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_smf(bytes: &[u8]) -> Result<Smf<'_>> {
    let smf = Smf::parse(bytes)?;
    debug!(
        tracks = smf.tracks.len(),
        format = ?smf.header.format,
        timing = ?smf.header.timing,
        "parsed MIDI file"
    );
    Ok(smf)
}

pub fn summarize_tracks(smf: &Smf) -> Vec<TrackSummary> {
    smf.tracks
        .iter()
        .enumerate()
        .map(|(index, track)| TrackSummary {
            index,
            name: track_name(track),
            event_count: track.len(),
            note_count: track.iter().filter(|e| is_note_message(e)).count(),
        })
        .collect()
}

pub fn select_track<'a, 'b>(smf: &'b Smf<'a>, index: usize) -> Result<&'b Track<'a>> {
    smf.tracks
        .get(index)
        .ok_or(ConvertError::TrackOutOfRange {
            index,
            count: smf.tracks.len(),
        })
}

/// Converts every note-on/note-off message of track `index`, in stream order.
///
/// Deltas are copied as-is, so each `hold_time` is measured from the previous
/// message on the track, including any non-note message that was skipped.
pub fn extract_track(smf: &Smf, index: usize, transpose: i8) -> Result<Vec<NoteEvent>> {
    let track = select_track(smf, index)?;
    let events: Vec<NoteEvent> = track
        .iter()
        .filter_map(|event| note_event(event, transpose))
        .collect();
    debug!(track = index, records = events.len(), "extracted note events");
    Ok(events)
}

pub fn extract_file(path: &Path, index: usize, transpose: i8) -> Result<Vec<NoteEvent>> {
    let bytes = read_midi_file(path)?;
    let smf = load_smf(&bytes)?;
    extract_track(&smf, index, transpose)
}

/// Maps a single track event. A note-on with zero velocity counts as a release.
pub fn note_event(event: &TrackEvent, transpose: i8) -> Option<NoteEvent> {
    let TrackEventKind::Midi { message, .. } = event.kind else {
        return None;
    };
    let hold_time = event.delta.as_int();

    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
            Some(NoteEvent::pressed(shift(key.as_int(), transpose), hold_time))
        }
        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
            Some(NoteEvent::released(shift(key.as_int(), transpose), hold_time))
        }
        _ => None,
    }
}

fn shift(key: u8, transpose: i8) -> i16 {
    let note = key as i16 + transpose as i16;
    if note < 0 {
        warn!(key, note, "transposed note is below zero");
    }
    note
}

fn is_note_message(event: &TrackEvent) -> bool {
    matches!(
        event.kind,
        TrackEventKind::Midi {
            message: MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. },
            ..
        }
    )
}

fn track_name(track: &Track) -> Option<String> {
    track.iter().find_map(|event| match event.kind {
        TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
            Some(String::from_utf8_lossy(name).into_owned())
        }
        _ => None,
    })
}

/// Human readable one-liner for the raw track dump.
pub fn describe_event(event: &TrackEvent) -> String {
    let delta = event.delta;
    match event.kind {
        TrackEventKind::Midi { channel, message } => {
            let body = match message {
                MidiMessage::NoteOn { key, vel } => format!("note_on note={key} vel={vel}"),
                MidiMessage::NoteOff { key, vel } => format!("note_off note={key} vel={vel}"),
                MidiMessage::Aftertouch { key, vel } => {
                    format!("aftertouch note={key} vel={vel}")
                }
                MidiMessage::Controller { controller, value } => {
                    format!("control_change control={controller} value={value}")
                }
                MidiMessage::ProgramChange { program } => {
                    format!("program_change program={program}")
                }
                MidiMessage::ChannelAftertouch { vel } => format!("channel_aftertouch vel={vel}"),
                MidiMessage::PitchBend { bend } => format!("pitchwheel bend={}", bend.as_int()),
            };
            format!("{body} channel={channel} time={delta}")
        }
        TrackEventKind::Meta(meta) => format!("meta {} time={delta}", describe_meta(&meta)),
        TrackEventKind::SysEx(data) => format!("sysex {} bytes time={delta}", data.len()),
        TrackEventKind::Escape(data) => format!("escape {} bytes time={delta}", data.len()),
    }
}

fn describe_meta(meta: &MetaMessage) -> String {
    match meta {
        MetaMessage::TrackName(name) => format!("track_name '{}'", String::from_utf8_lossy(name)),
        MetaMessage::InstrumentName(name) => {
            format!("instrument_name '{}'", String::from_utf8_lossy(name))
        }
        MetaMessage::Text(text) => format!("text '{}'", String::from_utf8_lossy(text)),
        MetaMessage::Marker(text) => format!("marker '{}'", String::from_utf8_lossy(text)),
        MetaMessage::Tempo(uspb) => format!("set_tempo tempo={uspb}"),
        MetaMessage::TimeSignature(num, den, clocks, notes) => {
            // The denominator is stored as a power of two and is not range checked.
            let den = match 1u32.checked_shl(u32::from(*den)) {
                Some(value) => value.to_string(),
                None => format!("2^{den}"),
            };
            format!("time_signature {num}/{den} clocks={clocks} notated_32nds={notes}")
        }
        MetaMessage::KeySignature(sharps, minor) => {
            format!("key_signature sharps={sharps} minor={minor}")
        }
        MetaMessage::EndOfTrack => "end_of_track".to_string(),
        other => format!("{other:?}"),
    }
}
