/// Value written in place of a missing note in the generated table.
pub const NO_NOTE: i16 = -1;

/// One step of a melody: wait `hold_time` ticks, then press or release a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub press: Option<i16>,
    pub release: Option<i16>,
    pub hold_time: u32,
}

impl NoteEvent {
    pub fn pressed(note: i16, hold_time: u32) -> Self {
        Self {
            press: Some(note),
            release: None,
            hold_time,
        }
    }

    pub fn released(note: i16, hold_time: u32) -> Self {
        Self {
            press: None,
            release: Some(note),
            hold_time,
        }
    }

    /// Fields in table order, with absent notes as [`NO_NOTE`].
    pub fn fields(&self) -> (i16, i16, u32) {
        (
            self.press.unwrap_or(NO_NOTE),
            self.release.unwrap_or(NO_NOTE),
            self.hold_time,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRange {
    pub min: i16,
    pub max: i16,
}

/// Lowest and highest pressed note, or `None` if nothing is ever pressed.
pub fn note_range(events: &[NoteEvent]) -> Option<NoteRange> {
    let mut pressed = events.iter().filter_map(|e| e.press);
    let first = pressed.next()?;
    let (min, max) = pressed.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n)));
    Some(NoteRange { min, max })
}
