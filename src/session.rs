use std::io::{BufRead, Write};
use std::path::Path;

use tracing::info;

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::events::{NoteEvent, NoteRange, note_range};
use crate::extract::{extract_track, load_smf, read_midi_file, select_track, summarize_tracks};
use crate::prompt::{choose_track, dump_track, list_tracks, report_range};
use crate::serialize::write_song_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub track: usize,
    pub events: Vec<NoteEvent>,
    pub range: Option<NoteRange>,
}

/// Runs one conversion of `midi_path` into the configured output file.
///
/// When `track` is `None` the track list is printed to `out` and the index
/// is read from `input`. Nothing is written to the output file unless the
/// MIDI file parses and the selection is valid.
pub fn convert<R: BufRead, W: Write>(
    midi_path: &Path,
    track: Option<usize>,
    config: &ConvertConfig,
    input: &mut R,
    out: &mut W,
) -> Result<Conversion> {
    let bytes = read_midi_file(midi_path)?;
    let smf = load_smf(&bytes)?;
    let summaries = summarize_tracks(&smf);

    list_tracks(out, &summaries)?;
    let index = match track {
        Some(index) => index,
        None => choose_track(input, out, summaries.len())?,
    };
    let selected = select_track(&smf, index)?;
    dump_track(out, &summaries[index], selected)?;

    let events = extract_track(&smf, index, config.transpose)?;
    write_song_file(&config.output, config.mode, &config.declaration(), &events)?;

    let range = note_range(&events);
    report_range(out, range)?;
    info!(
        input = %midi_path.display(),
        track = index,
        records = events.len(),
        "conversion finished"
    );

    Ok(Conversion {
        track: index,
        events,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::extract::tests::{midi_bytes, note_off, note_on};
    use crate::serialize::OutputMode;
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        midi: PathBuf,
        config: ConvertConfig,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let midi = dir.path().join("song.mid");
        fs::write(
            &midi,
            midi_bytes(vec![
                vec![],
                vec![note_on(72, 100, 0), note_on(72, 0, 480)],
                vec![note_on(64, 90, 10), note_off(64, 240)],
            ]),
        )
        .unwrap();
        let config = ConvertConfig {
            output: dir.path().join("song.c"),
            ..Default::default()
        };
        Fixture {
            _dir: dir,
            midi,
            config,
        }
    }

    #[test]
    fn prompts_and_writes_selected_track() {
        let fx = fixture();
        let mut input = "1\n".as_bytes();
        let mut out = Vec::new();

        let conversion = convert(&fx.midi, None, &fx.config, &mut input, &mut out).unwrap();

        assert_eq!(conversion.track, 1);
        assert_eq!(
            conversion.events,
            vec![NoteEvent::pressed(60, 0), NoteEvent::released(60, 480)]
        );
        assert_eq!(conversion.range, Some(NoteRange { min: 60, max: 60 }));

        assert_eq!(
            fs::read_to_string(&fx.config.output).unwrap(),
            "#include \"song.h\"\n\
             long song_len1 = 2;\n\
             note_t song_data1[] = {{60, -1, 0}, {-1, 60, 480}};\n"
        );

        let console = String::from_utf8(out).unwrap();
        assert!(console.starts_with("0.<unnamed>"));
        assert!(console.contains("Choose track: "));
        assert!(console.ends_with("Note Range:\nmin 60\nmax 60\n"));
    }

    #[test]
    fn explicit_track_skips_prompt() {
        let fx = fixture();
        let mut out = Vec::new();

        let conversion =
            convert(&fx.midi, Some(2), &fx.config, &mut "".as_bytes(), &mut out).unwrap();

        assert_eq!(
            conversion.events,
            vec![NoteEvent::pressed(52, 10), NoteEvent::released(52, 240)]
        );
        assert!(!String::from_utf8(out).unwrap().contains("Choose track"));
    }

    #[test]
    fn empty_track_writes_zero_length_table() {
        let fx = fixture();
        let mut out = Vec::new();

        let conversion =
            convert(&fx.midi, Some(0), &fx.config, &mut "".as_bytes(), &mut out).unwrap();

        assert!(conversion.events.is_empty());
        assert_eq!(conversion.range, None);
        let written = fs::read_to_string(&fx.config.output).unwrap();
        assert!(written.contains("long song_len1 = 0;"));
        assert!(String::from_utf8(out).unwrap().ends_with("no notes pressed\n"));
    }

    #[test]
    fn bad_selection_writes_nothing() {
        let fx = fixture();
        let mut input = "9\n".as_bytes();

        let err = convert(&fx.midi, None, &fx.config, &mut input, &mut Vec::new()).unwrap_err();

        assert!(matches!(err, ConvertError::TrackOutOfRange { index: 9, count: 3 }));
        assert!(!fx.config.output.exists());
    }

    #[test]
    fn repeated_runs_append() {
        let fx = fixture();
        let run = || convert(&fx.midi, Some(1), &fx.config, &mut "".as_bytes(), &mut Vec::new());

        run().unwrap();
        run().unwrap();

        let written = fs::read_to_string(&fx.config.output).unwrap();
        assert_eq!(written.matches("long song_len1 = 2;").count(), 2);
    }

    #[test]
    fn truncate_mode_keeps_one_copy() {
        let mut fx = fixture();
        fx.config.mode = OutputMode::Truncate;

        for _ in 0..2 {
            convert(&fx.midi, Some(1), &fx.config, &mut "".as_bytes(), &mut Vec::new()).unwrap();
        }

        let written = fs::read_to_string(&fx.config.output).unwrap();
        assert_eq!(written.matches("#include").count(), 1);
    }
}
