use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use midi2song::{ConvertConfig, OutputMode, convert};
use tracing_subscriber::EnvFilter;

/// Convert one track of a MIDI file into a `note_t` table for the firmware.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// MIDI file to read
    midi_file: PathBuf,

    /// RON file with conversion settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// C file the table is written to [default: song.c]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suffix of the song_len/song_data names [default: 1]
    #[arg(short, long)]
    suffix: Option<String>,

    /// Replace the output file instead of appending to it
    #[arg(long)]
    truncate: bool,

    /// Track index to convert, skipping the prompt
    #[arg(long)]
    track: Option<usize>,

    /// Save the resolved settings as RON to this file before converting
    #[arg(long)]
    write_config: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> midi2song::Result<(PathBuf, Option<usize>, ConvertConfig)> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(suffix) = self.suffix {
            config.suffix = suffix;
        }
        if self.truncate {
            config.mode = OutputMode::Truncate;
        }
        if let Some(path) = &self.write_config {
            config.save(path)?;
        }
        Ok((self.midi_file, self.track, config))
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let result = args.into_config().and_then(|(midi_file, track, config)| {
        convert(
            &midi_file,
            track,
            &config,
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
        )
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
