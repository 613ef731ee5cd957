use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::extract::DEFAULT_TRANSPOSE;
use crate::serialize::{OutputMode, SongDeclaration};

/// Everything about a conversion that is not the input file or the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub output: PathBuf,
    pub mode: OutputMode,
    pub suffix: String,
    pub header: String,
    pub element_type: String,
    pub length_type: String,
    pub transpose: i8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let decl = SongDeclaration::default();
        Self {
            output: PathBuf::from("song.c"),
            mode: OutputMode::Append,
            suffix: decl.name_suffix,
            header: decl.header,
            element_type: decl.element_type,
            length_type: decl.length_type,
            transpose: DEFAULT_TRANSPOSE,
        }
    }
}

impl ConvertConfig {
    pub fn declaration(&self) -> SongDeclaration {
        SongDeclaration {
            name_suffix: self.suffix.clone(),
            header: self.header.clone(),
            element_type: self.element_type.clone(),
            length_type: self.length_type.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| config_error(path, e))?;
        fs::write(path, ron_string).map_err(|source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let ron_string = fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ConvertConfig = ron::from_str(&ron_string).map_err(|e| config_error(path, e))?;

        Ok(config)
    }
}

fn config_error(path: &Path, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::Config {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_firmware_names() {
        let config = ConvertConfig::default();
        assert_eq!(config.output, PathBuf::from("song.c"));
        assert_eq!(config.mode, OutputMode::Append);
        assert_eq!(config.transpose, -12);
        assert_eq!(config.declaration(), SongDeclaration::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("midi2song.ron");
        let config = ConvertConfig {
            output: PathBuf::from("firmware/song.c"),
            mode: OutputMode::Truncate,
            suffix: "4".to_string(),
            transpose: 0,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(ConvertConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        fs::write(&path, r#"(suffix: "2", mode: Truncate)"#).unwrap();

        let config = ConvertConfig::load(&path).unwrap();
        assert_eq!(config.suffix, "2");
        assert_eq!(config.mode, OutputMode::Truncate);
        assert_eq!(config.header, "song.h");
        assert_eq!(config.transpose, -12);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(suffix: ").unwrap();

        let err = ConvertConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }
}
