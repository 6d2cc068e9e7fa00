//! TOML frame configuration for the command line.
//!
//! ```toml
//! [frame]
//! width = 600
//! height = "400"
//! faceWidth = 20
//! style = "bold"
//! ```
//!
//! Every key is optional; missing or unreadable values are repaired by the
//! normalizer like any other input.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::frame::RawFrameInput;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    frame: RawFrameInput,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid frame config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read the `[frame]` table of a TOML file.
///
/// # Errors
/// Returns [`ConfigError`] when the file cannot be read or is not valid TOML.
pub fn load_frame_config(path: &Path) -> Result<RawFrameInput, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_frame_config(&text)
}

/// Parse the `[frame]` table from TOML text.
///
/// # Errors
/// Returns [`ConfigError::Parse`] for malformed TOML or mistyped values.
pub fn parse_frame_config(text: &str) -> Result<RawFrameInput, ConfigError> {
    let file: ConfigFile = toml::from_str(text)?;
    Ok(file.frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DEFAULT_PROFILE_DEPTH, FrameStyle};

    #[test]
    fn frame_table_is_read_with_defaults_for_missing_keys() {
        let input = parse_frame_config(
            r#"
            [frame]
            width = 450.5
            height = "300"
            lipWidth = 3
            style = "Bold"
            "#,
        )
        .unwrap();

        let params = input.to_parameters();
        assert_eq!(params.width, 450.5);
        assert_eq!(params.height, 300.0);
        assert_eq!(params.lip_width, 3.0);
        assert_eq!(params.profile_depth, DEFAULT_PROFILE_DEPTH);
        assert_eq!(params.style, FrameStyle::Bold);
    }

    #[test]
    fn empty_file_means_defaults() {
        let input = parse_frame_config("").unwrap();
        assert_eq!(input, RawFrameInput::default());
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            parse_frame_config("[frame\nwidth = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_frame_config("[frame]\nwidth = [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_frame_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("here.toml"));
    }
}
