use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ltk_audio_tree::session::{load, LoadOptions, LoadedAudio};
use ltk_wwise::ContainerKind;
use miette::Result;

use crate::errors::CliError;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Read a whole file, mapping a missing file to a friendly error.
pub fn read_file(path: &Utf8Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }
    Ok(fs::read(path).map_err(CliError::from)?)
}

/// Inputs shared by every command that loads a container into a tree.
pub struct AudioSource<'a> {
    pub file_path: &'a Utf8Path,
    /// Explicit string table; falls back to the configured one.
    pub strings: Option<&'a Utf8Path>,
    pub events: Option<&'a Utf8Path>,
}

impl<'a> AudioSource<'a> {
    pub fn new(file_path: &'a Utf8Path) -> Self {
        Self {
            file_path,
            strings: None,
            events: None,
        }
    }
}

/// Load a container and resolve its names.
pub fn load_audio(source: &AudioSource<'_>) -> Result<LoadedAudio> {
    let container = read_file(source.file_path)?;

    let configured = config::load_config().strings_path;
    let strings_path = source
        .strings
        .map(Utf8Path::to_path_buf)
        .or(configured.filter(|path| path.exists()));
    let strings = strings_path.as_deref().map(read_file).transpose()?;
    let events = source.events.map(read_file).transpose()?;

    let root_label = root_label(source.file_path);
    let options = LoadOptions {
        string_table: strings.as_deref(),
        events_bank: events.as_deref(),
        root_label: Some(root_label.as_str()),
    };

    load(&container, &options)
        .map_err(|err| CliError::invalid_container(source.file_path.to_path_buf(), err).into())
}

/// File name without the extension, used as the tree root.
pub fn root_label(file_path: &Utf8Path) -> String {
    file_path.file_stem().unwrap_or("audio").to_string()
}

/// Pick the output format: explicit flag, then config, then the input's own format.
pub fn output_kind(requested: Option<ContainerKind>, input: ContainerKind) -> ContainerKind {
    requested
        .or(config::load_config().output_format)
        .unwrap_or(input)
}

/// `<dir>/<stem>_modified.<ext>` next to the input.
pub fn default_output_path(file_path: &Utf8Path, kind: ContainerKind) -> Utf8PathBuf {
    let name = format!("{}_modified.{}", root_label(file_path), kind.extension());
    match file_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.join(name),
        _ => Utf8PathBuf::from(name),
    }
}

/// Turn a branch name into a single path component.
///
/// Separators and characters Windows rejects become `_`. Trailing dots and
/// spaces are dropped, so `.` and `..` never name the current or parent directory.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "_".repeat(cleaned.chars().count().max(1))
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Utf8Path::new("sfx/ahri_base_sfx_audio.bnk"), ContainerKind::Bnk),
            Utf8PathBuf::from("sfx/ahri_base_sfx_audio_modified.bnk")
        );
        assert_eq!(
            default_output_path(Utf8Path::new("ahri_vo.wpk"), ContainerKind::Bnk),
            Utf8PathBuf::from("ahri_vo_modified.bnk")
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Play_Q:Cast?"), "Play_Q_Cast_");
        assert_eq!(sanitize_file_name("Play_vo_Ahri_Attack"), "Play_vo_Ahri_Attack");
    }

    #[test]
    fn test_sanitize_relative_components() {
        assert_eq!(sanitize_file_name(".."), "__");
        assert_eq!(sanitize_file_name("."), "_");
        assert_eq!(sanitize_file_name(""), "_");
        assert_eq!(sanitize_file_name("Play_x. "), "Play_x");
        assert_eq!(sanitize_file_name("a/../b"), "a_.._b");
        assert_eq!(sanitize_file_name("v1.2"), "v1.2");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Utf8Path::new("does/not/exist.bnk")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
