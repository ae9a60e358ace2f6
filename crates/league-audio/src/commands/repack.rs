use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use ltk_wwise::ContainerKind;
use miette::Result;
use walkdir::WalkDir;

use crate::commands::replace::write_container;
use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{load_audio, AudioSource};

pub struct RepackContainerArgs {
    pub file_path: String,
    pub input_dir: String,
    pub output: Option<String>,
    pub format: Option<ContainerKind>,
}

pub fn repack_container(args: RepackContainerArgs) -> Result<()> {
    let file_path = Utf8Path::new(&args.file_path);
    let input_dir = Utf8Path::new(&args.input_dir);
    let mut loaded = load_audio(&AudioSource::new(file_path))?;

    let replacements = collect_replacements(input_dir);
    if replacements.is_empty() {
        return Err(CliError::NothingToReplace {
            dir: input_dir.to_path_buf(),
        }
        .into());
    }

    println_pad!(
        "{} {} {}",
        "📦 Repacking".bright_blue().bold(),
        args.file_path.bright_cyan().bold(),
        format!("with {} replacement files", replacements.len()).dimmed()
    );

    let mut replaced = 0;
    for (id, path) in &replacements {
        let bytes = fs::read(path).map_err(CliError::from)?;
        match loaded.root.replace_audio(*id, &bytes) {
            0 => println_pad!(
                "   {} {} {}",
                "•".bright_yellow(),
                path.as_str().bright_white(),
                "(no audio with this id, skipped)".dimmed()
            ),
            _ => replaced += 1,
        }
    }

    if replaced == 0 {
        return Err(CliError::NothingToReplace {
            dir: input_dir.to_path_buf(),
        }
        .into());
    }

    println_pad!(
        "{} {} of {} audio files",
        "🔁 Replaced".bright_green(),
        replaced,
        loaded.summary.file_count
    );

    write_container(&loaded, file_path, args.output, args.format)
}

/// Find every `<id>.wem` below `dir`. Later files win when an id appears twice.
fn collect_replacements(dir: &Utf8Path) -> BTreeMap<u32, Utf8PathBuf> {
    let mut replacements = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            continue;
        };
        let is_wem = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("wem"));
        let Some(id) = path
            .file_stem()
            .filter(|_| is_wem)
            .and_then(|stem| stem.parse::<u32>().ok())
        else {
            continue;
        };

        if let Some(previous) = replacements.insert(id, path) {
            tracing::warn!("Audio {} found more than once, ignoring {}", id, previous);
        }
    }

    replacements
}
