use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use ltk_audio_tree::session::{save_as, LoadedAudio};
use ltk_wwise::ContainerKind;
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{default_output_path, load_audio, output_kind, read_file, AudioSource};

pub struct ReplaceAudioArgs {
    pub file_path: String,
    pub id: u32,
    pub with: String,
    pub output: Option<String>,
    pub format: Option<ContainerKind>,
}

pub fn replace_audio(args: ReplaceAudioArgs) -> Result<()> {
    let file_path = Utf8Path::new(&args.file_path);
    let mut loaded = load_audio(&AudioSource::new(file_path))?;
    let bytes = read_file(Utf8Path::new(&args.with))?;

    let replaced = loaded.root.replace_audio(args.id, &bytes);
    if replaced == 0 {
        return Err(CliError::audio_not_found(args.id, file_path.to_path_buf()).into());
    }

    println_pad!(
        "{} {} {}",
        "🔁 Replaced audio".bright_blue().bold(),
        args.id.to_string().bright_cyan().bold(),
        format!("({} bytes)", bytes.len()).dimmed()
    );

    write_container(&loaded, file_path, args.output, args.format)
}

/// Save the tree of `loaded` and report where it went.
pub(crate) fn write_container(
    loaded: &LoadedAudio,
    file_path: &Utf8Path,
    output: Option<String>,
    format: Option<ContainerKind>,
) -> Result<()> {
    let kind = output_kind(format, loaded.metadata.kind());
    let output = output
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| default_output_path(file_path, kind));

    let written = save_as(&loaded.root, kind, &loaded.metadata)
        .map_err(|err| CliError::save_failed(output.clone(), err))?;
    fs::write(&output, &written.bytes).map_err(CliError::from)?;

    if written.duplicates > 0 {
        println_pad!(
            "{} {} duplicate audio ids collapsed, the last copy was kept",
            "⚠️".bright_yellow(),
            written.duplicates
        );
    }
    println_pad!(
        "{} {} {}",
        "✅ Wrote".bright_green().bold(),
        output.as_str().bright_white().bold(),
        format!("({}, {} bytes)", kind, written.bytes.len()).dimmed()
    );
    Ok(())
}
