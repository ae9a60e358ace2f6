use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use ltk_audio_tree::TreeNode;
use ltk_wwise::AudioPayload;
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{load_audio, sanitize_file_name, AudioSource};

pub struct ExtractContainerArgs {
    pub file_path: String,
    pub output_dir: Option<String>,
    pub strings: Option<String>,
    pub events: Option<String>,
}

/// Compute the default output directory: parent folder + file stem
fn default_output_dir(file_path: &Utf8Path) -> Utf8PathBuf {
    let file_stem = file_path.file_stem().unwrap_or("extracted");
    match file_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.join(file_stem),
        _ => Utf8PathBuf::from(file_stem),
    }
}

pub fn extract_container(args: ExtractContainerArgs) -> Result<()> {
    let file_path = Utf8Path::new(&args.file_path);
    let source = AudioSource {
        file_path,
        strings: args.strings.as_deref().map(Utf8Path::new),
        events: args.events.as_deref().map(Utf8Path::new),
    };
    let loaded = load_audio(&source)?;

    println_pad!(
        "{} {}",
        "🔊 Extracting:".bright_blue().bold(),
        args.file_path.bright_cyan().bold()
    );

    let output_dir = args
        .output_dir
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| default_output_dir(file_path));

    println_pad!(
        "{} {}",
        "📁 Extracting to:".bright_yellow(),
        output_dir.as_str().bright_white().bold()
    );

    let written = write_leaves(&loaded.root, &output_dir)?;

    println_pad!(
        "{} {} audio files ({} named)",
        "✅ Extracted".bright_green().bold(),
        written,
        loaded.summary.resolved
    );
    Ok(())
}

/// Write every leaf below `root` to `<output_dir>/<branch path>/<id>.wem`.
fn write_leaves(root: &TreeNode, output_dir: &Utf8Path) -> Result<usize> {
    let mut files = Vec::new();
    collect_leaves(root, output_dir.to_path_buf(), &mut files);

    for (path, payload) in &files {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| CliError::directory_creation_failed(parent.to_path_buf(), err))?;
        }
        fs::write(path, &payload.bytes).map_err(CliError::from)?;
        tracing::debug!("Wrote {}", path);
    }

    Ok(files.len())
}

fn collect_leaves<'a>(
    node: &'a TreeNode,
    dir: Utf8PathBuf,
    files: &mut Vec<(Utf8PathBuf, &'a AudioPayload)>,
) {
    for child in &node.children {
        match &child.payload {
            Some(payload) => files.push((dir.join(payload.file_name()), payload)),
            None => collect_leaves(child, dir.join(sanitize_file_name(&child.name)), files),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltk_wwise::resolve::EventMapping;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Utf8Path::new("vo/ahri_base_vo_audio.wpk")),
            Utf8PathBuf::from("vo/ahri_base_vo_audio")
        );
        assert_eq!(
            default_output_dir(Utf8Path::new("ahri.bnk")),
            Utf8PathBuf::from("ahri")
        );
    }

    #[test]
    fn test_write_leaves_mirrors_tree() {
        let mut root = TreeNode::branch("ahri");
        let mut event = TreeNode::branch("Play_Q:Cast");
        event.children.push(TreeNode::leaf(AudioPayload::new(1, vec![1, 2])));
        root.children.push(event);
        root.children.push(TreeNode::leaf(AudioPayload::new(2, vec![3])));
        root.assign_ids();

        let dir = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert_eq!(write_leaves(&root, &output).unwrap(), 2);

        assert_eq!(fs::read(output.join("Play_Q_Cast/1.wem")).unwrap(), vec![1, 2]);
        assert_eq!(fs::read(output.join("2.wem")).unwrap(), vec![3]);
    }

    #[test]
    fn test_write_leaves_stays_inside_output_dir() {
        let mappings = [EventMapping {
            id: 1,
            name: "../../escaped/Play_x".to_string(),
        }];
        let root = ltk_audio_tree::build(&[AudioPayload::new(1, vec![7])], &mappings, "root");

        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let output = base.join("a").join("out");
        assert_eq!(write_leaves(&root, &output).unwrap(), 1);

        assert!(!base.join("escaped").exists());
        assert!(!base.join("a").join("escaped").exists());
        assert_eq!(
            fs::read(output.join("__/__/escaped/Play_x/1.wem")).unwrap(),
            vec![7]
        );
    }
}
