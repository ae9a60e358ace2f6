use camino::Utf8Path;
use colored::Colorize;
use ltk_audio_tree::TreeNode;
use miette::{IntoDiagnostic, Result};
use serde_json::json;

use crate::println_pad;
use crate::utils::{load_audio, AudioSource};

pub struct TreeContainerArgs {
    pub file_path: String,
    pub strings: Option<String>,
    pub events: Option<String>,
    pub json: bool,
}

pub fn print_tree(args: TreeContainerArgs) -> Result<()> {
    let source = AudioSource {
        file_path: Utf8Path::new(&args.file_path),
        strings: args.strings.as_deref().map(Utf8Path::new),
        events: args.events.as_deref().map(Utf8Path::new),
    };
    let loaded = load_audio(&source)?;

    if args.json {
        let output = json!({
            "summary": loaded.summary,
            "tree": loaded.root.view(),
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(());
    }

    print_node(&loaded.root, 0);

    let summary = &loaded.summary;
    println!();
    println_pad!(
        "{} {} of {} audio files named",
        "🏷️".bright_green(),
        summary.resolved.to_string().bright_white().bold(),
        summary.file_count.to_string().bright_white().bold()
    );
    if summary.skipped_strings > 0 {
        println_pad!(
            "{} {} string records skipped",
            "⚠️".bright_yellow(),
            summary.skipped_strings
        );
    }
    for warning in &summary.warnings {
        println_pad!("{} {}", "⚠️".bright_yellow(), warning);
    }

    Ok(())
}

fn print_node(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match &node.payload {
        Some(payload) => println_pad!(
            "{}{} {} {}",
            indent,
            "♪".bright_cyan(),
            node.name.bright_white(),
            format!("[{}] {} bytes", node.id, payload.length).dimmed()
        ),
        None => println_pad!(
            "{}{} {}",
            indent,
            "▸".bright_magenta(),
            node.name.bright_magenta().bold()
        ),
    }

    for child in &node.children {
        print_node(child, depth + 1);
    }
}
