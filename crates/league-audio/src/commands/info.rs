use camino::Utf8Path;
use colored::Colorize;
use ltk_wwise::hirc::ObjectKind;
use ltk_wwise::{parse, ContainerMetadata};
use miette::Result;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::read_file;

pub struct InfoContainerArgs {
    pub file_path: String,
}

pub fn info_container(args: InfoContainerArgs) -> Result<()> {
    let file_path = Utf8Path::new(&args.file_path);
    let bytes = read_file(file_path)?;
    let container = parse(&bytes)
        .map_err(|err| CliError::invalid_container(file_path.to_path_buf(), err.into()))?;

    let total_size: usize = container.payloads.iter().map(|p| p.bytes.len()).sum();

    println_pad!(
        "{} {} {}",
        "🔊 Container:".bright_blue().bold(),
        args.file_path.bright_cyan().bold(),
        format!("({})", container.kind()).dimmed()
    );
    println_pad!(
        "{} {}",
        "🏷️ Version:".bright_green(),
        container.metadata.version().to_string().bright_white().bold()
    );

    if let ContainerMetadata::Bnk(bank) = &container.metadata {
        println_pad!(
            "{} {}",
            "🆔 Bank id:".bright_green(),
            bank.bank_id.to_string().bright_white()
        );
        println_pad!(
            "{} {}",
            "🧩 Sections:".bright_yellow(),
            bank.section_tags().join(", ").bright_white()
        );
    }

    println_pad!(
        "{} {} {}",
        "🎵 Audio files:".bright_yellow(),
        container.payloads.len().to_string().bright_white().bold(),
        format!("({} bytes)", total_size).dimmed()
    );

    if let Some(graph) = &container.hierarchy {
        println_pad!(
            "{} {} objects {}",
            "🌳 Hierarchy:".bright_magenta().bold(),
            graph.len().to_string().bright_white().bold(),
            format!(
                "({} events, {} actions, {} sounds, {} containers)",
                graph.count(ObjectKind::Event),
                graph.count(ObjectKind::Action),
                graph.count(ObjectKind::Sound),
                graph.count(ObjectKind::Container)
            )
            .dimmed()
        );
    }

    if !container.warnings.is_empty() {
        println_pad!("\n{}", "⚠️  Warnings:".bright_yellow().bold());
        for warning in &container.warnings {
            println_pad!("   {} {}", "•".bright_yellow(), warning);
        }
    }

    Ok(())
}
