use crate::utils::config::{self, AppConfig};
use camino::Utf8PathBuf;
use colored::Colorize;
use ltk_wwise::ContainerKind;
use miette::Result;

fn update_config(update: impl FnOnce(&mut AppConfig)) -> Result<()> {
    let mut cfg = config::load_config();
    update(&mut cfg);
    config::save_config(&cfg).map_err(|e| miette::miette!("Failed to save config: {}", e))
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    match &cfg.strings_path {
        Some(path) => {
            let status = if path.exists() {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", "strings_path:".bright_white(), path, status);
        }
        None => println!(
            "  {} {}",
            "strings_path:".bright_white(),
            "(not set)".bright_yellow()
        ),
    }

    match cfg.output_format {
        Some(kind) => println!("  {} {}", "output_format:".bright_white(), kind.extension()),
        None => println!(
            "  {} {}",
            "output_format:".bright_white(),
            "(same as input)".bright_yellow()
        ),
    }

    println!();
    Ok(())
}

pub fn set_strings_path(path: String) -> Result<()> {
    let path = Utf8PathBuf::from(&path);
    if !path.is_file() {
        eprintln!(
            "  {}",
            "The path must point to a string table: a text list of event names or a .bin file."
                .bright_yellow()
        );
        return Err(miette::miette!("String table not found: {}", path));
    }

    update_config(|cfg| cfg.strings_path = Some(path.clone()))?;

    println!(
        "{}",
        "✓ String table set successfully!".bright_green().bold()
    );
    println!();
    println!(
        "  {} {}",
        "Path:".bright_white().bold(),
        path.as_str().bright_green()
    );
    Ok(())
}

pub fn set_output_format(format: Option<ContainerKind>) -> Result<()> {
    update_config(|cfg| cfg.output_format = format)?;

    let description = format.map_or("same as input", |kind| kind.extension());
    println!(
        "{} {}",
        "✓ Output format set to".bright_green().bold(),
        description.bright_white().bold()
    );
    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    config::save_config(&AppConfig::default())
        .map_err(|e| miette::miette!("Failed to reset config: {}", e))?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    Ok(())
}
