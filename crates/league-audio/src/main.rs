use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    extract_container, info_container, print_tree, repack_container, replace_audio,
    ExtractContainerArgs, InfoContainerArgs, OutputFormat, RepackContainerArgs,
    ReplaceAudioArgs, TreeContainerArgs,
};
use miette::Result;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show information about a soundbank or audio package
    Info {
        /// The path to the .bnk or .wpk file
        #[arg(short, long)]
        file_path: String,
    },
    /// Print the event tree of a container
    Tree {
        /// The path to the .bnk or .wpk file
        #[arg(short, long)]
        file_path: String,

        /// String table with candidate event names
        #[arg(short, long)]
        strings: Option<String>,

        /// Companion events bank (e.g. *_events.bnk)
        #[arg(short, long)]
        events: Option<String>,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract every audio file into a directory tree
    Extract {
        /// The path to the .bnk or .wpk file
        #[arg(short, long)]
        file_path: String,

        /// The directory to extract to
        #[arg(short, long)]
        output_dir: Option<String>,

        /// String table with candidate event names
        #[arg(short, long)]
        strings: Option<String>,

        /// Companion events bank (e.g. *_events.bnk)
        #[arg(short, long)]
        events: Option<String>,
    },
    /// Replace a single audio file
    Replace {
        /// The path to the .bnk or .wpk file
        #[arg(short, long)]
        file_path: String,

        /// The audio id to replace
        #[arg(long)]
        id: u32,

        /// The .wem file to put in its place
        #[arg(long)]
        with: String,

        /// Where to write the modified container
        #[arg(short, long)]
        output: Option<String>,

        /// The output container format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Replace every audio file that has a matching <id>.wem in a directory
    Repack {
        /// The path to the .bnk or .wpk file
        #[arg(short, long)]
        file_path: String,

        /// Directory searched recursively for <id>.wem files
        #[arg(short, long)]
        input_dir: String,

        /// Where to write the modified container
        #[arg(short, long)]
        output: Option<String>,

        /// The output container format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Manage the configuration stored next to the executable
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set the default string table
    SetStringsPath {
        /// Path to a text list of event names or a .bin file
        path: String,
    },
    /// Set the default output format (omit to keep the input's format)
    SetOutputFormat {
        #[arg(value_enum)]
        format: Option<OutputFormat>,
    },
    /// Reset the configuration to defaults
    Reset,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args();

    match args.command {
        Commands::Info { file_path } => info_container(InfoContainerArgs { file_path }),
        Commands::Tree {
            file_path,
            strings,
            events,
            json,
        } => print_tree(TreeContainerArgs {
            file_path,
            strings,
            events,
            json,
        }),
        Commands::Extract {
            file_path,
            output_dir,
            strings,
            events,
        } => extract_container(ExtractContainerArgs {
            file_path,
            output_dir,
            strings,
            events,
        }),
        Commands::Replace {
            file_path,
            id,
            with,
            output,
            format,
        } => replace_audio(ReplaceAudioArgs {
            file_path,
            id,
            with,
            output,
            format: format.map(Into::into),
        }),
        Commands::Repack {
            file_path,
            input_dir,
            output,
            format,
        } => repack_container(RepackContainerArgs {
            file_path,
            input_dir,
            output,
            format: format.map(Into::into),
        }),
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::show_config(),
            ConfigCommands::SetStringsPath { path } => commands::set_strings_path(path),
            ConfigCommands::SetOutputFormat { format } => {
                commands::set_output_format(format.map(Into::into))
            }
            ConfigCommands::Reset => commands::reset_config(),
        },
    }
}
