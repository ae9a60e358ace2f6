mod config;
mod extract;
mod info;
mod replace;
mod repack;
mod tree;

pub use config::*;
pub use extract::*;
pub use info::*;
pub use replace::*;
pub use repack::*;
pub use tree::*;

use ltk_wwise::ContainerKind;

/// Container format selectable on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Bnk,
    Wpk,
}

impl From<OutputFormat> for ContainerKind {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Bnk => ContainerKind::Bnk,
            OutputFormat::Wpk => ContainerKind::Wpk,
        }
    }
}
