//! Editable event tree over Wwise audio containers.
//!
//! [`session::load`] parses a `.bnk` or `.wpk`, resolves payload IDs to event
//! names and groups the payloads into a [`TreeNode`] hierarchy. Leaves can then
//! be replaced and the tree written back with [`session::save`].
//!
//! ```no_run
//! use ltk_audio_tree::session::{load, LoadOptions};
//!
//! # fn main() -> ltk_audio_tree::Result<()> {
//! let bank = std::fs::read("ahri_base_vo_audio.wpk")?;
//! let names = std::fs::read("vo_events.txt")?;
//!
//! let mut loaded = load(
//!     &bank,
//!     &LoadOptions {
//!         string_table: Some(&names),
//!         ..Default::default()
//!     },
//! )?;
//! loaded.root.replace_audio(0x2890D955, &std::fs::read("new.wem")?);
//! std::fs::write("ahri_base_vo_audio.wpk", loaded.save()?.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
mod error;
pub mod node;
pub mod session;

pub use builder::build;
pub use error::{Error, Result};
pub use node::{TreeNode, TreeNodeView};
