//! Reader and writer for the Wwise audio containers shipped with League of Legends.
//!
//! Two container kinds are supported:
//!
//! - **BNK** soundbanks: a chunked file holding a bank header, an optional media
//!   index/data pair with embedded `.wem` payloads and an optional hierarchy of
//!   events, actions and sounds.
//! - **WPK** packages: a flat table of `.wem` payloads, used for voice-over.
//!
//! Besides the codec this crate resolves the numeric IDs found in those containers
//! back to event names using [`fnv::fnv1_lower`] and a list of candidate names
//! loaded with [`strings::StringTable`].
//!
//! # Example
//!
//! ```no_run
//! use ltk_wwise::{parse, resolve, strings::StringTable, write};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bank = std::fs::read("ahri_base_sfx_audio.bnk")?;
//! let events = std::fs::read("ahri_base_sfx_events.bnk")?;
//! let names = std::fs::read("skin0.bin")?;
//!
//! let mut container = parse(&bank)?;
//! let mut graph = parse(&events)?.hierarchy.unwrap_or_default();
//! if let Some(own) = container.hierarchy.take() {
//!     graph.merge(own);
//! }
//!
//! let strings = StringTable::new(&names).load();
//! let ids: Vec<u32> = container.payloads.iter().map(|p| p.id).collect();
//! let resolution = resolve::resolve_auto(Some(&graph), &ids, &strings.names);
//! println!("resolved {} of {} payloads", resolution.mappings.len(), ids.len());
//!
//! let rebuilt = write(&container.payloads, &container.metadata)?;
//! std::fs::write("rebuilt.bnk", rebuilt.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod bnk;
mod container;
mod error;
pub mod fnv;
pub mod hirc;
mod payload;
pub mod resolve;
pub mod strings;
pub mod wpk;

pub use container::*;
pub use error::{ParseWarning, Result, WwiseError};
pub use payload::*;
