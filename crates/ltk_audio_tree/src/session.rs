//! Loading a container into an editable tree and writing it back.

use std::collections::HashSet;

use ltk_wwise::resolve::{resolve_auto, Resolution, ResolutionStrategy};
use ltk_wwise::strings::StringTable;
use ltk_wwise::{
    parse, write, AudioPayload, ContainerKind, ContainerMetadata, ParseWarning, Written,
};
use serde::Serialize;

use crate::builder::build;
use crate::error::Result;
use crate::node::TreeNode;

/// Root label used when none is given.
pub const DEFAULT_ROOT_LABEL: &str = "audio";

/// Auxiliary inputs for [`load`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions<'a> {
    /// Candidate event names (text list, length-prefixed records or a property bin).
    pub string_table: Option<&'a [u8]>,
    /// Companion bank holding the events for an audio-only bank or package.
    pub events_bank: Option<&'a [u8]>,
    /// Name of the root node. Defaults to [`DEFAULT_ROOT_LABEL`].
    pub root_label: Option<&'a str>,
}

/// Counts and diagnostics gathered during [`load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub file_count: usize,
    pub container_kind: ContainerKind,
    pub resolved: usize,
    /// `None` when no string table was given.
    pub strategy: Option<ResolutionStrategy>,
    pub skipped_strings: usize,
    pub warnings: Vec<String>,
}

/// A container loaded for editing.
#[derive(Debug, Clone)]
pub struct LoadedAudio {
    pub root: TreeNode,
    /// Payloads in container order.
    pub payloads: Vec<AudioPayload>,
    pub metadata: ContainerMetadata,
    pub summary: LoadSummary,
}

impl LoadedAudio {
    /// Write the current tree back into the original container format.
    pub fn save(&self) -> Result<Written> {
        save(&self.root, &self.metadata)
    }
}

/// Parse a container and group its payloads into a tree.
///
/// Failing to read the main container is fatal. A broken companion events bank
/// only degrades name resolution.
pub fn load(container: &[u8], options: &LoadOptions<'_>) -> Result<LoadedAudio> {
    let parsed = parse(container)?;
    let mut warnings: Vec<String> = parsed.warnings.iter().map(ParseWarning::to_string).collect();

    let mut hierarchy = parsed.hierarchy;
    if let Some(events) = options.events_bank {
        match parse(events) {
            Ok(events) => {
                warnings.extend(events.warnings.iter().map(|w| format!("events bank: {w}")));
                if let Some(mut graph) = events.hierarchy {
                    if let Some(own) = hierarchy.take() {
                        graph.merge(own);
                    }
                    hierarchy = Some(graph);
                }
            }
            Err(err) => {
                tracing::warn!("Ignoring unreadable events bank: {}", err);
                warnings.push(format!("events bank ignored: {err}"));
            }
        }
    }

    let payload_ids: Vec<u32> = parsed.payloads.iter().map(|payload| payload.id).collect();
    let (resolution, skipped_strings) = match options.string_table {
        Some(bytes) => {
            let strings = StringTable::new(bytes).load();
            let resolution = resolve_auto(hierarchy.as_ref(), &payload_ids, &strings.names);
            (Some(resolution), strings.skipped)
        }
        None => {
            tracing::info!("No string table given, leaving payloads unnamed");
            (None, 0)
        }
    };

    let mappings = resolution
        .as_ref()
        .map(|resolution| resolution.mappings.as_slice())
        .unwrap_or_default();
    let root_label = options.root_label.unwrap_or(DEFAULT_ROOT_LABEL);
    let root = build(&parsed.payloads, mappings, root_label);

    let summary = LoadSummary {
        file_count: parsed.payloads.len(),
        container_kind: parsed.metadata.kind(),
        resolved: count_resolved(resolution.as_ref(), &payload_ids),
        strategy: resolution.as_ref().map(|resolution| resolution.strategy),
        skipped_strings,
        warnings,
    };

    tracing::info!(
        "Loaded {} container: {} payloads, {} named",
        summary.container_kind,
        summary.file_count,
        summary.resolved
    );

    Ok(LoadedAudio {
        root,
        payloads: parsed.payloads,
        metadata: parsed.metadata,
        summary,
    })
}

/// Payloads of the container that received a name.
fn count_resolved(resolution: Option<&Resolution>, payload_ids: &[u32]) -> usize {
    resolution.map_or(0, |resolution| {
        let named: HashSet<u32> = resolution.mappings.iter().map(|m| m.id).collect();
        payload_ids.iter().filter(|&&id| named.contains(&id)).count()
    })
}

/// Write a tree into a container using the metadata it was loaded with.
pub fn save(root: &TreeNode, metadata: &ContainerMetadata) -> Result<Written> {
    root.validate()?;
    Ok(write(&root.flatten_payloads(), metadata)?)
}

/// Write a tree into a container of the given format.
///
/// `template` is reused when it already has that format, otherwise a fresh
/// container is created.
pub fn save_as(root: &TreeNode, kind: ContainerKind, template: &ContainerMetadata) -> Result<Written> {
    if template.kind() == kind {
        save(root, template)
    } else {
        save(root, &ContainerMetadata::fresh(kind))
    }
}
