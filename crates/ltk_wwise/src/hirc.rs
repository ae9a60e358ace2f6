//! The soundbank object hierarchy (`HIRC` chunk).
//!
//! Every object starts with a type byte, a `u32` body size and a `u32` ID. Only
//! the parts needed to walk from an event down to the audio it plays are decoded:
//!
//! - events list the actions they trigger,
//! - actions point at a single target object,
//! - sounds and music tracks name the media (`.wem`) IDs they play,
//! - containers are linked to their children through the `DirectParentID`
//!   stored in every node's base parameters.
//!
//! Everything else is kept opaque. The raw chunk is written back untouched, so
//! nothing here needs to round-trip.

use std::collections::HashMap;
use std::io::{self, Cursor, Seek, SeekFrom};

use byteorder::{ByteOrder, ReadBytesExt, LE};

use crate::error::{ParseWarning, Result, WwiseError};

pub const HIRC_SOUND: u8 = 2;
pub const HIRC_ACTION: u8 = 3;
pub const HIRC_EVENT: u8 = 4;
pub const HIRC_RANDOM_SEQUENCE_CONTAINER: u8 = 5;
pub const HIRC_SWITCH_CONTAINER: u8 = 6;
pub const HIRC_ACTOR_MIXER: u8 = 7;
pub const HIRC_LAYER_CONTAINER: u8 = 9;
pub const HIRC_MUSIC_SEGMENT: u8 = 10;
pub const HIRC_MUSIC_TRACK: u8 = 11;
pub const HIRC_MUSIC_SWITCH: u8 = 12;
pub const HIRC_MUSIC_RANDOM_SEQUENCE: u8 = 13;

/// Last bank version that stores an event's action count as a plain `u32`.
const LAST_U32_ACTION_COUNT_VERSION: u32 = 122;

/// Size of one entry in a node's initial FX list.
const FX_ENTRY_SIZE: i64 = 7;

/// Size of one entry in a node's initial metadata FX list.
const METADATA_FX_ENTRY_SIZE: i64 = 6;

/// Coarse classification of hierarchy objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Event,
    Action,
    /// Objects that play media directly (sounds, music tracks).
    Sound,
    /// Objects grouping other nodes (random/switch/layer containers, actor mixers, music containers).
    Container,
    Other,
}

impl ObjectKind {
    pub fn from_type_id(type_id: u8) -> Self {
        match type_id {
            HIRC_EVENT => ObjectKind::Event,
            HIRC_ACTION => ObjectKind::Action,
            HIRC_SOUND | HIRC_MUSIC_TRACK => ObjectKind::Sound,
            HIRC_RANDOM_SEQUENCE_CONTAINER
            | HIRC_SWITCH_CONTAINER
            | HIRC_ACTOR_MIXER
            | HIRC_LAYER_CONTAINER
            | HIRC_MUSIC_SEGMENT
            | HIRC_MUSIC_SWITCH
            | HIRC_MUSIC_RANDOM_SEQUENCE => ObjectKind::Container,
            _ => ObjectKind::Other,
        }
    }
}

/// A decoded hierarchy object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub id: u32,
    pub kind: ObjectKind,
    /// The raw HIRC type byte.
    pub type_id: u8,
    /// Outgoing edges stored in the object itself (event actions, action target).
    pub references: Vec<u32>,
    /// Media IDs played by sound-like objects.
    pub media: Vec<u32>,
    /// Direct parent in the actor-mixer/interactive-music tree.
    pub parent: Option<u32>,
}

impl ObjectRecord {
    pub fn new(id: u32, type_id: u8) -> Self {
        Self {
            id,
            kind: ObjectKind::from_type_id(type_id),
            type_id,
            references: Vec::new(),
            media: Vec::new(),
            parent: None,
        }
    }

    pub fn with_references(mut self, references: Vec<u32>) -> Self {
        self.references = references;
        self
    }

    pub fn with_media(mut self, media: Vec<u32>) -> Self {
        self.media = media;
        self
    }

    pub fn with_parent(mut self, parent: u32) -> Self {
        self.parent = (parent != 0).then_some(parent);
        self
    }
}

/// Hierarchy objects indexed by ID.
///
/// Child edges of containers are derived from each object's `parent`, so an
/// object and its parent may come from different banks as long as both graphs
/// are [merged](ObjectGraph::merge).
#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    records: Vec<ObjectRecord>,
    index: HashMap<u32, usize>,
    children: HashMap<u32, Vec<u32>>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ObjectRecord>) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.insert(record);
        }
        graph
    }

    /// Insert a record. Returns `false` (and keeps the existing record) if the ID is taken.
    pub fn insert(&mut self, record: ObjectRecord) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }

        if let Some(parent) = record.parent {
            self.children.entry(parent).or_default().push(record.id);
        }
        self.index.insert(record.id, self.records.len());
        self.records.push(record);
        true
    }

    /// Merge another graph into this one. Objects already present win.
    pub fn merge(&mut self, other: ObjectGraph) {
        for record in other.records {
            self.insert(record);
        }
    }

    pub fn get(&self, id: u32) -> Option<&ObjectRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    pub fn has_events(&self) -> bool {
        self.records.iter().any(|r| r.kind == ObjectKind::Event)
    }

    /// Stored references followed by derived children.
    pub fn edges(&self, id: u32) -> impl Iterator<Item = u32> + '_ {
        let references = self
            .get(id)
            .map(|r| r.references.as_slice())
            .unwrap_or_default();
        let children = self
            .children
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        references.iter().chain(children).copied()
    }
}

/// Parse the body of a `HIRC` chunk.
///
/// `chunk_offset` is the file offset of the body and only used for error reporting.
pub(crate) fn read_hierarchy(
    body: &[u8],
    chunk_offset: usize,
    version: u32,
    warnings: &mut Vec<ParseWarning>,
) -> Result<ObjectGraph> {
    if body.len() < 4 {
        return Err(WwiseError::malformed(
            "HIRC object count",
            chunk_offset,
            4,
            body.len(),
        ));
    }

    let count = LE::read_u32(body);
    let mut graph = ObjectGraph::new();
    let mut position = 4;

    for i in 0..count {
        let remaining = body.len() - position;
        if remaining < 5 {
            return Err(WwiseError::malformed(
                format!("HIRC object #{i} header"),
                chunk_offset + position,
                5,
                remaining,
            ));
        }

        let type_id = body[position];
        let size = LE::read_u32(&body[position + 1..]) as usize;
        let start = position + 5;
        let available = body.len() - start;
        if size > available {
            return Err(WwiseError::malformed(
                format!("HIRC object #{i}"),
                chunk_offset + position,
                size,
                available,
            ));
        }
        if size < 4 {
            return Err(WwiseError::invalid_section(
                "HIRC",
                format!("object #{i} is {size} bytes, too small to hold an id"),
            ));
        }

        let record = decode_object(type_id, &body[start..start + size], version, warnings);
        if !graph.insert(record) {
            tracing::debug!("Duplicate hierarchy object id, keeping the first one");
        }
        position = start + size;
    }

    tracing::debug!(
        "Read {} hierarchy objects ({} events, {} sounds)",
        graph.len(),
        graph.count(ObjectKind::Event),
        graph.count(ObjectKind::Sound)
    );
    Ok(graph)
}

fn decode_object(
    type_id: u8,
    body: &[u8],
    version: u32,
    warnings: &mut Vec<ParseWarning>,
) -> ObjectRecord {
    let id = LE::read_u32(body);
    let mut reader = Cursor::new(&body[4..]);

    let decoded = match type_id {
        HIRC_EVENT => read_event(&mut reader, version).map(|actions| {
            ObjectRecord::new(id, type_id).with_references(actions)
        }),
        HIRC_ACTION => read_action(&mut reader)
            .map(|target| ObjectRecord::new(id, type_id).with_references(target)),
        HIRC_SOUND => read_source(&mut reader).map(|source| {
            let record = ObjectRecord::new(id, type_id).with_media(vec![source]);
            // The media ID is what matters; a sound without a readable parent still resolves.
            match read_direct_parent(&mut reader, version) {
                Ok(parent) => record.with_parent(parent),
                Err(_) => record,
            }
        }),
        HIRC_MUSIC_TRACK => read_music_track_sources(&mut reader, version)
            .map(|sources| ObjectRecord::new(id, type_id).with_media(sources)),
        HIRC_RANDOM_SEQUENCE_CONTAINER
        | HIRC_SWITCH_CONTAINER
        | HIRC_ACTOR_MIXER
        | HIRC_LAYER_CONTAINER => read_direct_parent(&mut reader, version)
            .map(|parent| ObjectRecord::new(id, type_id).with_parent(parent)),
        HIRC_MUSIC_SEGMENT | HIRC_MUSIC_SWITCH | HIRC_MUSIC_RANDOM_SEQUENCE => {
            skip_music_flags(&mut reader, version)
                .and_then(|_| read_direct_parent(&mut reader, version))
                .map(|parent| ObjectRecord::new(id, type_id).with_parent(parent))
        }
        _ => Ok(ObjectRecord::new(id, type_id)),
    };

    decoded.unwrap_or_else(|err| {
        tracing::warn!(
            "Could not decode hierarchy object {} (type {}): {}",
            id,
            type_id,
            err
        );
        warnings.push(ParseWarning::UnreadableObject { id, type_id });
        ObjectRecord::new(id, type_id)
    })
}

fn read_event(reader: &mut Cursor<&[u8]>, version: u32) -> io::Result<Vec<u32>> {
    let count = if version <= LAST_U32_ACTION_COUNT_VERSION {
        reader.read_u32::<LE>()?
    } else {
        read_var_u32(reader)?
    };

    let remaining = reader.get_ref().len() as u64 - reader.position();
    if u64::from(count) * 4 > remaining {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("event lists {count} actions but only {remaining} bytes remain"),
        ));
    }

    (0..count).map(|_| reader.read_u32::<LE>()).collect()
}

fn read_action(reader: &mut Cursor<&[u8]>) -> io::Result<Vec<u32>> {
    let _action_type = reader.read_u16::<LE>()?;
    let target = reader.read_u32::<LE>()?;
    Ok(if target == 0 { Vec::new() } else { vec![target] })
}

/// Read an `AkBankSourceData` block and return its media ID.
fn read_source(reader: &mut Cursor<&[u8]>) -> io::Result<u32> {
    let plugin_id = reader.read_u32::<LE>()?;
    let _stream_type = reader.read_u8()?;
    let source_id = reader.read_u32::<LE>()?;
    let _in_memory_size = reader.read_u32::<LE>()?;
    let _source_bits = reader.read_u8()?;

    // Source plugins carry an inline parameter block.
    if plugin_id & 0x0F == 2 {
        let size = reader.read_u32::<LE>()?;
        reader.seek(SeekFrom::Current(i64::from(size)))?;
    }
    Ok(source_id)
}

fn read_music_track_sources(reader: &mut Cursor<&[u8]>, version: u32) -> io::Result<Vec<u32>> {
    skip_music_flags(reader, version)?;
    let count = reader.read_u32::<LE>()?;
    let mut sources = Vec::new();
    for _ in 0..count {
        sources.push(read_source(reader)?);
    }
    Ok(sources)
}

fn skip_music_flags(reader: &mut Cursor<&[u8]>, version: u32) -> io::Result<()> {
    if version > 89 {
        reader.read_u8()?;
    }
    Ok(())
}

/// Read the start of `NodeBaseParams` up to and including `DirectParentID`.
fn read_direct_parent(reader: &mut Cursor<&[u8]>, version: u32) -> io::Result<u32> {
    let _override_parent_fx = reader.read_u8()?;
    let fx_count = reader.read_u8()?;
    if fx_count > 0 {
        let _fx_bypass = reader.read_u8()?;
        reader.seek(SeekFrom::Current(i64::from(fx_count) * FX_ENTRY_SIZE))?;
    }

    if version > 136 {
        let _override_parent_metadata = reader.read_u8()?;
        let metadata_count = reader.read_u8()?;
        reader.seek(SeekFrom::Current(
            i64::from(metadata_count) * METADATA_FX_ENTRY_SIZE,
        ))?;
    }

    if version > 88 {
        let _override_attachment_params = reader.read_u8()?;
    }

    let _override_bus_id = reader.read_u32::<LE>()?;
    reader.read_u32::<LE>()
}

/// Wwise variable-length integer: 7 bits per byte, most significant group first.
fn read_var_u32(reader: &mut Cursor<&[u8]>) -> io::Result<u32> {
    let mut value = 0u32;
    for _ in 0..5 {
        let byte = reader.read_u8()?;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "variable-length integer is longer than 5 bytes",
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal encoder for hierarchy bodies, mirroring what the reader understands.
    pub(crate) struct HircWriter {
        version: u32,
        objects: Vec<(u8, Vec<u8>)>,
    }

    impl HircWriter {
        pub(crate) fn new(version: u32) -> Self {
            Self {
                version,
                objects: Vec::new(),
            }
        }

        pub(crate) fn event(mut self, id: u32, actions: &[u32]) -> Self {
            let mut body = id.to_le_bytes().to_vec();
            if self.version <= LAST_U32_ACTION_COUNT_VERSION {
                body.extend_from_slice(&(actions.len() as u32).to_le_bytes());
            } else {
                assert!(actions.len() < 0x80);
                body.push(actions.len() as u8);
            }
            for action in actions {
                body.extend_from_slice(&action.to_le_bytes());
            }
            self.objects.push((HIRC_EVENT, body));
            self
        }

        pub(crate) fn action(mut self, id: u32, target: u32) -> Self {
            let mut body = id.to_le_bytes().to_vec();
            body.extend_from_slice(&0x0403u16.to_le_bytes());
            body.extend_from_slice(&target.to_le_bytes());
            body.push(0); // bus flag
            self.objects.push((HIRC_ACTION, body));
            self
        }

        pub(crate) fn sound(mut self, id: u32, source: u32, parent: u32) -> Self {
            let mut body = id.to_le_bytes().to_vec();
            body.extend_from_slice(&0x0004_0001u32.to_le_bytes()); // vorbis codec
            body.push(0); // embedded
            body.extend_from_slice(&source.to_le_bytes());
            body.extend_from_slice(&1024u32.to_le_bytes());
            body.push(0);
            body.extend_from_slice(&self.node_base(parent));
            self.objects.push((HIRC_SOUND, body));
            self
        }

        pub(crate) fn container(mut self, type_id: u8, id: u32, parent: u32) -> Self {
            let mut body = id.to_le_bytes().to_vec();
            body.extend_from_slice(&self.node_base(parent));
            body.extend_from_slice(&[0xEE; 8]); // rest of the node, not decoded
            self.objects.push((type_id, body));
            self
        }

        pub(crate) fn raw(mut self, type_id: u8, body: Vec<u8>) -> Self {
            self.objects.push((type_id, body));
            self
        }

        fn node_base(&self, parent: u32) -> Vec<u8> {
            let mut base = vec![0, 1, 0]; // no override, one fx, bypass bits
            base.extend_from_slice(&[0, 0xAA, 0xBB, 0xCC, 0xDD, 0, 0]);
            if self.version > 136 {
                base.extend_from_slice(&[0, 0]);
            }
            if self.version > 88 {
                base.push(0);
            }
            base.extend_from_slice(&0u32.to_le_bytes()); // bus
            base.extend_from_slice(&parent.to_le_bytes());
            base
        }

        pub(crate) fn build(self) -> Vec<u8> {
            let mut out = (self.objects.len() as u32).to_le_bytes().to_vec();
            for (type_id, body) in self.objects {
                out.push(type_id);
                out.extend_from_slice(&(body.len() as u32).to_le_bytes());
                out.extend_from_slice(&body);
            }
            out
        }
    }

    fn read(body: &[u8], version: u32) -> (ObjectGraph, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let graph = read_hierarchy(body, 0, version, &mut warnings).unwrap();
        (graph, warnings)
    }

    #[test]
    fn test_event_action_sound_chain() {
        for version in [113, 134, 145] {
            let body = HircWriter::new(version)
                .event(100, &[200, 201])
                .action(200, 300)
                .action(201, 0)
                .sound(300, 9001, 400)
                .container(HIRC_RANDOM_SEQUENCE_CONTAINER, 400, 0)
                .build();

            let (graph, warnings) = read(&body, version);
            assert!(warnings.is_empty(), "version {version}: {warnings:?}");
            assert_eq!(graph.len(), 5);

            let event = graph.get(100).unwrap();
            assert_eq!(event.kind, ObjectKind::Event);
            assert_eq!(event.references, vec![200, 201]);

            assert_eq!(graph.get(200).unwrap().references, vec![300]);
            assert!(graph.get(201).unwrap().references.is_empty());

            let sound = graph.get(300).unwrap();
            assert_eq!(sound.kind, ObjectKind::Sound);
            assert_eq!(sound.media, vec![9001]);
            assert_eq!(sound.parent, Some(400));

            assert_eq!(graph.get(400).unwrap().parent, None);
            assert_eq!(graph.edges(400).collect::<Vec<_>>(), vec![300]);
        }
    }

    #[test]
    fn test_unknown_kind_is_opaque() {
        let body = HircWriter::new(134)
            .raw(0x42, vec![0x10, 0, 0, 0, 1, 2, 3])
            .build();
        let (graph, warnings) = read(&body, 134);
        assert!(warnings.is_empty());
        let record = graph.get(0x10).unwrap();
        assert_eq!(record.kind, ObjectKind::Other);
        assert_eq!(record.type_id, 0x42);
    }

    #[test]
    fn test_truncated_known_kind_is_kept_with_warning() {
        // An action body with an id but no target.
        let body = HircWriter::new(134)
            .raw(HIRC_ACTION, vec![0x20, 0, 0, 0, 0x03])
            .build();
        let (graph, warnings) = read(&body, 134);
        assert_eq!(
            warnings,
            vec![ParseWarning::UnreadableObject {
                id: 0x20,
                type_id: HIRC_ACTION
            }]
        );
        assert!(graph.get(0x20).unwrap().references.is_empty());
    }

    #[test]
    fn test_event_with_absurd_action_count() {
        let mut body = 7u32.to_le_bytes().to_vec();
        body.extend_from_slice(&u32::MAX.to_le_bytes());
        let hirc = HircWriter::new(113).raw(HIRC_EVENT, body).build();
        let (graph, warnings) = read(&hirc, 113);
        assert_eq!(warnings.len(), 1);
        assert!(graph.get(7).unwrap().references.is_empty());
    }

    #[test]
    fn test_object_overrunning_chunk_is_fatal() {
        let mut body = 1u32.to_le_bytes().to_vec();
        body.push(HIRC_SOUND);
        body.extend_from_slice(&100u32.to_le_bytes());
        body.extend_from_slice(&[0; 10]);

        let mut warnings = Vec::new();
        let err = read_hierarchy(&body, 0x40, 134, &mut warnings).unwrap_err();
        match err {
            WwiseError::MalformedContainer {
                offset,
                declared,
                available,
                ..
            } => {
                assert_eq!(offset, 0x44);
                assert_eq!(declared, 100);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_var_u32() {
        let mut reader = Cursor::new(&[0x81u8, 0x00][..]);
        assert_eq!(read_var_u32(&mut reader).unwrap(), 128);
        let mut reader = Cursor::new(&[0x05u8][..]);
        assert_eq!(read_var_u32(&mut reader).unwrap(), 5);
    }

    #[test]
    fn test_merge_links_children_across_graphs() {
        let events = ObjectGraph::from_records([
            ObjectRecord::new(1, HIRC_EVENT).with_references(vec![2]),
            ObjectRecord::new(2, HIRC_ACTION).with_references(vec![3]),
        ]);
        let audio = ObjectGraph::from_records([
            ObjectRecord::new(3, HIRC_SWITCH_CONTAINER),
            ObjectRecord::new(4, HIRC_SOUND)
                .with_media(vec![44])
                .with_parent(3),
        ]);

        let mut graph = events;
        graph.merge(audio);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.edges(3).collect::<Vec<_>>(), vec![4]);
        assert!(graph.has_events());
    }
}
