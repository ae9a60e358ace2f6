use std::collections::BTreeMap;

use ltk_wwise::bnk::{BankMetadata, BankSection};
use ltk_wwise::fnv::fnv1_lower;
use ltk_wwise::resolve::{resolve_auto, ResolutionStrategy};
use ltk_wwise::strings::StringTable;
use ltk_wwise::{
    parse, write, write_kind, AudioPayload, ContainerKind, ContainerMetadata, WwiseError,
};
use proptest::prelude::*;

/// Unique ids in ascending order with arbitrary contents.
fn payloads_strategy() -> impl Strategy<Value = Vec<AudioPayload>> {
    proptest::collection::btree_map(any::<u32>(), proptest::collection::vec(any::<u8>(), 0..64), 1..16)
        .prop_map(|map: BTreeMap<u32, Vec<u8>>| {
            map.into_iter()
                .map(|(id, bytes)| AudioPayload::new(id, bytes))
                .collect()
        })
}

fn contents(payloads: &[AudioPayload]) -> Vec<(u32, Vec<u8>)> {
    payloads.iter().map(|p| (p.id, p.bytes.clone())).collect()
}

proptest! {
    #[test]
    fn test_bnk_roundtrip(payloads in payloads_strategy()) {
        let written = write_kind(&payloads, ContainerKind::Bnk).unwrap();
        let parsed = parse(&written.bytes).unwrap();
        prop_assert_eq!(contents(&parsed.payloads), contents(&payloads));

        // Rewriting a parsed bank is stable.
        let rewritten = write(&parsed.payloads, &parsed.metadata).unwrap();
        prop_assert_eq!(rewritten.bytes, written.bytes);
    }

    #[test]
    fn test_wpk_roundtrip(payloads in payloads_strategy()) {
        let written = write_kind(&payloads, ContainerKind::Wpk).unwrap();
        let parsed = parse(&written.bytes).unwrap();
        prop_assert_eq!(contents(&parsed.payloads), contents(&payloads));
    }

    #[test]
    fn test_bnk_media_offsets(payloads in payloads_strategy()) {
        let written = write_kind(&payloads, ContainerKind::Bnk).unwrap();
        let parsed = parse(&written.bytes).unwrap();

        let data_len = data_chunk_len(&written.bytes);
        let mut previous_end = 0;
        let mut previous_offset: Option<u32> = None;
        for payload in &parsed.payloads {
            prop_assert_eq!(payload.offset % 16, 0);
            prop_assert!(payload.offset >= previous_end);
            // Empty payloads take no space and may share the next offset.
            if payload.length > 0 {
                if let Some(previous) = previous_offset {
                    prop_assert!(payload.offset > previous);
                }
                previous_offset = Some(payload.offset);
            }
            previous_end = payload.offset + payload.length;
        }
        prop_assert_eq!(previous_end, data_len);
    }
}

/// Walk the chunks of a bank and return the size of `DATA`.
fn data_chunk_len(bytes: &[u8]) -> u32 {
    let mut position = 0;
    while position + 8 <= bytes.len() {
        let size = u32::from_le_bytes(bytes[position + 4..position + 8].try_into().unwrap());
        if &bytes[position..position + 4] == b"DATA" {
            return size;
        }
        position += 8 + size as usize;
    }
    panic!("bank has no DATA chunk");
}

#[test]
fn test_duplicate_ids_collapse_on_write() {
    let payloads = vec![
        AudioPayload::new(3, vec![1]),
        AudioPayload::new(1, vec![2]),
        AudioPayload::new(3, vec![3, 3, 3]),
    ];
    let written = write_kind(&payloads, ContainerKind::Bnk).unwrap();
    assert_eq!(written.duplicates, 1);

    let parsed = parse(&written.bytes).unwrap();
    assert_eq!(
        contents(&parsed.payloads),
        vec![(1, vec![2]), (3, vec![3, 3, 3])]
    );
}

#[test]
fn test_corrupt_media_index_is_rejected() {
    let payloads = vec![AudioPayload::new(1, vec![0; 32])];
    let mut bytes = write_kind(&payloads, ContainerKind::Bnk).unwrap().bytes;

    // BKHD is 28 bytes, the first DIDX entry's size field sits at 28 + 8 + 8.
    bytes[44..48].copy_from_slice(&4096u32.to_le_bytes());
    assert!(matches!(
        parse(&bytes),
        Err(WwiseError::MalformedContainer { declared: 4096, available: 32, .. })
    ));
}

#[test]
fn test_truncated_bank_is_rejected() {
    let payloads = vec![AudioPayload::new(1, vec![0; 32])];
    let bytes = write_kind(&payloads, ContainerKind::Bnk).unwrap().bytes;
    assert!(matches!(
        parse(&bytes[..bytes.len() - 1]),
        Err(WwiseError::MalformedContainer { .. })
    ));
}

#[test]
fn test_resolution_degrades_without_hierarchy() {
    let names = ["explosion_01", "Play_vo_Ahri_Attack"];
    let payloads = vec![
        AudioPayload::new(fnv1_lower("explosion_01"), vec![1]),
        AudioPayload::new(42, vec![2]),
    ];
    let written = write_kind(&payloads, ContainerKind::Bnk).unwrap();
    let parsed = parse(&written.bytes).unwrap();
    assert!(parsed.hierarchy.is_none());

    let table = names.join("\n");
    let strings = StringTable::new(table.as_bytes()).load();
    let resolution = resolve_auto(parsed.hierarchy.as_ref(), &parsed.payload_ids(), &strings.names);
    assert_eq!(resolution.strategy, ResolutionStrategy::Direct);
    assert_eq!(resolution.name_of(0xD92C18C0), Some("explosion_01"));
    assert_eq!(resolution.name_of(42), None);
}

#[test]
fn test_hierarchy_survives_rewrite() {
    // Event -> action -> sound playing media 500, encoded for bank version 134.
    let event_id = fnv1_lower("Play_sfx_Ahri_Q");
    let mut hirc = 3u32.to_le_bytes().to_vec();
    push_object(&mut hirc, 4, &[&event_id.to_le_bytes()[..], &[1], &10u32.to_le_bytes()].concat());
    push_object(&mut hirc, 3, &[&10u32.to_le_bytes()[..], &[3, 4], &20u32.to_le_bytes()].concat());
    let mut sound = 20u32.to_le_bytes().to_vec();
    sound.extend_from_slice(&1u32.to_le_bytes());
    sound.push(0);
    sound.extend_from_slice(&500u32.to_le_bytes());
    sound.extend_from_slice(&1u32.to_le_bytes());
    sound.push(0);
    push_object(&mut hirc, 2, &sound);

    let mut metadata = BankMetadata::new(134, 1);
    metadata.sections.push(BankSection::Raw {
        tag: *b"HIRC",
        body: hirc.clone(),
    });
    let metadata = ContainerMetadata::Bnk(metadata);

    let written = write(&[AudioPayload::new(500, vec![7; 10])], &metadata).unwrap();
    let parsed = parse(&written.bytes).unwrap();
    let graph = parsed.hierarchy.as_ref().unwrap();
    assert_eq!(graph.get(20).unwrap().media, vec![500]);
    assert_eq!(parsed.warnings.len(), 0);

    let resolution = resolve_auto(Some(graph), &parsed.payload_ids(), ["Play_sfx_Ahri_Q"]);
    assert_eq!(resolution.strategy, ResolutionStrategy::Hierarchy);
    assert_eq!(resolution.name_of(500), Some("Play_sfx_Ahri_Q"));

    match parsed.metadata {
        ContainerMetadata::Bnk(bank) => assert_eq!(bank.hierarchy(), Some(hirc.as_slice())),
        other => panic!("expected bank metadata, got {other:?}"),
    }
}

fn push_object(hirc: &mut Vec<u8>, type_id: u8, body: &[u8]) {
    hirc.push(type_id);
    hirc.extend_from_slice(&(body.len() as u32).to_le_bytes());
    hirc.extend_from_slice(body);
}
