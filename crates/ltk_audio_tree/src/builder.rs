//! Grouping of flat payload lists into an event tree.
//!
//! Payloads with a resolved event name are placed under a branch path derived
//! from the name (split on `/`, `\` and `::`), the last segment being the event
//! itself. Payloads without a name become leaves directly under the root, after
//! all named branches. Branch order follows the first payload that created them.

use std::collections::HashMap;

use ltk_wwise::resolve::EventMapping;
use ltk_wwise::AudioPayload;

use crate::node::TreeNode;

/// Build a tree from payloads and the names resolved for them.
///
/// If a payload id has several mappings the first one is used.
pub fn build(payloads: &[AudioPayload], mappings: &[EventMapping], root_label: &str) -> TreeNode {
    let mut names: HashMap<u32, &str> = HashMap::with_capacity(mappings.len());
    for mapping in mappings {
        names.entry(mapping.id).or_insert(mapping.name.as_str());
    }

    let mut root = TreeNode::branch(root_label);
    let mut unnamed = Vec::new();

    for payload in payloads {
        let segments = names.get(&payload.id).map(|name| split_name(name));
        match segments {
            Some(segments) if !segments.is_empty() => {
                insert_leaf(&mut root, &segments, TreeNode::leaf(payload.clone()));
            }
            _ => unnamed.push(TreeNode::leaf(payload.clone())),
        }
    }

    tracing::debug!(
        "Built audio tree: {} named branches, {} unnamed payloads",
        root.children.len(),
        unnamed.len()
    );

    root.children.extend(unnamed);
    root.assign_ids();
    root
}

/// Split an event name into branch segments.
pub fn split_name(name: &str) -> Vec<&str> {
    name.split(['/', '\\'])
        .flat_map(|part| part.split("::"))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn insert_leaf(root: &mut TreeNode, segments: &[&str], leaf: TreeNode) {
    let mut node = root;
    for segment in segments {
        let index = match node
            .children
            .iter()
            .position(|child| !child.is_leaf() && child.name == *segment)
        {
            Some(index) => index,
            None => {
                node.children.push(TreeNode::branch(*segment));
                node.children.len() - 1
            }
        };
        node = &mut node.children[index];
    }
    node.children.push(leaf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(id: u32, name: &str) -> EventMapping {
        EventMapping {
            id,
            name: name.to_string(),
        }
    }

    fn payloads(ids: &[u32]) -> Vec<AudioPayload> {
        ids.iter().map(|&id| AudioPayload::new(id, vec![id as u8])).collect()
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Play_vo_Ahri_Attack"), vec!["Play_vo_Ahri_Attack"]);
        assert_eq!(
            split_name("Characters/Ahri\\Skin0::Play_Q"),
            vec!["Characters", "Ahri", "Skin0", "Play_Q"]
        );
        assert_eq!(split_name("//a//"), vec!["a"]);
        assert!(split_name("/").is_empty());
    }

    #[test]
    fn test_grouping_and_order() {
        let payloads = payloads(&[30, 10, 20, 40, 50]);
        let mappings = vec![
            mapping(10, "Play_sfx_Ahri_Q"),
            mapping(20, "Play_vo_Ahri_Attack"),
            mapping(40, "Play_sfx_Ahri_Q"),
        ];

        let root = build(&payloads, &mappings, "ahri_base_sfx");
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Play_sfx_Ahri_Q", "Play_vo_Ahri_Attack", "30.wem", "50.wem"]
        );

        let q = &root.children[0];
        assert_eq!(q.id, "0");
        let q_ids: Vec<Option<u32>> = q.children.iter().map(TreeNode::audio_id).collect();
        assert_eq!(q_ids, vec![Some(10), Some(40)]);
        assert_eq!(q.children[1].id, "0/1");
        assert_eq!(q.children[1].name, "40.wem");
    }

    #[test]
    fn test_nested_paths_share_branches() {
        let payloads = payloads(&[1, 2]);
        let mappings = vec![mapping(1, "sfx/Play_a"), mapping(2, "sfx/Play_b")];
        let root = build(&payloads, &mappings, "root");

        assert_eq!(root.children.len(), 1);
        let sfx = &root.children[0];
        assert_eq!(sfx.name, "sfx");
        assert_eq!(sfx.children.len(), 2);
        assert_eq!(sfx.children[1].children[0].id, "0/1/0");
    }

    #[test]
    fn test_leaf_ids_match_payloads() {
        let input = payloads(&[5, 6, 7, 8]);
        let mappings = vec![mapping(6, "Play_x"), mapping(8, "a/Play_y")];
        let root = build(&input, &mappings, "root");
        assert!(root.validate().is_ok());

        let mut leaf_ids: Vec<u32> = root.leaves().iter().filter_map(|l| l.audio_id()).collect();
        leaf_ids.sort();
        assert_eq!(leaf_ids, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_no_names() {
        let root = build(&payloads(&[2, 1]), &[], "root");
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2.wem", "1.wem"]);
        assert_eq!(root.children[1].id, "1");
    }

    #[test]
    fn test_empty_payloads() {
        let root = build(&[], &[mapping(1, "Play_a")], "root");
        assert!(root.children.is_empty());
        assert!(!root.is_leaf());
    }
}
