use ltk_wwise::AudioPayload;
use serde::Serialize;

use crate::error::{Error, Result};

/// Separator used in node ids.
pub const ID_SEPARATOR: char = '/';

/// A node of the audio tree.
///
/// A node is either a leaf holding an audio payload or a branch holding
/// children, never both. Branches may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Child-index path from the root (`""` for the root, `"0"`, `"0/2"`, ...).
    pub id: String,
    pub name: String,
    pub payload: Option<AudioPayload>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            payload: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(payload: AudioPayload) -> Self {
        Self {
            id: String::new(),
            name: payload.file_name(),
            payload: Some(payload),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.payload.is_some()
    }

    /// Audio id of a leaf.
    pub fn audio_id(&self) -> Option<u32> {
        self.payload.as_ref().map(|payload| payload.id)
    }

    /// Recompute every node id from its position in the tree.
    pub fn assign_ids(&mut self) {
        self.id = String::new();
        assign_child_ids(self);
    }

    /// All leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        self.visit(&mut |node| {
            if node.is_leaf() {
                leaves.push(node);
            }
        });
        leaves
    }

    /// Number of nodes including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Replace the audio of the leaf with the given node id.
    pub fn replace_payload(&mut self, node_id: &str, bytes: Vec<u8>) -> Result<()> {
        let node = self
            .find_mut(node_id)
            .ok_or_else(|| Error::NodeNotFound(node_id.to_string()))?;
        let payload = node
            .payload
            .as_mut()
            .ok_or_else(|| Error::NotALeaf(node_id.to_string()))?;
        payload.replace_bytes(bytes);
        Ok(())
    }

    /// Replace the audio of every leaf with the given audio id.
    ///
    /// Returns the number of leaves that were updated.
    pub fn replace_audio(&mut self, audio_id: u32, bytes: &[u8]) -> usize {
        let mut replaced = 0;
        self.visit_mut(&mut |node| {
            if let Some(payload) = node.payload.as_mut().filter(|p| p.id == audio_id) {
                payload.replace_bytes(bytes.to_vec());
                replaced += 1;
            }
        });
        replaced
    }

    /// Leaf payloads in depth-first order, ready to be written.
    pub fn flatten_payloads(&self) -> Vec<AudioPayload> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| leaf.payload.clone())
            .collect()
    }

    /// Check that no node is both a leaf and a branch.
    pub fn validate(&self) -> Result<()> {
        if self.is_leaf() && !self.children.is_empty() {
            return Err(Error::InvalidNode(self.id.clone()));
        }
        self.children.iter().try_for_each(TreeNode::validate)
    }

    /// A serializable view of the tree without payload bytes.
    pub fn view(&self) -> TreeNodeView<'_> {
        TreeNodeView {
            id: &self.id,
            name: &self.name,
            audio_id: self.audio_id(),
            size: self.payload.as_ref().map(|payload| payload.length),
            children: self.children.iter().map(TreeNode::view).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.view())?)
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut TreeNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }
}

fn assign_child_ids(node: &mut TreeNode) {
    let prefix = node.id.clone();
    for (index, child) in node.children.iter_mut().enumerate() {
        child.id = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}{ID_SEPARATOR}{index}")
        };
        assign_child_ids(child);
    }
}

/// JSON shape of a [`TreeNode`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNodeView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNodeView<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        let mut root = TreeNode::branch("root");
        let mut event = TreeNode::branch("Play_a");
        event.children.push(TreeNode::leaf(AudioPayload::new(1, vec![1])));
        event.children.push(TreeNode::leaf(AudioPayload::new(2, vec![2])));
        root.children.push(event);
        root.children.push(TreeNode::branch("empty"));
        root.children.push(TreeNode::leaf(AudioPayload::new(3, vec![3])));
        root.assign_ids();
        root
    }

    #[test]
    fn test_ids_are_index_paths() {
        let root = sample();
        assert_eq!(root.id, "");
        assert_eq!(root.children[0].id, "0");
        assert_eq!(root.children[0].children[1].id, "0/1");
        assert_eq!(root.children[2].id, "2");
        assert_eq!(root.node_count(), 6);
    }

    #[test]
    fn test_find() {
        let root = sample();
        assert_eq!(root.find("0/1").and_then(TreeNode::audio_id), Some(2));
        assert_eq!(root.find("1").map(|n| n.name.as_str()), Some("empty"));
        assert!(root.find("9").is_none());
    }

    #[test]
    fn test_replace_payload() {
        let mut root = sample();
        root.replace_payload("0/0", vec![9; 4]).unwrap();
        let leaf = root.find("0/0").unwrap().payload.as_ref().unwrap();
        assert_eq!(leaf.bytes, vec![9; 4]);
        assert_eq!(leaf.length, 4);

        assert!(matches!(
            root.replace_payload("0", vec![]),
            Err(Error::NotALeaf(id)) if id == "0"
        ));
        assert!(matches!(
            root.replace_payload("7/7", vec![]),
            Err(Error::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_replace_audio_and_flatten() {
        let mut root = sample();
        root.children[1]
            .children
            .push(TreeNode::leaf(AudioPayload::new(2, vec![0])));
        root.assign_ids();

        assert_eq!(root.replace_audio(2, &[5, 5]), 2);
        assert_eq!(root.replace_audio(99, &[5]), 0);

        let flat = root.flatten_payloads();
        let ids: Vec<u32> = flat.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 2, 3]);
        assert_eq!(flat[1].bytes, vec![5, 5]);
        assert_eq!(flat[2].bytes, vec![5, 5]);
    }

    #[test]
    fn test_validate() {
        let mut root = sample();
        assert!(root.validate().is_ok());

        root.children[2]
            .children
            .push(TreeNode::branch("oops"));
        assert!(matches!(root.validate(), Err(Error::InvalidNode(id)) if id == "2"));
    }

    #[test]
    fn test_json_view() {
        let root = sample();
        let json: serde_json::Value = serde_json::from_str(&root.to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "root");
        assert_eq!(json["children"][0]["children"][1]["audioId"], 2);
        assert_eq!(json["children"][0]["children"][1]["name"], "2.wem");
        assert!(json["children"][1].get("children").is_none());
    }
}
