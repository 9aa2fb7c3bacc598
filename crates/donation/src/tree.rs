//! Nested value tree and the flatten/unflatten pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::path::FieldPath;

/// Values of the form as a nested mapping, e.g.
/// `{user: {name: "A"}, address: {city: "B"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValueTree {
    Scalar(String),
    Node(BTreeMap<String, FormValueTree>),
}

impl Default for FormValueTree {
    fn default() -> Self {
        FormValueTree::Node(BTreeMap::new())
    }
}

impl FormValueTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `path`, creating intermediate nodes. A scalar found
    /// on the way is replaced by a node.
    pub fn insert(&mut self, path: &FieldPath, value: impl Into<String>) {
        let mut node = self;
        for segment in path.parents() {
            node = node
                .children_mut()
                .entry(segment.clone())
                .or_insert_with(FormValueTree::new);
        }
        node.children_mut()
            .insert(path.leaf().to_string(), FormValueTree::Scalar(value.into()));
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FormValueTree> {
        let mut node = self;
        for segment in path.segments() {
            match node {
                FormValueTree::Node(children) => node = children.get(segment)?,
                FormValueTree::Scalar(_) => return None,
            }
        }
        Some(node)
    }

    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        match self.get(path)? {
            FormValueTree::Scalar(s) => Some(s),
            FormValueTree::Node(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FormValueTree::Scalar(_) => false,
            FormValueTree::Node(children) => children.is_empty(),
        }
    }

    fn children_mut(&mut self) -> &mut BTreeMap<String, FormValueTree> {
        if let FormValueTree::Scalar(_) = self {
            *self = FormValueTree::Node(BTreeMap::new());
        }
        match self {
            FormValueTree::Node(children) => children,
            FormValueTree::Scalar(_) => unreachable!("scalar replaced by node above"),
        }
    }
}

/// Build a tree from flat `path -> value` pairs.
pub fn unflatten<I>(entries: I) -> FormValueTree
where
    I: IntoIterator<Item = (FieldPath, String)>,
{
    let mut tree = FormValueTree::new();
    for (path, value) in entries {
        tree.insert(&path, value);
    }
    tree
}

/// Flatten a tree into `path -> value` pairs.
///
/// Keys that already contain dots (`{"user.name": "A"}`) are split, so flat
/// and nested documents flatten to the same mapping. Entries whose key would
/// produce an empty segment are skipped.
pub fn flatten(tree: &FormValueTree) -> BTreeMap<FieldPath, String> {
    let mut out = BTreeMap::new();
    let mut prefix = Vec::new();
    flatten_into(tree, &mut prefix, &mut out);
    out
}

fn flatten_into(
    tree: &FormValueTree,
    prefix: &mut Vec<String>,
    out: &mut BTreeMap<FieldPath, String>,
) {
    match tree {
        FormValueTree::Scalar(value) => {
            if prefix.is_empty() {
                return;
            }
            let raw = prefix.join(".");
            match FieldPath::parse(&raw) {
                Ok(path) => {
                    out.insert(path, value.clone());
                }
                Err(e) => warn!("skipping value: {e}"),
            }
        }
        FormValueTree::Node(children) => {
            for (key, child) in children {
                prefix.push(key.clone());
                flatten_into(child, prefix, out);
                prefix.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn unflatten_builds_nested_scopes() {
        let tree = unflatten([
            (p("user.name"), "A".to_string()),
            (p("address.city"), "B".to_string()),
        ]);
        let expected: FormValueTree =
            serde_json::from_str(r#"{"user":{"name":"A"},"address":{"city":"B"}}"#).unwrap();
        assert_eq!(tree, expected);
    }

    #[test]
    fn flatten_inverts_unflatten() {
        let flat: BTreeMap<FieldPath, String> = [
            (p("user.name"), "Maria".to_string()),
            (p("user.email"), "".to_string()),
            (p("transaction.amount"), "10,00".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(flatten(&unflatten(flat.clone())), flat);
    }

    #[test]
    fn flatten_splits_dotted_keys() {
        let tree: FormValueTree =
            serde_json::from_str(r#"{"user.name":"A","address":{"city":"B"}}"#).unwrap();
        let flat = flatten(&tree);
        assert_eq!(flat.get(&p("user.name")).map(String::as_str), Some("A"));
        assert_eq!(flat.get(&p("address.city")).map(String::as_str), Some("B"));
    }

    #[test]
    fn flatten_skips_hollow_keys() {
        let tree: FormValueTree = serde_json::from_str(r#"{"user.":"A","ok":"B"}"#).unwrap();
        let flat = flatten(&tree);
        assert_eq!(flat.len(), 1);
        assert!(flat.contains_key(&p("ok")));
    }

    #[test]
    fn insert_below_scalar_replaces_it() {
        let mut tree = FormValueTree::new();
        tree.insert(&p("user"), "x");
        tree.insert(&p("user.name"), "A");
        assert_eq!(tree.get_str(&p("user.name")), Some("A"));
        assert_eq!(tree.get_str(&p("user")), None);
    }

    #[test]
    fn get_missing_and_through_scalar() {
        let tree = unflatten([(p("user.name"), "A".to_string())]);
        assert!(tree.get(&p("user.email")).is_none());
        assert!(tree.get(&p("user.name.first")).is_none());
        assert!(!tree.is_empty());
        assert!(FormValueTree::new().is_empty());
    }
}
