// src/domain/article/placeholder.rs
use crate::domain::article::value_objects::{
    ArticleId, ContentBlockId, LanguageCode, PlaceholderId, PlaceholderSlot, PluginType,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A named slot owned by exactly one article flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub id: PlaceholderId,
    pub article_id: ArticleId,
    pub slot: PlaceholderSlot,
}

/// One content item inside a placeholder. Blocks form a tree per
/// (placeholder, language); `depth` is 1 for roots.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub id: ContentBlockId,
    pub placeholder_id: PlaceholderId,
    pub parent_id: Option<ContentBlockId>,
    pub language: LanguageCode,
    pub plugin_type: PluginType,
    pub position: i64,
    pub depth: i64,
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct NewContentBlock {
    pub placeholder_id: PlaceholderId,
    pub parent_id: Option<ContentBlockId>,
    pub language: LanguageCode,
    pub plugin_type: PluginType,
    pub position: i64,
    pub depth: i64,
    pub payload: Value,
}

impl NewContentBlock {
    /// Copy of `source` placed in another placeholder under a remapped parent.
    pub fn copy_of(
        source: &ContentBlock,
        placeholder_id: PlaceholderId,
        parent_id: Option<ContentBlockId>,
    ) -> Self {
        Self {
            placeholder_id,
            parent_id,
            language: source.language.clone(),
            plugin_type: source.plugin_type.clone(),
            position: source.position,
            depth: source.depth,
            payload: source.payload.clone(),
        }
    }
}

/// Position-independent description of a block, used to compare content
/// across revisions where ids differ.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockShape {
    pub plugin_type: String,
    pub depth: i64,
    pub parent_index: Option<usize>,
    pub payload: Value,
}

/// Orders blocks parents-first, siblings by position (pre-order walk).
/// Blocks whose parent is not in the input are treated as roots.
pub fn tree_order(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let known: HashSet<ContentBlockId> = blocks.iter().map(|b| b.id).collect();
    let mut children: HashMap<Option<ContentBlockId>, Vec<ContentBlock>> = HashMap::new();
    for block in blocks {
        let parent = block.parent_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(block);
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|b| (b.position, b.id));
    }

    let mut ordered = Vec::with_capacity(known.len());
    let mut stack: Vec<ContentBlock> = children.remove(&None).unwrap_or_default();
    stack.reverse();
    while let Some(block) = stack.pop() {
        if let Some(mut kids) = children.remove(&Some(block.id)) {
            kids.reverse();
            stack.extend(kids);
        }
        ordered.push(block);
    }
    ordered
}

/// Ids ordered deepest first so containers go after their children.
pub fn deletion_order(blocks: &[ContentBlock]) -> Vec<ContentBlockId> {
    let mut sorted: Vec<&ContentBlock> = blocks.iter().collect();
    sorted.sort_by(|a, b| b.depth.cmp(&a.depth).then(b.id.cmp(&a.id)));
    sorted.into_iter().map(|b| b.id).collect()
}

/// `root` and all of its descendants among `blocks`.
pub fn subtree(blocks: &[ContentBlock], root: ContentBlockId) -> Vec<ContentBlock> {
    let mut members: HashSet<ContentBlockId> = HashSet::from([root]);
    let mut changed = true;
    while changed {
        changed = false;
        for block in blocks {
            if let Some(parent) = block.parent_id {
                if members.contains(&parent) && members.insert(block.id) {
                    changed = true;
                }
            }
        }
    }
    blocks
        .iter()
        .filter(|b| members.contains(&b.id))
        .cloned()
        .collect()
}

pub fn shapes(blocks: Vec<ContentBlock>) -> Vec<BlockShape> {
    let ordered = tree_order(blocks);
    let index: HashMap<ContentBlockId, usize> =
        ordered.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
    ordered
        .iter()
        .map(|b| BlockShape {
            plugin_type: b.plugin_type.as_str().to_string(),
            depth: b.depth,
            parent_index: b.parent_id.and_then(|p| index.get(&p).copied()),
            payload: b.payload.clone(),
        })
        .collect()
}
