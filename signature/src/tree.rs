//! Plugin tree — arena of discovered plugins with parent links
//!
//! Nested plugins refer to their parent by [`PluginIndex`]. A parent is
//! always inserted before its children, so walking the arena in index order
//! visits every parent before any of its descendants.

use sdk::errors::{EngineError, SignatureError};
use sdk::types::{Plugin, PluginIndex};
use std::collections::HashMap;

use crate::validator::SignatureValidator;

/// Outcome of validating one node
pub type NodeOutcome = (PluginIndex, Result<(), SignatureError>);

/// Arena owning a discovered plugin hierarchy
#[derive(Debug, Clone, Default)]
pub struct PluginTree {
    nodes: Vec<Plugin>,
    by_id: HashMap<String, PluginIndex>,
}

impl PluginTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a top-level plugin
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DuplicatePlugin` if a plugin with the same ID is
    /// already in the tree.
    pub fn insert_root(&mut self, mut plugin: Plugin) -> Result<PluginIndex, EngineError> {
        plugin.parent = None;
        self.push(plugin)
    }

    /// Add a plugin nested inside `parent`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownParent` if `parent` is not in the tree and
    /// `EngineError::DuplicatePlugin` if the ID is already taken.
    pub fn insert_child(
        &mut self,
        parent: PluginIndex,
        mut plugin: Plugin,
    ) -> Result<PluginIndex, EngineError> {
        if parent.0 >= self.nodes.len() {
            return Err(EngineError::UnknownParent(format!(
                "{} (parent of '{}')",
                parent, plugin.id
            )));
        }
        plugin.parent = Some(parent);
        self.push(plugin)
    }

    fn push(&mut self, plugin: Plugin) -> Result<PluginIndex, EngineError> {
        if self.by_id.contains_key(&plugin.id) {
            return Err(EngineError::DuplicatePlugin(plugin.id));
        }
        let index = PluginIndex(self.nodes.len());
        self.by_id.insert(plugin.id.clone(), index);
        self.nodes.push(plugin);
        Ok(index)
    }

    pub fn get(&self, index: PluginIndex) -> Option<&Plugin> {
        self.nodes.get(index.0)
    }

    /// Mutable access to a node
    ///
    /// Changing `id` or `parent` through this reference is not tracked by the
    /// tree. A parent link that no longer points at an earlier node makes
    /// validation of that node fail.
    pub fn get_mut(&mut self, index: PluginIndex) -> Option<&mut Plugin> {
        self.nodes.get_mut(index.0)
    }

    pub fn parent_of(&self, index: PluginIndex) -> Option<&Plugin> {
        self.get(index)
            .and_then(|plugin| plugin.parent)
            .and_then(|parent| self.get(parent))
    }

    /// Find a plugin by ID
    pub fn find(&self, id: &str) -> Option<PluginIndex> {
        self.by_id.get(id).copied()
    }

    /// Iterate in insertion order, parents before children
    pub fn iter(&self) -> impl Iterator<Item = (PluginIndex, &Plugin)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, plugin)| (PluginIndex(i), plugin))
    }

    /// Direct children of `index`
    pub fn children(&self, index: PluginIndex) -> impl Iterator<Item = PluginIndex> + '_ {
        self.iter()
            .filter(move |(_, plugin)| plugin.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Top-level ancestor of `index`
    pub fn root_of(&self, index: PluginIndex) -> Option<PluginIndex> {
        let mut current = index;
        loop {
            match self.get(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Validate a single node against its parent
    ///
    /// The parent must already have been validated for inheritance to see
    /// its final signature. Returns `None` if `index` is not in the tree.
    pub fn validate_with(
        &mut self,
        index: PluginIndex,
        validator: &SignatureValidator,
    ) -> Option<Result<(), SignatureError>> {
        if index.0 >= self.nodes.len() {
            return None;
        }
        // Parents always sit at lower indices than their children.
        let (before, rest) = self.nodes.split_at_mut(index.0);
        let plugin = &mut rest[0];
        let parent = plugin.parent.and_then(|p| before.get(p.0));
        Some(validator.validate(plugin, parent))
    }

    /// Validate every plugin, parents first
    pub fn validate_all(&mut self, validator: &SignatureValidator) -> Vec<NodeOutcome> {
        let mut outcomes = Vec::with_capacity(self.nodes.len());
        for i in 0..self.nodes.len() {
            let index = PluginIndex(i);
            if let Some(result) = self.validate_with(index, validator) {
                outcomes.push((index, result));
            }
        }
        outcomes
    }
}
