//! Full-image parent/child tree: a `record_number -> node` map built by
//! walking every record once, re-parenting orphans under a synthetic
//! `$ORPHAN` node instead of dropping them.

use std::collections::{HashMap, HashSet};

use crate::cache::CacheConfig;
use crate::enumerator::MftEnumerator;
use crate::progress::ProgressCallback;
use crate::record::MftRecord;
use crate::{ORPHAN_INDEX, ROOT_INDEX};
use serde::Serialize;

/// One node of the reconstructed filesystem tree. Parent and children are
/// referenced by record number rather than by owning pointer, so the tree
/// stays a flat `HashMap` with no reference cycles.
#[derive(Debug, Clone, Serialize)]
pub struct MftTreeNode {
    pub record_number: u64,
    pub filename: String,
    pub parent_record_number: u64,
    pub children: Vec<u64>,
}

/// The fully-populated `record_number -> node` map produced by [`MftTreeBuilder::build`].
#[derive(Debug, Clone, Serialize)]
pub struct MftTree {
    nodes: HashMap<u64, MftTreeNode>,
}

impl MftTree {
    #[must_use]
    pub fn get(&self, record_number: u64) -> Option<&MftTreeNode> {
        self.nodes.get(&record_number)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MftTreeNode> {
        self.nodes.values()
    }
}

/// Builds an [`MftTree`] over an MFT byte image. Owns its own enumerator
/// sized with [`CacheConfig::for_tree_build`], distinct from whatever
/// enumerator a caller might already be using for path lookups.
pub struct MftTreeBuilder<'a> {
    enumerator: MftEnumerator<'a>,
}

impl<'a> MftTreeBuilder<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            enumerator: MftEnumerator::with_config(bytes, CacheConfig::for_tree_build()),
        }
    }

    /// Builds the tree, reporting progress after each record the underlying
    /// enumerator processes.
    pub fn build(&self, progress: Option<&mut ProgressCallback<'_>>) -> MftTree {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_INDEX,
            MftTreeNode {
                record_number: ROOT_INDEX,
                filename: "\\.".to_string(),
                parent_record_number: ROOT_INDEX,
                children: vec![ORPHAN_INDEX],
            },
        );
        nodes.insert(
            ORPHAN_INDEX,
            MftTreeNode {
                record_number: ORPHAN_INDEX,
                filename: "$ORPHAN".to_string(),
                parent_record_number: ROOT_INDEX,
                children: Vec::new(),
            },
        );

        for record in self.enumerator.enumerate_records(progress) {
            let mut visiting = HashSet::new();
            self.add_record(&mut nodes, &record, &mut visiting);
        }

        MftTree { nodes }
    }

    /// Adds `record` to `nodes`, recursively adding its parent first so a
    /// child never gets appended to a parent entry that doesn't exist yet.
    /// Orphan conditions (unresolvable or stale parent reference) re-parent
    /// the record under [`ORPHAN_INDEX`]; so does a parent chain that loops
    /// back on a record already being added higher up the current call
    /// stack (`visiting`), the same back-edge the path resolver (§4.8) would
    /// report as `<CYCLE>` — here it simply breaks the chain under
    /// `$ORPHAN` instead of recursing forever.
    fn add_record(&self, nodes: &mut HashMap<u64, MftTreeNode>, record: &MftRecord, visiting: &mut HashSet<u64>) {
        if nodes.contains_key(&record.mft_record_number) {
            return;
        }
        if record.mft_record_number == ROOT_INDEX {
            return;
        }
        if visiting.contains(&record.mft_record_number) {
            return;
        }

        let Some(fna) = record.filename_information() else {
            return;
        };

        visiting.insert(record.mft_record_number);

        let mut parent_number = fna.parent_reference.record_number();
        let parent_sequence = fna.parent_reference.sequence_number();
        match self.enumerator.get_record(parent_number) {
            Ok(parent) if parent.sequence_number == parent_sequence => {
                if !nodes.contains_key(&parent_number) {
                    self.add_record(nodes, &parent, visiting);
                }
                if !nodes.contains_key(&parent_number) {
                    parent_number = ORPHAN_INDEX;
                }
            }
            _ => parent_number = ORPHAN_INDEX,
        }

        visiting.remove(&record.mft_record_number);

        // Defensive guard against the parent node still being absent (the
        // source's equivalent `except IndexError` around a dict lookup is
        // unreachable there too, but cheap to check explicitly here).
        if !nodes.contains_key(&parent_number) {
            return;
        }

        nodes.insert(
            record.mft_record_number,
            MftTreeNode {
                record_number: record.mft_record_number,
                filename: fna.filename.clone(),
                parent_record_number: parent_number,
                children: Vec::new(),
            },
        );
        nodes
            .get_mut(&parent_number)
            .expect("just verified present above")
            .children
            .push(record.mft_record_number);
    }
}
