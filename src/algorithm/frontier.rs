//! Open and closed lists plus the best wall seen so far

use bitvec::prelude::*;

use crate::spatial::node::{EDGE_OFFSETS, NodeField, offset_position};

/// Frontier state of one synthesis run
///
/// `open` keeps its order between steps: it is re-sorted by priority with a
/// stable sort before every pick, so equal priorities stay in the order the
/// nodes were appended. A bitset mirrors `open` for O(1) membership tests.
#[derive(Clone, Debug)]
pub struct Frontier {
    open: Vec<[usize; 2]>,
    closed: Vec<[usize; 2]>,
    best_snapshot: Option<Vec<[usize; 2]>>,
    open_members: BitVec,
    width: usize,
    height: usize,
}

impl Frontier {
    /// Create an empty frontier for a `width × height` grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            open: Vec::new(),
            closed: Vec::new(),
            best_snapshot: None,
            open_members: bitvec![0; width * height],
            width,
            height,
        }
    }

    /// Drop every list and the snapshot
    pub fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.best_snapshot = None;
        self.open_members.fill(false);
    }

    const fn bit_index(&self, pos: [usize; 2]) -> Option<usize> {
        if pos[0] < self.width && pos[1] < self.height {
            Some(pos[0] * self.height + pos[1])
        } else {
            None
        }
    }

    /// Append a node to the open list
    pub fn push_open(&mut self, pos: [usize; 2]) {
        if let Some(index) = self.bit_index(pos) {
            self.open_members.set(index, true);
            self.open.push(pos);
        }
    }

    /// Test open-list membership
    pub fn contains_open(&self, pos: [usize; 2]) -> bool {
        self.bit_index(pos)
            .is_some_and(|index| self.open_members.get(index).as_deref() == Some(&true))
    }

    /// Nodes awaiting expansion, in their current order
    pub fn open(&self) -> &[[usize; 2]] {
        &self.open
    }

    /// Expanded nodes, in expansion order
    pub fn closed(&self) -> &[[usize; 2]] {
        &self.closed
    }

    /// Smallest valid wall recorded in this run
    pub fn best_snapshot(&self) -> Option<&[[usize; 2]]> {
        self.best_snapshot.as_deref()
    }

    /// Number of open nodes
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Whether the open list is empty
    pub fn is_open_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Stable sort of the open list by ascending priority
    pub fn sort_open(&mut self, nodes: &NodeField) {
        self.open
            .sort_by_key(|&pos| nodes.get(pos).map_or(i32::MAX, |node| node.priority));
    }

    /// Move the first open node with a nonzero neighbor count to the closed list
    ///
    /// Call [`Self::sort_open`] first. Returns `None` when every open node is
    /// still disconnected from the interior.
    pub fn take_candidate(&mut self, nodes: &NodeField) -> Option<[usize; 2]> {
        let index = self.open.iter().position(|&pos| {
            nodes
                .get(pos)
                .is_some_and(|node| node.neighbor_count > 0)
        })?;

        let pos = self.open.remove(index);
        if let Some(bit) = self.bit_index(pos) {
            self.open_members.set(bit, false);
        }
        self.closed.push(pos);
        Some(pos)
    }

    /// Number of open nodes sharing an edge with `pos`
    pub fn open_degree(&self, pos: [usize; 2]) -> usize {
        EDGE_OFFSETS
            .iter()
            .filter_map(|&offset| offset_position(pos, offset, self.width, self.height))
            .filter(|&neighbor| self.contains_open(neighbor))
            .count()
    }

    /// Store the open list as the best wall if it beats the stored one
    ///
    /// Returns whether the snapshot was replaced. Only a strictly smaller open
    /// list replaces an existing snapshot.
    pub fn record_candidate(&mut self) -> bool {
        let improves = self
            .best_snapshot
            .as_ref()
            .is_none_or(|best| self.open.len() < best.len());
        if improves {
            self.best_snapshot = Some(self.open.clone());
        }
        improves
    }
}
