//! Edges and per-edge attributes.
//!
//! Edges are not stored on the mesh; they are derived from face loops and
//! identified by their two endpoint indices.

use crate::float_types::Real;
use hashbrown::HashMap;

/// Unordered vertex-index pair, stored smaller index first so `(a, b)` and
/// `(b, a)` hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(usize, usize);

impl EdgeKey {
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b { EdgeKey(a, b) } else { EdgeKey(b, a) }
    }

    pub const fn endpoints(self) -> (usize, usize) {
        (self.0, self.1)
    }

    pub const fn contains(self, vertex: usize) -> bool {
        self.0 == vertex || self.1 == vertex
    }

    /// The endpoint that is not `vertex`, if `vertex` is on this edge.
    pub const fn other(self, vertex: usize) -> Option<usize> {
        if self.0 == vertex {
            Some(self.1)
        } else if self.1 == vertex {
            Some(self.0)
        } else {
            None
        }
    }
}

/// Attributes a bevel capability reads from an edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeAttributes {
    /// Participation in a weighted bevel, in `[0, 1]`.
    pub bevel_weight: Real,
    pub selected: bool,
}

/// Sparse map of edge attributes. Edges absent from the map have weight 0
/// and are unselected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeWeightMap {
    attributes: HashMap<EdgeKey, EdgeAttributes>,
}

impl EdgeWeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an edge's bevel weight, clamped to `[0, 1]`.
    pub fn set_weight(&mut self, edge: EdgeKey, weight: Real) {
        self.attributes.entry(edge).or_default().bevel_weight = weight.clamp(0.0, 1.0);
    }

    pub fn select(&mut self, edge: EdgeKey) {
        self.attributes.entry(edge).or_default().selected = true;
    }

    pub fn weight(&self, edge: EdgeKey) -> Real {
        self.attributes.get(&edge).map_or(0.0, |a| a.bevel_weight)
    }

    pub fn is_selected(&self, edge: EdgeKey) -> bool {
        self.attributes.get(&edge).is_some_and(|a| a.selected)
    }

    pub fn get(&self, edge: EdgeKey) -> Option<&EdgeAttributes> {
        self.attributes.get(&edge)
    }

    /// Edges with a non-zero bevel weight, sorted for stable output.
    pub fn weighted_edges(&self) -> Vec<(EdgeKey, Real)> {
        let mut weighted: Vec<_> = self
            .attributes
            .iter()
            .filter(|(_, a)| a.bevel_weight > 0.0)
            .map(|(&e, a)| (e, a.bevel_weight))
            .collect();
        weighted.sort_by_key(|&(e, _)| e);
        weighted
    }

    /// Selected edges, sorted.
    pub fn selected_edges(&self) -> Vec<EdgeKey> {
        let mut selected: Vec<_> = self
            .attributes
            .iter()
            .filter(|(_, a)| a.selected)
            .map(|(&e, _)| e)
            .collect();
        selected.sort();
        selected
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &EdgeAttributes)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
