//! `PropertySet` and related types for pass communication.
//!
//! This module provides the [`PropertySet`] type, which lets compilation passes
//! share data with each other. It holds the standard target properties (layout,
//! coupling map, basis gates) and supports arbitrary custom properties.
//!
//! # Examples
//!
//! ```
//! use qcmp_compile::{BasisGates, CouplingMap, PropertySet};
//!
//! let props = PropertySet::new()
//!     .with_target(CouplingMap::linear(5), BasisGates::ibm());
//!
//! assert!(props.coupling_map.is_some());
//! assert!(props.basis_gates.as_ref().unwrap().contains("sx"));
//! ```
//!
//! Custom properties are keyed by type:
//!
//! ```
//! use qcmp_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct SwapCount(usize);
//!
//! let mut props = PropertySet::new();
//! props.insert(SwapCount(4));
//! assert_eq!(props.get::<SwapCount>(), Some(&SwapCount(4)));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::collections::VecDeque;

use qcmp_ir::QubitId;

/// A mapping from logical qubits to physical qubits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Map from logical qubit to physical qubit index.
    logical_to_physical: FxHashMap<QubitId, u32>,
    /// Map from physical qubit index to logical qubit.
    physical_to_logical: FxHashMap<u32, QubitId>,
}

impl Layout {
    /// Create a new empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trivial layout (logical qubit i -> physical qubit i).
    pub fn trivial(num_qubits: u32) -> Self {
        let mut layout = Self::new();
        for i in 0..num_qubits {
            layout.add(QubitId(i), i);
        }
        layout
    }

    /// Add a mapping from logical to physical qubit.
    ///
    /// Conflicting mappings on either side are removed first so that both
    /// directions stay consistent.
    pub fn add(&mut self, logical: QubitId, physical: u32) {
        if let Some(&old_logical) = self.physical_to_logical.get(&physical) {
            if old_logical != logical {
                self.logical_to_physical.remove(&old_logical);
            }
        }
        if let Some(&old_physical) = self.logical_to_physical.get(&logical) {
            if old_physical != physical {
                self.physical_to_logical.remove(&old_physical);
            }
        }
        self.logical_to_physical.insert(logical, physical);
        self.physical_to_logical.insert(physical, logical);
    }

    /// Get the physical qubit for a logical qubit.
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Get the logical qubit for a physical qubit.
    pub fn get_logical(&self, physical: u32) -> Option<QubitId> {
        self.physical_to_logical.get(&physical).copied()
    }

    /// Swap the logical qubits held by two physical qubits.
    pub fn swap(&mut self, p1: u32, p2: u32) {
        let l1 = self.physical_to_logical.get(&p1).copied();
        let l2 = self.physical_to_logical.get(&p2).copied();

        if let Some(l1) = l1 {
            self.logical_to_physical.insert(l1, p2);
            self.physical_to_logical.insert(p2, l1);
        } else {
            self.physical_to_logical.remove(&p2);
        }

        if let Some(l2) = l2 {
            self.logical_to_physical.insert(l2, p1);
            self.physical_to_logical.insert(p1, l2);
        } else {
            self.physical_to_logical.remove(&p1);
        }
    }

    /// Whether every logical qubit sits on the physical qubit of the same index.
    pub fn is_trivial(&self) -> bool {
        self.logical_to_physical.iter().all(|(l, p)| l.0 == *p)
    }

    /// Get the number of mapped qubits.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Iterate over (logical, physical) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.logical_to_physical.iter().map(|(&l, &p)| (l, p))
    }
}

/// Target device coupling map.
///
/// The coupling map defines which unordered pairs of physical qubits can
/// interact with two-qubit gates.
///
/// ## Performance
///
/// On construction, a distance matrix is precomputed using BFS from each
/// node. This gives O(1) `distance()` lookups and O(distance) path
/// reconstruction during routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouplingMap {
    /// Connected qubit pairs, each stored once with the smaller index first.
    edges: Vec<(u32, u32)>,
    /// Number of physical qubits.
    num_qubits: u32,
    /// Sorted adjacency lists.
    adjacency: FxHashMap<u32, Vec<u32>>,
    /// `dist_matrix[from][to]` is the shortest-path distance, or `u32::MAX`
    /// if unreachable.
    dist_matrix: Vec<Vec<u32>>,
    /// `pred_matrix[from][to]` is the node before `to` on a shortest path
    /// from `from`.
    pred_matrix: Vec<Vec<u32>>,
}

impl CouplingMap {
    /// Create a coupling map from an edge list.
    ///
    /// Duplicate and reversed pairs are merged. Callers validate ranges and
    /// self loops before construction.
    pub fn from_edges(num_qubits: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut map = Self {
            edges: vec![],
            num_qubits,
            adjacency: FxHashMap::default(),
            dist_matrix: vec![],
            pred_matrix: vec![],
        };
        for (a, b) in edges {
            map.add_edge(a, b);
        }
        map.edges.sort_unstable();
        for neighbors in map.adjacency.values_mut() {
            neighbors.sort_unstable();
        }
        map.precompute_distances();
        map
    }

    fn add_edge(&mut self, q1: u32, q2: u32) {
        let edge = (q1.min(q2), q1.max(q2));
        if self.edges.contains(&edge) {
            return;
        }
        self.edges.push(edge);
        self.adjacency.entry(q1).or_default().push(q2);
        self.adjacency.entry(q2).or_default().push(q1);
    }

    /// Precompute all-pairs shortest paths using BFS from each node.
    fn precompute_distances(&mut self) {
        let n = self.num_qubits as usize;
        self.dist_matrix = vec![vec![u32::MAX; n]; n];
        self.pred_matrix = vec![vec![u32::MAX; n]; n];

        for source in 0..self.num_qubits {
            let src = source as usize;
            self.dist_matrix[src][src] = 0;
            let mut queue = VecDeque::from([source]);

            while let Some(current) = queue.pop_front() {
                let cur = current as usize;
                for &neighbor in self.adjacency.get(&current).into_iter().flatten() {
                    let nb = neighbor as usize;
                    if self.dist_matrix[src][nb] == u32::MAX {
                        self.dist_matrix[src][nb] = self.dist_matrix[src][cur] + 1;
                        self.pred_matrix[src][nb] = current;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
    }

    /// Check if two qubits are directly connected.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        q1 != q2
            && self
                .adjacency
                .get(&q1)
                .is_some_and(|neighbors| neighbors.binary_search(&q2).is_ok())
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the coupling edges.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Get neighbors of a qubit in ascending order.
    pub fn neighbors(&self, qubit: u32) -> impl Iterator<Item = u32> + '_ {
        self.adjacency
            .get(&qubit)
            .map(|v| v.iter().copied())
            .into_iter()
            .flatten()
    }

    /// Create a linear coupling map (0-1-2-3-...).
    pub fn linear(n: u32) -> Self {
        Self::from_edges(n, (0..n.saturating_sub(1)).map(|i| (i, i + 1)))
    }

    /// Create a fully connected coupling map.
    pub fn full(n: u32) -> Self {
        Self::from_edges(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Create a star topology (center qubit connected to all others).
    pub fn star(n: u32) -> Self {
        Self::from_edges(n, (1..n).map(|i| (0, i)))
    }

    /// Shortest-path distance, `None` if unreachable or out of range.
    pub fn distance(&self, from: u32, to: u32) -> Option<u32> {
        let d = *self.dist_matrix.get(from as usize)?.get(to as usize)?;
        (d != u32::MAX).then_some(d)
    }

    /// Reconstruct a shortest path from `from` to `to`, both ends included.
    ///
    /// Returns `None` if no path exists.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        self.distance(from, to)?;
        let row = &self.pred_matrix[from as usize];
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let pred = row[current as usize];
            if pred == u32::MAX {
                return None;
            }
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Some(path)
    }

    /// Whether every qubit can reach every other qubit.
    pub fn is_connected_graph(&self) -> bool {
        self.num_qubits == 0
            || (0..self.num_qubits).all(|q| self.distance(0, q).is_some())
    }
}

/// Basis gates for the target device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisGates {
    /// Gate identifiers in the basis.
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a new basis gates set. Duplicates are dropped.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut list: Vec<String> = vec![];
        for gate in gates {
            let gate = gate.into();
            if !list.contains(&gate) {
                list.push(gate);
            }
        }
        Self { gates: list }
    }

    /// Check if a gate is in the basis.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    /// Get the basis gates.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// Check if the basis is empty.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// IBM Falcon-style basis (CX + ID + RZ + SX + X).
    pub fn ibm() -> Self {
        Self::new(["cx", "id", "rz", "sx", "x"])
    }

    /// IQM basis (PRX + CZ).
    pub fn iqm() -> Self {
        Self::new(["prx", "cz"])
    }
}

/// Properties shared between compilation passes.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `layout` | [`Layout`] | Logical-to-physical qubit mapping |
/// | `coupling_map` | [`CouplingMap`] | Device connectivity graph |
/// | `basis_gates` | [`BasisGates`] | Native gate set for the target |
///
/// Passes can also store arbitrary data using the type-safe
/// [`insert`](Self::insert) and [`get`](Self::get) methods. Each type can have
/// at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Qubit layout mapping (logical → physical).
    ///
    /// Set by the layout pass, updated by routing.
    pub layout: Option<Layout>,
    /// Target coupling map defining allowed two-qubit interactions.
    pub coupling_map: Option<CouplingMap>,
    /// Target basis gates for gate translation.
    pub basis_gates: Option<BasisGates>,
    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property set with target configuration.
    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        self.coupling_map = Some(coupling_map);
        self.basis_gates = Some(basis_gates);
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_trivial() {
        let layout = Layout::trivial(5);
        assert_eq!(layout.get_physical(QubitId(0)), Some(0));
        assert_eq!(layout.get_physical(QubitId(4)), Some(4));
        assert_eq!(layout.get_logical(2), Some(QubitId(2)));
        assert!(layout.is_trivial());
    }

    #[test]
    fn test_layout_swap() {
        let mut layout = Layout::trivial(3);
        layout.swap(0, 2);
        assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        assert_eq!(layout.get_physical(QubitId(2)), Some(0));
        assert_eq!(layout.get_logical(0), Some(QubitId(2)));
        assert!(!layout.is_trivial());
        layout.swap(2, 0);
        assert!(layout.is_trivial());
    }

    #[test]
    fn test_coupling_map_linear() {
        let map = CouplingMap::linear(5);
        assert!(map.is_connected(0, 1));
        assert!(map.is_connected(1, 0));
        assert!(!map.is_connected(0, 2));
        assert_eq!(map.distance(0, 4), Some(4));
        assert_eq!(map.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
        assert_eq!(map.shortest_path(2, 2), Some(vec![2]));
    }

    #[test]
    fn test_coupling_map_star() {
        let map = CouplingMap::star(5);
        assert!(map.is_connected(0, 4));
        assert!(!map.is_connected(1, 2));
        assert_eq!(map.distance(1, 2), Some(2));
        assert_eq!(map.shortest_path(3, 1), Some(vec![3, 0, 1]));
    }

    #[test]
    fn test_coupling_map_merges_duplicates() {
        let map = CouplingMap::from_edges(3, [(0, 1), (1, 0), (0, 1), (2, 1)]);
        assert_eq!(map.edges(), &[(0, 1), (1, 2)]);
        assert_eq!(map.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_disconnected_map() {
        let map = CouplingMap::from_edges(4, [(0, 1), (2, 3)]);
        assert!(!map.is_connected_graph());
        assert_eq!(map.distance(0, 3), None);
        assert_eq!(map.shortest_path(0, 3), None);
        assert_eq!(map.distance(0, 9), None);
        assert!(CouplingMap::full(4).is_connected_graph());
    }

    #[test]
    fn test_basis_gates() {
        let basis = BasisGates::ibm();
        assert!(basis.contains("cx"));
        assert!(basis.contains("rz"));
        assert!(!basis.contains("cz"));
        assert_eq!(BasisGates::new(["x", "x", "cz"]).gates().len(), 2);
    }

    #[test]
    fn test_custom_properties() {
        #[derive(Debug, PartialEq)]
        struct Marker(u8);

        let mut props = PropertySet::new();
        props.insert(Marker(1));
        props.get_mut::<Marker>().unwrap().0 = 2;
        assert_eq!(props.get::<Marker>(), Some(&Marker(2)));
        assert_eq!(props.remove::<Marker>(), Some(Marker(2)));
        assert!(props.get::<Marker>().is_none());
    }
}
