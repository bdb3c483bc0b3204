//! Routing passes for inserting SWAP gates.

use std::collections::VecDeque;

use tracing::debug;

use qcmp_ir::{CircuitDag, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

/// Swap counts recorded by [`ShortestPathRouting`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingStats {
    /// Swaps inserted to make two-qubit gates adjacent.
    pub swaps_inserted: usize,
    /// Swaps inserted to restore the initial placement.
    pub restore_swaps: usize,
}

/// Shortest-path routing pass.
///
/// Walks the circuit in order, relabelling every gate to the physical qubits
/// its operands currently occupy. When a two-qubit gate acts on uncoupled
/// qubits, the first operand is swapped along a shortest path until it sits
/// next to the second. Afterwards the initial placement is restored, so the
/// routed circuit implements the same operator as its input.
pub struct ShortestPathRouting;

impl Pass for ShortestPathRouting {
    fn name(&self) -> &'static str {
        "ShortestPathRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let initial = properties
            .layout
            .clone()
            .ok_or(CompileError::MissingLayout)?;

        let mut layout = initial.clone();
        let mut stats = RoutingStats::default();
        let mut out = Vec::with_capacity(dag.num_ops());

        for (_idx, inst) in dag.topological_ops() {
            let physical = |layout: &Layout, q: QubitId| {
                layout.get_physical(q).ok_or(CompileError::MissingLayout)
            };
            match inst.qubits.as_slice() {
                [q] => {
                    let p = physical(&layout, *q)?;
                    out.push(relabel(inst, &[p]));
                }
                [q0, q1] => {
                    let p0 = physical(&layout, *q0)?;
                    let p1 = physical(&layout, *q1)?;
                    if !coupling_map.is_connected(p0, p1) {
                        let path = coupling_map
                            .shortest_path(p0, p1)
                            .ok_or(CompileError::RoutingFailed {
                                qubit1: p0,
                                qubit2: p1,
                            })?;
                        for hop in path.windows(2).take(path.len().saturating_sub(2)) {
                            out.push(swap(hop[0], hop[1]));
                            layout.swap(hop[0], hop[1]);
                            stats.swaps_inserted += 1;
                        }
                    }
                    let p0 = physical(&layout, *q0)?;
                    out.push(relabel(inst, &[p0, p1]));
                }
                qubits => {
                    return Err(CompileError::GateTooWide {
                        name: inst.name().to_string(),
                        num_qubits: qubits.len(),
                    });
                }
            }
        }

        stats.restore_swaps = restore(coupling_map, &mut layout, &initial, &mut out)?;

        debug!(
            "Routing inserted {} swaps and {} to restore the layout",
            stats.swaps_inserted, stats.restore_swaps
        );

        for p in 0..coupling_map.num_qubits() {
            dag.add_qubit(QubitId(p));
        }
        dag.rebuild(out)?;
        properties.layout = Some(layout);
        properties.insert(stats);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

fn relabel(inst: &Instruction, physical: &[u32]) -> Instruction {
    Instruction {
        gate: inst.gate.clone(),
        qubits: physical.iter().map(|&p| QubitId(p)).collect(),
    }
}

fn swap(p1: u32, p2: u32) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::Swap, QubitId(p1), QubitId(p2))
}

/// A BFS spanning forest of the coupling graph.
struct SpanningForest {
    /// Vertices in BFS order, tree by tree.
    order: Vec<u32>,
    parent: Vec<Option<u32>>,
    depth: Vec<usize>,
    root: Vec<u32>,
}

impl SpanningForest {
    fn bfs(coupling_map: &CouplingMap) -> Self {
        let n = coupling_map.num_qubits() as usize;
        let mut forest = Self {
            order: Vec::with_capacity(n),
            parent: vec![None; n],
            depth: vec![0; n],
            root: vec![0; n],
        };
        let mut visited = vec![false; n];

        for root in 0..coupling_map.num_qubits() {
            if visited[root as usize] {
                continue;
            }
            visited[root as usize] = true;
            forest.root[root as usize] = root;
            let mut queue = VecDeque::from([root]);
            while let Some(v) = queue.pop_front() {
                forest.order.push(v);
                for w in coupling_map.neighbors(v) {
                    if visited[w as usize] {
                        continue;
                    }
                    visited[w as usize] = true;
                    forest.parent[w as usize] = Some(v);
                    forest.depth[w as usize] = forest.depth[v as usize] + 1;
                    forest.root[w as usize] = root;
                    queue.push_back(w);
                }
            }
        }
        forest
    }

    /// The tree path from `from` to `to` through their lowest common ancestor.
    fn path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        let (mut a, mut b) = (from, to);
        let mut head = vec![a];
        let mut tail = vec![b];
        while a != b {
            if self.depth[a as usize] >= self.depth[b as usize] {
                a = self.parent[a as usize]?;
                head.push(a);
            } else {
                b = self.parent[b as usize]?;
                tail.push(b);
            }
        }
        tail.pop();
        head.extend(tail.into_iter().rev());
        Some(head)
    }
}

/// Move every logical qubit back to its position in `initial`.
///
/// Vertices are settled in reverse BFS order, so each one is a leaf of the
/// still-unsettled subtree and the tree path that fills it never crosses a
/// settled vertex. Returns the number of swaps emitted.
fn restore(
    coupling_map: &CouplingMap,
    layout: &mut Layout,
    initial: &Layout,
    out: &mut Vec<Instruction>,
) -> CompileResult<usize> {
    if layout == initial {
        return Ok(0);
    }

    let forest = SpanningForest::bfs(coupling_map);
    let mut swaps = 0;
    for (idx, &v) in forest.order.iter().enumerate().rev() {
        let source = match initial.get_logical(v) {
            Some(logical) => layout.get_physical(logical),
            // Unmapped position: pull any free position of the same tree.
            None => forest.order[..=idx].iter().copied().find(|&u| {
                forest.root[u as usize] == forest.root[v as usize]
                    && layout.get_logical(u).is_none()
            }),
        };
        let Some(u) = source else {
            continue;
        };
        if u == v {
            continue;
        }

        let path = forest.path(u, v).ok_or(CompileError::RoutingFailed {
            qubit1: u,
            qubit2: v,
        })?;
        for hop in path.windows(2) {
            out.push(swap(hop[0], hop[1]));
            layout.swap(hop[0], hop[1]);
            swaps += 1;
        }
    }
    Ok(swaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::target::TrivialLayout;
    use crate::property::BasisGates;
    use qcmp_ir::Circuit;
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn route(circuit: &Circuit, coupling_map: CouplingMap) -> (Circuit, PropertySet) {
        let mut dag = circuit.dag().clone();
        let mut props = PropertySet::new().with_target(coupling_map, BasisGates::ibm());
        TrivialLayout.run(&mut dag, &mut props).unwrap();
        ShortestPathRouting.run(&mut dag, &mut props).unwrap();
        (Circuit::from_dag(circuit.name(), dag), props)
    }

    fn widened(circuit: &Circuit, n: u32) -> Circuit {
        Circuit::from_instructions(circuit.name(), n, circuit.instructions()).unwrap()
    }

    fn assert_coupled(circuit: &Circuit, coupling_map: &CouplingMap) {
        for inst in circuit.instructions() {
            if let [a, b] = inst.qubits[..] {
                assert!(
                    coupling_map.is_connected(a.0, b.0),
                    "{} on uncoupled {a} {b}",
                    inst.name()
                );
            }
        }
    }

    #[test]
    fn test_routing_connected() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (out, props) = route(&circuit, CouplingMap::linear(5));
        assert_eq!(out.num_ops(), 2);
        assert_eq!(
            props.get::<RoutingStats>(),
            Some(&RoutingStats::default())
        );
    }

    #[test]
    fn test_routing_needs_swap() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();

        let coupling_map = CouplingMap::linear(5);
        let (out, props) = route(&circuit, coupling_map.clone());

        let stats = props.get::<RoutingStats>().unwrap();
        assert_eq!(stats.swaps_inserted, 1);
        assert_eq!(stats.restore_swaps, 1);
        assert!(props.layout.as_ref().unwrap().is_trivial());
        assert_coupled(&out, &coupling_map);
        assert!(equivalent_up_to_global_phase(
            &circuit_operator(&widened(&circuit, 5)).unwrap(),
            &circuit_operator(&out).unwrap()
        ));
    }

    #[test]
    fn test_routing_on_star_restores_layout() {
        let mut circuit = Circuit::with_size("test", 5);
        circuit.h(QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        circuit.cx(QubitId(3), QubitId(4)).unwrap();
        circuit.cx(QubitId(2), QubitId(4)).unwrap();
        circuit.t(QubitId(3)).unwrap();

        let coupling_map = CouplingMap::star(5);
        let (out, props) = route(&circuit, coupling_map.clone());

        assert!(props.layout.as_ref().unwrap().is_trivial());
        assert_coupled(&out, &coupling_map);
        assert!(equivalent_up_to_global_phase(
            &circuit_operator(&circuit).unwrap(),
            &circuit_operator(&out).unwrap()
        ));
    }

    #[test]
    fn test_routing_disconnected_fails() {
        let mut circuit = Circuit::with_size("test", 4);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new()
            .with_target(CouplingMap::from_edges(4, [(0, 1), (2, 3)]), BasisGates::ibm());
        TrivialLayout.run(&mut dag, &mut props).unwrap();

        let result = ShortestPathRouting.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::RoutingFailed { .. })));
    }

    #[test]
    fn test_routing_rejects_wide_gates() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props =
            PropertySet::new().with_target(CouplingMap::full(3), BasisGates::ibm());
        TrivialLayout.run(&mut dag, &mut props).unwrap();

        let result = ShortestPathRouting.run(&mut dag, &mut props);
        assert!(matches!(
            result,
            Err(CompileError::GateTooWide { num_qubits: 3, .. })
        ));
    }

    #[test]
    fn test_forest_path_through_ancestor() {
        // 0 - 1 - 2 and 1 - 3
        let coupling_map = CouplingMap::from_edges(4, [(0, 1), (1, 2), (1, 3)]);
        let forest = SpanningForest::bfs(&coupling_map);
        assert_eq!(forest.order, vec![0, 1, 2, 3]);
        assert_eq!(forest.path(2, 3), Some(vec![2, 1, 3]));
        assert_eq!(forest.path(3, 0), Some(vec![3, 1, 0]));
        assert_eq!(forest.path(1, 1), Some(vec![1]));
    }
}
