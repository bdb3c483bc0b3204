//! Device model: qubit count, coupling graph and native gate vocabulary.
//!
//! A [`DeviceModel`] is immutable once constructed and is shared read-only by
//! every decomposition that targets it. Devices come from the built-in
//! presets or from a serde [`DeviceProfile`].

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::property::{BasisGates, CouplingMap};

/// Edges of the 16-qubit heavy-hex reference device.
const HEAVY_HEX_16_EDGES: [(u32, u32); 16] = [
    (0, 1),
    (1, 2),
    (1, 4),
    (2, 3),
    (3, 5),
    (4, 7),
    (5, 8),
    (6, 7),
    (7, 10),
    (8, 9),
    (8, 11),
    (10, 12),
    (11, 14),
    (12, 13),
    (12, 15),
    (13, 14),
];

/// Edges of the 7-qubit heavy-hex device.
const HEAVY_HEX_7_EDGES: [(u32, u32); 6] = [(0, 1), (1, 2), (1, 3), (3, 5), (4, 5), (5, 6)];

/// Names accepted by [`DeviceModel::preset`].
pub const PRESET_NAMES: [&str; 4] = ["heavy_hex_16", "heavy_hex_7", "iqm_star_5", "linear_5"];

/// A target device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceModel {
    name: String,
    num_qubits: u32,
    coupling: CouplingMap,
    basis: BasisGates,
}

impl DeviceModel {
    /// Create a device, validating its description.
    ///
    /// Fails with [`CompileError::InvalidDevice`] when the device has no
    /// qubits, an edge is out of range or a self loop, or the basis is empty.
    /// Duplicate and reversed edges are merged.
    pub fn new(
        name: impl Into<String>,
        num_qubits: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
        basis: impl IntoIterator<Item = impl Into<String>>,
    ) -> CompileResult<Self> {
        let name = name.into();
        let invalid = |reason: String| CompileError::InvalidDevice {
            name: name.clone(),
            reason,
        };

        if num_qubits == 0 {
            return Err(invalid("device must have at least one qubit".into()));
        }
        let edges: Vec<(u32, u32)> = edges.into_iter().collect();
        for &(a, b) in &edges {
            if a >= num_qubits || b >= num_qubits {
                return Err(invalid(format!(
                    "edge ({a}, {b}) references a qubit outside 0..{num_qubits}"
                )));
            }
            if a == b {
                return Err(invalid(format!("self loop on qubit {a}")));
            }
        }
        let basis = BasisGates::new(basis);
        if basis.is_empty() {
            return Err(invalid("native gate set is empty".into()));
        }

        Ok(Self {
            coupling: CouplingMap::from_edges(num_qubits, edges),
            name,
            num_qubits,
            basis,
        })
    }

    /// The 16-qubit heavy-hex reference device with basis `{cx, id, rz, sx, x}`.
    pub fn heavy_hex_16() -> Self {
        Self::from_trusted("heavy_hex_16", 16, &HEAVY_HEX_16_EDGES, BasisGates::ibm())
    }

    /// A 7-qubit heavy-hex device with basis `{cx, id, rz, sx, x}`.
    pub fn heavy_hex_7() -> Self {
        Self::from_trusted("heavy_hex_7", 7, &HEAVY_HEX_7_EDGES, BasisGates::ibm())
    }

    /// A 5-qubit star device with basis `{prx, cz}`.
    pub fn iqm_star_5() -> Self {
        let coupling = CouplingMap::star(5);
        Self {
            name: "iqm_star_5".into(),
            num_qubits: 5,
            coupling,
            basis: BasisGates::iqm(),
        }
    }

    /// A linear chain of `n` qubits.
    pub fn linear(n: u32, basis: BasisGates) -> Self {
        Self {
            name: format!("linear_{n}"),
            num_qubits: n,
            coupling: CouplingMap::linear(n),
            basis,
        }
    }

    /// A star of `n` qubits around qubit 0.
    pub fn star(n: u32, basis: BasisGates) -> Self {
        Self {
            name: format!("star_{n}"),
            num_qubits: n,
            coupling: CouplingMap::star(n),
            basis,
        }
    }

    /// A fully connected device of `n` qubits.
    pub fn full(n: u32, basis: BasisGates) -> Self {
        Self {
            name: format!("full_{n}"),
            num_qubits: n,
            coupling: CouplingMap::full(n),
            basis,
        }
    }

    /// Look up a built-in device by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "heavy_hex_16" => Some(Self::heavy_hex_16()),
            "heavy_hex_7" => Some(Self::heavy_hex_7()),
            "iqm_star_5" => Some(Self::iqm_star_5()),
            "linear_5" => Some(Self::linear(5, BasisGates::ibm())),
            _ => None,
        }
    }

    fn from_trusted(name: &str, num_qubits: u32, edges: &[(u32, u32)], basis: BasisGates) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            coupling: CouplingMap::from_edges(num_qubits, edges.iter().copied()),
            basis,
        }
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The coupling graph.
    pub fn coupling(&self) -> &CouplingMap {
        &self.coupling
    }

    /// The native gate vocabulary.
    pub fn basis(&self) -> &BasisGates {
        &self.basis
    }

    /// Whether `gate` is native.
    pub fn supports(&self, gate: &str) -> bool {
        self.basis.contains(gate)
    }

    /// Whether two physical qubits share a coupling edge.
    ///
    /// Symmetric; false for equal or out-of-range indices.
    pub fn are_coupled(&self, q1: u32, q2: u32) -> bool {
        q1 < self.num_qubits && q2 < self.num_qubits && self.coupling.is_connected(q1, q2)
    }

    /// Serializable description of this device.
    pub fn to_profile(&self) -> DeviceProfile {
        DeviceProfile {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            coupling: self.coupling.edges().iter().map(|&(a, b)| [a, b]).collect(),
            basis: self.basis.gates().to_vec(),
        }
    }
}

/// Serializable device description, as found in YAML or JSON device files.
///
/// ```yaml
/// name: ring_4
/// num_qubits: 4
/// coupling: [[0, 1], [1, 2], [2, 3], [3, 0]]
/// basis: [cx, rz, sx, x]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Device name.
    pub name: String,
    /// Number of physical qubits.
    pub num_qubits: u32,
    /// Undirected coupling edges.
    #[serde(default)]
    pub coupling: Vec<[u32; 2]>,
    /// Native gate identifiers.
    pub basis: Vec<String>,
}

impl TryFrom<DeviceProfile> for DeviceModel {
    type Error = CompileError;

    fn try_from(profile: DeviceProfile) -> CompileResult<Self> {
        DeviceModel::new(
            profile.name,
            profile.num_qubits,
            profile.coupling.into_iter().map(|[a, b]| (a, b)),
            profile.basis,
        )
    }
}
