//! Statevector simulation engine.

use num_complex::Complex64;

use qcmp_ir::{GateKind, Instruction, StandardGate, UnitaryGate};

use crate::error::{SimError, SimResult};

/// Largest register a [`Statevector`] will allocate.
pub const MAX_QUBITS: usize = 20;

/// A statevector representing a quantum state.
///
/// Qubit `j` is bit `j` of the basis-state index.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::from_basis(num_qubits, 0)
    }

    /// Create the computational basis state `|index⟩`.
    pub fn from_basis(num_qubits: usize, index: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let size = 1 << num_qubits;
        if index >= size {
            return Err(SimError::BasisStateOutOfRange { index, num_qubits });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of measuring basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, Complex64::norm_sqr)
    }

    /// The most likely basis state and its probability.
    pub fn dominant_basis_state(&self) -> (usize, f64) {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .enumerate()
            .fold((0, 0.0), |best, (i, p)| if p > best.1 { (i, p) } else { best })
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        if let Some(&qubit) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(SimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }

        match &instruction.gate.kind {
            GateKind::Standard(gate) => self.apply_standard_gate(gate, &qubits),
            GateKind::Unitary(block) => self.apply_dense(block, &qubits),
        }
        Ok(())
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        if let Some(matrix) = gate.single_qubit_matrix() {
            self.apply_1q(qubits[0], &matrix);
            return;
        }
        match gate {
            StandardGate::CX | StandardGate::CCX | StandardGate::MCX(_) => {
                if let Some((&target, controls)) = qubits.split_last() {
                    self.apply_mcx(controls, target);
                }
            }
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            // Every other standard gate acts on one qubit and has a matrix.
            _ => {}
        }
    }

    // =========================================================================
    // Gate implementations
    // =========================================================================

    fn apply_1q(&mut self, qubit: usize, m: &[Complex64; 4]) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    fn apply_mcx(&mut self, controls: &[usize], target: usize) {
        let ctrl_mask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let mask = (1 << control) | (1 << target);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == mask {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Apply a dense block; qubit `k` of the block is bit `k` of its local index.
    fn apply_dense(&mut self, block: &UnitaryGate, qubits: &[usize]) {
        let dim = block.dim();
        let block_mask = qubits.iter().fold(0usize, |m, &q| m | (1 << q));
        let spread = |local: usize| {
            qubits
                .iter()
                .enumerate()
                .filter(|(k, _)| (local >> k) & 1 == 1)
                .fold(0usize, |acc, (_, &q)| acc | (1 << q))
        };
        let offsets: Vec<usize> = (0..dim).map(spread).collect();

        let mut gathered = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..(1 << self.num_qubits) {
            if base & block_mask != 0 {
                continue;
            }
            for (slot, &offset) in gathered.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (r, &offset) in offsets.iter().enumerate() {
                self.amplitudes[base | offset] = gathered
                    .iter()
                    .enumerate()
                    .map(|(c, a)| block.entry(r, c) * a)
                    .sum();
            }
        }
    }
}
