//! Ancilla scopes: allocate, compute, use, uncompute.

use qcmp_ir::{Circuit, Instruction, QubitId};

use crate::error::OracleResult;

/// A compute/uncompute region over a circuit.
///
/// Instructions added with [`compute`](Self::compute) are recorded and undone
/// in reverse order by [`close`](Self::close); instructions added with
/// [`apply`](Self::apply) are the use step and stay. Ancillas allocated in
/// the scope therefore end in `|0⟩` as long as the use step leaves every
/// computed qubit as it found it.
#[must_use = "a scope must be closed to uncompute its ancillas"]
pub struct Scope<'c> {
    circuit: &'c mut Circuit,
    computed: Vec<Instruction>,
    ancillas: Vec<QubitId>,
}

impl<'c> Scope<'c> {
    /// Open a scope on `circuit`.
    pub fn open(circuit: &'c mut Circuit) -> Self {
        Self {
            circuit,
            computed: vec![],
            ancillas: vec![],
        }
    }

    /// Allocate a fresh ancilla after the circuit's last qubit.
    pub fn allocate(&mut self) -> QubitId {
        let qubit = self.circuit.add_qubit();
        self.ancillas.push(qubit);
        qubit
    }

    /// Ancillas allocated so far.
    pub fn ancillas(&self) -> &[QubitId] {
        &self.ancillas
    }

    /// Add a compute step, undone when the scope closes.
    pub fn compute(&mut self, instruction: Instruction) -> OracleResult<()> {
        self.circuit.push(instruction.clone())?;
        self.computed.push(instruction);
        Ok(())
    }

    /// Add a use step.
    pub fn apply(&mut self, instruction: Instruction) -> OracleResult<()> {
        self.circuit.push(instruction)?;
        Ok(())
    }

    /// Uncompute every compute step in reverse order.
    ///
    /// Returns the number of ancillas the scope allocated.
    pub fn close(self) -> OracleResult<usize> {
        for instruction in self.computed.iter().rev() {
            self.circuit.push(instruction.inverse())?;
        }
        Ok(self.ancillas.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcmp_ir::StandardGate;

    #[test]
    fn test_scope_uncomputes_in_reverse() {
        let mut circuit = Circuit::with_size("scope", 2);
        let mut scope = Scope::open(&mut circuit);
        let a = scope.allocate();
        assert_eq!(a, QubitId(2));
        scope
            .compute(Instruction::single_qubit_gate(StandardGate::T, QubitId(0)))
            .unwrap();
        scope
            .compute(Instruction::mcx(&[QubitId(0), QubitId(1)], a))
            .unwrap();
        scope
            .apply(Instruction::two_qubit_gate(StandardGate::CX, a, QubitId(1)))
            .unwrap();
        assert_eq!(scope.close().unwrap(), 1);

        let names: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, ["t", "ccx", "cx", "ccx", "tdg"]);
        assert_eq!(circuit.num_qubits(), 3);
    }
}
