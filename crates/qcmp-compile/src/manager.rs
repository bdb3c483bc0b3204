//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qcmp_ir::CircuitDag;

use crate::device::DeviceModel;
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasisTranslation, CancelTwoQubit, CommutativeCancellation, OptimizationLoop, Optimize1qGates,
    ShortestPathRouting, TargetConformance, TargetFamily, TrivialLayout, UnrollMultiQubit,
};
use crate::property::{BasisGates, CouplingMap, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits, depth {}, ops {}",
            self.passes.len(),
            dag.num_qubits(),
            dag.depth(),
            dag.num_ops()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            dag.depth(),
            dag.num_ops()
        );

        Ok(())
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Target properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 3,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: No optimization, only required transformations
    /// - Level 1: Single-qubit run merging
    /// - Level 2: + two-qubit cancellation
    /// - Level 3: + commutative cancellation (default)
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target coupling map and basis gates.
    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        self.properties.coupling_map = Some(coupling_map);
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Target a device model.
    #[must_use]
    pub fn with_device(self, device: &DeviceModel) -> Self {
        self.with_target(device.coupling().clone(), device.basis().clone())
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut properties = self.properties;
        let level = self.optimization_level;
        let mut pm = PassManager::new();

        if properties.get::<TargetFamily>().is_none() {
            if let Some(family) = properties
                .basis_gates
                .as_ref()
                .and_then(|basis| TargetFamily::from_basis(basis).ok())
            {
                properties.insert(family);
            }
        }

        let has_coupling = properties.coupling_map.is_some();
        if has_coupling {
            pm.add_pass(TrivialLayout);
        }
        pm.add_pass(UnrollMultiQubit);
        if level >= 2 {
            // Fewer entanglers before routing means fewer swaps.
            pm.add_pass(CancelTwoQubit);
        }
        if has_coupling {
            pm.add_pass(ShortestPathRouting);
            pm.add_pass(UnrollMultiQubit);
        }
        if properties.basis_gates.is_some() {
            pm.add_pass(BasisTranslation);
        }

        if level >= 1 {
            let mut optimizer = OptimizationLoop::new().with_pass(Optimize1qGates::new());
            if level >= 2 {
                optimizer = optimizer.with_pass(CancelTwoQubit);
            }
            if level >= 3 {
                optimizer = optimizer
                    .with_pass(CommutativeCancellation)
                    .with_pass(Optimize1qGates::new());
            }
            pm.add_pass(optimizer);
        }

        pm.add_pass(TargetConformance);

        (pm, properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
