//! Optimization passes.

mod cancel;
mod optimize_1q;


use tracing::debug;

use qcmp_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

pub use cancel::{CancelTwoQubit, CommutativeCancellation};
pub use optimize_1q::Optimize1qGates;

/// Tolerance for angle comparisons.
pub(super) const EPSILON: f64 = 1e-10;

/// Upper bound on optimization rounds.
pub const MAX_ITERATIONS: usize = 10;

/// Runs a group of passes repeatedly until the operation count stops
/// decreasing.
///
/// Every member pass only ever removes or shortens gate runs, so the loop
/// reaches a fixed point; [`MAX_ITERATIONS`] bounds it regardless.
#[derive(Default)]
pub struct OptimizationLoop {
    passes: Vec<Box<dyn Pass>>,
}

impl OptimizationLoop {
    /// Create an empty loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to every round.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Number of passes per round.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Whether the loop has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Pass for OptimizationLoop {
    fn name(&self) -> &'static str {
        "OptimizationLoop"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        for round in 0..MAX_ITERATIONS {
            let before = dag.num_ops();
            for pass in &self.passes {
                if pass.should_run(dag, properties) {
                    pass.run(dag, properties)?;
                }
            }
            let after = dag.num_ops();
            debug!("Optimization round {}: {} -> {} ops", round + 1, before, after);
            if after >= before {
                break;
            }
        }
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        !self.passes.is_empty()
    }
}
