//! Constant folding — interface only.
//!
//! The concrete fold set (which combinational kinds fold to a constant, and
//! under what conditions) is explicitly out of scope for this core; see
//! `DESIGN.md`. This type exists so the pass manager's contract — a
//! named, configurable pass with a `run()` — stays complete, matching the
//! shape of every other registered pass.

use crate::diagnostic::Diagnostics;
use crate::ir::Netlist;

use super::{Pass, PassResult};

/// Configuration for [`ConstantFoldPass`].
#[derive(Debug, Copy, Clone)]
pub struct ConstantFoldOptions {
    /// Upper bound on fold iterations before giving up at a non-fixed-point.
    pub max_iterations: u32,
    /// Whether unknown ("X") propagation through folds is permitted.
    pub allow_x_propagation: bool,
}

impl Default for ConstantFoldOptions {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            allow_x_propagation: false,
        }
    }
}

/// Constant-folding pass. `run()` is a documented no-op: it reports no
/// change and never fails.
#[derive(Debug, Default)]
pub struct ConstantFoldPass {
    options: ConstantFoldOptions,
}

impl ConstantFoldPass {
    /// Creates a constant-fold pass with default options.
    pub fn new() -> Self {
        Self::with_options(ConstantFoldOptions::default())
    }

    /// Creates a constant-fold pass with explicit options.
    pub fn with_options(options: ConstantFoldOptions) -> Self {
        Self { options }
    }

    /// The configuration this pass was constructed with.
    pub fn options(&self) -> ConstantFoldOptions {
        self.options
    }
}

impl Pass for ConstantFoldPass {
    fn id(&self) -> &str {
        "const-fold"
    }

    fn name(&self) -> &str {
        "const-fold"
    }

    fn description(&self) -> &str {
        "Fold combinational operations to constants (unimplemented)"
    }

    fn run(&mut self, _netlist: &mut Netlist, _diags: &mut Diagnostics) -> PassResult {
        PassResult::default()
    }
}
