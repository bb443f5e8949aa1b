//! Redundant-elimination — interface only.
//!
//! Rounds out the family of example passes alongside [`super::const_fold`]:
//! declared the same config-free, single-`run()` shape, with no fold/merge
//! algorithm attached. Not named by the core specification; its behavior is
//! intentionally a non-functional stub.

use crate::diagnostic::Diagnostics;
use crate::ir::Netlist;

use super::{Pass, PassResult};

/// Redundant-operation-elimination pass. `run()` is a documented no-op: it
/// reports no change and never fails.
#[derive(Debug, Default)]
pub struct RedundantElimPass;

impl RedundantElimPass {
    /// Creates the pass.
    pub fn new() -> Self {
        Self
    }
}

impl Pass for RedundantElimPass {
    fn id(&self) -> &str {
        "redundant-elim"
    }

    fn name(&self) -> &str {
        "redundant-elim"
    }

    fn description(&self) -> &str {
        "Eliminate redundant operations (unimplemented)"
    }

    fn run(&mut self, _netlist: &mut Netlist, _diags: &mut Diagnostics) -> PassResult {
        PassResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_a_documented_no_op() {
        let mut netlist = Netlist::new();
        let mut diags = Diagnostics::new();
        let result = RedundantElimPass::new().run(&mut netlist, &mut diags);
        assert!(!result.changed);
        assert!(!result.failed);
        assert!(diags.is_empty());
    }
}
