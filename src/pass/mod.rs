//! The pass framework: the `Pass` trait, pass results, and the manager that
//! runs a registered sequence of passes over a netlist.

pub mod const_fold;
pub mod output_assign_inline;
pub mod redundant_elim;
pub mod verify;

use crate::diagnostic::Diagnostics;
use crate::ir::Netlist;

/// The outcome of a single pass run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PassResult {
    /// `true` if the pass mutated the netlist.
    pub changed: bool,
    /// `true` if the pass's own logic determined it could not complete
    /// (distinct from, but often paired with, an error recorded on the
    /// diagnostics channel).
    pub failed: bool,
}

/// A single stage in a [`PassManager`] pipeline.
///
/// Implementors read and mutate the netlist through its entity-store and
/// graph-level facades, recording findings into `diags` as they go.
pub trait Pass {
    /// Stable identifier, suitable for programmatic matching.
    fn id(&self) -> &str;

    /// Human-readable name, used to attribute diagnostics to this pass.
    fn name(&self) -> &str;

    /// One-line description of what this pass does.
    fn description(&self) -> &str;

    /// Runs this pass once against `netlist`, recording findings into
    /// `diags`.
    fn run(&mut self, netlist: &mut Netlist, diags: &mut Diagnostics) -> PassResult;
}

/// The outcome of running an entire [`PassManager`] pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PassManagerResult {
    /// `true` if any pass in the pipeline reported `changed`.
    pub changed: bool,
    /// `true` if every pass ran to completion without failing or recording
    /// an error attributed to itself.
    pub success: bool,
}

/// Executes a registered sequence of passes, in registration order, against
/// a netlist.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Creates an empty pass manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `pass` to the end of the pipeline.
    pub fn add_pass(&mut self, pass: Box<dyn Pass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Runs every registered pass, in order, against `netlist`.
    ///
    /// Stops at the first pass that reports `failed` or records an error
    /// attributed to its own name, in which case `success` is `false`.
    pub fn run(&mut self, netlist: &mut Netlist, diags: &mut Diagnostics) -> PassManagerResult {
        let mut changed = false;
        for pass in &mut self.passes {
            let result = pass.run(netlist, diags);
            changed |= result.changed;
            if result.failed || diags.has_error_from(pass.name()) {
                return PassManagerResult {
                    changed,
                    success: false,
                };
            }
        }
        PassManagerResult {
            changed,
            success: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysChanges;
    impl Pass for AlwaysChanges {
        fn id(&self) -> &str {
            "always_changes"
        }
        fn name(&self) -> &str {
            "always_changes"
        }
        fn description(&self) -> &str {
            "test pass that always reports changed"
        }
        fn run(&mut self, _netlist: &mut Netlist, _diags: &mut Diagnostics) -> PassResult {
            PassResult {
                changed: true,
                failed: false,
            }
        }
    }

    struct AlwaysErrors;
    impl Pass for AlwaysErrors {
        fn id(&self) -> &str {
            "always_errors"
        }
        fn name(&self) -> &str {
            "always_errors"
        }
        fn description(&self) -> &str {
            "test pass that always records an error"
        }
        fn run(&mut self, _netlist: &mut Netlist, diags: &mut Diagnostics) -> PassResult {
            diags.error("always_errors", None, None, "boom");
            PassResult::default()
        }
    }

    #[test]
    fn manager_ors_changed_across_passes() {
        let mut manager = PassManager::new();
        manager.add_pass(Box::new(AlwaysChanges));
        let mut netlist = Netlist::new();
        let mut diags = Diagnostics::new();
        let result = manager.run(&mut netlist, &mut diags);
        assert!(result.changed);
        assert!(result.success);
    }

    #[test]
    fn manager_stops_on_error() {
        let mut manager = PassManager::new();
        manager.add_pass(Box::new(AlwaysErrors));
        manager.add_pass(Box::new(AlwaysChanges));
        let mut netlist = Netlist::new();
        let mut diags = Diagnostics::new();
        let result = manager.run(&mut netlist, &mut diags);
        assert!(!result.success);
        assert!(!result.changed);
    }
}
