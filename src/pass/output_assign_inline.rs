//! The output-assign inline pass: removes a pass-through `Assign` that
//! copies a value straight into an output port, redirecting the upstream
//! producer to drive the output value directly.

use tracing::trace;

use crate::diagnostic::Diagnostics;
use crate::ir::{Netlist, OperationId};
use crate::schema::OperationKind;

use super::{Pass, PassResult};

/// Inlines `Assign` operations that copy a single-use, single-producer value
/// straight into an output port, eliminating the intermediate copy.
///
/// For every `Assign` operation `A` in a graph: if `A` writes the sole result
/// of another operation `D` directly into an output-port value with no other
/// users, `A` is erased and `D` is made to produce the output value directly
/// (via [`crate::ir::Graph::replace_result`]).
#[derive(Debug, Default)]
pub struct OutputAssignInlinePass;

impl OutputAssignInlinePass {
    /// Creates the pass.
    pub fn new() -> Self {
        Self
    }
}

impl Pass for OutputAssignInlinePass {
    fn id(&self) -> &str {
        "output-assign-inline"
    }

    fn name(&self) -> &str {
        "output-assign-inline"
    }

    fn description(&self) -> &str {
        "Inline output port assigns"
    }

    fn run(&mut self, netlist: &mut Netlist, _diags: &mut Diagnostics) -> PassResult {
        let mut any_changed = false;

        let graph_names: Vec<String> = netlist.graphs().map(|(name, _)| name.to_owned()).collect();
        for graph_name in graph_names {
            let graph = netlist.graph_mut(&graph_name).expect("graph just listed");

            // Snapshot the operation order before mutating: erasing an
            // operation mid-iteration would otherwise invalidate the list
            // being walked.
            let assign_ops: Vec<OperationId> = graph
                .operation_order()
                .iter()
                .copied()
                .filter(|&id| graph.get_operation(id).kind() == OperationKind::Assign)
                .collect();

            for assign_id in assign_ops {
                if try_inline(graph, assign_id) {
                    any_changed = true;
                    trace!(graph = %graph_name, "inlined an output-assign");
                }
            }
        }

        PassResult {
            changed: any_changed,
            failed: false,
        }
    }
}

fn try_inline(graph: &mut crate::ir::Graph, assign_id: OperationId) -> bool {
    let op = graph.get_operation(assign_id);
    if op.operands().len() != 1 || op.results().len() != 1 {
        return false;
    }
    let out_value_id = op.results()[0];
    let operand_id = op.operands()[0];

    let out_value = graph.get_value(out_value_id);
    if !(out_value.is_output() && !out_value.is_input() && !out_value.is_inout()) {
        return false;
    }
    if out_value.defining_op() != Some(assign_id) {
        return false;
    }
    if !out_value.users().is_empty() {
        return false;
    }

    let operand_value = graph.get_value(operand_id);
    let operand_users = operand_value.users();
    if operand_users.len() != 1 || operand_users[0].operation != assign_id {
        return false;
    }
    if operand_value.width() != out_value.width() || operand_value.is_signed() != out_value.is_signed() {
        return false;
    }

    let Some(def_op_id) = operand_value.defining_op() else {
        return false;
    };
    if def_op_id == assign_id {
        return false;
    }
    let def_op = graph.get_operation(def_op_id);
    if def_op.results().len() != 1 || def_op.results()[0] != operand_id {
        return false;
    }

    if !graph.erase_op(assign_id) {
        return false;
    }
    graph.replace_result(def_op_id, 0, out_value_id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OperationKind;

    fn graph_with_not_then_assign(second_user: bool) -> Netlist {
        let mut netlist = Netlist::new();
        let g = netlist.create_graph("g");
        let inp = g.intern_symbol("in");
        let out = g.intern_symbol("out");
        let tmp = g.intern_symbol("tmp");
        let vin = g.create_value(inp, 1, false);
        let vout = g.create_value(out, 1, false);
        let vtmp = g.create_value(tmp, 1, false);
        g.bind_input_port(inp, vin);
        g.bind_output_port(out, vout);

        let not0 = g.create_operation(OperationKind::Not, g.intern_symbol("not0"));
        g.add_operand(not0, vin);
        g.add_result(not0, vtmp);

        let assign_out = g.create_operation(OperationKind::Assign, g.intern_symbol("assign_out"));
        g.add_operand(assign_out, vtmp);
        g.add_result(assign_out, vout);

        if second_user {
            let out1 = g.intern_symbol("out1");
            let vout1 = g.create_value(out1, 1, false);
            g.bind_output_port(out1, vout1);
            let assign_out1 =
                g.create_operation(OperationKind::Assign, g.intern_symbol("assign_out1"));
            g.add_operand(assign_out1, vtmp);
            g.add_result(assign_out1, vout1);
        }

        netlist
    }

    #[test]
    fn s5_output_assign_inline_fires_once() {
        let mut netlist = graph_with_not_then_assign(false);
        let mut diags = Diagnostics::new();
        let result = OutputAssignInlinePass::new().run(&mut netlist, &mut diags);
        assert!(!result.failed);
        assert!(result.changed);

        let g = netlist.graph("g").unwrap();
        assert!(g.find_symbol("assign_out").and_then(|s| g.find_operation(s)).is_none());

        let out_sym = g.find_symbol("out").unwrap();
        let out_value_id = g.find_value(out_sym).unwrap();
        let not0_sym = g.find_symbol("not0").unwrap();
        let not0_id = g.find_operation(not0_sym).unwrap();
        assert_eq!(g.get_value(out_value_id).defining_op(), Some(not0_id));
        assert_eq!(g.get_operation(not0_id).results()[0], out_value_id);
    }

    #[test]
    fn s6_blocked_by_a_second_user() {
        let mut netlist = graph_with_not_then_assign(true);
        let mut diags = Diagnostics::new();
        let result = OutputAssignInlinePass::new().run(&mut netlist, &mut diags);
        assert!(!result.failed);
        assert!(!result.changed);

        let g = netlist.graph("g").unwrap();
        assert!(g.find_symbol("assign_out").and_then(|s| g.find_operation(s)).is_some());
        assert!(g.find_symbol("assign_out1").and_then(|s| g.find_operation(s)).is_some());
    }

    #[test]
    fn running_twice_is_idempotent() {
        let mut netlist = graph_with_not_then_assign(false);
        let mut diags = Diagnostics::new();
        OutputAssignInlinePass::new().run(&mut netlist, &mut diags);
        let second = OutputAssignInlinePass::new().run(&mut netlist, &mut diags);
        assert!(!second.changed);
    }
}
