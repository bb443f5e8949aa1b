//! Property-based tests over randomly generated small well-formed graphs.
//!
//! Scenario tests (S1-S6) live next to the code they exercise, as
//! `#[cfg(test)]` units in `src/pass/verify.rs` and
//! `src/pass/output_assign_inline.rs`. This suite covers the
//! universal/round-trip/idempotence laws, which need many random graphs to
//! mean anything.

use grh::diagnostic::{Diagnostics, Level};
use grh::ir::Netlist;
use grh::load;
use grh::pass::output_assign_inline::OutputAssignInlinePass;
use grh::pass::verify::{VerifierPass, VerifyOptions};
use grh::pass::Pass;
use grh::schema::OperationKind;

use proptest::prelude::*;

/// Builds the JSON text for a graph with `n` independent two-input adders:
/// `sI = aI + bI` for `I` in `0..n`, each `aI`/`bI` an input port and each
/// `sI` an output port.
fn adder_chain_json(n: u32, width: u32) -> String {
    let mut vals = Vec::new();
    let mut ports_in = Vec::new();
    let mut ports_out = Vec::new();
    let mut ops = Vec::new();

    for i in 0..n {
        vals.push(format!(r#"{{"sym":"a{i}","w":{width},"sgn":false,"in":true,"out":false}}"#));
        vals.push(format!(r#"{{"sym":"b{i}","w":{width},"sgn":false,"in":true,"out":false}}"#));
        vals.push(format!(r#"{{"sym":"s{i}","w":{width},"sgn":false,"in":false,"out":true}}"#));
        ports_in.push(format!(r#"{{"name":"a{i}","val":"a{i}"}}"#));
        ports_in.push(format!(r#"{{"name":"b{i}","val":"b{i}"}}"#));
        ports_out.push(format!(r#"{{"name":"s{i}","val":"s{i}"}}"#));
        ops.push(format!(r#"{{"kind":"add","sym":"add{i}","in":["a{i}","b{i}"],"out":["s{i}"]}}"#));
    }

    format!(
        r#"{{"graphs":[{{"symbol":"g","vals":[{}],"ports":{{"in":[{}],"out":[{}]}},"ops":[{}]}}]}}"#,
        vals.join(","),
        ports_in.join(","),
        ports_out.join(","),
        ops.join(","),
    )
}

/// Builds a graph programmatically (not via JSON) with `n` chained `Not`
/// operations: `in -> t0 -> t1 -> ... -> out`.
fn not_chain_netlist(n: u32) -> Netlist {
    let mut netlist = Netlist::new();
    let g = netlist.create_graph("g");

    let in_sym = g.intern_symbol("in");
    let mut prev = g.create_value(in_sym, 1, false);
    g.bind_input_port(in_sym, prev);

    for i in 0..n {
        let is_last = i == n - 1;
        let name = if is_last { "out".to_owned() } else { format!("t{i}") };
        let sym = g.intern_symbol(name);
        let value = g.create_value(sym, 1, false);
        if is_last {
            g.bind_output_port(sym, value);
        }
        let op_sym = g.intern_symbol(format!("not{i}"));
        let op = g.create_operation(OperationKind::Not, op_sym);
        g.add_operand(op, prev);
        g.add_result(op, value);
        prev = value;
    }

    netlist
}

/// Builds a graph with `fires` pass-through assign-to-output patterns (one
/// producer, one consuming `Assign` writing an otherwise-unused output) plus
/// `blocked` patterns where the producer also feeds a second output assign,
/// which should never be inlined.
fn assign_inline_netlist(fires: u32, blocked: u32) -> Netlist {
    let mut netlist = Netlist::new();
    let g = netlist.create_graph("g");

    for i in 0..fires {
        let in_sym = g.intern_symbol(format!("fire_in{i}"));
        let tmp_sym = g.intern_symbol(format!("fire_tmp{i}"));
        let out_sym = g.intern_symbol(format!("fire_out{i}"));
        let vin = g.create_value(in_sym, 1, false);
        let vtmp = g.create_value(tmp_sym, 1, false);
        let vout = g.create_value(out_sym, 1, false);
        g.bind_input_port(in_sym, vin);
        g.bind_output_port(out_sym, vout);

        let not_op = g.create_operation(OperationKind::Not, g.intern_symbol(format!("fire_not{i}")));
        g.add_operand(not_op, vin);
        g.add_result(not_op, vtmp);

        let assign_op = g.create_operation(OperationKind::Assign, g.intern_symbol(format!("fire_assign{i}")));
        g.add_operand(assign_op, vtmp);
        g.add_result(assign_op, vout);
    }

    for i in 0..blocked {
        let in_sym = g.intern_symbol(format!("block_in{i}"));
        let tmp_sym = g.intern_symbol(format!("block_tmp{i}"));
        let out0_sym = g.intern_symbol(format!("block_out0_{i}"));
        let out1_sym = g.intern_symbol(format!("block_out1_{i}"));
        let vin = g.create_value(in_sym, 1, false);
        let vtmp = g.create_value(tmp_sym, 1, false);
        let vout0 = g.create_value(out0_sym, 1, false);
        let vout1 = g.create_value(out1_sym, 1, false);
        g.bind_input_port(in_sym, vin);
        g.bind_output_port(out0_sym, vout0);
        g.bind_output_port(out1_sym, vout1);

        let not_op = g.create_operation(OperationKind::Not, g.intern_symbol(format!("block_not{i}")));
        g.add_operand(not_op, vin);
        g.add_result(not_op, vtmp);

        let assign0 = g.create_operation(OperationKind::Assign, g.intern_symbol(format!("block_assign0_{i}")));
        g.add_operand(assign0, vtmp);
        g.add_result(assign0, vout0);

        let assign1 = g.create_operation(OperationKind::Assign, g.intern_symbol(format!("block_assign1_{i}")));
        g.add_operand(assign1, vtmp);
        g.add_result(assign1, vout1);
    }

    netlist
}

proptest! {
    /// Law 7: every JSON document the importer accepts, once verified with
    /// auto-fix on, yields `failed = false` and no repair diagnostics — a
    /// well-formed import round-trips clean.
    #[test]
    fn imported_well_formed_graphs_verify_clean(n in 1u32..6, width in 1u32..9) {
        let json = adder_chain_json(n, width);
        let mut netlist = load::from_json_str(&json).expect("generated JSON must be accepted");

        let mut diags = Diagnostics::new();
        let result = VerifierPass::new().run(&mut netlist, &mut diags);

        prop_assert!(!result.failed);
        prop_assert!(!diags.has_error());
        prop_assert!(diags.entries().iter().all(|d| !d.message.contains("rebuilt")));
    }

    /// Law 8 + universal invariants 1-6: a graph built directly through the
    /// programmatic API is left observably unchanged by verification.
    #[test]
    fn programmatically_built_graphs_verify_without_changes(n in 1u32..8) {
        let mut netlist = not_chain_netlist(n);
        let mut diags = Diagnostics::new();
        let result = VerifierPass::new().run(&mut netlist, &mut diags);

        prop_assert!(!result.failed);
        prop_assert!(!result.changed);
        prop_assert!(diags.is_empty());
    }

    /// Law 9: running the verifier twice reports no repairs on the second
    /// pass.
    #[test]
    fn verifier_is_idempotent(n in 1u32..8) {
        let mut netlist = not_chain_netlist(n);
        let mut first_diags = Diagnostics::new();
        VerifierPass::new().run(&mut netlist, &mut first_diags);

        let mut second_diags = Diagnostics::new();
        let second = VerifierPass::new().run(&mut netlist, &mut second_diags);

        prop_assert!(!second.changed);
        prop_assert!(second_diags.entries().iter().all(|d| d.level != Level::Info));
    }

    /// Law 10: running the output-assign inline pass twice reports no change
    /// on the second pass, whether or not the first pass found work to do.
    #[test]
    fn output_assign_inline_is_idempotent(fires in 0u32..4, blocked in 0u32..4) {
        prop_assume!(fires + blocked > 0);
        let mut netlist = assign_inline_netlist(fires, blocked);
        let mut diags = Diagnostics::new();
        OutputAssignInlinePass::new().run(&mut netlist, &mut diags);

        let mut diags2 = Diagnostics::new();
        let second = OutputAssignInlinePass::new().run(&mut netlist, &mut diags2);
        prop_assert!(!second.changed);

        let mut verify_diags = Diagnostics::new();
        let verify_result = VerifierPass::new().run(&mut netlist, &mut verify_diags);
        prop_assert!(!verify_result.failed);
    }
}

#[test]
fn verify_options_default_matches_documented_defaults() {
    let opts = VerifyOptions::default();
    assert!(opts.auto_fix_pointers);
    assert!(opts.stop_on_error);
}

#[test]
fn malformed_json_is_rejected_with_a_schema_error_path() {
    let json = r#"{"graphs": [{"symbol": "g", "vals": [], "ports": {"in": [{"name": "a", "val": "ghost"}]}}]}"#;
    let err = load::from_json_str(json).unwrap_err();
    match err {
        load::ImportError::Schema { path, .. } => assert!(path.contains("val")),
        load::ImportError::Syntax(_) => panic!("expected a schema error, not a syntax error"),
    }
}
