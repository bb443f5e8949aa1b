//! JSON netlist import.
//!
//! Parses the textual wire format into a [`Netlist`]: graphs, values, ports
//! and operations, plus attributes and source locations. This stage only
//! performs the checks needed to construct a well-formed [`Netlist`] value
//! (duplicate names, dangling references, direction-flag/port consistency);
//! full schema and def-use verification is [`crate::pass::verify::VerifierPass`]'s
//! job and is not duplicated here.

use std::collections::{HashMap, HashSet};

use serde_json::Value as Json;

use crate::ir::{AttributeValue, Netlist, SourceLocation};
use crate::schema::OperationKind;

/// Failure importing a netlist from JSON text.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The text was not valid JSON at all.
    #[error("failed to parse JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    /// The JSON parsed, but didn't conform to the netlist schema.
    #[error("{path}: {message}")]
    Schema {
        /// Dotted/bracketed path to the offending value, e.g. `"graph.port.val"`.
        path: String,
        /// Human-readable description of what was expected.
        message: String,
    },
}

fn schema_err(path: impl Into<String>, message: impl Into<String>) -> ImportError {
    ImportError::Schema {
        path: path.into(),
        message: message.into(),
    }
}

/// Parses `json` into a [`Netlist`].
///
/// See the module documentation for what this stage does and doesn't check.
pub fn from_json_str(json: &str) -> Result<Netlist, ImportError> {
    let root: Json = serde_json::from_str(json).map_err(ImportError::Syntax)?;
    let root_obj = as_object(&root, "netlist")?;

    let mut netlist = Netlist::new();

    let graphs = get_array(root_obj, "graphs", "netlist")?;
    for graph_json in graphs {
        load_graph(&mut netlist, graph_json)?;
    }

    if let Some(tops) = root_obj.get("tops") {
        let tops = as_array(tops, "netlist.tops")?;
        for (i, entry) in tops.iter().enumerate() {
            let name = as_str(entry, &format!("netlist.tops[{i}]"))?;
            if netlist.graph(name).is_none() {
                return Err(schema_err(
                    "netlist.tops",
                    format!("top module '{name}' is not a known graph"),
                ));
            }
            netlist.mark_top_module(name);
        }
    }

    Ok(netlist)
}

fn load_graph(netlist: &mut Netlist, graph_json: &Json) -> Result<(), ImportError> {
    let graph_obj = as_object(graph_json, "graph")?;
    let symbol = get_str(graph_obj, "symbol", "graph.symbol")?;
    let graph = netlist.create_graph(symbol);

    let mut value_by_symbol: HashMap<String, crate::ir::ValueId> = HashMap::new();
    let mut declared_inputs: HashSet<String> = HashSet::new();
    let mut declared_outputs: HashSet<String> = HashSet::new();
    let mut declared_inouts: HashSet<String> = HashSet::new();

    let vals = get_array(graph_obj, "vals", "graph")?;
    for (i, val_json) in vals.iter().enumerate() {
        let val_obj = as_object(val_json, &format!("graph.vals[{i}]"))?;
        let sym_text = get_str(val_obj, "sym", &format!("graph.vals[{i}].sym"))?;
        let width = get_i64(val_obj, "w", &format!("graph.vals[{i}].w"))?;
        let is_signed = get_bool(val_obj, "sgn", &format!("graph.vals[{i}].sgn"))?;
        let is_input = get_bool(val_obj, "in", &format!("graph.vals[{i}].in"))?;
        let is_output = get_bool(val_obj, "out", &format!("graph.vals[{i}].out"))?;
        let is_inout = match val_obj.get("inout") {
            Some(v) => as_bool(v, &format!("graph.vals[{i}].inout"))?,
            None => false,
        };

        if (is_input && is_output) || (is_inout && (is_input || is_output)) {
            return Err(schema_err(
                format!("graph.vals[{i}]"),
                "value cannot be marked input/output/inout in more than one way",
            ));
        }

        if value_by_symbol.contains_key(sym_text) {
            return Err(schema_err(
                format!("graph.vals[{i}].sym"),
                format!("duplicate value symbol '{sym_text}'"),
            ));
        }

        let sym = graph.intern_symbol(sym_text);
        let value_id = graph.create_value(sym, width as i32, is_signed);
        value_by_symbol.insert(sym_text.to_owned(), value_id);

        if is_input {
            declared_inputs.insert(sym_text.to_owned());
        }
        if is_output {
            declared_outputs.insert(sym_text.to_owned());
        }
        if is_inout {
            declared_inouts.insert(sym_text.to_owned());
        }

        if let Some(loc_json) = val_obj.get("loc") {
            if let Some(loc) = parse_src_loc(loc_json, &format!("graph.vals[{i}].loc"))? {
                graph.set_value_src_loc(value_id, loc);
            }
        }
    }

    let ports_json = graph_obj
        .get("ports")
        .ok_or_else(|| schema_err("graph", "missing ports object"))?;
    let ports_obj = as_object(ports_json, "graph.ports")?;

    for (key, is_input) in [("in", true), ("out", false)] {
        let Some(array_json) = ports_obj.get(key) else {
            continue;
        };
        let path = format!("graph.ports.{key}");
        let array = as_array(array_json, &path)?;
        for (i, entry) in array.iter().enumerate() {
            let port_obj = as_object(entry, &format!("{path}[{i}]"))?;
            let name = get_str(port_obj, "name", &format!("{path}[{i}].name"))?;
            let value_name = get_str(port_obj, "val", &format!("{path}[{i}].val"))?;
            let value_id = *value_by_symbol.get(value_name).ok_or_else(|| {
                schema_err(
                    format!("{path}[{i}].val"),
                    format!("port references unknown value '{value_name}'"),
                )
            })?;
            let port_sym = graph.intern_symbol(name);
            if is_input {
                graph.bind_input_port(port_sym, value_id);
            } else {
                graph.bind_output_port(port_sym, value_id);
            }
        }
    }

    if let Some(inout_json) = ports_obj.get("inout") {
        let array = as_array(inout_json, "graph.ports.inout")?;
        for (i, entry) in array.iter().enumerate() {
            let path = format!("graph.ports.inout[{i}]");
            let port_obj = as_object(entry, &path)?;
            let name = get_str(port_obj, "name", &format!("{path}.name"))?;
            let in_name = get_str(port_obj, "in", &format!("{path}.in"))?;
            let out_name = get_str(port_obj, "out", &format!("{path}.out"))?;
            let oe_name = get_str(port_obj, "oe", &format!("{path}.oe"))?;

            let resolve = |field: &str, name: &str| {
                value_by_symbol.get(name).copied().ok_or_else(|| {
                    schema_err(
                        format!("{path}.{field}"),
                        format!("inout port references unknown value '{name}'"),
                    )
                })
            };
            let in_id = resolve("in", in_name)?;
            let out_id = resolve("out", out_name)?;
            let oe_id = resolve("oe", oe_name)?;

            let port_sym = graph.intern_symbol(name);
            graph.bind_inout_port(port_sym, in_id, out_id, oe_id);
        }
    }

    check_direction_consistency(
        graph,
        &value_by_symbol,
        &declared_inputs,
        &declared_outputs,
        &declared_inouts,
    )?;

    if let Some(ops_json) = graph_obj.get("ops") {
        let ops = as_array(ops_json, "graph.ops")?;
        for (i, op_json) in ops.iter().enumerate() {
            load_operation(graph, &value_by_symbol, op_json, i)?;
        }
    }

    Ok(())
}

fn check_direction_consistency(
    graph: &crate::ir::Graph,
    value_by_symbol: &HashMap<String, crate::ir::ValueId>,
    declared_inputs: &HashSet<String>,
    declared_outputs: &HashSet<String>,
    declared_inouts: &HashSet<String>,
) -> Result<(), ImportError> {
    for port in graph.input_ports() {
        let value = graph.get_value(port.value);
        let sym_text = graph.symbol_text(value.symbol());
        if !declared_inputs.contains(sym_text) {
            return Err(schema_err(
                "graph.ports.in",
                format!("value '{sym_text}' is bound to an input port but not marked in=true"),
            ));
        }
    }
    for (sym_text, value_id) in value_by_symbol {
        if declared_inputs.contains(sym_text) && !graph.get_value(*value_id).is_input() {
            return Err(schema_err(
                "graph.vals",
                format!("value '{sym_text}' marked in=true but not bound to an input port"),
            ));
        }
    }

    for port in graph.output_ports() {
        let value = graph.get_value(port.value);
        let sym_text = graph.symbol_text(value.symbol());
        if !declared_outputs.contains(sym_text) {
            return Err(schema_err(
                "graph.ports.out",
                format!("value '{sym_text}' is bound to an output port but not marked out=true"),
            ));
        }
    }
    for (sym_text, value_id) in value_by_symbol {
        if declared_outputs.contains(sym_text) && !graph.get_value(*value_id).is_output() {
            return Err(schema_err(
                "graph.vals",
                format!("value '{sym_text}' marked out=true but not bound to an output port"),
            ));
        }
    }

    for port in graph.inout_ports() {
        for leg in [port.inp, port.out, port.oe] {
            let value = graph.get_value(leg);
            if value.is_input() || value.is_output() {
                return Err(schema_err(
                    "graph.ports.inout",
                    "inout port values must not be marked as input/output",
                ));
            }
            if !value.is_inout() {
                return Err(schema_err(
                    "graph.ports.inout",
                    "inout port values must be marked as inout",
                ));
            }
        }
    }
    for (sym_text, value_id) in value_by_symbol {
        if !declared_inouts.contains(sym_text) {
            continue;
        }
        let seen = graph
            .inout_ports()
            .iter()
            .any(|port| port.inp == *value_id || port.out == *value_id || port.oe == *value_id);
        if !seen {
            return Err(schema_err(
                "graph.vals",
                format!("value '{sym_text}' marked inout=true but not bound to an inout port"),
            ));
        }
    }

    Ok(())
}

fn load_operation(
    graph: &mut crate::ir::Graph,
    value_by_symbol: &HashMap<String, crate::ir::ValueId>,
    op_json: &Json,
    index: usize,
) -> Result<(), ImportError> {
    let path = format!("graph.ops[{index}]");
    let op_obj = as_object(op_json, &path)?;

    let kind_text = get_str(op_obj, "kind", &format!("{path}.kind"))?;
    let kind = OperationKind::parse(kind_text)
        .ok_or_else(|| schema_err(format!("{path}.kind"), format!("unknown operation kind '{kind_text}'")))?;

    let sym_text = get_str(op_obj, "sym", &format!("{path}.sym"))?;
    if graph.find_symbol(sym_text).and_then(|s| graph.find_operation(s)).is_some() {
        return Err(schema_err(
            format!("{path}.sym"),
            format!("duplicate operation symbol '{sym_text}'"),
        ));
    }
    let op_sym = graph.intern_symbol(sym_text);
    let op_id = graph.create_operation(kind, op_sym);

    if let Some(operands_json) = op_obj.get("in") {
        let operands = as_array(operands_json, &format!("{path}.in"))?;
        for (i, entry) in operands.iter().enumerate() {
            let name = as_str(entry, &format!("{path}.in[{i}]"))?;
            let value_id = *value_by_symbol.get(name).ok_or_else(|| {
                schema_err(format!("{path}.in[{i}]"), format!("operand references unknown value '{name}'"))
            })?;
            graph.add_operand(op_id, value_id);
        }
    }

    if let Some(results_json) = op_obj.get("out") {
        let results = as_array(results_json, &format!("{path}.out"))?;
        for (i, entry) in results.iter().enumerate() {
            let name = as_str(entry, &format!("{path}.out[{i}]"))?;
            let value_id = *value_by_symbol.get(name).ok_or_else(|| {
                schema_err(format!("{path}.out[{i}]"), format!("result references unknown value '{name}'"))
            })?;
            if graph.get_value(value_id).defining_op().is_some() {
                return Err(schema_err(
                    format!("{path}.out[{i}]"),
                    "value already driven by another operation",
                ));
            }
            graph.add_result(op_id, value_id);
        }
    }

    if let Some(attrs_json) = op_obj.get("attrs") {
        let attrs_obj = as_object(attrs_json, &format!("{path}.attrs"))?;
        for (name, attr_json) in attrs_obj {
            let value = parse_attribute_value(attr_json, &format!("{path}.attrs.{name}"))?;
            graph.set_attr(op_id, name.clone(), value);
        }
    }

    if let Some(loc_json) = op_obj.get("loc") {
        if let Some(loc) = parse_src_loc(loc_json, &format!("{path}.loc"))? {
            graph.set_op_src_loc(op_id, loc);
        }
    }

    Ok(())
}

fn parse_attribute_kind(text: &str, path: &str) -> Result<crate::ir::AttributeKind, ImportError> {
    use crate::ir::AttributeKind::*;
    match text {
        "bool" => Ok(Bool),
        "int" => Ok(Int),
        "double" => Ok(Double),
        "string" | "str" => Ok(String),
        "bool_array" | "bool[]" => Ok(BoolArray),
        "int_array" | "int[]" => Ok(IntArray),
        "double_array" | "double[]" => Ok(DoubleArray),
        "string_array" | "string[]" => Ok(StringArray),
        other => Err(schema_err(path.to_owned(), format!("unknown attribute kind '{other}'"))),
    }
}

fn parse_attribute_value(attr_json: &Json, path: &str) -> Result<AttributeValue, ImportError> {
    let obj = as_object(attr_json, path)?;

    let (kind_field, kind_text) = ["t", "k", "kind"]
        .iter()
        .find_map(|&field| obj.get(field).map(|v| (field, v)))
        .ok_or_else(|| schema_err(path.to_owned(), "attribute object missing kind"))?;
    let kind_text = as_str(kind_text, &format!("{path}.{kind_field}"))?;
    let kind = parse_attribute_kind(kind_text, &format!("{path}.{kind_field}"))?;

    let scalar = ["v", "value"].iter().find_map(|&field| obj.get(field));
    let array = ["vs", "values"].iter().find_map(|&field| obj.get(field));

    use crate::ir::AttributeKind as K;
    let value = match kind {
        K::Bool => AttributeValue::Bool(as_bool(
            scalar.ok_or_else(|| schema_err(path.to_owned(), "bool attribute missing value"))?,
            &format!("{path}.v"),
        )?),
        K::Int => AttributeValue::Int(as_i64(
            scalar.ok_or_else(|| schema_err(path.to_owned(), "int attribute missing value"))?,
            &format!("{path}.v"),
        )?),
        K::Double => AttributeValue::Double(as_f64(
            scalar.ok_or_else(|| schema_err(path.to_owned(), "double attribute missing value"))?,
            &format!("{path}.v"),
        )?),
        K::String => AttributeValue::String(
            as_str(
                scalar.ok_or_else(|| schema_err(path.to_owned(), "string attribute missing value"))?,
                &format!("{path}.v"),
            )?
            .to_owned(),
        ),
        K::BoolArray => {
            let array = array.ok_or_else(|| schema_err(path.to_owned(), "bool array attribute missing values"))?;
            let array = as_array(array, &format!("{path}.vs"))?;
            let mut out = Vec::with_capacity(array.len());
            for (i, entry) in array.iter().enumerate() {
                out.push(as_bool(entry, &format!("{path}.vs[{i}]"))?);
            }
            AttributeValue::BoolArray(out)
        }
        K::IntArray => {
            let array = array.ok_or_else(|| schema_err(path.to_owned(), "int array attribute missing values"))?;
            let array = as_array(array, &format!("{path}.vs"))?;
            let mut out = Vec::with_capacity(array.len());
            for (i, entry) in array.iter().enumerate() {
                out.push(as_i64(entry, &format!("{path}.vs[{i}]"))?);
            }
            AttributeValue::IntArray(out)
        }
        K::DoubleArray => {
            let array = array.ok_or_else(|| schema_err(path.to_owned(), "double array attribute missing values"))?;
            let array = as_array(array, &format!("{path}.vs"))?;
            let mut out = Vec::with_capacity(array.len());
            for (i, entry) in array.iter().enumerate() {
                out.push(as_f64(entry, &format!("{path}.vs[{i}]"))?);
            }
            AttributeValue::DoubleArray(out)
        }
        K::StringArray => {
            let array = array.ok_or_else(|| schema_err(path.to_owned(), "string array attribute missing values"))?;
            let array = as_array(array, &format!("{path}.vs"))?;
            let mut out = Vec::with_capacity(array.len());
            for (i, entry) in array.iter().enumerate() {
                out.push(as_str(entry, &format!("{path}.vs[{i}]"))?.to_owned());
            }
            AttributeValue::StringArray(out)
        }
    };

    if !value.is_json_serializable() {
        return Err(schema_err(path.to_owned(), "attribute value is not JSON serializable"));
    }
    Ok(value)
}

fn parse_src_loc(json: &Json, path: &str) -> Result<Option<SourceLocation>, ImportError> {
    let obj = as_object(json, path)?;
    let mut loc = SourceLocation::default();

    if let Some(v) = obj.get("file") {
        loc.file = as_str(v, &format!("{path}.file"))?.to_owned();
    }
    if let Some(v) = obj.get("line") {
        loc.line = as_i64(v, &format!("{path}.line"))? as u32;
    }
    if let Some(v) = obj.get("col") {
        loc.column = as_i64(v, &format!("{path}.col"))? as u32;
    }
    if let Some(v) = obj.get("endLine") {
        loc.end_line = as_i64(v, &format!("{path}.endLine"))? as u32;
    }
    if let Some(v) = obj.get("endCol") {
        loc.end_column = as_i64(v, &format!("{path}.endCol"))? as u32;
    }

    if loc.is_unknown() {
        Ok(None)
    } else {
        Ok(Some(loc))
    }
}

// -- JSON value helpers ---------------------------------------------------

fn as_object<'a>(json: &'a Json, path: &str) -> Result<&'a serde_json::Map<String, Json>, ImportError> {
    json.as_object()
        .ok_or_else(|| schema_err(path.to_owned(), "expected an object"))
}

fn as_array<'a>(json: &'a Json, path: &str) -> Result<&'a Vec<Json>, ImportError> {
    json.as_array().ok_or_else(|| schema_err(path.to_owned(), "expected an array"))
}

fn as_str<'a>(json: &'a Json, path: &str) -> Result<&'a str, ImportError> {
    json.as_str().ok_or_else(|| schema_err(path.to_owned(), "expected a string"))
}

fn as_bool(json: &Json, path: &str) -> Result<bool, ImportError> {
    json.as_bool().ok_or_else(|| schema_err(path.to_owned(), "expected a bool"))
}

fn as_i64(json: &Json, path: &str) -> Result<i64, ImportError> {
    if let Some(i) = json.as_i64() {
        return Ok(i);
    }
    if let Some(u) = json.as_u64() {
        return Ok(u as i64);
    }
    if let Some(f) = json.as_f64() {
        if f.fract() == 0.0 {
            return Ok(f as i64);
        }
        return Err(schema_err(path.to_owned(), "expected integer number"));
    }
    Err(schema_err(path.to_owned(), "expected an integer"))
}

fn as_f64(json: &Json, path: &str) -> Result<f64, ImportError> {
    json.as_f64().ok_or_else(|| schema_err(path.to_owned(), "expected a number"))
}

fn get_array<'a>(obj: &'a serde_json::Map<String, Json>, key: &str, path: &str) -> Result<&'a Vec<Json>, ImportError> {
    let field = obj
        .get(key)
        .ok_or_else(|| schema_err(path.to_owned(), format!("missing '{key}' array")))?;
    as_array(field, &format!("{path}.{key}"))
}

fn get_str<'a>(obj: &'a serde_json::Map<String, Json>, key: &str, path: &str) -> Result<&'a str, ImportError> {
    let field = obj
        .get(key)
        .ok_or_else(|| schema_err(path.to_owned(), format!("missing '{key}' field")))?;
    as_str(field, path)
}

fn get_bool(obj: &serde_json::Map<String, Json>, key: &str, path: &str) -> Result<bool, ImportError> {
    let field = obj
        .get(key)
        .ok_or_else(|| schema_err(path.to_owned(), format!("missing '{key}' field")))?;
    as_bool(field, path)
}

fn get_i64(obj: &serde_json::Map<String, Json>, key: &str, path: &str) -> Result<i64, ImportError> {
    let field = obj
        .get(key)
        .ok_or_else(|| schema_err(path.to_owned(), format!("missing '{key}' field")))?;
    as_i64(field, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_adder_json() -> &'static str {
        r#"{
            "graphs": [
                {
                    "symbol": "adder",
                    "vals": [
                        {"sym": "a", "w": 8, "sgn": false, "in": true, "out": false},
                        {"sym": "b", "w": 8, "sgn": false, "in": true, "out": false},
                        {"sym": "sum", "w": 8, "sgn": false, "in": false, "out": true}
                    ],
                    "ports": {
                        "in": [
                            {"name": "a", "val": "a"},
                            {"name": "b", "val": "b"}
                        ],
                        "out": [
                            {"name": "sum", "val": "sum"}
                        ]
                    },
                    "ops": [
                        {
                            "kind": "add",
                            "sym": "add0",
                            "in": ["a", "b"],
                            "out": ["sum"]
                        }
                    ]
                }
            ],
            "tops": ["adder"]
        }"#
    }

    #[test]
    fn loads_a_minimal_well_formed_graph() {
        let netlist = from_json_str(minimal_adder_json()).unwrap();
        assert_eq!(netlist.len(), 1);
        assert!(netlist.is_top_module("adder"));
        let graph = netlist.graph("adder").unwrap();
        assert_eq!(graph.input_ports().len(), 2);
        assert_eq!(graph.output_ports().len(), 1);
        let add_sym = graph.find_symbol("add0").unwrap();
        let add_id = graph.find_operation(add_sym).unwrap();
        assert_eq!(graph.get_operation(add_id).kind(), OperationKind::Add);
    }

    #[test]
    fn rejects_trailing_garbage() {
        let json = format!("{} garbage", minimal_adder_json());
        assert!(matches!(from_json_str(&json), Err(ImportError::Syntax(_))));
    }

    #[test]
    fn rejects_missing_graphs_field() {
        let err = from_json_str("{}").unwrap_err();
        assert!(matches!(err, ImportError::Schema { .. }));
    }

    #[test]
    fn rejects_value_marked_both_input_and_output() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "a", "w": 1, "sgn": false, "in": true, "out": true}],
                "ports": {}
            }]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_port_referencing_unknown_value() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [],
                "ports": {"in": [{"name": "a", "val": "ghost"}]}
            }]
        }"#;
        let err = from_json_str(json).unwrap_err();
        match err {
            ImportError::Schema { path, .. } => assert!(path.contains("val")),
            _ => panic!("expected schema error"),
        }
    }

    #[test]
    fn rejects_value_marked_input_but_not_bound_to_a_port() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "a", "w": 1, "sgn": false, "in": true, "out": false}],
                "ports": {}
            }]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_graph_missing_ports_object() {
        let json = r#"{
            "graphs": [{"symbol": "g", "vals": []}]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_non_finite_double_attribute() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [],
                "ports": {},
                "ops": [{
                    "kind": "constant",
                    "sym": "c0",
                    "attrs": {"constValue": {"t": "double", "v": 1e400}}
                }]
            }]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_integer_field_carrying_a_fraction() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "a", "w": 1.5, "sgn": false, "in": false, "out": false}],
                "ports": {}
            }]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn accepts_attribute_kind_aliases() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [],
                "ports": {},
                "ops": [{
                    "kind": "display",
                    "sym": "d0",
                    "attrs": {
                        "formatString": {"k": "str", "value": "hello"},
                        "argNames": {"kind": "string_array", "values": []}
                    }
                }]
            }]
        }"#;
        let netlist = from_json_str(json).unwrap();
        let graph = netlist.graph("g").unwrap();
        let op_sym = graph.find_symbol("d0").unwrap();
        let op_id = graph.find_operation(op_sym).unwrap();
        let op = graph.get_operation(op_id);
        assert_eq!(
            op.attr("formatString"),
            Some(&AttributeValue::String("hello".into()))
        );
        assert_eq!(op.attr("argNames"), Some(&AttributeValue::StringArray(vec![])));
    }

    #[test]
    fn parses_source_locations() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "a", "w": 1, "sgn": false, "in": false, "out": false,
                          "loc": {"file": "x.sv", "line": 4, "col": 2}}],
                "ports": {}
            }]
        }"#;
        let netlist = from_json_str(json).unwrap();
        let graph = netlist.graph("g").unwrap();
        let sym = graph.find_symbol("a").unwrap();
        let value_id = graph.find_value(sym).unwrap();
        let loc = graph.get_value(value_id).src_loc().unwrap();
        assert_eq!(loc.file, "x.sv");
        assert_eq!(loc.line, 4);
    }

    #[test]
    fn an_absent_loc_object_is_not_recorded_when_empty() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "a", "w": 1, "sgn": false, "in": false, "out": false, "loc": {}}],
                "ports": {}
            }]
        }"#;
        let netlist = from_json_str(json).unwrap();
        let graph = netlist.graph("g").unwrap();
        let sym = graph.find_symbol("a").unwrap();
        let value_id = graph.find_value(sym).unwrap();
        assert!(graph.get_value(value_id).src_loc().is_none());
    }

    #[test]
    fn rejects_top_naming_an_unknown_graph() {
        let json = r#"{"graphs": [], "tops": ["ghost"]}"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_duplicate_operation_symbols() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [],
                "ports": {},
                "ops": [
                    {"kind": "not", "sym": "n0"},
                    {"kind": "not", "sym": "n0"}
                ]
            }]
        }"#;
        assert!(from_json_str(json).is_err());
    }

    #[test]
    fn rejects_two_operations_driving_the_same_value() {
        let json = r#"{
            "graphs": [{
                "symbol": "g",
                "vals": [{"sym": "x", "w": 1, "sgn": false, "in": false, "out": false}],
                "ports": {},
                "ops": [
                    {"kind": "not", "sym": "n0", "out": ["x"]},
                    {"kind": "not", "sym": "n1", "out": ["x"]}
                ]
            }]
        }"#;
        let err = from_json_str(json).unwrap_err();
        match err {
            ImportError::Schema { path, .. } => assert!(path.contains("out")),
            ImportError::Syntax(_) => panic!("expected a schema error, not a crash"),
        }
    }
}
