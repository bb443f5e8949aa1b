//! A single module's IR body: the value/operation entity store plus port
//! bindings, exposed through a typed construction and query façade.

use slotmap::SlotMap;

use super::attribute::AttributeValue;
use super::operation::Operation;
use super::port::{InoutPort, InputPort, OutputPort};
use super::srcloc::SourceLocation;
use super::value::{OperationId, Value, ValueId, ValueUser};
use crate::schema::OperationKind;
use crate::symbol::{SymbolId, SymbolTable};

/// One module's dataflow graph: values, operations, and the three port
/// collections at the module boundary.
///
/// `Graph` exclusively owns its values and operations (§3's ownership
/// invariant): dropping a `Graph` drops all of its entities.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    symbols: SymbolTable,
    values: SlotMap<ValueId, Value>,
    value_by_symbol: std::collections::HashMap<SymbolId, ValueId>,
    operations: SlotMap<OperationId, Operation>,
    operation_by_symbol: std::collections::HashMap<SymbolId, OperationId>,
    operation_order: Vec<OperationId>,
    input_ports: Vec<InputPort>,
    output_ports: Vec<OutputPort>,
    inout_ports: Vec<InoutPort>,
}

impl Graph {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: SymbolTable::new(),
            values: SlotMap::with_key(),
            value_by_symbol: Default::default(),
            operations: SlotMap::with_key(),
            operation_by_symbol: Default::default(),
            operation_order: Vec::new(),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            inout_ports: Vec::new(),
        }
    }

    /// This graph's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -- Symbols -----------------------------------------------------

    /// Interns `text` into this graph's symbol table.
    pub fn intern_symbol(&mut self, text: impl Into<String>) -> SymbolId {
        self.symbols.intern(text)
    }

    /// Looks up a previously-interned symbol without interning it.
    pub fn find_symbol(&self, text: &str) -> Option<SymbolId> {
        self.symbols.find(text)
    }

    /// Resolves a symbol id back to its text.
    pub fn symbol_text(&self, id: SymbolId) -> &str {
        self.symbols.text(id)
    }

    // -- Values --------------------------------------------------------

    /// Creates a new value named `sym` with the given width and signedness.
    ///
    /// # Panics
    /// Panics if `sym` already names a value in this graph, or if `width` is
    /// negative — both are programmer errors per §7's taxonomy.
    pub fn create_value(&mut self, sym: SymbolId, width: i32, is_signed: bool) -> ValueId {
        assert!(
            !self.value_by_symbol.contains_key(&sym),
            "symbol '{}' already names a value in graph '{}'",
            self.symbols.text(sym),
            self.name
        );
        let id = self.values.insert(Value::new(sym, width, is_signed));
        self.value_by_symbol.insert(sym, id);
        id
    }

    /// Looks up the id of the value named `sym`, if any.
    pub fn find_value(&self, sym: SymbolId) -> Option<ValueId> {
        self.value_by_symbol.get(&sym).copied()
    }

    /// Resolves a value id to its data.
    ///
    /// # Panics
    /// Panics if `id` does not name a value owned by this graph.
    pub fn get_value(&self, id: ValueId) -> &Value {
        self.values
            .get(id)
            .unwrap_or_else(|| panic!("value id {id:?} not owned by graph '{}'", self.name))
    }

    /// All (symbol, value) pairs owned by this graph, in arbitrary order.
    pub fn values(&self) -> impl Iterator<Item = (ValueId, &Value)> {
        self.values.iter()
    }

    /// Mutable access to a value's stored user list, for the verifier's
    /// cache-repair step. Not exposed for general mutation: callers outside
    /// the verifier should go through [`Graph::add_operand`]/[`Graph::erase_op`].
    ///
    /// # Panics
    /// Panics if `id` does not name a value owned by this graph.
    pub fn value_users_mut(&mut self, id: ValueId) -> &mut Vec<ValueUser> {
        self.values
            .get_mut(id)
            .unwrap_or_else(|| panic!("value id {id:?} not owned by graph '{}'", self.name))
            .users_mut()
    }

    // -- Operations ------------------------------------------------------

    /// Creates a new operation of `kind` named `sym`, appended to the
    /// insertion-ordered operation list.
    ///
    /// # Panics
    /// Panics if `sym` already names an operation in this graph.
    pub fn create_operation(&mut self, kind: OperationKind, sym: SymbolId) -> OperationId {
        assert!(
            !self.operation_by_symbol.contains_key(&sym),
            "symbol '{}' already names an operation in graph '{}'",
            self.symbols.text(sym),
            self.name
        );
        let id = self.operations.insert(Operation::new(kind, sym));
        self.operation_by_symbol.insert(sym, id);
        self.operation_order.push(id);
        id
    }

    /// Looks up the id of the operation named `sym`, if any.
    pub fn find_operation(&self, sym: SymbolId) -> Option<OperationId> {
        self.operation_by_symbol.get(&sym).copied()
    }

    /// Resolves an operation id to its data.
    ///
    /// # Panics
    /// Panics if `id` does not name an operation owned by this graph.
    pub fn get_operation(&self, id: OperationId) -> &Operation {
        self.operations
            .get(id)
            .unwrap_or_else(|| panic!("operation id {id:?} not owned by graph '{}'", self.name))
    }

    /// Resolves an operation id to its data, or `None` if `id` does not (or
    /// no longer) name an operation in this graph. Unlike [`Graph::get_operation`]
    /// this never panics — used by the verifier to check a stale reference
    /// without assuming it still resolves.
    pub fn operation_by_id(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id)
    }

    /// The canonical, insertion-ordered list of operation ids. Deterministic
    /// passes must iterate operations in this order.
    pub fn operation_order(&self) -> &[OperationId] {
        &self.operation_order
    }

    /// Appends `value_id` to `op_id`'s operand list, recording a matching
    /// user entry on the value.
    pub fn add_operand(&mut self, op_id: OperationId, value_id: ValueId) {
        let index = self.get_operation(op_id).operands().len();
        self.operations
            .get_mut(op_id)
            .expect("operand added to operation not owned by this graph")
            .operands_mut()
            .push(value_id);
        self.values
            .get_mut(value_id)
            .expect("operand value not owned by this graph")
            .users_mut()
            .push(ValueUser {
                operation: op_id,
                operand_index: index,
            });
    }

    /// Appends `value_id` to `op_id`'s result list, marking the value as
    /// defined by this operation.
    ///
    /// # Panics
    /// Panics if `value_id` is already the result of another operation
    /// (§3's result-uniqueness invariant).
    pub fn add_result(&mut self, op_id: OperationId, value_id: ValueId) {
        {
            let value = self
                .values
                .get(value_id)
                .expect("result value not owned by this graph");
            assert!(
                value.defining_op().is_none(),
                "value already defined by another operation"
            );
        }
        self.operations
            .get_mut(op_id)
            .expect("result added to operation not owned by this graph")
            .results_mut()
            .push(value_id);
        self.values
            .get_mut(value_id)
            .unwrap()
            .set_defining_op(Some(op_id));
    }

    /// Replaces `op_id`'s result at `index` with `new_value_id`: the old
    /// value is no longer considered defined by `op_id`, and `new_value_id`
    /// becomes its replacement.
    ///
    /// The caller is responsible for ensuring no other operation already
    /// defines `new_value_id`.
    pub fn replace_result(&mut self, op_id: OperationId, index: usize, new_value_id: ValueId) {
        let old_value_id = {
            let op = self
                .operations
                .get(op_id)
                .expect("replace_result on operation not owned by this graph");
            *op.results()
                .get(index)
                .expect("replace_result index out of range")
        };
        if let Some(old_value) = self.values.get_mut(old_value_id) {
            old_value.set_defining_op(None);
        }
        self.operations.get_mut(op_id).unwrap().results_mut()[index] = new_value_id;
        self.values
            .get_mut(new_value_id)
            .expect("new result value not owned by this graph")
            .set_defining_op(Some(op_id));
    }

    /// Removes `op_id` from the graph, detaching it from the user lists of
    /// its own operands and clearing the defining-op link on its own
    /// results.
    ///
    /// Returns `false` (refusing to erase) if any of `op_id`'s result values
    /// still have other consumers — erasing it would silently orphan them.
    /// Callers must detach or replace those consumers first (e.g. via
    /// [`Graph::replace_result`] on the new producer).
    pub fn erase_op(&mut self, op_id: OperationId) -> bool {
        let Some(op) = self.operations.get(op_id) else {
            return false;
        };
        for &result in op.results() {
            if let Some(value) = self.values.get(result) {
                if !value.users().is_empty() {
                    return false;
                }
            }
        }

        let operands = op.operands().to_vec();
        let results = op.results().to_vec();

        for operand in operands {
            if let Some(value) = self.values.get_mut(operand) {
                value.users_mut().retain(|user| user.operation != op_id);
            }
        }
        for result in results {
            if let Some(value) = self.values.get_mut(result) {
                value.set_defining_op(None);
            }
        }

        let symbol = op.symbol();
        self.operations.remove(op_id);
        self.operation_by_symbol.remove(&symbol);
        self.operation_order.retain(|&id| id != op_id);
        true
    }

    /// Inserts or replaces attribute `name` on `op_id`.
    pub fn set_attr(&mut self, op_id: OperationId, name: impl Into<String>, value: AttributeValue) {
        self.operations
            .get_mut(op_id)
            .expect("set_attr on operation not owned by this graph")
            .set_attr(name, value);
    }

    /// Removes attribute `name` from `op_id`, returning its prior value.
    pub fn remove_attr(&mut self, op_id: OperationId, name: &str) -> Option<AttributeValue> {
        self.operations
            .get_mut(op_id)
            .expect("remove_attr on operation not owned by this graph")
            .remove_attr(name)
    }

    /// Records a source location for `value_id`.
    pub fn set_value_src_loc(&mut self, value_id: ValueId, loc: SourceLocation) {
        self.values
            .get_mut(value_id)
            .expect("set_value_src_loc on value not owned by this graph")
            .set_src_loc(loc);
    }

    /// Records a source location for `op_id`.
    pub fn set_op_src_loc(&mut self, op_id: OperationId, loc: SourceLocation) {
        self.operations
            .get_mut(op_id)
            .expect("set_op_src_loc on operation not owned by this graph")
            .set_src_loc(loc);
    }

    // -- Ports -----------------------------------------------------------

    /// Binds `name` as an input port driving `value`, setting `isInput`.
    ///
    /// # Panics
    /// Panics if `value` is already bound to any port (double-binding).
    pub fn bind_input_port(&mut self, name: SymbolId, value: ValueId) {
        self.assert_unbound(value);
        self.values
            .get_mut(value)
            .expect("bind_input_port on value not owned by this graph")
            .direction_mut()
            .is_input = true;
        self.input_ports.push(InputPort { name, value });
    }

    /// Binds `name` as an output port driven by `value`, setting `isOutput`.
    ///
    /// # Panics
    /// Panics if `value` is already bound to any port (double-binding).
    pub fn bind_output_port(&mut self, name: SymbolId, value: ValueId) {
        self.assert_unbound(value);
        self.values
            .get_mut(value)
            .expect("bind_output_port on value not owned by this graph")
            .direction_mut()
            .is_output = true;
        self.output_ports.push(OutputPort { name, value });
    }

    /// Binds `name` as an inout port with legs `inp`/`out`/`oe`, setting
    /// `isInout` on all three values.
    ///
    /// # Panics
    /// Panics if any of the three values is already bound to any port.
    pub fn bind_inout_port(&mut self, name: SymbolId, inp: ValueId, out: ValueId, oe: ValueId) {
        for value in [inp, out, oe] {
            self.assert_unbound(value);
        }
        for value in [inp, out, oe] {
            self.values
                .get_mut(value)
                .expect("bind_inout_port on value not owned by this graph")
                .direction_mut()
                .is_inout = true;
        }
        self.inout_ports.push(InoutPort {
            name,
            inp,
            out,
            oe,
        });
    }

    fn assert_unbound(&self, value: ValueId) {
        let direction = self.get_value(value).direction();
        assert!(
            !direction.is_input && !direction.is_output && !direction.is_inout,
            "value already bound to a port"
        );
    }

    /// Declared input ports, in binding order.
    pub fn input_ports(&self) -> &[InputPort] {
        &self.input_ports
    }

    /// Declared output ports, in binding order.
    pub fn output_ports(&self) -> &[OutputPort] {
        &self.output_ports
    }

    /// Declared inout ports, in binding order.
    pub fn inout_ports(&self) -> &[InoutPort] {
        &self.inout_ports
    }
}
