//! Values (wires/signals) and their def-use back-references.

use slotmap::new_key_type;

use super::srcloc::SourceLocation;
use crate::symbol::SymbolId;

new_key_type! {
    /// Dense, per-graph identifier for a [`Value`], stable for the life of
    /// the owning [`Graph`](super::graph::Graph).
    pub struct ValueId;
}

new_key_type! {
    /// Dense, per-graph identifier for an [`Operation`](super::operation::Operation).
    pub struct OperationId;
}

/// A back-reference recorded on a [`Value`] naming one operand occurrence
/// that consumes it.
///
/// A value referenced twice by the same operation (e.g. `add(x, x)`) yields
/// two distinct `ValueUser` entries, one per operand index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueUser {
    /// The operation that consumes this value.
    pub operation: OperationId,
    /// The zero-based index into that operation's operand list.
    pub operand_index: usize,
}

/// Which single direction flag (if any) is set on a value bound to a port.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Direction {
    /// Bound to an [`InputPort`](super::port::InputPort).
    pub is_input: bool,
    /// Bound to an [`OutputPort`](super::port::OutputPort).
    pub is_output: bool,
    /// Bound to one leg of an [`InoutPort`](super::port::InoutPort).
    pub is_inout: bool,
}

impl Direction {
    /// Returns `true` if at most one of the three flags is set, i.e. the
    /// direction is well-formed per §3's invariant.
    pub fn is_well_formed(&self) -> bool {
        [self.is_input, self.is_output, self.is_inout]
            .iter()
            .filter(|b| **b)
            .count()
            <= 1
    }
}

/// A wire or signal: a typed, named dataflow value with def-use links.
#[derive(Debug, Clone)]
pub struct Value {
    symbol: SymbolId,
    width: i32,
    is_signed: bool,
    direction: Direction,
    src_loc: Option<SourceLocation>,
    defining_op: Option<OperationId>,
    users: Vec<ValueUser>,
}

impl Value {
    pub(super) fn new(symbol: SymbolId, width: i32, is_signed: bool) -> Self {
        assert!(width >= 0, "value width must be non-negative, got {width}");
        Self {
            symbol,
            width,
            is_signed,
            direction: Direction::default(),
            src_loc: None,
            defining_op: None,
            users: Vec::new(),
        }
    }

    /// This value's name within its owning graph.
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Bit width. Always `>= 0`.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Whether this value is interpreted as a signed quantity.
    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    /// Current port-direction flags.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Shorthand for `direction().is_input`.
    pub fn is_input(&self) -> bool {
        self.direction.is_input
    }

    /// Shorthand for `direction().is_output`.
    pub fn is_output(&self) -> bool {
        self.direction.is_output
    }

    /// Shorthand for `direction().is_inout`.
    pub fn is_inout(&self) -> bool {
        self.direction.is_inout
    }

    pub(super) fn direction_mut(&mut self) -> &mut Direction {
        &mut self.direction
    }

    /// Optional declared source location.
    pub fn src_loc(&self) -> Option<&SourceLocation> {
        self.src_loc.as_ref()
    }

    pub(super) fn set_src_loc(&mut self, loc: SourceLocation) {
        self.src_loc = Some(loc);
    }

    /// The operation whose result list contains this value, if any.
    pub fn defining_op(&self) -> Option<OperationId> {
        self.defining_op
    }

    pub(super) fn set_defining_op(&mut self, op: Option<OperationId>) {
        self.defining_op = op;
    }

    /// The list of operand occurrences across the graph that consume this
    /// value.
    pub fn users(&self) -> &[ValueUser] {
        &self.users
    }

    pub(super) fn users_mut(&mut self) -> &mut Vec<ValueUser> {
        &mut self.users
    }
}
