//! Operations: hardware operator instances with operands, results and
//! attributes.

use std::collections::HashMap;

use super::attribute::AttributeValue;
use super::srcloc::SourceLocation;
use super::value::ValueId;
use crate::schema::OperationKind;
use crate::symbol::SymbolId;

/// A single hardware operator instance within a [`Graph`](super::graph::Graph).
#[derive(Debug, Clone)]
pub struct Operation {
    kind: OperationKind,
    symbol: SymbolId,
    operands: Vec<ValueId>,
    results: Vec<ValueId>,
    attrs: HashMap<String, AttributeValue>,
    src_loc: Option<SourceLocation>,
}

impl Operation {
    pub(super) fn new(kind: OperationKind, symbol: SymbolId) -> Self {
        Self {
            kind,
            symbol,
            operands: Vec::new(),
            results: Vec::new(),
            attrs: HashMap::new(),
            src_loc: None,
        }
    }

    /// The operator kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// This operation's unique name within its owning graph.
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Ordered operand value ids.
    pub fn operands(&self) -> &[ValueId] {
        &self.operands
    }

    pub(super) fn operands_mut(&mut self) -> &mut Vec<ValueId> {
        &mut self.operands
    }

    /// Ordered result value ids.
    pub fn results(&self) -> &[ValueId] {
        &self.results
    }

    pub(super) fn results_mut(&mut self) -> &mut Vec<ValueId> {
        &mut self.results
    }

    /// This operation's attribute map.
    pub fn attrs(&self) -> &HashMap<String, AttributeValue> {
        &self.attrs
    }

    /// Looks up a single attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttributeValue> {
        self.attrs.get(name)
    }

    pub(super) fn set_attr(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attrs.insert(name.into(), value);
    }

    pub(super) fn remove_attr(&mut self, name: &str) -> Option<AttributeValue> {
        self.attrs.remove(name)
    }

    /// Optional declared source location.
    pub fn src_loc(&self) -> Option<&SourceLocation> {
        self.src_loc.as_ref()
    }

    pub(super) fn set_src_loc(&mut self, loc: SourceLocation) {
        self.src_loc = Some(loc);
    }
}
