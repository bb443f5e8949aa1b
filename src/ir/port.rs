//! Externally visible bindings between a graph's boundary names and its
//! internal values.

use super::value::ValueId;
use crate::symbol::SymbolId;

/// A single-value input port: external name plus the internal value it
/// drives. The bound value's `isInput` flag must be set.
#[derive(Debug, Copy, Clone)]
pub struct InputPort {
    /// External-facing name.
    pub name: SymbolId,
    /// Internal value bound to this port.
    pub value: ValueId,
}

/// A single-value output port: external name plus the internal value that
/// drives it. The bound value's `isOutput` flag must be set.
#[derive(Debug, Copy, Clone)]
pub struct OutputPort {
    /// External-facing name.
    pub name: SymbolId,
    /// Internal value bound to this port.
    pub value: ValueId,
}

/// A three-value bidirectional port: `in` carries external-to-internal
/// traffic, `out` internal-to-external, `oe` the output-enable. All three
/// bound values must have `isInout` set and no other direction flag.
#[derive(Debug, Copy, Clone)]
pub struct InoutPort {
    /// External-facing name.
    pub name: SymbolId,
    /// External-to-internal value.
    pub inp: ValueId,
    /// Internal-to-external value.
    pub out: ValueId,
    /// Output-enable value.
    pub oe: ValueId,
}
