//! GRH: Graph Representation of Hardware.
//!
//! A mid-level IR for synthesizable digital hardware — combinational gates,
//! registers, memories, module instances and simulation constructs — modeled
//! as a set of named graphs, each a dataflow of typed [`Value`](ir::Value)s
//! produced and consumed by [`Operation`](ir::Operation)s, with named ports
//! at the graph boundary.
//!
//! Around the IR sits a [`pass`] framework: a [`pass::PassManager`] runs an
//! ordered sequence of passes against a [`ir::Netlist`], each recording
//! findings into a [`diagnostic::Diagnostics`] channel. [`pass::verify`] is
//! the structural verifier that checks every invariant in this crate's data
//! model; [`pass::output_assign_inline`] and [`pass::const_fold`] are two
//! case-study rewrite passes. [`load`] imports a netlist from the JSON
//! format documented there.

pub mod diagnostic;
pub mod ir;
pub mod load;
pub mod pass;
pub mod schema;
pub mod symbol;
