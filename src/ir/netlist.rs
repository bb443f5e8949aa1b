//! The outermost container: an insertion-ordered collection of graphs plus
//! the set of graphs marked as top modules.

use std::collections::{HashMap, HashSet};

use super::graph::Graph;

/// An insertion-ordered mapping from graph name to owned [`Graph`], plus the
/// set of names marked as top modules.
///
/// A [`Netlist`] exclusively owns its graphs (§3's ownership invariant):
/// dropping it drops every graph, value and operation it contains.
///
/// Insertion order is tracked explicitly via `order` rather than reached for
/// an order-preserving map crate: the only operations needed are append,
/// name lookup, and removal, which a `Vec` of names plus a `HashMap` cover
/// directly.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    graphs: HashMap<String, Graph>,
    order: Vec<String>,
    top_modules: HashSet<String>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty graph named `name` and inserts it at the end of
    /// the insertion order.
    ///
    /// # Panics
    /// Panics if a graph named `name` already exists.
    pub fn create_graph(&mut self, name: impl Into<String>) -> &mut Graph {
        let name = name.into();
        assert!(
            !self.graphs.contains_key(&name),
            "graph '{name}' already exists in this netlist"
        );
        self.order.push(name.clone());
        self.graphs.entry(name.clone()).or_insert_with(|| Graph::new(name))
    }

    /// Removes and returns the graph named `name`, along with its top-module
    /// mark if it had one.
    pub fn remove_graph(&mut self, name: &str) -> Option<Graph> {
        self.top_modules.remove(name);
        self.order.retain(|n| n != name);
        self.graphs.remove(name)
    }

    /// Looks up a graph by name.
    pub fn graph(&self, name: &str) -> Option<&Graph> {
        self.graphs.get(name)
    }

    /// Looks up a graph by name, mutably.
    pub fn graph_mut(&mut self, name: &str) -> Option<&mut Graph> {
        self.graphs.get_mut(name)
    }

    /// All graphs in insertion order.
    pub fn graphs(&self) -> impl Iterator<Item = (&str, &Graph)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.graphs.get(name).expect("order/graphs desynced")))
    }

    /// Number of graphs in this netlist.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns `true` if this netlist holds no graphs.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Marks `name` as a top module.
    ///
    /// # Panics
    /// Panics if no graph named `name` exists in this netlist.
    pub fn mark_top_module(&mut self, name: impl Into<String>) {
        let name = name.into();
        assert!(
            self.graphs.contains_key(&name),
            "cannot mark unknown graph '{name}' as a top module"
        );
        self.top_modules.insert(name);
    }

    /// Removes `name`'s top-module mark, if present.
    pub fn unmark_top_module(&mut self, name: &str) {
        self.top_modules.remove(name);
    }

    /// Returns `true` if `name` is marked as a top module.
    pub fn is_top_module(&self, name: &str) -> bool {
        self.top_modules.contains(name)
    }

    /// The set of graph names marked as top modules.
    pub fn top_modules(&self) -> &HashSet<String> {
        &self.top_modules
    }
}
