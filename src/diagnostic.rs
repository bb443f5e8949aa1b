//! The diagnostics channel passes use to report findings, modeled on the
//! level/message shape of a compiler diagnostic but targeted at GRH's own
//! graph/operation/value location model instead of source spans.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Diagnostic reporting level, most to least severe.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Blocks the owning pass from succeeding.
    Error,
    /// A structural concern that does not stop the pipeline.
    Warning,
    /// Advisory information, e.g. a repair performed or an unrecognized
    /// attribute kept as-is.
    Info,
}

impl Level {
    /// All levels, most to least severe.
    pub fn iter() -> std::array::IntoIter<Self, 3> {
        [Self::Error, Self::Warning, Self::Info].into_iter()
    }
}

/// A single diagnostic entry, located by graph name and an optional
/// operation or value symbol rather than a source span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Name of the pass that recorded this entry.
    pub pass_name: String,
    /// Graph the finding concerns, if any.
    pub graph: Option<String>,
    /// Operation or value symbol text the finding concerns, if any.
    pub symbol: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} [{}]", self.level, self.pass_name)?;
        if let Some(graph) = &self.graph {
            write!(f, " {graph}")?;
        }
        if let Some(symbol) = &self.symbol {
            write!(f, ":{symbol}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// The mutable channel passes record findings into, and that the pass
/// manager inspects to decide whether a run failed.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl std::fmt::Debug for Diagnostics {
    /// Pretty-prints entries grouped by level, most to least severe, rather
    /// than in raw recording order — easier to scan when a pass reports many
    /// findings at once.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "Diagnostics (empty)");
        }
        let groups = self.entries.iter().into_group_map_by(|d| d.level);
        write!(f, "Diagnostics (")?;
        for (level, count) in
            Level::iter().filter_map(|level| groups.get(&level).map(|v| (level, v.len())))
        {
            write!(f, "{level:?}: {count}, ")?;
        }
        writeln!(f, "):")?;
        for diagnostic in Level::iter().filter_map(|level| groups.get(&level)).flatten() {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl Diagnostics {
    /// Creates an empty diagnostics channel.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        level: Level,
        pass_name: impl Into<String>,
        graph: Option<&str>,
        symbol: Option<&str>,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            level,
            pass_name: pass_name.into(),
            graph: graph.map(str::to_owned),
            symbol: symbol.map(str::to_owned),
            message: message.into(),
        });
    }

    /// Records an error attributed to `pass_name`, optionally located at a
    /// graph and operation/value symbol.
    pub fn error(
        &mut self,
        pass_name: &str,
        graph: Option<&str>,
        symbol: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(Level::Error, pass_name, graph, symbol, message);
    }

    /// Records a warning.
    pub fn warning(
        &mut self,
        pass_name: &str,
        graph: Option<&str>,
        symbol: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(Level::Warning, pass_name, graph, symbol, message);
    }

    /// Records an informational entry.
    pub fn info(
        &mut self,
        pass_name: &str,
        graph: Option<&str>,
        symbol: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(Level::Info, pass_name, graph, symbol, message);
    }

    /// `true` if any recorded entry is at [`Level::Error`].
    pub fn has_error(&self) -> bool {
        self.entries.iter().any(|d| d.level == Level::Error)
    }

    /// `true` if any entry at [`Level::Error`] is attributed to `pass_name`.
    pub fn has_error_from(&self, pass_name: &str) -> bool {
        self.entries
            .iter()
            .any(|d| d.level == Level::Error && d.pass_name == pass_name)
    }

    /// All recorded entries, in recording order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_error_reflects_only_error_level() {
        let mut diags = Diagnostics::new();
        diags.warning("verify", Some("top"), None, "stale cache");
        assert!(!diags.has_error());
        diags.error("verify", Some("top"), Some("op0"), "unknown kind");
        assert!(diags.has_error());
    }

    #[test]
    fn has_error_from_is_pass_scoped() {
        let mut diags = Diagnostics::new();
        diags.error("verify", None, None, "boom");
        assert!(diags.has_error_from("verify"));
        assert!(!diags.has_error_from("output_assign_inline"));
    }

    #[test]
    fn debug_groups_by_level_most_to_least_severe() {
        let mut diags = Diagnostics::new();
        diags.info("verify", None, None, "kept attr");
        diags.error("verify", None, None, "boom");
        diags.warning("verify", None, None, "stale cache");
        let rendered = format!("{diags:?}");
        let error_pos = rendered.find("Error: 1").unwrap();
        let warning_pos = rendered.find("Warning: 1").unwrap();
        let info_pos = rendered.find("Info: 1").unwrap();
        assert!(error_pos < warning_pos && warning_pos < info_pos);
    }

    #[test]
    fn debug_on_empty_channel_says_so() {
        assert_eq!(format!("{:?}", Diagnostics::new()), "Diagnostics (empty)");
    }

    #[test]
    fn entries_preserve_recording_order() {
        let mut diags = Diagnostics::new();
        diags.info("verify", None, None, "first");
        diags.warning("verify", None, None, "second");
        let messages: Vec<&str> = diags.entries().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
