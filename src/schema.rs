//! The operation kind enumeration and the process-wide operation schema
//! registry: per-kind rules for operand/result arity and attribute shape.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::ir::AttributeKind;

/// The closed enumeration of hardware operator kinds GRH understands.
///
/// Table-driven rather than dispatched through a trait hierarchy: every
/// per-kind rule lives in [`operation_spec`] or the verifier's per-kind
/// cross-check match arms, not in methods on this type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OperationKind {
    // Binary arithmetic / logic / compare.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
    Xnor,
    LogicAnd,
    LogicOr,
    Shl,
    LShr,
    AShr,
    // Unary.
    Not,
    LogicNot,
    ReduceAnd,
    ReduceOr,
    ReduceXor,
    ReduceNor,
    ReduceNand,
    ReduceXnor,
    // Constants, selects, bit manipulation.
    Constant,
    Mux,
    Assign,
    Concat,
    Replicate,
    SliceStatic,
    SliceDynamic,
    SliceArray,
    // Latches and registers.
    Latch,
    LatchArst,
    Register,
    RegisterEn,
    RegisterRst,
    RegisterEnRst,
    RegisterArst,
    RegisterEnArst,
    // Memories.
    Memory,
    MemoryAsyncReadPort,
    MemorySyncReadPort,
    MemorySyncReadPortRst,
    MemorySyncReadPortArst,
    MemoryWritePort,
    MemoryWritePortRst,
    MemoryWritePortArst,
    MemoryMaskWritePort,
    MemoryMaskWritePortRst,
    MemoryMaskWritePortArst,
    // Module instantiation.
    Instance,
    Blackbox,
    // Simulation constructs.
    Display,
    Assert,
    // External function calls.
    DpicImport,
    DpicCall,
}

impl OperationKind {
    /// The JSON/diagnostic string lexicon for this kind, e.g. `"add"`,
    /// `"sliceStatic"`, `"memorySyncReadPortRst"`.
    pub fn as_str(self) -> &'static str {
        use OperationKind::*;
        match self {
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Mod => "mod",
            Eq => "eq",
            Ne => "ne",
            Lt => "lt",
            Le => "le",
            Gt => "gt",
            Ge => "ge",
            And => "and",
            Or => "or",
            Xor => "xor",
            Xnor => "xnor",
            LogicAnd => "logicAnd",
            LogicOr => "logicOr",
            Shl => "shl",
            LShr => "lShr",
            AShr => "aShr",
            Not => "not",
            LogicNot => "logicNot",
            ReduceAnd => "reduceAnd",
            ReduceOr => "reduceOr",
            ReduceXor => "reduceXor",
            ReduceNor => "reduceNor",
            ReduceNand => "reduceNand",
            ReduceXnor => "reduceXnor",
            Constant => "constant",
            Mux => "mux",
            Assign => "assign",
            Concat => "concat",
            Replicate => "replicate",
            SliceStatic => "sliceStatic",
            SliceDynamic => "sliceDynamic",
            SliceArray => "sliceArray",
            Latch => "latch",
            LatchArst => "latchArst",
            Register => "register",
            RegisterEn => "registerEn",
            RegisterRst => "registerRst",
            RegisterEnRst => "registerEnRst",
            RegisterArst => "registerArst",
            RegisterEnArst => "registerEnArst",
            Memory => "memory",
            MemoryAsyncReadPort => "memoryAsyncReadPort",
            MemorySyncReadPort => "memorySyncReadPort",
            MemorySyncReadPortRst => "memorySyncReadPortRst",
            MemorySyncReadPortArst => "memorySyncReadPortArst",
            MemoryWritePort => "memoryWritePort",
            MemoryWritePortRst => "memoryWritePortRst",
            MemoryWritePortArst => "memoryWritePortArst",
            MemoryMaskWritePort => "memoryMaskWritePort",
            MemoryMaskWritePortRst => "memoryMaskWritePortRst",
            MemoryMaskWritePortArst => "memoryMaskWritePortArst",
            Instance => "instance",
            Blackbox => "blackbox",
            Display => "display",
            Assert => "assert",
            DpicImport => "dpicImport",
            DpicCall => "dpicCall",
        }
    }

    /// All kinds, in declaration order. Used by the JSON kind lexicon to
    /// build its reverse (string -> kind) lookup once.
    pub fn all() -> &'static [OperationKind] {
        use OperationKind::*;
        &[
            Add, Sub, Mul, Div, Mod, Eq, Ne, Lt, Le, Gt, Ge, And, Or, Xor, Xnor, LogicAnd,
            LogicOr, Shl, LShr, AShr, Not, LogicNot, ReduceAnd, ReduceOr, ReduceXor, ReduceNor,
            ReduceNand, ReduceXnor, Constant, Mux, Assign, Concat, Replicate, SliceStatic,
            SliceDynamic, SliceArray, Latch, LatchArst, Register, RegisterEn, RegisterRst,
            RegisterEnRst, RegisterArst, RegisterEnArst, Memory, MemoryAsyncReadPort,
            MemorySyncReadPort, MemorySyncReadPortRst, MemorySyncReadPortArst, MemoryWritePort,
            MemoryWritePortRst, MemoryWritePortArst, MemoryMaskWritePort,
            MemoryMaskWritePortRst, MemoryMaskWritePortArst, Instance, Blackbox, Display, Assert,
            DpicImport, DpicCall,
        ]
    }

    /// Parses a kind from its JSON/diagnostic string form.
    pub fn parse(text: &str) -> Option<OperationKind> {
        kind_lexicon().get(text).copied()
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn kind_lexicon() -> &'static HashMap<&'static str, OperationKind> {
    static LEXICON: OnceLock<HashMap<&'static str, OperationKind>> = OnceLock::new();
    LEXICON.get_or_init(|| {
        OperationKind::all()
            .iter()
            .map(|&kind| (kind.as_str(), kind))
            .collect()
    })
}

/// Inclusive-or-unbounded arity range, e.g. operand count `[2, 2]` or result
/// count `[0, unbounded)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ArityRange {
    min: usize,
    max: Option<usize>,
}

impl ArityRange {
    /// A range matching exactly `count`.
    pub const fn exact(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// A range matching `[min, max]` inclusive.
    pub const fn bounded(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// A range matching `[min, ∞)`.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Returns `true` if `count` falls within this range.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Lower bound.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, or `None` if unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }
}

impl std::fmt::Display for ArityRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, unbounded)", self.min),
        }
    }
}

/// A rule constraining one named attribute on an operation of a given kind.
#[derive(Debug, Clone)]
pub struct AttributeRule {
    /// Attribute name.
    pub name: &'static str,
    /// Required value type tag.
    pub kind: AttributeKind,
    /// If non-empty and `kind == String`, the value must be one of these.
    pub allowed_strings: &'static [&'static str],
    /// `false` for required rules, `true` for optional ones.
    pub optional: bool,
}

const fn req(name: &'static str, kind: AttributeKind) -> AttributeRule {
    AttributeRule {
        name,
        kind,
        allowed_strings: &[],
        optional: false,
    }
}

const fn req_enum(name: &'static str, allowed: &'static [&'static str]) -> AttributeRule {
    AttributeRule {
        name,
        kind: AttributeKind::String,
        allowed_strings: allowed,
        optional: false,
    }
}

const fn opt(name: &'static str, kind: AttributeKind) -> AttributeRule {
    AttributeRule {
        name,
        kind,
        allowed_strings: &[],
        optional: true,
    }
}

/// The per-kind contract: operand/result arity plus required and optional
/// attribute rules.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    /// Allowed operand count range.
    pub operands: ArityRange,
    /// Allowed result count range.
    pub results: ArityRange,
    /// Attributes that must be present, with correct type (and allowed
    /// string membership, where applicable).
    pub required: &'static [AttributeRule],
    /// Attributes that may be present; if present, checked the same way.
    pub optional: &'static [AttributeRule],
}

const CLK_POLARITY: AttributeRule = req_enum("clkPolarity", &["posedge", "negedge"]);
const EN_LEVEL: AttributeRule = req_enum("enLevel", &["high", "low"]);
const RST_POLARITY: AttributeRule = req_enum("rstPolarity", &["high", "low"]);
const MEM_SYMBOL: AttributeRule = req("memSymbol", AttributeKind::String);

/// Returns the registered [`OperationSpec`] for `kind`, or `None` if `kind`
/// is not (yet) in the registry — which the verifier reports as "unknown
/// operation kind", not a panic, since it can observe kinds from
/// partially-trusted input.
pub fn operation_spec(kind: OperationKind) -> Option<&'static OperationSpec> {
    registry().get(&kind)
}

fn registry() -> &'static HashMap<OperationKind, OperationSpec> {
    static REGISTRY: OnceLock<HashMap<OperationKind, OperationSpec>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> HashMap<OperationKind, OperationSpec> {
    use OperationKind::*;

    let mut map = HashMap::new();

    const BINARY: OperationSpec = OperationSpec {
        operands: ArityRange::exact(2),
        results: ArityRange::exact(1),
        required: &[],
        optional: &[],
    };
    for kind in [
        Add, Sub, Mul, Div, Mod, Eq, Ne, Lt, Le, Gt, Ge, And, Or, Xor, Xnor, LogicAnd, LogicOr,
        Shl, LShr, AShr,
    ] {
        map.insert(kind, BINARY.clone());
    }

    const UNARY: OperationSpec = OperationSpec {
        operands: ArityRange::exact(1),
        results: ArityRange::exact(1),
        required: &[],
        optional: &[],
    };
    for kind in [
        Not, LogicNot, ReduceAnd, ReduceOr, ReduceXor, ReduceNor, ReduceNand, ReduceXnor,
    ] {
        map.insert(kind, UNARY.clone());
    }

    map.insert(
        Constant,
        OperationSpec {
            operands: ArityRange::exact(0),
            results: ArityRange::exact(1),
            required: &[req("constValue", AttributeKind::String)],
            optional: &[],
        },
    );
    map.insert(
        Mux,
        OperationSpec {
            operands: ArityRange::exact(3),
            results: ArityRange::exact(1),
            required: &[],
            optional: &[],
        },
    );
    map.insert(
        Assign,
        OperationSpec {
            operands: ArityRange::exact(1),
            results: ArityRange::exact(1),
            required: &[],
            optional: &[],
        },
    );
    map.insert(
        Concat,
        OperationSpec {
            operands: ArityRange::at_least(2),
            results: ArityRange::exact(1),
            required: &[],
            optional: &[],
        },
    );
    map.insert(
        Replicate,
        OperationSpec {
            operands: ArityRange::exact(1),
            results: ArityRange::exact(1),
            required: &[req("rep", AttributeKind::Int)],
            optional: &[],
        },
    );
    map.insert(
        SliceStatic,
        OperationSpec {
            operands: ArityRange::exact(1),
            results: ArityRange::exact(1),
            required: &[
                req("sliceStart", AttributeKind::Int),
                req("sliceEnd", AttributeKind::Int),
            ],
            optional: &[],
        },
    );
    for kind in [SliceDynamic, SliceArray] {
        map.insert(
            kind,
            OperationSpec {
                operands: ArityRange::exact(2),
                results: ArityRange::exact(1),
                required: &[req("sliceWidth", AttributeKind::Int)],
                optional: &[],
            },
        );
    }

    map.insert(
        Latch,
        OperationSpec {
            operands: ArityRange::exact(2),
            results: ArityRange::exact(1),
            required: &[EN_LEVEL],
            optional: &[],
        },
    );
    map.insert(
        LatchArst,
        OperationSpec {
            operands: ArityRange::exact(4),
            results: ArityRange::exact(1),
            required: &[EN_LEVEL, RST_POLARITY],
            optional: &[],
        },
    );

    map.insert(
        Register,
        OperationSpec {
            operands: ArityRange::exact(2),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY],
            optional: &[],
        },
    );
    map.insert(
        RegisterEn,
        OperationSpec {
            operands: ArityRange::exact(3),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, EN_LEVEL],
            optional: &[],
        },
    );
    map.insert(
        RegisterRst,
        OperationSpec {
            operands: ArityRange::exact(4),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, RST_POLARITY],
            optional: &[],
        },
    );
    map.insert(
        RegisterEnRst,
        OperationSpec {
            operands: ArityRange::exact(5),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, RST_POLARITY, EN_LEVEL],
            optional: &[],
        },
    );
    map.insert(
        RegisterArst,
        OperationSpec {
            operands: ArityRange::exact(4),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, RST_POLARITY],
            optional: &[],
        },
    );
    map.insert(
        RegisterEnArst,
        OperationSpec {
            operands: ArityRange::exact(5),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, RST_POLARITY, EN_LEVEL],
            optional: &[],
        },
    );

    map.insert(
        Memory,
        OperationSpec {
            operands: ArityRange::exact(0),
            results: ArityRange::exact(0),
            required: &[
                req("width", AttributeKind::Int),
                req("row", AttributeKind::Int),
                req("isSigned", AttributeKind::Bool),
            ],
            optional: &[],
        },
    );
    map.insert(
        MemoryAsyncReadPort,
        OperationSpec {
            operands: ArityRange::exact(1),
            results: ArityRange::exact(1),
            required: &[MEM_SYMBOL],
            optional: &[],
        },
    );
    map.insert(
        MemorySyncReadPort,
        OperationSpec {
            operands: ArityRange::exact(3),
            results: ArityRange::exact(1),
            required: &[CLK_POLARITY, MEM_SYMBOL, EN_LEVEL],
            optional: &[],
        },
    );
    for kind in [MemorySyncReadPortRst, MemorySyncReadPortArst] {
        map.insert(
            kind,
            OperationSpec {
                operands: ArityRange::exact(4),
                results: ArityRange::exact(1),
                required: &[CLK_POLARITY, RST_POLARITY, EN_LEVEL, MEM_SYMBOL],
                optional: &[],
            },
        );
    }

    map.insert(
        MemoryWritePort,
        OperationSpec {
            operands: ArityRange::exact(4),
            results: ArityRange::exact(0),
            required: &[MEM_SYMBOL, CLK_POLARITY, EN_LEVEL],
            optional: &[],
        },
    );
    for kind in [MemoryWritePortRst, MemoryWritePortArst] {
        map.insert(
            kind,
            OperationSpec {
                operands: ArityRange::exact(5),
                results: ArityRange::exact(0),
                required: &[MEM_SYMBOL, CLK_POLARITY, RST_POLARITY, EN_LEVEL],
                optional: &[],
            },
        );
    }

    map.insert(
        MemoryMaskWritePort,
        OperationSpec {
            operands: ArityRange::exact(5),
            results: ArityRange::exact(0),
            required: &[MEM_SYMBOL, CLK_POLARITY, EN_LEVEL],
            optional: &[],
        },
    );
    for kind in [MemoryMaskWritePortRst, MemoryMaskWritePortArst] {
        map.insert(
            kind,
            OperationSpec {
                operands: ArityRange::exact(6),
                results: ArityRange::exact(0),
                required: &[MEM_SYMBOL, CLK_POLARITY, RST_POLARITY, EN_LEVEL],
                optional: &[],
            },
        );
    }

    map.insert(
        Instance,
        OperationSpec {
            operands: ArityRange::at_least(0),
            results: ArityRange::at_least(0),
            required: &[
                req("moduleName", AttributeKind::String),
                req("instanceName", AttributeKind::String),
                req("inputPortName", AttributeKind::StringArray),
                req("outputPortName", AttributeKind::StringArray),
            ],
            optional: &[],
        },
    );
    map.insert(
        Blackbox,
        OperationSpec {
            operands: ArityRange::at_least(0),
            results: ArityRange::at_least(0),
            required: &[
                req("moduleName", AttributeKind::String),
                req("instanceName", AttributeKind::String),
                req("inputPortName", AttributeKind::StringArray),
                req("outputPortName", AttributeKind::StringArray),
                req("parameterNames", AttributeKind::StringArray),
                req("parameterValues", AttributeKind::StringArray),
            ],
            optional: &[],
        },
    );

    map.insert(
        Display,
        OperationSpec {
            operands: ArityRange::at_least(2),
            results: ArityRange::exact(0),
            required: &[
                CLK_POLARITY,
                req("formatString", AttributeKind::String),
                req_enum("displayKind", &["display", "write", "strobe"]),
            ],
            optional: &[],
        },
    );
    map.insert(
        Assert,
        OperationSpec {
            operands: ArityRange::exact(2),
            results: ArityRange::exact(0),
            required: &[CLK_POLARITY],
            optional: &[
                opt("message", AttributeKind::String),
                opt("severity", AttributeKind::String),
            ],
        },
    );

    map.insert(
        DpicImport,
        OperationSpec {
            operands: ArityRange::exact(0),
            results: ArityRange::exact(0),
            required: &[
                req("argsDirection", AttributeKind::StringArray),
                req("argsWidth", AttributeKind::IntArray),
                req("argsName", AttributeKind::StringArray),
            ],
            optional: &[],
        },
    );
    map.insert(
        DpicCall,
        OperationSpec {
            operands: ArityRange::at_least(2),
            results: ArityRange::at_least(0),
            required: &[
                CLK_POLARITY,
                req("targetImportSymbol", AttributeKind::String),
                req("inArgName", AttributeKind::StringArray),
                req("outArgName", AttributeKind::StringArray),
            ],
            optional: &[],
        },
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_string() {
        for &kind in OperationKind::all() {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn registry_covers_every_kind() {
        for &kind in OperationKind::all() {
            assert!(
                operation_spec(kind).is_some(),
                "missing schema spec for {kind}"
            );
        }
    }

    #[test]
    fn binary_kinds_take_two_operands_one_result() {
        let spec = operation_spec(OperationKind::Add).unwrap();
        assert!(spec.operands.contains(2));
        assert!(!spec.operands.contains(1));
        assert!(!spec.operands.contains(3));
        assert!(spec.results.contains(1));
    }

    #[test]
    fn concat_is_unbounded_above() {
        let spec = operation_spec(OperationKind::Concat).unwrap();
        assert!(spec.operands.contains(2));
        assert!(spec.operands.contains(1000));
        assert!(!spec.operands.contains(1));
    }

    #[test]
    fn unknown_string_does_not_parse() {
        assert_eq!(OperationKind::parse("not_a_real_kind"), None);
    }
}
