/// How a lookup that misses every frame is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnboundNames {
    /// The name evaluates to itself as a symbol.
    #[default]
    Permissive,
    /// The lookup fails with an unbound-name fault.
    Strict,
}

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub unbound: UnboundNames,
    /// Maximum number of nested function calls and `let` frames.
    pub max_depth: usize,
    /// Zero-argument function called once every top-level form has run.
    pub entry_point: String,
}

pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Deepest list nesting accepted in source text and built at run time.
pub const MAX_NESTING: usize = 1_000;

impl Default for Options {
    fn default() -> Self {
        Self {
            unbound: UnboundNames::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            entry_point: "main".to_owned(),
        }
    }
}

impl Options {
    pub fn strict(mut self) -> Self {
        self.unbound = UnboundNames::Strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
