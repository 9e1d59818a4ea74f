//! Fresh register and label name generation.
//!
//! Counters are owned by one generator, so two builders never share a
//! sequence. Each label pair uses its own prefixes, so labels generated for
//! different constructs cannot collide.

use oracle_core::Register;

/// Prefix of generated temporaries.
pub const TEMPORARY_PREFIX: &str = "temp_";

/// Two labels generated together for one control-flow construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LabelPair {
    /// Label placed at the start of the construct (loop head, negative arm).
    pub begin: String,
    /// Label placed after the construct.
    pub end: String,
}

/// Label pair families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelScope {
    /// `while` loops.
    Loop,
    /// `if`/`else` conditionals.
    Conditional,
    /// Equality tests.
    Equality,
}

impl LabelScope {
    /// Prefixes for the begin and end labels of this scope.
    #[must_use]
    pub const fn prefixes(self) -> (&'static str, &'static str) {
        match self {
            Self::Loop => ("l_while_begin_", "l_while_end_"),
            Self::Conditional => ("l_cond_neg_", "l_cond_end_"),
            Self::Equality => ("eq_neg_", "eq_end_"),
        }
    }
}

/// Monotonic counters for temporaries and label pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameGenerator {
    temporaries: u32,
    labels: u32,
}

impl NameGenerator {
    /// Returns a temporary register never handed out by this generator before.
    pub fn temporary(&mut self) -> Register {
        self.temporaries += 1;
        Register::new(format!("{TEMPORARY_PREFIX}{}", self.temporaries))
    }

    /// Returns a fresh label pair for `scope`.
    ///
    /// All scopes draw from one counter.
    pub fn label_pair(&mut self, scope: LabelScope) -> LabelPair {
        self.labels += 1;
        let (begin, end) = scope.prefixes();
        LabelPair {
            begin: format!("{begin}{}", self.labels),
            end: format!("{end}{}", self.labels),
        }
    }
}
