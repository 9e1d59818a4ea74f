//! Branch condition sets over the sign of the condition flag.

use std::fmt;
use std::str::FromStr;

use crate::{Fault, Word};

/// Subset of `{negative, zero, positive}` tested by a branch.
///
/// The empty set and the full set both mean "always taken".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ConditionSet {
    /// Taken when the flag is below zero.
    pub negative: bool,
    /// Taken when the flag equals zero.
    pub zero: bool,
    /// Taken when the flag is above zero.
    pub positive: bool,
}

impl ConditionSet {
    /// Empty set, an unconditional branch.
    pub const ALWAYS: Self = Self::new(false, false, false);
    /// `{n, z, p}`, also an unconditional branch.
    pub const ALL: Self = Self::new(true, true, true);
    /// `{n}`.
    pub const N: Self = Self::new(true, false, false);
    /// `{z}`.
    pub const Z: Self = Self::new(false, true, false);
    /// `{p}`.
    pub const P: Self = Self::new(false, false, true);
    /// `{n, z}`.
    pub const NZ: Self = Self::new(true, true, false);
    /// `{z, p}`.
    pub const ZP: Self = Self::new(false, true, true);
    /// `{n, p}`.
    pub const NP: Self = Self::new(true, false, true);

    /// Creates a condition set from its three members.
    #[must_use]
    pub const fn new(negative: bool, zero: bool, positive: bool) -> Self {
        Self {
            negative,
            zero,
            positive,
        }
    }

    /// Returns `true` when the branch never consults the condition flag.
    #[must_use]
    pub const fn is_unconditional(self) -> bool {
        let all = self.negative && self.zero && self.positive;
        let none = !self.negative && !self.zero && !self.positive;
        all || none
    }

    /// Returns `true` when `flag` satisfies at least one member test.
    #[must_use]
    pub const fn admits(self, flag: Word) -> bool {
        (self.negative && flag < 0) || (self.zero && flag == 0) || (self.positive && flag > 0)
    }
}

impl FromStr for ConditionSet {
    type Err = Fault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::ALWAYS;
        for c in s.chars() {
            match c {
                'n' => set.negative = true,
                'z' => set.zero = true,
                'p' => set.positive = true,
                _ => return Err(Fault::UnexpectedCondition(s.to_string())),
            }
        }
        Ok(set)
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (member, letter) in [(self.negative, 'n'), (self.zero, 'z'), (self.positive, 'p')] {
            if member {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
