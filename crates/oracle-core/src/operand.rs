//! Registers, operands, and normalization of loosely-typed emitter input.
//!
//! Code generators hand the builder raw numerals, `#`-marked literals, and
//! plain names interchangeably. [`Operand::normalize`] turns each of those
//! into exactly one of [`Operand::Register`] or [`Operand::Immediate`], and
//! nothing downstream looks at the raw text again.

use std::borrow::Borrow;
use std::fmt;

use crate::Fault;

/// Signed machine word stored in registers and the condition flag.
pub type Word = i64;

/// Marker character that introduces a literal in textual operands.
pub const LITERAL_MARKER: char = '#';

/// Named storage cell holding one [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register(String);

impl Register {
    /// Creates a register with the given name, without validation.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates the register for a small non-negative index (`r0`, `r1`, ...).
    #[must_use]
    pub fn numbered(index: u16) -> Self {
        Self(format!("r{index}"))
    }

    /// Returns the register name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Register {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loosely-typed value accepted at the builder boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A raw integer.
    Int(i64),
    /// Text that may name a register or spell a literal.
    Text(String),
    /// An already-normalized register.
    Register(Register),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Register(register) => write!(f, "{register}"),
        }
    }
}

macro_rules! raw_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

raw_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Register> for RawValue {
    fn from(value: Register) -> Self {
        Self::Register(value)
    }
}

impl From<&Register> for RawValue {
    fn from(value: &Register) -> Self {
        Self::Register(value.clone())
    }
}

/// Normalized instruction operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operand {
    /// Reference to a register.
    Register(Register),
    /// Literal integer value.
    Immediate(Word),
}

impl Operand {
    /// Normalizes loosely-typed input into a register or an immediate.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidRegisterName`] for empty text, text containing
    /// whitespace, or a `#` marker not followed by an integer, and
    /// [`Fault::OverflowConstant`] for numerals that do not fit a [`Word`].
    ///
    /// A `#` marker is never stripped to leave a register name behind, so
    /// `"#abc"` is rejected rather than read as register `abc`. A prebuilt
    /// [`Register`] gets the same checks as text: its name must come back
    /// unchanged as a register, so `Register::new("#3")`, `Register::new("5")`
    /// and `Register::new(" ")` are all rejected.
    pub fn normalize(raw: impl Into<RawValue>) -> Result<Self, Fault> {
        match raw.into() {
            RawValue::Int(value) => Ok(Self::Immediate(value)),
            RawValue::Register(register) => checked_register(register).map(Self::Register),
            RawValue::Text(text) => normalize_text(&text),
        }
    }

    /// Returns the register, if this operand names one.
    #[must_use]
    pub const fn as_register(&self) -> Option<&Register> {
        match self {
            Self::Register(register) => Some(register),
            Self::Immediate(_) => None,
        }
    }

    /// Returns the literal value, if this operand is an immediate.
    #[must_use]
    pub const fn as_immediate(&self) -> Option<Word> {
        match self {
            Self::Immediate(value) => Some(*value),
            Self::Register(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(register) => write!(f, "{register}"),
            Self::Immediate(value) => write!(f, "{LITERAL_MARKER}{value}"),
        }
    }
}

fn checked_register(register: Register) -> Result<Register, Fault> {
    match normalize_text(register.name()) {
        Ok(Operand::Register(parsed)) if parsed == register => Ok(register),
        _ => Err(Fault::InvalidRegisterName(register.name().to_string())),
    }
}

fn normalize_text(text: &str) -> Result<Operand, Fault> {
    let trimmed = text.trim();

    if let Some(literal) = trimmed.strip_prefix(LITERAL_MARKER) {
        return parse_numeral(literal.trim())
            .unwrap_or_else(|| Err(Fault::InvalidRegisterName(text.to_string())))
            .map(Operand::Immediate);
    }

    if let Some(value) = parse_numeral(trimmed) {
        return value.map(Operand::Immediate);
    }

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(Fault::InvalidRegisterName(text.to_string()));
    }

    Ok(Operand::Register(Register::new(trimmed)))
}

/// Parses a signed decimal numeral.
///
/// Returns `None` when the text is not a numeral at all, and an
/// `OverflowConstant` (saturated by sign) when it is one but exceeds a word.
fn parse_numeral(text: &str) -> Option<Result<Word, Fault>> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(text.parse::<Word>().map_err(|_| {
        Fault::OverflowConstant(if negative { Word::MIN } else { Word::MAX })
    }))
}
