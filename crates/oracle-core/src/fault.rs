use thiserror::Error;

use crate::Register;

/// Fault classes separating emission-time rejections from execution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Raised by the builder before any instruction executes.
    Build,
    /// Raised by the machine while executing a program.
    Run,
}

/// Closed fault taxonomy shared by the builder and the machine.
///
/// Every variant carries the offending value so harnesses can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// A register position received something that is not a register name.
    #[error("invalid register name: {0}")]
    InvalidRegisterName(String),
    /// An immediate operand lies outside the representable range.
    #[error("constant {0} does not fit the immediate field")]
    OverflowConstant(i64),
    /// A branch condition is not a subset of `nzp`.
    #[error("unexpected branch condition {0:?}")]
    UnexpectedCondition(String),
    /// A label position received something that is not text.
    #[error("label must be text, got {0}")]
    NotALabel(String),
    /// The program already holds the configured maximum of instructions.
    #[error("program exceeds the cap of {0} instructions")]
    TooMuchCode(usize),
    /// A register (or the condition flag, when `None`) was read before any write.
    #[error("read of uninitialized {}", describe_read(.0.as_ref()))]
    UninitializedRegister(Option<Register>),
    /// A branch targets a label that the program never defines.
    #[error("missing label {0:?}")]
    MissingLabel(String),
    /// The run executed more instructions than the step ceiling allows.
    #[error("step ceiling of {0} instructions exceeded")]
    InfiniteLoop(u64),
}

fn describe_read(register: Option<&Register>) -> String {
    register.map_or_else(
        || "condition flag".to_string(),
        |register| format!("register {register}"),
    )
}

/// Payload-free discriminant of [`Fault`], for matching on kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum FaultKind {
    InvalidRegisterName,
    OverflowConstant,
    UnexpectedCondition,
    NotALabel,
    TooMuchCode,
    UninitializedRegister,
    MissingLabel,
    InfiniteLoop,
}

impl FaultKind {
    /// All fault kinds, build-time kinds first.
    pub const ALL: [Self; 8] = [
        Self::InvalidRegisterName,
        Self::OverflowConstant,
        Self::UnexpectedCondition,
        Self::NotALabel,
        Self::TooMuchCode,
        Self::UninitializedRegister,
        Self::MissingLabel,
        Self::InfiniteLoop,
    ];

    /// Returns whether this kind is raised while building or while running.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::InvalidRegisterName
            | Self::OverflowConstant
            | Self::UnexpectedCondition
            | Self::NotALabel
            | Self::TooMuchCode => FaultClass::Build,
            Self::UninitializedRegister | Self::MissingLabel | Self::InfiniteLoop => {
                FaultClass::Run
            }
        }
    }
}

impl Fault {
    /// Returns the payload-free kind of this fault.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::InvalidRegisterName(_) => FaultKind::InvalidRegisterName,
            Self::OverflowConstant(_) => FaultKind::OverflowConstant,
            Self::UnexpectedCondition(_) => FaultKind::UnexpectedCondition,
            Self::NotALabel(_) => FaultKind::NotALabel,
            Self::TooMuchCode(_) => FaultKind::TooMuchCode,
            Self::UninitializedRegister(_) => FaultKind::UninitializedRegister,
            Self::MissingLabel(_) => FaultKind::MissingLabel,
            Self::InfiniteLoop(_) => FaultKind::InfiniteLoop,
        }
    }

    /// Returns the class of this fault.
    #[must_use]
    pub const fn class(&self) -> FaultClass {
        self.kind().class()
    }
}

#[cfg(test)]
mod tests {
    use super::{Fault, FaultClass, FaultKind};
    use crate::Register;

    #[test]
    fn class_mapping_splits_build_and_run_faults() {
        let build: Vec<_> = FaultKind::ALL
            .iter()
            .filter(|kind| kind.class() == FaultClass::Build)
            .collect();
        assert_eq!(build.len(), 5);

        assert_eq!(FaultKind::TooMuchCode.class(), FaultClass::Build);
        assert_eq!(FaultKind::UninitializedRegister.class(), FaultClass::Run);
        assert_eq!(FaultKind::MissingLabel.class(), FaultClass::Run);
        assert_eq!(FaultKind::InfiniteLoop.class(), FaultClass::Run);
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            Fault::OverflowConstant(16).kind(),
            FaultKind::OverflowConstant
        );
        assert_eq!(
            Fault::MissingLabel("nowhere".into()).kind(),
            FaultKind::MissingLabel
        );
        assert_eq!(Fault::InfiniteLoop(10).class(), FaultClass::Run);
    }

    #[test]
    fn messages_carry_the_offending_value() {
        assert_eq!(
            Fault::UninitializedRegister(Some(Register::new("temp_1"))).to_string(),
            "read of uninitialized register temp_1"
        );
        assert_eq!(
            Fault::UninitializedRegister(None).to_string(),
            "read of uninitialized condition flag"
        );
        assert_eq!(
            Fault::UnexpectedCondition("nx".into()).to_string(),
            "unexpected branch condition \"nx\""
        );
        assert_eq!(
            Fault::TooMuchCode(100_000).to_string(),
            "program exceeds the cap of 100000 instructions"
        );
    }
}
