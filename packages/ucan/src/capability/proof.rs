use super::{Ability, CapabilitySemantics, Scope};
use crate::error::CapabilityParseError;
use std::fmt::Display;
use url::Url;

/// Which of a UCAN's proofs a delegation capability selects: a single
/// proof by position in the `prf` list, or all of them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProofSelection {
    Index(usize),
    All,
}

impl Scope for ProofSelection {
    fn contains(&self, other: &Self) -> bool {
        self == other || *self == ProofSelection::All
    }

    fn parse(uri: &Url) -> Result<Self, CapabilityParseError> {
        match uri.scheme() {
            "prf" => match uri.path() {
                "*" => Ok(ProofSelection::All),
                path => path
                    .parse::<usize>()
                    .map(ProofSelection::Index)
                    .map_err(|_| CapabilityParseError::InvalidUri(uri.to_string())),
            },
            _ => Err(CapabilityParseError::TypeMismatch(uri.to_string())),
        }
    }
}

impl Display for ProofSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofSelection::Index(index) => write!(f, "prf:{index}"),
            ProofSelection::All => write!(f, "prf:*"),
        }
    }
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ProofAction {
    Delegate,
}

impl Ability for ProofAction {
    fn parse(ability: &str) -> Result<Self, CapabilityParseError> {
        match ability {
            "ucan/DELEGATE" => Ok(ProofAction::Delegate),
            unsupported => Err(CapabilityParseError::TypeMismatch(format!(
                "Unsupported action for proof resource: {unsupported}"
            ))),
        }
    }
}

impl Display for ProofAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofAction::Delegate => write!(f, "ucan/DELEGATE"),
        }
    }
}

/// The capability family that selects proofs for wholesale
/// redelegation.
pub struct ProofDelegationSemantics {}

impl CapabilitySemantics<ProofSelection, ProofAction> for ProofDelegationSemantics {}
