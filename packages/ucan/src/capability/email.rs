use super::{Ability, CapabilitySemantics, Scope};
use crate::error::CapabilityParseError;
use std::fmt::Display;
use url::Url;

/// A `mailto:` scope; one address contains exactly itself.
#[derive(Clone, Eq, PartialEq)]
pub struct EmailAddress(String);

impl Scope for EmailAddress {
    fn contains(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn parse(uri: &Url) -> Result<Self, CapabilityParseError> {
        match uri.scheme() {
            "mailto" => Ok(EmailAddress(uri.path().to_owned())),
            _ => Err(CapabilityParseError::TypeMismatch(format!(
                "Could not interpret URI as an email address: {uri}"
            ))),
        }
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mailto:{}", self.0)
    }
}

#[derive(Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum EmailAction {
    Send,
}

impl Ability for EmailAction {
    fn parse(ability: &str) -> Result<Self, CapabilityParseError> {
        match ability {
            "email/send" => Ok(EmailAction::Send),
            unrecognized => Err(CapabilityParseError::TypeMismatch(format!(
                "Unrecognized action: {unrecognized}"
            ))),
        }
    }
}

impl Display for EmailAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailAction::Send => write!(f, "email/send"),
        }
    }
}

pub struct EmailSemantics {}

impl CapabilitySemantics<EmailAddress, EmailAction> for EmailSemantics {}
