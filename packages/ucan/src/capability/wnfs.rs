use super::{Ability, CapabilitySemantics, Scope};
use crate::error::CapabilityParseError;
use std::fmt::Display;
use url::Url;

/// A `wnfs://` scope: an origin plus a path, where a path contains all
/// of its sub-paths.
#[derive(Clone, Eq, PartialEq)]
pub struct WNFSScope {
    origin: String,
    path: String,
}

impl Scope for WNFSScope {
    fn contains(&self, other: &Self) -> bool {
        if self.origin != other.origin {
            return false;
        }

        let self_path_parts = self.path.split('/');
        let mut other_path_parts = other.path.split('/');

        for part in self_path_parts {
            match other_path_parts.next() {
                Some(other_part) if part == other_part => continue,
                _ => return false,
            }
        }

        true
    }

    fn parse(uri: &Url) -> Result<Self, CapabilityParseError> {
        match (uri.scheme(), uri.host_str()) {
            ("wnfs", Some(host)) => Ok(WNFSScope {
                origin: host.to_owned(),
                path: uri.path().to_owned(),
            }),
            _ => Err(CapabilityParseError::TypeMismatch(format!(
                "Cannot interpret URI as a WNFS scope: {uri}"
            ))),
        }
    }
}

impl Display for WNFSScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wnfs://{}{}", self.origin, self.path)
    }
}

/// The WNFS ability lattice, least to most permissive.
#[derive(Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum WNFSCapLevel {
    Create,
    Revise,
    SoftDelete,
    Overwrite,
    SuperUser,
}

impl Ability for WNFSCapLevel {
    fn parse(ability: &str) -> Result<Self, CapabilityParseError> {
        Ok(match ability {
            "wnfs/create" => WNFSCapLevel::Create,
            "wnfs/revise" => WNFSCapLevel::Revise,
            "wnfs/soft_delete" => WNFSCapLevel::SoftDelete,
            "wnfs/overwrite" => WNFSCapLevel::Overwrite,
            "wnfs/super_user" => WNFSCapLevel::SuperUser,
            _ => {
                return Err(CapabilityParseError::TypeMismatch(format!(
                    "No such WNFS capability level: {ability}"
                )))
            }
        })
    }
}

impl Display for WNFSCapLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WNFSCapLevel::Create => "wnfs/create",
                WNFSCapLevel::Revise => "wnfs/revise",
                WNFSCapLevel::SoftDelete => "wnfs/soft_delete",
                WNFSCapLevel::Overwrite => "wnfs/overwrite",
                WNFSCapLevel::SuperUser => "wnfs/super_user",
            }
        )
    }
}

pub struct WNFSSemantics {}

impl CapabilitySemantics<WNFSScope, WNFSCapLevel> for WNFSSemantics {}
