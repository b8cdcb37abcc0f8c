use super::{Capability, Caveat};
use crate::error::CapabilityParseError;
use serde_json::Value;
use std::fmt::{Debug, Display};
use url::Url;

/// A typed resource scope within one capability family. Containment is
/// the family's own partial order; parsing must fail with
/// [CapabilityParseError::TypeMismatch] when a URI belongs to some
/// other family.
pub trait Scope: ToString + Sized + PartialEq + Clone {
    fn contains(&self, other: &Self) -> bool;

    fn parse(uri: &Url) -> Result<Self, CapabilityParseError>;
}

/// A named ability within one capability family, totally ordered from
/// least to most permissive. Cross-family comparison never arises:
/// parsing an ability from a foreign family fails first.
pub trait Ability: Ord + ToString + Sized + Clone {
    fn parse(ability: &str) -> Result<Self, CapabilityParseError>;
}

/// A scope or the `*` wildcard, which contains every scope of the
/// family.
#[derive(Clone, Eq, PartialEq)]
pub enum ResourceUri<S>
where
    S: Scope,
{
    Scoped(S),
    Unscoped,
}

impl<S> ResourceUri<S>
where
    S: Scope,
{
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (ResourceUri::Unscoped, _) => true,
            (ResourceUri::Scoped(_), ResourceUri::Unscoped) => false,
            (ResourceUri::Scoped(scope), ResourceUri::Scoped(other_scope)) => {
                scope.contains(other_scope)
            }
        }
    }
}

impl<S> Display for ResourceUri<S>
where
    S: Scope,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceUri::Scoped(scope) => write!(f, "{}", scope.to_string()),
            ResourceUri::Unscoped => write!(f, "*"),
        }
    }
}

/// A scoped URI together with its addressing mode: a plain resource,
/// an issuer-owned `my:` resource, or an `as:<did>:` resource bound to
/// a delegated identity.
#[derive(Clone, Eq, PartialEq)]
pub enum Resource<S>
where
    S: Scope,
{
    Resource { kind: ResourceUri<S> },
    My { kind: ResourceUri<S> },
    As { did: String, kind: ResourceUri<S> },
}

impl<S> Resource<S>
where
    S: Scope,
{
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Resource::Resource { kind }, Resource::Resource { kind: other_kind }) => {
                kind.contains(other_kind)
            }
            (Resource::My { kind }, Resource::My { kind: other_kind }) => {
                kind.contains(other_kind)
            }
            (
                Resource::As { did, kind },
                Resource::As {
                    did: other_did,
                    kind: other_kind,
                },
            ) => did == other_did && kind.contains(other_kind),
            _ => false,
        }
    }
}

impl<S> Display for Resource<S>
where
    S: Scope,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Resource { kind } => write!(f, "{kind}"),
            Resource::My { kind } => write!(f, "my:{kind}"),
            Resource::As { did, kind } => write!(f, "as:{did}:{kind}"),
        }
    }
}

/// A parser producing typed [CapabilityView]s for one `(Scope,
/// Ability)` family. Implementors usually only pick the type
/// parameters; all methods have defaults.
pub trait CapabilitySemantics<S, A>
where
    S: Scope,
    A: Ability,
{
    fn parse_scope(&self, scope: &Url) -> Result<S, CapabilityParseError> {
        S::parse(scope)
    }

    fn parse_ability(&self, ability: &str) -> Result<A, CapabilityParseError> {
        A::parse(ability)
    }

    /// Missing and null caveats normalize to the empty object, the
    /// most permissive caveat; anything else must be a JSON object.
    fn parse_caveat(&self, caveat: Option<&Value>) -> Result<Caveat, CapabilityParseError> {
        match caveat {
            None | Some(Value::Null) => Ok(Caveat::default()),
            Some(value) => Caveat::try_from(value),
        }
    }

    /// Parse the resource URI embedded in a `my:` or `as:` form, where
    /// `*` denotes the wildcard.
    fn parse_inner_resource(&self, inner: &str) -> Result<ResourceUri<S>, CapabilityParseError> {
        Ok(match inner {
            "*" => ResourceUri::Unscoped,
            _ => {
                let uri = Url::parse(inner)
                    .map_err(|_| CapabilityParseError::InvalidUri(inner.to_owned()))?;
                ResourceUri::Scoped(self.parse_scope(&uri)?)
            }
        })
    }

    /// Split an `as:` path into the DID and the remaining resource
    /// URI. The path must look like `did:key:<id>:<resource>`; the
    /// remainder keeps any further `:` separators.
    fn extract_did(&self, path: &str) -> Result<(String, String), CapabilityParseError> {
        let parts: Vec<&str> = path.split(':').collect();

        if parts.len() < 4 || parts[0] != "did" || parts[1] != "key" {
            return Err(CapabilityParseError::InvalidUri(format!("as:{path}")));
        }

        Ok((parts[..3].join(":"), parts[3..].join(":")))
    }

    fn parse(
        &self,
        resource: &str,
        ability: &str,
        caveat: Option<&Value>,
    ) -> Result<CapabilityView<S, A>, CapabilityParseError> {
        let cap_resource = if resource == "*" {
            Resource::Resource {
                kind: ResourceUri::Unscoped,
            }
        } else {
            let uri = Url::parse(resource)
                .map_err(|_| CapabilityParseError::InvalidUri(resource.to_owned()))?;

            match uri.scheme() {
                "my" => Resource::My {
                    kind: self.parse_inner_resource(uri.path())?,
                },
                "as" => {
                    let (did, inner) = self.extract_did(uri.path())?;
                    Resource::As {
                        did,
                        kind: self.parse_inner_resource(&inner)?,
                    }
                }
                _ => Resource::Resource {
                    kind: ResourceUri::Scoped(self.parse_scope(&uri)?),
                },
            }
        };

        let cap_ability = self.parse_ability(ability)?;
        let cap_caveat = self.parse_caveat(caveat)?;

        Ok(CapabilityView::new_with_caveat(
            cap_resource,
            cap_ability,
            cap_caveat,
        ))
    }

    fn parse_capability(
        &self,
        value: &Capability,
    ) -> Result<CapabilityView<S, A>, CapabilityParseError> {
        self.parse(&value.resource, &value.ability, Some(&value.caveat))
    }
}

/// A capability interpreted under a concrete `(Scope, Ability)`
/// family: a typed resource, a typed ability and a normalized caveat.
#[derive(Clone, Eq, PartialEq)]
pub struct CapabilityView<S, A>
where
    S: Scope,
    A: Ability,
{
    pub resource: Resource<S>,
    pub ability: A,
    pub caveat: Caveat,
}

impl<S, A> Debug for CapabilityView<S, A>
where
    S: Scope,
    A: Ability,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("resource", &self.resource.to_string())
            .field("ability", &self.ability.to_string())
            .field("caveat", &self.caveat.to_string())
            .finish()
    }
}

impl<S, A> CapabilityView<S, A>
where
    S: Scope,
    A: Ability,
{
    /// A view over a capability with the most permissive (empty)
    /// caveat.
    pub fn new(resource: Resource<S>, ability: A) -> Self {
        CapabilityView {
            resource,
            ability,
            caveat: Caveat::default(),
        }
    }

    pub fn new_with_caveat(resource: Resource<S>, ability: A, caveat: Caveat) -> Self {
        CapabilityView {
            resource,
            ability,
            caveat,
        }
    }

    /// The single partial order that governs delegation: this
    /// capability must contain the other's resource, be at least as
    /// permissive an ability, and admit the other's caveat.
    pub fn enables(&self, other: &CapabilityView<S, A>) -> bool {
        self.resource.contains(&other.resource)
            && self.ability >= other.ability
            && self.caveat.enables(&other.caveat)
    }

    pub fn resource(&self) -> &Resource<S> {
        &self.resource
    }

    pub fn ability(&self) -> &A {
        &self.ability
    }

    pub fn caveat(&self) -> &Caveat {
        &self.caveat
    }
}

impl<S, A> From<&CapabilityView<S, A>> for Capability
where
    S: Scope,
    A: Ability,
{
    fn from(value: &CapabilityView<S, A>) -> Self {
        Capability::new(
            value.resource.to_string(),
            value.ability.to_string(),
            Value::from(&value.caveat),
        )
    }
}

impl<S, A> From<CapabilityView<S, A>> for Capability
where
    S: Scope,
    A: Ability,
{
    fn from(value: CapabilityView<S, A>) -> Self {
        Capability::from(&value)
    }
}
