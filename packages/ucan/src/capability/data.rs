use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, ops::Deref};

/// A single flattened capability: a resource URI, an ability name and
/// one caveat object.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Capability {
    pub resource: String,
    pub ability: String,
    pub caveat: Value,
}

impl Capability {
    pub fn new(resource: String, ability: String, caveat: Value) -> Self {
        Capability {
            resource,
            ability,
            caveat,
        }
    }
}

impl From<&Capability> for Capability {
    fn from(value: &Capability) -> Self {
        value.to_owned()
    }
}

impl From<(String, String, Value)> for Capability {
    fn from(value: (String, String, Value)) -> Self {
        Capability::new(value.0, value.1, value.2)
    }
}

impl From<(&str, &str, &Value)> for Capability {
    fn from(value: (&str, &str, &Value)) -> Self {
        Capability::new(value.0.to_owned(), value.1.to_owned(), value.2.to_owned())
    }
}

impl From<Capability> for (String, String, Value) {
    fn from(value: Capability) -> Self {
        (value.resource, value.ability, value.caveat)
    }
}

pub type Abilities = BTreeMap<String, Vec<Value>>;
type CapabilitiesImpl = BTreeMap<String, Abilities>;

/// The wire form of a UCAN's capabilities: a map from resource URI to
/// a map from ability name to a list of caveat objects.
///
/// ```
/// use ucan::capability::Capabilities;
/// use serde_json::json;
///
/// let capabilities = Capabilities::try_from(&json!({
///   "mailto:username@example.com": {
///     "msg/receive": [{}],
///     "msg/send": [{ "draft": true }, { "publish": true, "topic": ["foo"]}]
///   }
/// })).unwrap();
///
/// let resource = capabilities.get("mailto:username@example.com").unwrap();
/// assert_eq!(resource.get("msg/receive").unwrap(), &vec![json!({})]);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Capabilities(CapabilitiesImpl);

impl Capabilities {
    /// Iterate the map-of-maps as a flattened sequence of [Capability]
    /// values. An ability with an empty caveat list grants nothing and
    /// is omitted, so a resource whose abilities are all empty
    /// disappears entirely.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().flat_map(|(resource, abilities)| {
            abilities.iter().flat_map(move |(ability, caveats)| {
                caveats.iter().map(move |caveat| {
                    Capability::new(resource.clone(), ability.clone(), caveat.clone())
                })
            })
        })
    }
}

impl Deref for Capabilities {
    type Target = CapabilitiesImpl;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Capability>> for Capabilities {
    type Error = anyhow::Error;

    fn try_from(value: Vec<Capability>) -> Result<Self, Self::Error> {
        let mut resources: CapabilitiesImpl = BTreeMap::new();

        for capability in value.into_iter() {
            let (resource_name, ability, caveat) = <(String, String, Value)>::from(capability);

            if !caveat.is_object() {
                return Err(anyhow!("Caveat must be an object: {}", caveat));
            }

            let abilities = resources.entry(resource_name).or_default();
            abilities.entry(ability).or_default().push(caveat);
        }

        Ok(Capabilities(resources))
    }
}

impl TryFrom<&Value> for Capabilities {
    type Error = anyhow::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value
            .as_object()
            .ok_or_else(|| anyhow!("Capabilities must be an object"))?;
        let mut resources: CapabilitiesImpl = BTreeMap::new();

        for (resource, value) in map.iter() {
            let abilities_object = value
                .as_object()
                .ok_or_else(|| anyhow!("Abilities must be an object"))?;

            if abilities_object.is_empty() {
                return Err(anyhow!("No abilities given for resource: {}", resource));
            }

            let mut abilities: Abilities = BTreeMap::new();
            for (ability, value) in abilities_object.iter() {
                let caveats = value
                    .as_array()
                    .ok_or_else(|| anyhow!("Caveats must be an array"))?;

                for caveat in caveats.iter() {
                    if !caveat.is_object() {
                        return Err(anyhow!("Caveat must be an object: {}", caveat));
                    }
                }

                abilities.insert(ability.to_owned(), caveats.to_owned());
            }

            resources.insert(resource.to_owned(), abilities);
        }

        Ok(Capabilities(resources))
    }
}

impl TryFrom<Value> for Capabilities {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Capabilities::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_parses_the_nested_map_form() {
        let capabilities = Capabilities::try_from(&json!({
            "mailto:username@example.com": {
                "msg/receive": [{}],
                "msg/send": [{ "draft": true }, { "publish": true, "topic": ["foo"] }]
            }
        }))
        .unwrap();

        let resource = capabilities.get("mailto:username@example.com").unwrap();

        assert_eq!(resource.get("msg/receive").unwrap(), &vec![json!({})]);
        assert_eq!(
            resource.get("msg/send").unwrap(),
            &vec![
                json!({ "draft": true }),
                json!({ "publish": true, "topic": ["foo"] })
            ]
        );
    }

    #[test]
    fn it_flattens_to_a_capability_sequence() {
        let capabilities = Capabilities::try_from(&json!({
            "example://example.com/private/84MZ7aqwKn7sNiMGsSbaxsEa6EPnQLoKYbXByxNBrCEr": {
                "wnfs/append": [{}]
            },
            "mailto:username@example.com": {
                "msg/receive": [{}],
                "msg/send": [{ "draft": true }, { "publish": true, "topic": ["foo"] }]
            }
        }))
        .unwrap();

        assert_eq!(
            capabilities.iter().collect::<Vec<Capability>>(),
            vec![
                Capability::from((
                    "example://example.com/private/84MZ7aqwKn7sNiMGsSbaxsEa6EPnQLoKYbXByxNBrCEr",
                    "wnfs/append",
                    &json!({})
                )),
                Capability::from(("mailto:username@example.com", "msg/receive", &json!({}))),
                Capability::from((
                    "mailto:username@example.com",
                    "msg/send",
                    &json!({ "draft": true })
                )),
                Capability::from((
                    "mailto:username@example.com",
                    "msg/send",
                    &json!({ "publish": true, "topic": ["foo"] })
                )),
            ]
        );
    }

    #[test]
    fn it_round_trips_between_sequence_and_map_forms() {
        let sequence = vec![
            Capability::from(("mailto:alice@email.com", "email/send", &json!({}))),
            Capability::from(("wnfs://alice.fission.name/public", "wnfs/create", &json!({}))),
            Capability::from((
                "wnfs://alice.fission.name/public",
                "wnfs/revise",
                &json!({ "path": "/public/Apps" }),
            )),
        ];

        let capabilities = Capabilities::try_from(sequence.clone()).unwrap();

        assert_eq!(capabilities.iter().collect::<Vec<Capability>>(), sequence);
    }

    #[test]
    fn it_drops_abilities_with_empty_caveat_lists_when_flattening() {
        let capabilities = Capabilities::try_from(&json!({
            "mailto:username@example.com": {
                "msg/receive": [],
                "msg/send": [{}]
            },
            "mailto:silent@example.com": {
                "msg/send": []
            }
        }))
        .unwrap();

        let sequence = capabilities.iter().collect::<Vec<Capability>>();

        assert_eq!(
            sequence,
            vec![Capability::from((
                "mailto:username@example.com",
                "msg/send",
                &json!({})
            ))]
        );

        // Rebuilding from the flattened form drops the emptied
        // resource entirely
        let rebuilt = Capabilities::try_from(sequence).unwrap();
        assert!(rebuilt.get("mailto:silent@example.com").is_none());
    }

    #[test]
    fn it_rejects_caveats_that_are_not_objects() {
        assert!(Capabilities::try_from(&json!({
            "mailto:username@example.com": {
                "msg/send": [1]
            }
        }))
        .is_err());

        assert!(Capabilities::try_from(vec![Capability::from((
            "mailto:username@example.com",
            "msg/send",
            &json!("caveat")
        ))])
        .is_err());
    }

    #[test]
    fn it_requires_at_least_one_ability_per_resource() {
        assert!(Capabilities::try_from(&json!({
            "mailto:username@example.com": {}
        }))
        .is_err());
    }

    #[test]
    fn it_round_trips_through_serde() {
        let capabilities = Capabilities::try_from(&json!({
            "mailto:username@example.com": {
                "msg/send": [{ "draft": true }]
            }
        }))
        .unwrap();

        let value = serde_json::to_value(&capabilities).unwrap();
        let decoded: Capabilities = serde_json::from_value(value).unwrap();

        assert_eq!(capabilities, decoded);
    }
}
