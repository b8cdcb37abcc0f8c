use crate::error::CapabilityParseError;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::ops::Deref;

/// A JSON-object restriction attached to a capability. The empty
/// object is the most permissive caveat there is; any key/value pair
/// narrows the grant.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Caveat(Map<String, Value>);

impl Caveat {
    /// Determines if this [Caveat] admits everything the provided
    /// caveat admits: an empty caveat admits anything, and a non-empty
    /// caveat admits another when every key/value pair here appears in
    /// the other verbatim. Extra keys in the other caveat only narrow
    /// it further and do not matter.
    pub fn enables(&self, other: &Caveat) -> bool {
        if self.is_empty() {
            return true;
        }

        if other.is_empty() {
            return false;
        }

        for (key, value) in self.iter() {
            match other.get(key) {
                Some(other_value) if value == other_value => continue,
                _ => return false,
            }
        }

        true
    }
}

impl Deref for Caveat {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Caveat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

impl TryFrom<&Value> for Caveat {
    type Error = CapabilityParseError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Ok(Caveat(object.clone())),
            other => Err(CapabilityParseError::InvalidCaveat(other.to_string())),
        }
    }
}

impl From<&Caveat> for Value {
    fn from(caveat: &Caveat) -> Self {
        Value::Object(caveat.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caveat(value: Value) -> Caveat {
        Caveat::try_from(&value).unwrap()
    }

    #[test]
    fn it_treats_the_empty_object_as_most_permissive() {
        let no_caveat = caveat(json!({}));
        let x_caveat = caveat(json!({ "x": true }));

        assert!(no_caveat.enables(&no_caveat));
        assert!(no_caveat.enables(&x_caveat));
        assert!(!x_caveat.enables(&no_caveat));
    }

    #[test]
    fn it_compares_keys_and_values() {
        let x_caveat = caveat(json!({ "x": true }));
        let x_diff_caveat = caveat(json!({ "x": false }));
        let y_caveat = caveat(json!({ "y": true }));
        let xz_caveat = caveat(json!({ "x": true, "z": true }));

        assert!(x_caveat.enables(&x_caveat));
        assert!(x_caveat.enables(&xz_caveat));
        assert!(!x_caveat.enables(&x_diff_caveat));
        assert!(!x_caveat.enables(&y_caveat));
        assert!(!xz_caveat.enables(&x_caveat));
    }

    #[test]
    fn it_is_transitive() {
        let top = caveat(json!({}));
        let x = caveat(json!({ "x": true }));
        let xy = caveat(json!({ "x": true, "y": true }));

        assert!(top.enables(&x));
        assert!(x.enables(&xy));
        assert!(top.enables(&xy));
    }

    #[test]
    fn it_rejects_values_that_are_not_objects() {
        assert!(Caveat::try_from(&json!([1, 2])).is_err());
        assert!(Caveat::try_from(&json!("caveat")).is_err());
        assert!(Caveat::try_from(&json!(null)).is_err());
    }
}
