//! Tri-state wrapper for patch-style updates.
//!
//! A plain `Option<T>` field cannot distinguish "leave the column alone"
//! from "set the column to NULL". [`Nullable`] names the three states
//! explicitly instead of stacking two levels of optionality.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a patch: absent, explicit NULL, or explicit value.
///
/// The default is [`Nullable::Absent`], so `..Default::default()` leaves
/// every other column untouched:
///
/// ```ignore
/// let patch = WidgetPatch {
///     owner_id: Nullable::null(),     // owner_id = NULL
///     status: Nullable::value("ok"),  // status = 'ok'
///     ..Default::default()            // everything else absent
/// };
/// ```
///
/// When deserialized with serde, a JSON `null` maps to `Null` and a present
/// value to `Value`; mark fields `#[serde(default)]` so a missing key maps
/// to `Absent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The field does not participate in the update.
    #[default]
    Absent,
    /// The field participates and sets the column to SQL NULL.
    Null,
    /// The field participates with a concrete value.
    Value(T),
}

impl<T> Nullable<T> {
    /// Participate with a concrete value.
    pub fn value(value: T) -> Self {
        Nullable::Value(value)
    }

    /// Participate with an explicit SQL NULL.
    pub fn null() -> Self {
        Nullable::Null
    }

    /// Do not participate.
    pub fn absent() -> Self {
        Nullable::Absent
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Nullable::Value(_))
    }

    /// Borrow the inner value, if any.
    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Absent => Nullable::Absent,
            Nullable::Null => Nullable::Null,
            Nullable::Value(v) => Nullable::Value(v),
        }
    }

    /// Map the value state, preserving the other two.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
        match self {
            Nullable::Absent => Nullable::Absent,
            Nullable::Null => Nullable::Null,
            Nullable::Value(v) => Nullable::Value(f(v)),
        }
    }
}

/// `None` ⇒ absent, `Some(None)` ⇒ explicit NULL, `Some(Some(v))` ⇒ value.
impl<T> From<Option<Option<T>>> for Nullable<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Nullable::Absent,
            Some(None) => Nullable::Null,
            Some(Some(v)) => Nullable::Value(v),
        }
    }
}

impl<T> From<Nullable<T>> for Option<Option<T>> {
    fn from(value: Nullable<T>) -> Self {
        match value {
            Nullable::Absent => None,
            Nullable::Null => Some(None),
            Nullable::Value(v) => Some(Some(v)),
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Value(v) => serializer.serialize_some(v),
            // Absent should normally be skipped at the field level with
            // `#[serde(skip_serializing_if = "Nullable::is_absent")]`;
            // serialized anyway, it collapses to null.
            Nullable::Null | Nullable::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Nullable::Value(v),
            None => Nullable::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_absent() {
        assert!(Nullable::<i32>::default().is_absent());
    }

    #[test]
    fn nested_option_round_trip() {
        assert_eq!(Nullable::<i32>::from(None), Nullable::Absent);
        assert_eq!(Nullable::from(Some(None::<i32>)), Nullable::Null);
        assert_eq!(Nullable::from(Some(Some(3))), Nullable::Value(3));

        let back: Option<Option<i32>> = Nullable::Value(3).into();
        assert_eq!(back, Some(Some(3)));
    }

    #[test]
    fn map_preserves_states() {
        assert_eq!(Nullable::Value(2).map(|v| v * 2), Nullable::Value(4));
        assert_eq!(Nullable::<i32>::Null.map(|v| v * 2), Nullable::Null);
        assert_eq!(Nullable::<i32>::Absent.map(|v| v * 2), Nullable::Absent);
    }

    #[test]
    fn serde_null_vs_value() {
        #[derive(serde::Deserialize)]
        struct Patch {
            #[serde(default)]
            owner: Nullable<String>,
        }

        let set: Patch = serde_json::from_str(r#"{"owner": "alice"}"#).unwrap();
        assert_eq!(set.owner, Nullable::Value("alice".to_string()));

        let cleared: Patch = serde_json::from_str(r#"{"owner": null}"#).unwrap();
        assert!(cleared.owner.is_null());

        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert!(missing.owner.is_absent());
    }
}
