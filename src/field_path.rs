//! Typed accessors into a product record
//!
//! Category configs name the value each criterion reads with a dotted path
//! (`scores.c3`, `specs.peak_brightness_nits`). Paths are parsed once, when
//! the config is loaded, so a typo fails the load instead of silently
//! producing a missing value at scoring time.

use crate::error::ConfigError;
use crate::types::{ProductRecord, RawValue};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPath {
    Score(String),
    Spec(String),
    Attribute(String),
    Price,
    Brand,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        let unknown = || ConfigError::UnknownFieldPath(path.to_string());

        match path.split_once('.') {
            None => match path {
                "price" => Ok(FieldPath::Price),
                "brand" => Ok(FieldPath::Brand),
                _ => Err(unknown()),
            },
            Some((_, key)) if key.is_empty() || key.contains('.') => Err(unknown()),
            Some(("scores", key)) => Ok(FieldPath::Score(key.to_string())),
            Some(("specs", key)) => Ok(FieldPath::Spec(key.to_string())),
            Some(("attributes", key)) => Ok(FieldPath::Attribute(key.to_string())),
            Some(_) => Err(unknown()),
        }
    }

    /// Read the value from a product. Absent keys and explicit nulls both
    /// resolve to `None`.
    pub fn resolve(&self, product: &ProductRecord) -> Option<RawValue> {
        let value = match self {
            FieldPath::Score(key) => product.scores.get(key).copied().flatten().map(RawValue::Number),
            FieldPath::Spec(key) => product.specs.get(key).cloned(),
            FieldPath::Attribute(key) => product.attributes.get(key).cloned(),
            FieldPath::Price => Some(RawValue::Number(product.price)),
            FieldPath::Brand => Some(RawValue::Text(product.brand.clone())),
        };
        value.filter(|v| !v.is_missing())
    }

    pub fn spec_key(&self) -> Option<&str> {
        match self {
            FieldPath::Spec(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Score(k) => write!(f, "scores.{}", k),
            FieldPath::Spec(k) => write!(f, "specs.{}", k),
            FieldPath::Attribute(k) => write!(f, "attributes.{}", k),
            FieldPath::Price => write!(f, "price"),
            FieldPath::Brand => write!(f, "brand"),
        }
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roots() {
        assert_eq!(FieldPath::parse("scores.c3").unwrap(), FieldPath::Score("c3".into()));
        assert_eq!(
            FieldPath::parse("specs.refresh_rate_hz").unwrap(),
            FieldPath::Spec("refresh_rate_hz".into())
        );
        assert_eq!(FieldPath::parse("price").unwrap(), FieldPath::Price);
        assert_eq!(FieldPath::parse("brand").unwrap(), FieldPath::Brand);
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        for bad in ["score.c3", "specs.", "specs.a.b", "weight", "", "meta.x"] {
            assert!(
                matches!(FieldPath::parse(bad), Err(ConfigError::UnknownFieldPath(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resolve_treats_null_as_missing() {
        let product = ProductRecord::new("p1", "tv", "acme", 1000.0)
            .with_spec("panel_type", RawValue::Null)
            .with_score("c1", 7.5);

        assert_eq!(FieldPath::Spec("panel_type".into()).resolve(&product), None);
        assert_eq!(FieldPath::Spec("absent".into()).resolve(&product), None);
        assert_eq!(
            FieldPath::Score("c1".into()).resolve(&product),
            Some(RawValue::Number(7.5))
        );

        let mut nulled = product.clone();
        nulled.scores.insert("c3".into(), None);
        assert_eq!(FieldPath::Score("c3".into()).resolve(&nulled), None);
    }

    #[test]
    fn test_deserialize_via_string() {
        let path: FieldPath = serde_json::from_str("\"attributes.color\"").unwrap();
        assert_eq!(path, FieldPath::Attribute("color".into()));
        assert!(serde_json::from_str::<FieldPath>("\"nope.color\"").is_err());
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"attributes.color\"");
    }
}
