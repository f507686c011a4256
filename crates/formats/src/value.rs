use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dynamically typed table cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

/// One input row: column name to value.
pub type RawRow = BTreeMap<String, Scalar>;

impl Scalar {
    /// Dynamic typing for delimited cells: empty is null, anything `f64` accepts
    /// (including `NaN` and `inf`) is a number, everything else is text.
    pub fn parse_cell(raw: &str) -> Scalar {
        let raw = raw.trim();
        if raw.is_empty() {
            return Scalar::Null;
        }
        match raw.parse::<f64>() {
            Ok(v) => Scalar::Number(v),
            Err(_) => Scalar::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Number that is neither NaN nor infinite.
    pub fn as_finite(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// Builds a row from `(column, value)` pairs.
pub fn row<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> RawRow
where
    K: Into<String>,
    V: Into<Scalar>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn parse_cell_types_dynamically() {
        assert_eq!(Scalar::parse_cell(""), Scalar::Null);
        assert_eq!(Scalar::parse_cell("  "), Scalar::Null);
        assert_eq!(Scalar::parse_cell("1.25"), Scalar::Number(1.25));
        assert_eq!(Scalar::parse_cell("-3"), Scalar::Number(-3.0));
        assert_eq!(
            Scalar::parse_cell("85560b2ffffffff"),
            Scalar::Text("85560b2ffffffff".to_string())
        );
    }

    #[test]
    fn nan_is_a_number_but_not_finite() {
        let v = Scalar::parse_cell("NaN");
        assert!(v.as_f64().is_some_and(f64::is_nan));
        assert_eq!(v.as_finite(), None);
        assert_eq!(Scalar::parse_cell("inf").as_finite(), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Scalar::Number(1.5),
            Scalar::Text("a".into()),
            Scalar::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"a",null]"#);
    }
}
