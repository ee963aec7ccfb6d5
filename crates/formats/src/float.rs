//! Lenient numeric decoding for stored track data.
//!
//! Older track rows carry coordinates as JSON strings (`"46.05"`) instead of
//! numbers. Both spellings decode to the same `f64`. Non-finite values are
//! rejected either way.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(v) => v,
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}")))?,
    };
    if !value.is_finite() {
        return Err(de::Error::custom(format!("coordinate must be finite, got {value}")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Coord {
        #[serde(deserialize_with = "super::lenient_f64")]
        v: f64,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let a: Coord = serde_json::from_str(r#"{"v": 46.5}"#).unwrap();
        let b: Coord = serde_json::from_str(r#"{"v": " 46.5"}"#).unwrap();
        assert_eq!(a.v, 46.5);
        assert_eq!(b.v, 46.5);
    }

    #[test]
    fn rejects_garbage_strings() {
        assert!(serde_json::from_str::<Coord>(r#"{"v": "north"}"#).is_err());
        assert!(serde_json::from_str::<Coord>(r#"{"v": null}"#).is_err());
    }

    #[test]
    fn rejects_non_finite_strings() {
        for raw in [r#"{"v": "NaN"}"#, r#"{"v": "inf"}"#, r#"{"v": "-infinity"}"#] {
            let err = serde_json::from_str::<Coord>(raw).unwrap_err();
            assert!(err.to_string().contains("finite"), "{raw}: {err}");
        }
    }
}
