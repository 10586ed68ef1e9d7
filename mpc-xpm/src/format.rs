//! Value formatting used by the XPM schema

use serde::Serializer;

/// Serialize a float as a fixed six-decimal string
pub(crate) fn fixed6<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.6}"))
}

/// Serialize a flag as `True` / `False`
pub(crate) fn flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}
