use serde::Deserialize;
use serde::de::IgnoredAny;

/// A config value that may have the wrong shape.
///
/// Deserialization never fails on a `Lenient<T>`: anything that does not fit
/// `T` is swallowed as `Malformed`, and the caller substitutes its default.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

impl<T> Lenient<T> {
    /// Resolve an optional field, warning when a present value is unusable.
    pub fn resolve(field: Option<Self>, name: &str) -> Option<T> {
        match field? {
            Lenient::Valid(v) => Some(v),
            Lenient::Malformed(_) => {
                tracing::warn!("ip_filter.{name} is malformed, using the default");
                None
            }
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}
