//! Annotation argument normalization

use indexmap::IndexMap;

use crate::value::Value;

/// Normalized arguments: positional indices (`"0"`, `"1"`, ...) or names
pub type Args = IndexMap<String, Value>;

/// Arguments as passed to a decorator factory
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawArgs {
    /// Called with no arguments
    #[default]
    None,
    /// Called with a positional argument list
    Positional(Vec<Value>),
    /// Called with a single object of named arguments
    Named(IndexMap<String, Value>),
}

impl RawArgs {
    /// Positional arguments
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        RawArgs::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Named arguments, keys kept verbatim in the given order
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        RawArgs::Named(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Vec<Value>> for RawArgs {
    fn from(values: Vec<Value>) -> Self {
        RawArgs::Positional(values)
    }
}

impl From<IndexMap<String, Value>> for RawArgs {
    fn from(named: IndexMap<String, Value>) -> Self {
        RawArgs::Named(named)
    }
}

/// Convert call-time arguments to a uniform mapping
///
/// Values are moved in untouched; an empty call yields an empty mapping.
pub fn normalize(raw: RawArgs) -> Args {
    match raw {
        RawArgs::None => Args::new(),
        RawArgs::Positional(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        RawArgs::Named(named) => named,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_call() {
        assert!(normalize(RawArgs::None).is_empty());
        assert!(normalize(RawArgs::positional(Vec::<Value>::new())).is_empty());
    }

    #[test]
    fn test_positional_keys() {
        let args = normalize(RawArgs::positional(["Custom", "Arguments"]));

        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["0", "1"]);
        assert_eq!(args["1"], Value::from("Arguments"));
    }

    #[test]
    fn test_named_keys_verbatim() {
        let args = normalize(RawArgs::named([
            ("token", Value::from("Custom")),
            ("name", Value::Undefined),
        ]));

        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["token", "name"]);
        assert_eq!(args["name"], Value::Undefined);
    }
}
