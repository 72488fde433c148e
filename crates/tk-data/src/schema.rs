//! Alias-based matching of container keys to dataset fields.

use crate::error::{DataError, DataResult};
use crate::reader::ArrayContainer;

/// The three arrays a step-response experiment needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Time,
    Input,
    Output,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Time => "time",
            Field::Input => "input",
            Field::Output => "output",
        }
    }
}

/// Ordered aliases for one field. Earlier aliases win.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub field: Field,
    pub aliases: Vec<String>,
}

/// Ordered alias sets, one per field.
#[derive(Debug, Clone)]
pub struct Schema {
    pub fields: Vec<FieldAliases>,
}

impl Default for Schema {
    /// English, Spanish and Portuguese names used by lab acquisition scripts.
    fn default() -> Self {
        let set = |field, aliases: &[&str]| FieldAliases {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        };
        Self {
            fields: vec![
                set(Field::Time, &["time", "t", "tiempo", "tempo"]),
                set(Field::Input, &["input", "u", "entrada"]),
                set(Field::Output, &["output", "y", "salida", "saida"]),
            ],
        }
    }
}

/// Arrays resolved for the three fields, with the keys that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArrays {
    pub time: (String, Vec<f64>),
    pub input: (String, Vec<f64>),
    pub output: (String, Vec<f64>),
}

impl Schema {
    /// Find the container key for `field`.
    ///
    /// Exact matches on any alias beat decorated ones, so `entrada` wins over
    /// `u_ref`. Within each pass the first alias in order wins, then container
    /// order.
    pub fn find_key<'c>(&self, field: Field, container: &'c ArrayContainer) -> Option<&'c str> {
        let aliases: Vec<String> = self
            .fields
            .iter()
            .find(|f| f.field == field)?
            .aliases
            .iter()
            .map(|a| a.to_ascii_lowercase())
            .collect();
        let exact = |alias: &String| container.keys().find(|k| last_segment(k) == *alias);
        let decorated = |alias: &String| container.keys().find(|k| is_decorated(&last_segment(k), alias));
        aliases
            .iter()
            .find_map(exact)
            .or_else(|| aliases.iter().find_map(decorated))
    }

    /// Resolve all three fields.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Schema`] naming the first field with no matching key.
    pub fn resolve(&self, container: &ArrayContainer) -> DataResult<ResolvedArrays> {
        let take = |field: Field| -> DataResult<(String, Vec<f64>)> {
            let key = self
                .find_key(field, container)
                .ok_or_else(|| DataError::Schema {
                    field: field.name(),
                    available: container.keys().collect::<Vec<_>>().join(", "),
                })?;
            let values = container.get(key).unwrap_or_default().to_vec();
            Ok((key.to_string(), values))
        };
        Ok(ResolvedArrays {
            time: take(Field::Time)?,
            input: take(Field::Input)?,
            output: take(Field::Output)?,
        })
    }
}

/// Lowercased final path component of a key (`/exp/Tiempo` -> `tiempo`).
fn last_segment(key: &str) -> String {
    key.rsplit(['/', '\\', '.'])
        .next()
        .unwrap_or(key)
        .trim()
        .to_ascii_lowercase()
}

/// `tiempo_s`, `y1`, `time(s)` or `exp_time` all carry `alias` with decoration.
fn is_decorated(segment: &str, alias: &str) -> bool {
    if let Some(rest) = segment.strip_prefix(alias) {
        if rest.chars().next().is_some_and(|c| !c.is_ascii_alphabetic()) {
            return true;
        }
    }
    segment
        .strip_suffix(alias)
        .is_some_and(|head| head.ends_with('_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(keys: &[&str]) -> ArrayContainer {
        let mut c = ArrayContainer::new();
        for (i, k) in keys.iter().enumerate() {
            c.insert(*k, vec![i as f64]);
        }
        c
    }

    #[test]
    fn spanish_keys_resolve() {
        let c = container(&["tiempo", "entrada", "salida"]);
        let r = Schema::default().resolve(&c).unwrap();
        assert_eq!(r.time.0, "tiempo");
        assert_eq!(r.input.0, "entrada");
        assert_eq!(r.output.0, "salida");
    }

    #[test]
    fn case_and_path_tolerant() {
        let c = container(&["/data/TIME", "exp.Input", "Y"]);
        let r = Schema::default().resolve(&c).unwrap();
        assert_eq!(r.time.0, "/data/TIME");
        assert_eq!(r.input.0, "exp.Input");
        assert_eq!(r.output.0, "Y");
    }

    #[test]
    fn decorated_keys_resolve() {
        let c = container(&["time_s", "u1", "raw_output"]);
        let r = Schema::default().resolve(&c).unwrap();
        assert_eq!(r.time.0, "time_s");
        assert_eq!(r.input.0, "u1");
        assert_eq!(r.output.0, "raw_output");
    }

    #[test]
    fn alias_order_beats_container_order() {
        let c = container(&["t", "time", "u", "y"]);
        let r = Schema::default().resolve(&c).unwrap();
        assert_eq!(r.time.0, "time");
    }

    #[test]
    fn exact_alias_beats_decorated_earlier_alias() {
        let c = container(&["tiempo", "u_ref", "entrada", "salida"]);
        let schema = Schema::default();
        assert_eq!(schema.find_key(Field::Input, &c), Some("entrada"));

        // With no exact match the decorated key still resolves.
        let c = container(&["tiempo", "u_ref", "salida"]);
        assert_eq!(schema.find_key(Field::Input, &c), Some("u_ref"));
    }

    #[test]
    fn alphabetic_continuation_is_not_a_match() {
        // "temperature" must not be taken for "t", nor "user" for "u".
        let c = container(&["temperature", "user", "y"]);
        let schema = Schema::default();
        assert!(schema.find_key(Field::Time, &c).is_none());
        assert!(schema.find_key(Field::Input, &c).is_none());
    }

    #[test]
    fn missing_field_is_schema_error() {
        let c = container(&["time", "input"]);
        match Schema::default().resolve(&c) {
            Err(DataError::Schema { field, .. }) => assert_eq!(field, "output"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
