//! Attribute access on uniform JSON records.

/// A record rendered by a table. Records arrive as uniform JSON objects from
/// the resource client; the table engine never assumes any schema beyond what
/// the bound field descriptions reference.
pub type Record = serde_json::Value;

/// Look up a possibly nested attribute with dotted-path syntax, e.g.
/// `"master.numOfInstances"`. Array segments may be numeric indices.
/// Returns `None` for any missing segment instead of failing.
pub fn lookup_path<'a>(record: &'a Record, path: &str) -> Option<&'a Record> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            other => other.get(segment)?,
        };
    }
    Some(current)
}

/// Turn a JSON value into cell text. Strings render unquoted; `null` renders
/// as absent so the field's default value applies.
pub fn display_string(value: &Record) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_paths() {
        let record = json!({"master": {"numOfInstances": 2}});
        let value = lookup_path(&record, "master.numOfInstances").unwrap();
        assert_eq!(value, &json!(2));
    }

    #[test]
    fn missing_segment_resolves_to_none() {
        let record = json!({"master": {"numOfInstances": 2}});
        assert!(lookup_path(&record, "master.missing").is_none());
        assert!(lookup_path(&record, "worker.numOfInstances").is_none());
    }

    #[test]
    fn indexes_into_arrays() {
        let record = json!({"workers": [{"id": "w0"}, {"id": "w1"}]});
        let value = lookup_path(&record, "workers.1.id").unwrap();
        assert_eq!(display_string(value).as_deref(), Some("w1"));
    }

    #[test]
    fn display_string_unquotes_strings_and_skips_null() {
        assert_eq!(display_string(&json!("df1")).as_deref(), Some("df1"));
        assert_eq!(display_string(&json!(2)).as_deref(), Some("2"));
        assert_eq!(display_string(&json!(true)).as_deref(), Some("true"));
        assert!(display_string(&serde_json::Value::Null).is_none());
    }
}
