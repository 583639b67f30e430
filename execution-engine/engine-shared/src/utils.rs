use serde::Serialize;

/// Serializes `value` into JSON, falling back to an error object if serialization fails.
pub fn jsonify<T>(value: T, pretty_print: bool) -> String
where
    T: Serialize,
{
    let fj = if pretty_print {
        serde_json::to_string_pretty
    } else {
        serde_json::to_string
    };

    match fj(&value) {
        Ok(json) => json,
        Err(_) => "{\"error\": \"encountered error serializing value\"}".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn should_serialize_map_compactly() {
        let mut map = BTreeMap::new();
        map.insert("action", "set_key_weight");
        assert_eq!(jsonify(&map, false), "{\"action\":\"set_key_weight\"}");
    }

    #[test]
    fn should_pretty_print() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        assert!(jsonify(&map, true).contains('\n'));
    }
}
