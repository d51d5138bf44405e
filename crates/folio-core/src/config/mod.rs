use serde_json::{Map, Value};

/// Site configuration: a JSON object addressed by dotted paths (`"timeline.rowHeight"`).
///
/// Layout option structs read from this with per-key fallbacks, so a partial (or empty) config
/// is always valid.
#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig(Value);

impl Default for FolioConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl FolioConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    /// Finite numbers only; `NaN`-like inputs cannot occur in JSON but strings such as `"12"` are
    /// not coerced.
    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_i64(&self, dotted_path: &str) -> Option<i64> {
        self.lookup(dotted_path)?.as_i64()
    }

    pub fn get_str_list(&self, dotted_path: &str) -> Option<Vec<String>> {
        let items = self.lookup(dotted_path)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Overlays `other` on top of this config (objects merge key by key, everything else is
    /// replaced).
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FolioConfig;
    use serde_json::json;

    #[test]
    fn dotted_paths_read_nested_values() {
        let cfg = FolioConfig::from_value(json!({
            "timeline": { "rowHeight": 46, "mode": "fit" },
            "skillTree": { "foundationAreas": ["Math", 3, "Tools"] }
        }));
        assert_eq!(cfg.get_f64("timeline.rowHeight"), Some(46.0));
        assert_eq!(cfg.get_str("timeline.mode"), Some("fit"));
        assert_eq!(cfg.get_f64("timeline.missing"), None);
        assert_eq!(
            cfg.get_str_list("skillTree.foundationAreas"),
            Some(vec!["Math".to_string(), "Tools".to_string()])
        );
    }

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let mut cfg =
            FolioConfig::from_json_str(r#"{ "timeline": { "rowHeight": 44, "labelMargin": 12 } }"#)
                .unwrap();
        cfg.deep_merge(&json!({ "timeline": { "rowHeight": 48 } }));
        assert_eq!(cfg.get_f64("timeline.rowHeight"), Some(48.0));
        assert_eq!(cfg.get_f64("timeline.labelMargin"), Some(12.0));
    }

    #[test]
    fn malformed_config_json_is_an_error() {
        assert!(matches!(
            FolioConfig::from_json_str("{ timeline: }"),
            Err(crate::Error::Json(_))
        ));
    }
}
