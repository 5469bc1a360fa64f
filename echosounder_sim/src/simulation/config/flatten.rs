// echosounder_sim/src/simulation/config/flatten.rs

//! Turns a nested TOML tree into the flat `key -> scalar` store the core reads.

use std::collections::BTreeMap;

use echosounder_core::settings::SettingsSource;
use toml::Value;

/// A flat view of every numeric or boolean leaf in a settings file, keyed by
/// its dotted path (`[Echosounder.position] x = 0.1` becomes
/// `"Echosounder.position.x" -> 0.1`). Strings, dates and arrays are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSettings(pub BTreeMap<String, f64>);

impl FlatSettings {
    pub fn from_toml(value: &Value) -> Self {
        let mut out = BTreeMap::new();
        flatten_into(value, "", &mut out);
        Self(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SettingsSource for FlatSettings {
    fn scalar(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }
}

fn flatten_into(value: &Value, prefix: &str, out: &mut BTreeMap<String, f64>) {
    match value {
        Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(child, &path, out);
            }
        }
        Value::Integer(i) => {
            out.insert(prefix.to_string(), *i as f64);
        }
        Value::Float(f) => {
            out.insert(prefix.to_string(), *f);
        }
        Value::Boolean(b) => {
            out.insert(prefix.to_string(), if *b { 1.0 } else { 0.0 });
        }
        // Not scalars; the core has no use for them.
        Value::String(_) | Value::Datetime(_) | Value::Array(_) => {}
    }
}
