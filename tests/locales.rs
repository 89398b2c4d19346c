use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde_yaml::Value;

fn keys(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let k = k.as_str().unwrap_or_default();
                let path = if prefix.is_empty() {
                    k.to_string()
                } else {
                    format!("{prefix}.{k}")
                };
                keys(&path, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(name: &str) -> BTreeSet<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("locales").join(name);
    let text = fs::read_to_string(&path).unwrap();
    let value: Value = serde_yaml::from_str(&text).unwrap();
    let mut out = BTreeSet::new();
    keys("", &value, &mut out);
    out
}

#[test]
fn test_locales_share_keys() {
    let en = locale_keys("en.yml");
    let nb = locale_keys("nb.yml");
    assert!(en.contains("events.level_up"));
    assert_eq!(en, nb);
}

#[test]
fn test_placeholders_match() {
    let en = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("locales/en.yml")).unwrap();
    let nb = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("locales/nb.yml")).unwrap();
    let placeholders = |text: &str| -> BTreeSet<String> {
        regex::Regex::new(r"%\{(\w+)\}")
            .unwrap()
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect()
    };
    assert_eq!(placeholders(&en), placeholders(&nb));
}
