//! Nested-path mutation over `serde_json::Value`.
//!
//! Paths use the same dot/bracket syntax the extraction model speaks
//! (`personalInfo.phone`, `workExperience[1].jobTitle`). Paths are parsed
//! once into segments rather than re-scanned on every write. Writes never
//! fail: missing objects are created, short arrays are extended, and a
//! segment that does not look like `name` or `name[idx]` is treated as a
//! literal property name.

use serde_json::{json, Map, Value};
use uuid::Uuid;

/// One parsed segment of a dot/bracket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Indexed { field: String, idx: usize },
}

/// Parses `a.b[2].c` into segments. A malformed segment (unbalanced
/// brackets, non-numeric index) becomes a literal `Field`.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    path.split('.').map(parse_segment).collect()
}

fn parse_segment(seg: &str) -> PathSegment {
    if let Some(open) = seg.find('[') {
        if seg.ends_with(']') && open > 0 {
            let field = &seg[..open];
            let idx_str = &seg[open + 1..seg.len() - 1];
            if is_identifier(field) {
                if let Ok(idx) = idx_str.parse::<usize>() {
                    return PathSegment::Indexed {
                        field: field.to_string(),
                        idx,
                    };
                }
            }
        }
    }
    PathSegment::Field(seg.to_string())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sets `value` at `path` inside a copy of `root` and returns the copy.
/// The caller's `root` is never mutated.
pub fn set_path(root: &Value, path: &str, value: Value) -> Value {
    let mut out = root.clone();
    set_path_mut(&mut out, path, value);
    out
}

/// In-place variant of [`set_path`] for owners of the record value.
pub fn set_path_mut(root: &mut Value, path: &str, value: Value) {
    let segments = parse_path(path);
    if segments.is_empty() {
        return;
    }
    let mut current = root;
    let last = segments.len() - 1;
    for (i, seg) in segments.iter().enumerate() {
        let is_last = i == last;
        match seg {
            PathSegment::Field(name) => {
                let obj = coerce_object(current);
                if is_last {
                    obj.insert(name.clone(), value);
                    return;
                }
                current = obj.entry(name.clone()).or_insert(Value::Null);
            }
            PathSegment::Indexed { field, idx } => {
                let obj = coerce_object(current);
                let slot = obj.entry(field.clone()).or_insert(Value::Null);
                let arr = coerce_array(slot);
                while arr.len() <= *idx {
                    arr.push(Value::Null);
                }
                if is_last {
                    arr[*idx] = value;
                    return;
                }
                if !arr[*idx].is_object() {
                    arr[*idx] = fresh_entry();
                }
                current = &mut arr[*idx];
            }
        }
    }
}

/// Reads the value at `path`, if every segment resolves.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for seg in parse_path(path) {
        match seg {
            PathSegment::Field(name) => {
                current = current.as_object()?.get(&name)?;
            }
            PathSegment::Indexed { field, idx } => {
                current = current.as_object()?.get(&field)?.as_array()?.get(idx)?;
            }
        }
    }
    Some(current)
}

/// Replaces a non-object with an empty object and returns the map.
fn coerce_object(v: &mut Value) -> &mut Map<String, Value> {
    if !v.is_object() {
        *v = Value::Object(Map::new());
    }
    v.as_object_mut().unwrap()
}

fn coerce_array(v: &mut Value) -> &mut Vec<Value> {
    if !v.is_array() {
        *v = Value::Array(Vec::new());
    }
    v.as_array_mut().unwrap()
}

/// New multi-entry section element, carrying a stable id from birth.
fn fresh_entry() -> Value {
    json!({ "id": Uuid::new_v4().to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_fields() {
        assert_eq!(
            parse_path("personalInfo.phone"),
            vec![
                PathSegment::Field("personalInfo".into()),
                PathSegment::Field("phone".into())
            ]
        );
    }

    #[test]
    fn test_parse_indexed_segment() {
        assert_eq!(
            parse_path("workExperience[1].jobTitle"),
            vec![
                PathSegment::Indexed {
                    field: "workExperience".into(),
                    idx: 1
                },
                PathSegment::Field("jobTitle".into())
            ]
        );
    }

    #[test]
    fn test_malformed_segment_is_literal_field() {
        assert_eq!(
            parse_path("work[abc]"),
            vec![PathSegment::Field("work[abc]".into())]
        );
        assert_eq!(
            parse_path("[0]"),
            vec![PathSegment::Field("[0]".into())]
        );
    }

    #[test]
    fn test_set_creates_missing_objects() {
        let root = json!({});
        let out = set_path(&root, "personalInfo.phone", json!("555"));
        assert_eq!(out["personalInfo"]["phone"], "555");
        // caller's value untouched
        assert_eq!(root, json!({}));
    }

    #[test]
    fn test_set_extends_short_array_with_entry_objects() {
        let root = json!({});
        let out = set_path(&root, "workExperience[1].jobTitle", json!("Cook"));
        let arr = out["workExperience"].as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert!(arr[0].is_null());
        assert_eq!(arr[1]["jobTitle"], "Cook");
        assert!(arr[1]["id"].is_string(), "fresh entries get a stable id");
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let root = json!({"personalInfo": {"phone": "111"}});
        let out = set_path(&root, "personalInfo.phone", json!("222"));
        assert_eq!(out["personalInfo"]["phone"], "222");
    }

    #[test]
    fn test_last_write_wins() {
        let root = json!({});
        let once = set_path(&root, "a.b[0].c", json!(1));
        let twice = set_path(&once, "a.b[0].c", json!(2));
        assert_eq!(twice["a"]["b"][0]["c"], 2);
    }

    #[test]
    fn test_non_object_intermediate_is_coerced() {
        let root = json!({"personalInfo": "oops"});
        let out = set_path(&root, "personalInfo.email", json!("a@b.c"));
        assert_eq!(out["personalInfo"]["email"], "a@b.c");
    }

    #[test]
    fn test_non_array_indexed_target_is_coerced() {
        let root = json!({"education": {"x": 1}});
        let out = set_path(&root, "education[0].school", json!("State U"));
        assert_eq!(out["education"][0]["school"], "State U");
    }

    #[test]
    fn test_final_indexed_segment_assigns_slot() {
        let root = json!({});
        let out = set_path(&root, "skills.languages[2]", json!("Spanish"));
        let langs = out["skills"]["languages"].as_array().unwrap();
        assert_eq!(langs.len(), 3);
        assert!(langs[0].is_null());
        assert_eq!(langs[2], "Spanish");
    }

    #[test]
    fn test_existing_entry_keeps_its_id() {
        let root = json!({"references": [{"id": "keep-me", "name": "Ana"}]});
        let out = set_path(&root, "references[0].relationship", json!("manager"));
        assert_eq!(out["references"][0]["id"], "keep-me");
        assert_eq!(out["references"][0]["name"], "Ana");
        assert_eq!(out["references"][0]["relationship"], "manager");
    }

    #[test]
    fn test_get_path_reads_nested() {
        let root = json!({"workExperience": [{"company": "Acme"}]});
        assert_eq!(
            get_path(&root, "workExperience[0].company"),
            Some(&json!("Acme"))
        );
        assert_eq!(get_path(&root, "workExperience[3].company"), None);
        assert_eq!(get_path(&root, "missing.path"), None);
    }

    #[test]
    fn test_literal_bracket_property_name() {
        let root = json!({});
        let out = set_path(&root, "notes.[draft]", json!("x"));
        assert_eq!(out["notes"]["[draft]"], "x");
    }
}
