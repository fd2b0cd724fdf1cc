use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::error::FieldError;
use crate::shared::text::camel_case;

static MISSING_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^missing field `([^`]+)`").unwrap());

pub(super) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

pub(super) fn index(parent: &str, i: usize) -> String {
    format!("{}[{}]", parent, i)
}

pub(super) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Collects field errors while descending through an untyped JSON value.
#[derive(Default)]
pub(super) struct SchemaWalker {
    pub(super) errors: Vec<FieldError>,
}

impl SchemaWalker {
    pub(super) fn push(&mut self, path: impl Into<String>, code: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, code, message));
    }

    pub(super) fn mark(&self) -> usize {
        self.errors.len()
    }

    pub(super) fn clean_since(&self, mark: usize) -> bool {
        self.errors.len() == mark
    }

    pub(super) fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.push(path, "type", format!("expected an object, found {}", kind_name(other)));
                None
            }
        }
    }

    pub(super) fn array<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Vec<Value>> {
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.push(path, "type", format!("expected an array, found {}", kind_name(other)));
                None
            }
        }
    }

    pub(super) fn required<'v>(
        &mut self,
        path: &str,
        map: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Value> {
        let value = map.get(key);
        if value.is_none() {
            self.push(join(path, key), "required", format!("missing required field `{}`", key));
        }
        value
    }

    /// Required array field: missing and non-array values are errors, `[]` is not.
    pub(super) fn required_array<'v>(
        &mut self,
        path: &str,
        map: &'v Map<String, Value>,
        key: &str,
    ) -> Option<&'v Vec<Value>> {
        let value = self.required(path, map, key)?;
        self.array(&join(path, key), value)
    }

    pub(super) fn decode<T: DeserializeOwned>(&mut self, path: &str, value: &Value) -> Option<T> {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                self.errors.push(serde_error(path, &err));
                None
            }
        }
    }

    /// Run the `validator` derive rules of `value` and record failures under `path`.
    pub(super) fn check<T: Validate>(&mut self, path: &str, value: &T) {
        let Err(errors) = value.validate() else {
            return;
        };

        let mut found: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                let field_path = join(path, &camel_case(&field.to_string()));
                list.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed `{}` check", error.code));
                    FieldError::new(field_path.clone(), &error.code, message)
                })
            })
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.extend(found);
    }

    pub(super) fn finish<T>(self, value: Option<T>) -> Result<T, Vec<FieldError>> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            Some(_) => Err(self.errors),
            None if self.errors.is_empty() => Err(vec![FieldError::new(
                "",
                "invalid",
                "value could not be decoded",
            )]),
            None => Err(self.errors),
        }
    }
}

/// Map a serde decode error onto a field error, lifting `missing field` into the path.
pub(super) fn serde_error(path: &str, err: &serde_json::Error) -> FieldError {
    let message = err.to_string();
    if let Some(field) = MISSING_FIELD.captures(&message).and_then(|c| c.get(1)) {
        return FieldError::new(
            join(path, field.as_str()),
            "required",
            format!("missing required field `{}`", field.as_str()),
        );
    }

    let code = if message.starts_with("unknown variant") {
        "enum"
    } else if message.starts_with("invalid type") {
        "type"
    } else {
        "invalid"
    };
    FieldError::new(path, code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name must not be empty"))]
        display_name: String,
    }

    #[test]
    fn test_missing_field_is_lifted_into_path() {
        let mut walker = SchemaWalker::default();
        let decoded: Option<Sample> = walker.decode("outer[1]", &json!({}));
        assert!(decoded.is_none());
        assert_eq!(walker.errors[0].path, "outer[1].display_name");
        assert_eq!(walker.errors[0].code, "required");
    }

    #[test]
    fn test_validator_failures_use_camel_case_paths() {
        let mut walker = SchemaWalker::default();
        walker.check("item", &Sample { display_name: String::new() });
        assert_eq!(walker.errors.len(), 1);
        assert_eq!(walker.errors[0].path, "item.displayName");
        assert_eq!(walker.errors[0].code, "length");
        assert_eq!(walker.errors[0].message, "name must not be empty");
    }

    #[test]
    fn test_empty_array_is_accepted_but_null_is_not() {
        let mut walker = SchemaWalker::default();
        let present = json!({"items": []});
        assert!(walker.required_array("", present.as_object().unwrap(), "items").is_some());
        assert!(walker.errors.is_empty());

        let null = json!({"items": null});
        assert!(walker.required_array("", null.as_object().unwrap(), "items").is_none());
        assert_eq!(walker.errors[0].path, "items");
        assert_eq!(walker.errors[0].code, "type");
    }

    #[test]
    fn test_unknown_variant_is_an_enum_error() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum Color {
            Red,
        }
        let mut walker = SchemaWalker::default();
        let decoded: Option<Color> = walker.decode("color", &json!("blue"));
        assert!(decoded.is_none());
        assert_eq!(walker.errors[0].code, "enum");
    }
}
