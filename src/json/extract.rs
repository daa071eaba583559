use serde_json::Value;

use crate::json::path::{PathExpression, Segment};

/// 路径解析失败
///
/// 在断言求值中不会中断场景，而是记录为一条失败的断言结果。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Response body is not valid JSON: {0}")]
    MalformedBody(String),
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::PathNotFound { .. } => "PathNotFound",
            ExtractionError::TypeMismatch { .. } => "TypeMismatch",
            ExtractionError::MalformedBody(_) => "MalformedBody",
        }
    }
}

/// JSON 节点类型名，用于错误信息
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 在 JSON 树上解析路径表达式，返回树中节点的引用
pub fn evaluate<'a>(tree: &'a Value, path: &PathExpression) -> Result<&'a Value, ExtractionError> {
    let mut current = tree;
    let mut walked = String::new();

    for segment in path.segments() {
        match segment {
            Segment::Key(key) => {
                if !walked.is_empty() {
                    walked.push('.');
                }
                walked.push_str(key);

                let object = current.as_object().ok_or_else(|| ExtractionError::TypeMismatch {
                    path: walked.clone(),
                    expected: "object",
                    found: type_name(current),
                })?;
                current = object
                    .get(key)
                    .ok_or_else(|| ExtractionError::PathNotFound {
                        path: walked.clone(),
                    })?;
            }
            Segment::Index(index) => {
                walked.push_str(&segment.to_string());

                let array = current.as_array().ok_or_else(|| ExtractionError::TypeMismatch {
                    path: walked.clone(),
                    expected: "array",
                    found: type_name(current),
                })?;
                current = array
                    .get(*index)
                    .ok_or_else(|| ExtractionError::PathNotFound {
                        path: walked.clone(),
                    })?;
            }
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Value {
        json!({
            "page": 1,
            "data": [
                {"id": 1, "email": "george.bluth@reqres.in", "active": true},
                {"id": 2, "email": "janet.weaver@reqres.in", "avatar": null}
            ],
            "support": {"url": "https://reqres.in/#support-heading"}
        })
    }

    fn eval<'a>(tree: &'a Value, path: &str) -> Result<&'a Value, ExtractionError> {
        evaluate(tree, &PathExpression::parse(path).unwrap())
    }

    #[test]
    fn test_root_returns_whole_tree() {
        let tree = users();
        assert_eq!(eval(&tree, "").unwrap(), &tree);
    }

    #[test]
    fn test_nested_keys_and_indices() {
        let tree = users();
        assert_eq!(eval(&tree, "data[0].email").unwrap(), "george.bluth@reqres.in");
        assert_eq!(eval(&tree, "data[1].id").unwrap(), 2);
        assert_eq!(eval(&tree, "data[0].active").unwrap(), true);
        assert_eq!(eval(&tree, "data[1].avatar").unwrap(), &Value::Null);
        assert_eq!(
            eval(&tree, "support").unwrap(),
            &json!({"url": "https://reqres.in/#support-heading"})
        );
    }

    #[test]
    fn test_every_existing_path_resolves_to_its_value() {
        let tree = users();
        let cases = [
            ("page", json!(1)),
            ("data[0]", tree["data"][0].clone()),
            ("data[1].email", json!("janet.weaver@reqres.in")),
            ("support.url", json!("https://reqres.in/#support-heading")),
        ];
        for (path, expected) in cases {
            assert_eq!(eval(&tree, path).unwrap(), &expected, "path {}", path);
        }
    }

    #[test]
    fn test_missing_key() {
        let tree = users();
        let err = eval(&tree, "data[0].nonexistent").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::PathNotFound {
                path: "data[0].nonexistent".to_string()
            }
        );
        assert_eq!(err.kind(), "PathNotFound");
    }

    #[test]
    fn test_index_out_of_range() {
        let tree = users();
        let err = eval(&tree, "data[5].email").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::PathNotFound {
                path: "data[5]".to_string()
            }
        );
    }

    #[test]
    fn test_key_on_non_object() {
        let tree = users();
        let err = eval(&tree, "data.email").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::TypeMismatch {
                path: "data.email".to_string(),
                expected: "object",
                found: "array",
            }
        );
        assert_eq!(err.kind(), "TypeMismatch");
    }

    #[test]
    fn test_index_on_non_array() {
        let tree = users();
        let err = eval(&tree, "support[0]").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::TypeMismatch {
                expected: "array",
                found: "object",
                ..
            }
        ));
    }

    #[test]
    fn test_key_on_scalar_root() {
        let tree = json!("just a string");
        let err = eval(&tree, "error").unwrap_err();
        assert_eq!(err.kind(), "TypeMismatch");
    }
}
