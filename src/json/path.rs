use std::fmt;
use std::str::FromStr;

/// 路径表达式语法错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid path expression '{path}': {reason}")]
pub struct PathSyntaxError {
    pub path: String,
    pub reason: String,
}

/// 路径中的一段：对象 key 或数组下标
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// JSON 路径表达式
///
/// 语法：`segment ('.' segment | '[' integer ']')*`，首段可以为空，空串表示根节点。
/// 例如 `data[0].email`、`error`、`[1].id`。不支持转义，key 中不能包含 `.` 或 `[`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    pub fn root() -> Self {
        Self {
            raw: String::new(),
            segments: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, PathSyntaxError> {
        let raw = input.trim();
        let error = |reason: &str| PathSyntaxError {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();

        // 首段 key，可为空
        let end = raw.find(['.', '[']).unwrap_or(raw.len());
        let head = &raw[..end];
        if head.contains(']') {
            return Err(error("unexpected ']'"));
        }
        if !head.is_empty() {
            segments.push(Segment::Key(head.to_string()));
        }

        let mut rest = &raw[end..];
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                let key = &after[..end];
                if key.is_empty() {
                    return Err(error("empty key segment"));
                }
                if key.contains(']') {
                    return Err(error("unexpected ']'"));
                }
                segments.push(Segment::Key(key.to_string()));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| error("unclosed '['"))?;
                let digits = &after[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(error("array index must be a non-negative integer"));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| error("array index out of range"))?;
                segments.push(Segment::Index(index));
                rest = &after[close + 1..];
            } else {
                return Err(error("expected '.' or '[' after ']'"));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PathExpression {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Segment {
        Segment::Key(s.to_string())
    }

    #[test]
    fn test_parse_empty_is_root() {
        let path = PathExpression::parse("").unwrap();
        assert!(path.is_root());
        assert_eq!(path, PathExpression::root());
    }

    #[test]
    fn test_parse_dotted_keys() {
        let path = PathExpression::parse("data.last_name").unwrap();
        assert_eq!(path.segments(), &[key("data"), key("last_name")]);
        assert_eq!(path.to_string(), "data.last_name");
    }

    #[test]
    fn test_parse_array_index() {
        let path = PathExpression::parse("data[0].email").unwrap();
        assert_eq!(
            path.segments(),
            &[key("data"), Segment::Index(0), key("email")]
        );
    }

    #[test]
    fn test_parse_leading_index_and_nested_indices() {
        let path = PathExpression::parse("[1][2].id").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::Index(1), Segment::Index(2), key("id")]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["a..b", "a.", ".", "a[", "a[x]", "a[-1]", "a[]", "a[0]b", "a]"] {
            assert!(
                PathExpression::parse(input).is_err(),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let path: PathExpression = "  error ".parse().unwrap();
        assert_eq!(path.segments(), &[key("error")]);
        assert_eq!(path.as_str(), "error");
    }
}
