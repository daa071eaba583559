use std::fmt;

use serde::Serialize;

use crate::json::{PathExpression, PathSyntaxError};

/// 断言错误类型（仅用于断言的构造与解析阶段）
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssertError {
    #[error("Invalid assertion syntax: {0}")]
    InvalidSyntax(String),

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    InvalidPath(#[from] PathSyntaxError),
}

/// 断言目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// HTTP 状态码 `$status`
    Status,
    /// 响应耗时（毫秒）`$time`
    Time,
    /// JSON body 中的路径
    Path(PathExpression),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Status => write!(f, "$status"),
            Target::Time => write!(f, "$time"),
            Target::Path(path) if path.is_root() => write!(f, "<root>"),
            Target::Path(path) => write!(f, "{}", path),
        }
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// 结构相等
    Equals,
    /// 数值上界（含），用于 `$time`
    LessOrEqual,
}

impl CompareOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Equals),
            "<=" => Some(Self::LessOrEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 期望值
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    String(String),
    /// 整数按原值精确比较
    Integer(i128),
    Float(f64),
    Bool(bool),
}

impl Expected {
    pub fn is_number(&self) -> bool {
        matches!(self, Expected::Integer(_) | Expected::Float(_))
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::String(s) => write!(f, "\"{}\"", s),
            Expected::Integer(n) => write!(f, "{}", n),
            Expected::Float(n) => write!(f, "{}", n),
            Expected::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Expected {
    fn from(value: &str) -> Self {
        Expected::String(value.to_string())
    }
}

impl From<String> for Expected {
    fn from(value: String) -> Self {
        Expected::String(value)
    }
}

impl From<bool> for Expected {
    fn from(value: bool) -> Self {
        Expected::Bool(value)
    }
}

impl From<f64> for Expected {
    fn from(value: f64) -> Self {
        Expected::Float(value)
    }
}

macro_rules! expected_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expected {
                fn from(value: $ty) -> Self {
                    Expected::Integer(i128::from(value))
                }
            }
        )*
    };
}

expected_from_int!(i32, i64, u16, u32, u64);

/// 一条断言：目标、运算符、期望值
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub target: Target,
    pub op: CompareOp,
    pub expected: Expected,
}

impl Assertion {
    pub fn new(target: Target, op: CompareOp, expected: Expected) -> Self {
        Self {
            target,
            op,
            expected,
        }
    }

    /// `$status == code`
    pub fn status(code: u16) -> Self {
        Self::new(Target::Status, CompareOp::Equals, code.into())
    }

    /// `$time <= max_ms`
    pub fn max_time(max_ms: u64) -> Self {
        Self::new(Target::Time, CompareOp::LessOrEqual, max_ms.into())
    }

    /// `path == expected`
    pub fn json(path: &str, expected: impl Into<Expected>) -> Result<Self, AssertError> {
        Ok(Self::new(
            Target::Path(PathExpression::parse(path)?),
            CompareOp::Equals,
            expected.into(),
        ))
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.target, self.op, self.expected)
    }
}

/// 单条断言的求值结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionOutcome {
    /// 在场景中的声明顺序（从 0 开始）
    pub index: usize,

    pub target: String,

    /// 期望描述，如 `== 200`、`<= 1000`
    pub expected: String,

    /// 实际值；路径无法解析时为 `unresolved: <kind>`
    pub actual: String,

    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AssertionOutcome {
    pub fn success(index: usize, target: String, expected: String, actual: String) -> Self {
        Self {
            index,
            target,
            expected,
            actual,
            passed: true,
            message: None,
        }
    }

    pub fn failure(
        index: usize,
        target: String,
        expected: String,
        actual: String,
        message: String,
    ) -> Self {
        Self {
            index,
            target,
            expected,
            actual,
            passed: false,
            message: Some(message),
        }
    }
}
