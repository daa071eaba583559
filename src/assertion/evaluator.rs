use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::{Number, Value};
use tracing::debug;

use crate::assertion::types::{Assertion, AssertionOutcome, CompareOp, Expected, Target};
use crate::http::ResponseDescriptor;
use crate::json::{ExtractionError, evaluate, type_name};

/// 取得断言目标的实际值
pub fn resolve_actual<'a>(
    target: &Target,
    response: &'a ResponseDescriptor,
) -> Result<Cow<'a, Value>, ExtractionError> {
    match target {
        Target::Status => Ok(Cow::Owned(Value::from(response.status().code()))),
        Target::Time => Ok(Cow::Owned(Value::from(response.elapsed_ms()))),
        Target::Path(path) => {
            let tree = response.json()?;
            evaluate(tree, path).map(Cow::Borrowed)
        }
    }
}

/// 按运算符比较实际值与期望值
///
/// 类型不一致时不报错，只是不通过。
pub fn compare(actual: &Value, op: CompareOp, expected: &Expected) -> bool {
    match (actual, expected) {
        (Value::Number(n), e) if e.is_number() => {
            let ordering = compare_number(n, e);
            match op {
                CompareOp::Equals => ordering == Some(Ordering::Equal),
                CompareOp::LessOrEqual => {
                    matches!(ordering, Some(Ordering::Less | Ordering::Equal))
                }
            }
        }
        (Value::String(s), Expected::String(e)) => op == CompareOp::Equals && s == e,
        (Value::Bool(b), Expected::Bool(e)) => op == CompareOp::Equals && b == e,
        _ => false,
    }
}

/// 两边都是整数时按整数比较，任一边为小数时才退回 f64
fn compare_number(actual: &Number, expected: &Expected) -> Option<Ordering> {
    let integer = actual
        .as_i64()
        .map(i128::from)
        .or_else(|| actual.as_u64().map(i128::from));

    match (integer, expected) {
        (Some(a), Expected::Integer(e)) => Some(a.cmp(e)),
        // i128 -> f64 只在 actual 本身是小数时发生
        (None, Expected::Integer(e)) => actual.as_f64()?.partial_cmp(&(*e as f64)),
        (_, Expected::Float(e)) => actual.as_f64()?.partial_cmp(e),
        _ => None,
    }
}

/// 执行断言求值
pub fn evaluate_assertion(
    index: usize,
    assertion: &Assertion,
    response: &ResponseDescriptor,
) -> AssertionOutcome {
    let target = assertion.target.to_string();
    let expected = format!("{} {}", assertion.op, assertion.expected);

    let actual = match resolve_actual(&assertion.target, response) {
        Ok(v) => v,
        Err(e) => {
            debug!(index, target = %target, error = %e, "assertion target unresolved");
            return AssertionOutcome::failure(
                index,
                target,
                expected,
                format!("unresolved: {}", e.kind()),
                e.to_string(),
            );
        }
    };

    let actual_str = match &assertion.target {
        Target::Time => format!("{}ms", actual),
        _ => actual.to_string(),
    };

    if compare(&actual, assertion.op, &assertion.expected) {
        AssertionOutcome::success(index, target, expected, actual_str)
    } else {
        let message = match (assertion.op, &*actual) {
            (CompareOp::LessOrEqual, v) if !v.is_number() => format!(
                "Expected {} to be numeric for '<=', but got {}",
                target,
                type_name(v)
            ),
            _ => format!(
                "Expected {} {}, but got {}",
                target, expected, actual_str
            ),
        };
        AssertionOutcome::failure(index, target, expected, actual_str, message)
    }
}
