use crate::assertion::types::{AssertError, Assertion, CompareOp, Expected, Target};
use crate::json::PathExpression;

/// 解析文本形式的断言
///
/// 支持的格式：
/// - `$status == 200`
/// - `$time <= 1000`
/// - `data.last_name == "Weaver"`
/// - `data[0].email == 'george.bluth@reqres.in'`
/// - `active == true`
///
/// `$time` 只允许 `<=`，`<=` 也只允许用于 `$time`。
pub fn parse_assertion(input: &str) -> Result<Assertion, AssertError> {
    let input = input.trim();

    let (op_pos, op_str) = ["==", "<="]
        .iter()
        .filter_map(|op| input.find(op).map(|pos| (pos, *op)))
        .min_by_key(|(pos, _)| *pos)
        .ok_or_else(|| {
            AssertError::InvalidSyntax(format!("No valid operator found in assertion: {}", input))
        })?;

    let op = CompareOp::parse(op_str)
        .ok_or_else(|| AssertError::InvalidOperator(op_str.to_string()))?;

    let left_str = input[..op_pos].trim();
    let right_str = input[op_pos + op_str.len()..].trim();

    if right_str.is_empty() {
        return Err(AssertError::InvalidSyntax(
            "Right side of assertion is empty".to_string(),
        ));
    }

    let target = parse_target(left_str)?;
    let expected = parse_expected(right_str)?;

    match (&target, op) {
        (Target::Time, CompareOp::Equals) => {
            return Err(AssertError::InvalidOperator(
                "$time only supports '<=' (exact timing checks are flaky)".to_string(),
            ));
        }
        (Target::Status | Target::Path(_), CompareOp::LessOrEqual) => {
            return Err(AssertError::InvalidOperator(format!(
                "'<=' is only supported for $time, not {}",
                target
            )));
        }
        _ => {}
    }

    if matches!(target, Target::Status | Target::Time) && !expected.is_number() {
        return Err(AssertError::InvalidValue(format!(
            "{} expects a number, got {}",
            target, expected
        )));
    }

    Ok(Assertion::new(target, op, expected))
}

/// 解析断言目标
fn parse_target(input: &str) -> Result<Target, AssertError> {
    match input {
        "$status" => Ok(Target::Status),
        "$time" => Ok(Target::Time),
        other if other.starts_with('$') => Err(AssertError::InvalidSyntax(format!(
            "Unknown target: {}. Must be '$status', '$time', or a JSON path",
            other
        ))),
        other => Ok(Target::Path(PathExpression::parse(other)?)),
    }
}

/// 解析期望值（右值）
fn parse_expected(input: &str) -> Result<Expected, AssertError> {
    if input == "true" {
        return Ok(Expected::Bool(true));
    }
    if input == "false" {
        return Ok(Expected::Bool(false));
    }

    // 双引号字符串按 JSON 规则处理转义
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        return serde_json::from_str::<String>(input)
            .map(Expected::String)
            .map_err(|e| AssertError::InvalidValue(format!("{}: {}", input, e)));
    }
    if input.len() >= 2 && input.starts_with('\'') && input.ends_with('\'') {
        return Ok(Expected::String(input[1..input.len() - 1].to_string()));
    }

    // 整数优先，避免超过 2^53 的值经 f64 丢失精度
    if let Ok(n) = input.parse::<i64>() {
        return Ok(Expected::Integer(i128::from(n)));
    }
    if let Ok(n) = input.parse::<u64>() {
        return Ok(Expected::Integer(i128::from(n)));
    }
    if let Ok(n) = input.parse::<f64>() {
        if n.is_finite() {
            return Ok(Expected::Float(n));
        }
    }

    Err(AssertError::InvalidValue(format!(
        "Cannot parse value: {}. Use a quoted string, a number, true or false",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        let assertion = parse_assertion("$status == 200").unwrap();
        assert_eq!(assertion, Assertion::status(200));
    }

    #[test]
    fn test_parse_time() {
        let assertion = parse_assertion("$time <= 1000").unwrap();
        assert_eq!(assertion, Assertion::max_time(1000));
    }

    #[test]
    fn test_parse_path_string() {
        let assertion = parse_assertion("data.last_name == \"Weaver\"").unwrap();
        assert_eq!(assertion, Assertion::json("data.last_name", "Weaver").unwrap());
    }

    #[test]
    fn test_parse_single_quoted_and_index() {
        let assertion = parse_assertion("data[0].email == 'george.bluth@reqres.in'").unwrap();
        assert_eq!(
            assertion,
            Assertion::json("data[0].email", "george.bluth@reqres.in").unwrap()
        );
    }

    #[test]
    fn test_parse_escaped_string() {
        let assertion = parse_assertion(r#"error == "say \"hi\"""#).unwrap();
        assert_eq!(assertion.expected, Expected::String("say \"hi\"".to_string()));
    }

    #[test]
    fn test_parse_string_containing_operator() {
        let assertion = parse_assertion("formula == \"a <= b\"").unwrap();
        assert_eq!(assertion.op, CompareOp::Equals);
        assert_eq!(assertion.expected, Expected::String("a <= b".to_string()));
    }

    #[test]
    fn test_parse_bool_and_number() {
        assert_eq!(
            parse_assertion("active == true").unwrap().expected,
            Expected::Bool(true)
        );
        assert_eq!(
            parse_assertion("id == 4").unwrap().expected,
            Expected::Integer(4)
        );
        assert_eq!(
            parse_assertion("ratio == 0.5").unwrap().expected,
            Expected::Float(0.5)
        );
    }

    #[test]
    fn test_parse_large_integer_keeps_precision() {
        assert_eq!(
            parse_assertion("id == 9007199254740993").unwrap().expected,
            Expected::Integer(9_007_199_254_740_993)
        );
        assert_eq!(
            parse_assertion("id == 18446744073709551615").unwrap().expected,
            Expected::Integer(i128::from(u64::MAX))
        );
        assert_eq!(
            parse_assertion("id == -9007199254740993").unwrap().expected,
            Expected::Integer(-9_007_199_254_740_993)
        );
    }

    #[test]
    fn test_parse_root_path() {
        let assertion = parse_assertion("== \"ok\"").unwrap();
        assert_eq!(assertion.target, Target::Path(PathExpression::root()));
    }

    #[test]
    fn test_reject_exact_time() {
        let err = parse_assertion("$time == 1000").unwrap_err();
        assert!(matches!(err, AssertError::InvalidOperator(_)));
    }

    #[test]
    fn test_reject_less_or_equal_on_path() {
        let err = parse_assertion("data.id <= 3").unwrap_err();
        assert!(matches!(err, AssertError::InvalidOperator(_)));
    }

    #[test]
    fn test_reject_non_numeric_status() {
        let err = parse_assertion("$status == \"200\"").unwrap_err();
        assert!(matches!(err, AssertError::InvalidValue(_)));
    }

    #[test]
    fn test_invalid_syntax() {
        assert!(parse_assertion("status 200").is_err());
        assert!(parse_assertion("$status ==").is_err());
        assert!(parse_assertion("$headers == 1").is_err());
        assert!(parse_assertion("data[x] == 1").is_err());
        assert!(parse_assertion("name == morpheus").is_err());
    }
}
