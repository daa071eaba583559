mod chain;
mod evaluator;
mod parser;
/// 断言模块 - 对单个响应求值一组断言
mod types;

pub use chain::AssertionChain;
pub use evaluator::{compare, evaluate_assertion, resolve_actual};
pub use parser::parse_assertion;
pub use types::{AssertError, Assertion, AssertionOutcome, CompareOp, Expected, Target};
