use tracing::debug;

use crate::assertion::evaluator::evaluate_assertion;
use crate::assertion::types::{Assertion, AssertionOutcome};
use crate::http::ResponseDescriptor;

/// 按声明顺序排列的一组断言
///
/// 求值时每条断言相互独立，前面的失败不会跳过后面的断言。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertionChain {
    assertions: Vec<Assertion>,
}

impl AssertionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    pub fn push(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assertion> {
        self.assertions.iter()
    }

    pub fn evaluate(&self, response: &ResponseDescriptor) -> Vec<AssertionOutcome> {
        self.assertions
            .iter()
            .enumerate()
            .map(|(index, assertion)| {
                let outcome = evaluate_assertion(index, assertion, response);
                debug!(index, assertion = %assertion, passed = outcome.passed, "assertion evaluated");
                outcome
            })
            .collect()
    }
}

impl From<Vec<Assertion>> for AssertionChain {
    fn from(assertions: Vec<Assertion>) -> Self {
        Self { assertions }
    }
}

impl FromIterator<Assertion> for AssertionChain {
    fn from_iter<I: IntoIterator<Item = Assertion>>(iter: I) -> Self {
        Self {
            assertions: iter.into_iter().collect(),
        }
    }
}
