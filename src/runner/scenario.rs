use crate::assertion::{Assertion, AssertionChain};
use crate::http::RequestBuilder;

/// 一个具名测试场景：请求定义加上一组断言
///
/// 请求在运行时才构建，构建失败属于配置错误而不是断言失败。
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    request: RequestBuilder,
    assertions: AssertionChain,
}

impl Scenario {
    pub fn new(name: impl Into<String>, request: RequestBuilder) -> Self {
        Self {
            name: name.into(),
            request,
            assertions: AssertionChain::new(),
        }
    }

    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    pub fn with_assertions(mut self, assertions: AssertionChain) -> Self {
        self.assertions = assertions;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &RequestBuilder {
        &self.request
    }

    pub fn assertions(&self) -> &AssertionChain {
        &self.assertions
    }
}
