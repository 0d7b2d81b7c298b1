//! Record 结构定义和相关方法
//!
//! Record 表示一条原始的日志记录块：`# Time:` 起始行、若干 `#` 元信息行、
//! `SET timestamp` 行以及多行 SQL。

use crate::error::ParseError;
use crate::event::QueryEvent;
use crate::parser::parse_functions;

/// 一条完整的原始日志记录（借用原文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// 记录块原文
    pub text: &'a str,
}

impl<'a> Record<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// 获取起始行（不含换行符）
    pub fn start_line(&self) -> &'a str {
        self.lines().next().unwrap_or("")
    }

    /// 按行迭代记录内容
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.text.lines()
    }

    /// 判断是否有继续行
    pub fn has_continuation_lines(&self) -> bool {
        self.lines().nth(1).is_some()
    }

    /// 将 Record 解析为 QueryEvent
    ///
    /// # 返回
    ///
    /// * `Ok(QueryEvent)` - 解析成功（可能只有部分字段）
    /// * `Err(ParseError)` - 某个已匹配字段组中的数值无法转换
    pub fn parse_to_event(&self) -> Result<QueryEvent, ParseError> {
        parse_functions::parse_event(self.text)
    }
}
