//! SQL 分析模块
//!
//! 基于正则的启发式分析（不是完整的 SQL 解析器）：
//! - 样板归一化：屏蔽字面量，结构相同的语句得到同一个样板
//! - 表名提取：`FROM` / `JOIN` 之后的表名
//! - 语句类型判断
//!
//! 归一化和表名提取通过 trait 暴露，聚合与统计只依赖 trait，
//! 以后换成更强的解析器时不需要改动它们。

mod classify;
mod normalize;
mod tables;

pub use classify::{StatementType, classify_sql};
pub use normalize::{LiteralMasker, normalize_sql};
pub use tables::{KeywordTableExtractor, extract_tables};

/// SQL 文本 → 样板字符串
pub trait SqlNormalizer: Send + Sync {
    /// 必须是确定且幂等的：`normalize(normalize(x)) == normalize(x)`
    fn normalize(&self, sql: &str) -> String;
}

/// SQL 文本 → 引用的表名（去重、排序）
pub trait TableReferenceExtractor: Send + Sync {
    fn extract_tables(&self, sql: &str) -> Vec<String>;
}
