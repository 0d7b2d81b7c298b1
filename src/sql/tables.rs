use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::TableReferenceExtractor;

/// `FROM` / `JOIN` 之后的表名，可带反引号或双引号
static TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b(?:from|join)\s+[`"]?(\w+)[`"]?"#).unwrap());

/// 基于关键字的默认表名提取实现
///
/// 只看 `FROM` / `JOIN` 之后的第一个标识符，子查询、CTE、`INSERT INTO` / `UPDATE`
/// 的目标表以及 `db.table` 形式的库名前缀都不会被正确识别。
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTableExtractor;

impl TableReferenceExtractor for KeywordTableExtractor {
    fn extract_tables(&self, sql: &str) -> Vec<String> {
        extract_tables(sql)
    }
}

/// 提取 SQL 中引用的表名（小写、去重、排序）
///
/// ```
/// use mysql_slowlog_analyzer::extract_tables;
///
/// let tables = extract_tables("SELECT * FROM Orders o JOIN Customers c ON o.cid = c.id");
/// assert_eq!(tables, vec!["customers", "orders"]);
/// ```
pub fn extract_tables(sql: &str) -> Vec<String> {
    TABLE_RE
        .captures_iter(sql)
        .map(|caps| caps[1].to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
