use once_cell::sync::Lazy;
use regex::Regex;

use super::SqlNormalizer;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SINGLE_QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'[^']*'").unwrap());
static DOUBLE_QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\.\d+\b").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").unwrap());
static PLACEHOLDER_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*(?:\?,\s*)*\?\s*\)").unwrap());

/// 屏蔽字面量的默认归一化实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralMasker;

impl SqlNormalizer for LiteralMasker {
    fn normalize(&self, sql: &str) -> String {
        normalize_sql(sql)
    }
}

/// 把 SQL 转换为样板
///
/// 按固定顺序执行：小写 → 折叠空白 → 单引号字符串 → 双引号字符串 → 小数 → 整数
/// → `(?, ?, ...)` 折叠为 `(?)` → 去除首尾空白。
///
/// ```
/// use mysql_slowlog_analyzer::normalize_sql;
///
/// assert_eq!(
///     normalize_sql("SELECT * FROM t WHERE id IN (1, 2, 3) AND name = 'bob'"),
///     "select * from t where id in (?) and name = ?"
/// );
/// ```
pub fn normalize_sql(sql: &str) -> String {
    let sql = sql.to_lowercase();
    let sql = WHITESPACE_RE.replace_all(&sql, " ");
    let sql = SINGLE_QUOTED_RE.replace_all(&sql, "?");
    let sql = DOUBLE_QUOTED_RE.replace_all(&sql, "?");
    let sql = DECIMAL_RE.replace_all(&sql, "?");
    let sql = INTEGER_RE.replace_all(&sql, "?");
    let sql = PLACEHOLDER_LIST_RE.replace_all(&sql, "(?)");
    sql.trim().to_string()
}
