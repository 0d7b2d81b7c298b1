use std::fmt;
use std::str::FromStr;

/// 语句类型（粗分类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Replace,
    Call,
    Other,
}

impl StatementType {
    pub const ALL: [StatementType; 7] = [
        StatementType::Select,
        StatementType::Insert,
        StatementType::Update,
        StatementType::Delete,
        StatementType::Replace,
        StatementType::Call,
        StatementType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Select => "SELECT",
            StatementType::Insert => "INSERT",
            StatementType::Update => "UPDATE",
            StatementType::Delete => "DELETE",
            StatementType::Replace => "REPLACE",
            StatementType::Call => "CALL",
            StatementType::Other => "OTHER",
        }
    }

    /// 由首个关键字（大小写不敏感）得到类型，未知关键字归为 `Other`
    fn from_keyword(keyword: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| *t != StatementType::Other && t.as_str().eq_ignore_ascii_case(keyword))
            .unwrap_or(StatementType::Other)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = ();

    /// 严格匹配类型名（含 `OTHER`），大小写不敏感
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// 判断 SQL 的语句类型
///
/// 取去除前导空白后的第一个单词；文本以非单词字符开头（如注释或括号）时为 `Other`。
pub fn classify_sql(sql: &str) -> StatementType {
    let trimmed = sql.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    StatementType::from_keyword(&trimmed[..end])
}
