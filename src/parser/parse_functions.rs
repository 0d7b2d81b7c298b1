//! 核心解析函数
//!
//! 把一个记录块解析为 [`QueryEvent`]。各字段组互相独立地匹配：某一组没有匹配时
//! 对应字段保持 `None`，不影响其他组；匹配成功但数值无法转换时整条记录返回错误。

use std::str::FromStr;

use regex::Captures;

use crate::error::ParseError;
use crate::event::QueryEvent;
use crate::parser::constants::*;
use crate::sql::{KeywordTableExtractor, TableReferenceExtractor};

/// 使用默认的表名提取器解析一个记录块
///
/// # 示例
///
/// ```
/// use mysql_slowlog_analyzer::parse_event;
///
/// let block = concat!(
///     "# Time: 2025-05-31T01:02:03.000000Z\n",
///     "# Query_time: 1.500000  Lock_time: 0.000100 Rows_sent: 1  Rows_examined: 1000\n",
///     "SET timestamp=1748653323;\n",
///     "SELECT * FROM orders WHERE id = 5;",
/// );
/// let event = parse_event(block).unwrap();
///
/// assert_eq!(event.query_time, Some(1.5));
/// assert_eq!(event.timestamp, Some(1748653323));
/// assert_eq!(event.tables_used, vec!["orders"]);
/// assert_eq!(event.user, None);
/// ```
pub fn parse_event(block: &str) -> Result<QueryEvent, ParseError> {
    parse_event_with(block, &KeywordTableExtractor)
}

/// 使用指定的表名提取器解析一个记录块
pub fn parse_event_with(
    block: &str,
    extractor: &dyn TableReferenceExtractor,
) -> Result<QueryEvent, ParseError> {
    let mut event = QueryEvent::default();

    if let Some(caps) = TIME_RE.captures(block) {
        event.time = Some(caps[1].trim().to_string());
    }

    if let Some(caps) = USER_HOST_RE.captures(block) {
        event.user = Some(caps[2].trim().to_string());
        event.host = Some(caps[3].trim().to_string());
    }

    if let Some(caps) = THREAD_RE.captures(block) {
        event.thread_id = Some(parse_int(&caps, 1, FIELD_THREAD_ID)?);
        event.schema = Some(caps[2].to_string());
        event.qc_hit = Some(caps[3].to_string());
    }

    if let Some(caps) = TIMING_RE.captures(block) {
        event.query_time = Some(parse_float(&caps, 1, FIELD_QUERY_TIME)?);
        event.lock_time = Some(parse_float(&caps, 2, FIELD_LOCK_TIME)?);
        event.rows_sent = Some(parse_int(&caps, 3, FIELD_ROWS_SENT)?);
        event.rows_examined = Some(parse_int(&caps, 4, FIELD_ROWS_EXAMINED)?);
    }

    if let Some(caps) = AFFECTED_RE.captures(block) {
        event.rows_affected = Some(parse_int(&caps, 1, FIELD_ROWS_AFFECTED)?);
        event.bytes_sent = Some(parse_int(&caps, 2, FIELD_BYTES_SENT)?);
    }

    // SQL 从最后一个 SET timestamp 标记之后开始，时间戳也取自同一个标记
    if let Some(caps) = SET_TIMESTAMP_RE.captures_iter(block).last() {
        event.timestamp = Some(parse_int(&caps, 1, FIELD_TIMESTAMP)?);

        let body_start = caps.get(0).map_or(block.len(), |m| m.end());
        let sql = block[body_start..].trim();
        if !sql.is_empty() {
            event.tables_used = extractor.extract_tables(sql);
            event.sql = Some(sql.to_string());
        }
    }

    Ok(event)
}

#[inline]
fn parse_int(caps: &Captures<'_>, group: usize, field: &'static str) -> Result<i64, ParseError> {
    parse_number(caps, group).map_err(|value| ParseError::InvalidInteger { field, value })
}

#[inline]
fn parse_float(caps: &Captures<'_>, group: usize, field: &'static str) -> Result<f64, ParseError> {
    parse_number(caps, group).map_err(|value| ParseError::InvalidFloat { field, value })
}

/// 失败时返回原始文本
fn parse_number<T: FromStr>(caps: &Captures<'_>, group: usize) -> Result<T, String> {
    let raw = caps.get(group).map_or("", |m| m.as_str());
    raw.parse::<T>().map_err(|_| raw.to_string())
}
