//! 便捷 API 函数
//!
//! 提供了一组方便使用的高层 API，用于快速把整段日志文本解析为 [`QueryEvent`]。

use rayon::prelude::*;

use crate::config::AnalyzerConfig;
use crate::error::ParseError;
use crate::event::QueryEvent;
use crate::parser::parse_functions::parse_event;
use crate::parser::record::Record;
use crate::parser::record_splitter::RecordSplitter;

/// 惰性地逐条解析日志文本
///
/// 每个记录块产出一个 `Result`，解析失败的块不会中断后续记录。
pub fn iter_events(text: &str) -> impl Iterator<Item = Result<QueryEvent, ParseError>> + '_ {
    RecordSplitter::new(text).map(|block| Record::new(block).parse_to_event())
}

/// 惰性地逐条返回原始记录
pub fn iter_records(text: &str) -> impl Iterator<Item = Record<'_>> {
    RecordSplitter::new(text).map(Record::new)
}

/// 解析整段日志文本（默认配置）
///
/// # 返回
///
/// `(events, errors)`：成功解析的记录（保持输入顺序）以及被跳过的记录块的错误。
///
/// # 示例
///
/// ```
/// use mysql_slowlog_analyzer::parse_events_from_string;
///
/// let log = concat!(
///     "# Time: 2025-05-31T01:02:03Z\nSET timestamp=1;\nSELECT 1;\n",
///     "# Time: 2025-05-31T01:02:04Z\nSET timestamp=2;\nSELECT 2;\n",
/// );
/// let (events, errors) = parse_events_from_string(log);
///
/// assert_eq!(events.len(), 2);
/// assert!(errors.is_empty());
/// ```
pub fn parse_events_from_string(text: &str) -> (Vec<QueryEvent>, Vec<ParseError>) {
    parse_events_with_config(text, &AnalyzerConfig::default())
}

/// 解析整段日志文本
///
/// 记录块数量超过 `config.parallel_threshold` 时使用 rayon 并行解析，结果顺序与输入一致。
pub fn parse_events_with_config(
    text: &str,
    config: &AnalyzerConfig,
) -> (Vec<QueryEvent>, Vec<ParseError>) {
    let blocks: Vec<&str> = RecordSplitter::new(text).collect();

    let results: Vec<Result<QueryEvent, ParseError>> =
        if config.parallel_threshold > 0 && blocks.len() > config.parallel_threshold {
            blocks.par_iter().map(|block| parse_event(block)).collect()
        } else {
            blocks.iter().map(|block| parse_event(block)).collect()
        };

    let mut events = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(event) => events.push(event),
            Err(err) => {
                tracing::warn!(block = index, error = %err, "skipping unparsable slow log entry");
                errors.push(err);
            }
        }
    }

    tracing::debug!(
        blocks = blocks.len(),
        events = events.len(),
        errors = errors.len(),
        "parsed slow log text"
    );
    (events, errors)
}

/// 流式处理每条成功解析的记录
///
/// # 返回
///
/// 成功处理的记录数量；解析失败的记录块被跳过。
pub fn for_each_event_in_string<F>(text: &str, mut f: F) -> usize
where
    F: FnMut(QueryEvent),
{
    let mut processed = 0;
    for result in iter_events(text) {
        match result {
            Ok(event) => {
                f(event);
                processed += 1;
            }
            Err(err) => tracing::warn!(error = %err, "skipping unparsable slow log entry"),
        }
    }
    processed
}
