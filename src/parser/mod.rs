//! Parser 模块 - 解析 MySQL 慢查询日志
//!
//! 此模块提供了完整的日志解析功能,包括:
//! - 记录切分（RecordSplitter）
//! - Record 结构和字段提取
//! - 便捷 API 函数（含并行解析）

mod api;
mod constants;
pub(crate) mod parse_functions;
pub mod record;
pub mod record_splitter;

pub use api::{
    for_each_event_in_string, iter_events, iter_records, parse_events_from_string,
    parse_events_with_config,
};
pub use parse_functions::{parse_event, parse_event_with};
pub use record::Record;
pub use record_splitter::RecordSplitter;
