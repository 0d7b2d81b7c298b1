//! # MySQL Slow Log Analyzer
//!
//! MySQL 慢查询日志的解析、SQL 样板归一化与聚合统计库。
//!
//! ## 功能特性
//!
//! - **记录切分**: 按 `# Time:` 起始行惰性切分，零拷贝
//! - **容错解析**: 各字段组独立匹配，缺失的字段为 `None`；数值异常时单条记录报错
//! - **样板归一化**: 屏蔽字面量，结构相同的语句归为同一个样板
//! - **聚合统计**: 每个样板的次数、平均耗时、涉及的表，以及整体性能分布
//! - **并行处理**: 大日志可用 rayon 并行解析与归一化，结果与串行一致
//!
//! ## 快速开始
//!
//! ```rust
//! use mysql_slowlog_analyzer::{aggregate, calculate_performance_stats, parse_events_from_string};
//!
//! let log = concat!(
//!     "# Time: 2025-05-31T01:00:00.000000Z\n",
//!     "# User@Host: app[app] @  [10.0.0.1]\n",
//!     "# Query_time: 0.500000  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 10\n",
//!     "SET timestamp=1748653200;\n",
//!     "SELECT * FROM orders WHERE id = 5;\n",
//!     "# Time: 2025-05-31T01:00:01.000000Z\n",
//!     "# User@Host: app[app] @  [10.0.0.1]\n",
//!     "# Query_time: 2.000000  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 10\n",
//!     "SET timestamp=1748653201;\n",
//!     "SELECT * FROM orders WHERE id = 9;\n",
//! );
//!
//! let (events, errors) = parse_events_from_string(log);
//! assert!(errors.is_empty());
//!
//! let aggregation = aggregate(&events);
//! assert_eq!(aggregation.summaries.len(), 1);
//! assert_eq!(aggregation.summaries[0].template, "select * from orders where id = ?;");
//! assert_eq!(aggregation.summaries[0].count, 2);
//!
//! let stats = calculate_performance_stats(&events).unwrap();
//! assert_eq!(stats.basic_stats.max_query_time, 2.0);
//! ```
//!
//! ## 日志格式
//!
//! ```text
//! # Time: 2025-05-31T01:00:00.000000Z
//! # User@Host: app[app] @  [10.0.0.1]
//! # Thread_id: 42  Schema: shop  QC_hit: No
//! # Query_time: 0.500000  Lock_time: 0.000100  Rows_sent: 1  Rows_examined: 10
//! # Rows_affected: 0  Bytes_sent: 120
//! SET timestamp=1748653200;
//! SELECT * FROM orders WHERE id = 5;
//! ```

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod query;
pub mod sql;
pub mod stats;
pub mod tools;

pub use aggregate::{
    Aggregation, Aggregator, SummaryEntry, SummaryOrder, TemplateDetail, TemplateIndex,
    aggregate, sort_summaries,
};
pub use analysis::{ActiveAnalysis, Analysis, MergeInfo, SourceDetail};
pub use config::{AnalyzerConfig, TimeBucket};
pub use error::{AnalysisError, ConfigError, ParseError};
pub use event::QueryEvent;
pub use parser::{
    Record, RecordSplitter, for_each_event_in_string, iter_events, iter_records, parse_event,
    parse_event_with, parse_events_from_string, parse_events_with_config,
};
pub use query::{Page, QueryFilter, filter_events, list_tables, paginate};
pub use sql::{
    KeywordTableExtractor, LiteralMasker, SqlNormalizer, StatementType, TableReferenceExtractor,
    classify_sql, extract_tables, normalize_sql,
};
pub use stats::{
    BasicStats, PerformanceStats, PerformanceStatsCalculator, TypePerformance,
    calculate_performance_stats,
};
