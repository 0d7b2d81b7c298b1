//! 错误类型定义
//!
//! 定义了解析、统计和合并过程中可能出现的所有错误类型。

use thiserror::Error;

/// 单条记录的解析错误
///
/// 字段组没有匹配时不算错误（对应字段为 `None`）；只有字段组已经匹配、
/// 但数值位置上的文本无法转换时，才会返回这里的错误。调用方可以记录后跳过该记录。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// 整数解析失败（例如超出 i64 范围）
    #[error("failed to parse {field} as integer: {value}")]
    InvalidInteger {
        /// 字段名
        field: &'static str,
        /// 字段值
        value: String,
    },

    /// 浮点数解析失败（例如 `1.2.3`）
    #[error("failed to parse {field} as float: {value}")]
    InvalidFloat {
        /// 字段名
        field: &'static str,
        /// 字段值
        value: String,
    },
}

/// 聚合、统计以及合并阶段的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// 输入中没有任何带 Query_time 的记录
    #[error("no timing data: none of the events carries a query time")]
    NoTimingData,

    /// 合并至少需要两个来源
    #[error("merge needs at least 2 sources, got {count}")]
    NotEnoughSources {
        /// 实际来源数量
        count: usize,
    },

    /// 所有来源都没有记录
    #[error("merge sources contain no events")]
    EmptyMerge,

    /// 统计口径配置无效
    #[error("invalid analyzer config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// 配置校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 没有定义任何时间区间
    #[error("time bucket list is empty")]
    NoTimeBuckets,

    /// 区间上界不是严格递增
    #[error("time bucket '{label}' is not above the previous bucket")]
    UnorderedTimeBucket {
        /// 出问题的区间标签
        label: String,
    },

    /// 最后一个区间必须没有上界
    #[error("last time bucket '{label}' must be unbounded")]
    BoundedLastBucket {
        /// 最后一个区间的标签
        label: String,
    },

    /// 只有最后一个区间可以没有上界
    #[error("time bucket '{label}' is unbounded but is not the last one")]
    UnboundedInnerBucket {
        /// 出问题的区间标签
        label: String,
    },
}
