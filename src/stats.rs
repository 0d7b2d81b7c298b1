//! 性能统计
//!
//! 对一组 [`QueryEvent`] 计算整体耗时统计以及按语句类型、耗时区间、用户、表的分布。

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::event::QueryEvent;
use crate::sql::{StatementType, classify_sql};
use crate::tools::round_to;

/// 整体耗时统计（秒）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicStats {
    /// 全部记录数（包括没有耗时的记录）
    pub total_queries: usize,
    pub avg_query_time: f64,
    pub median_query_time: f64,
    pub max_query_time: f64,
    pub min_query_time: f64,
}

impl BasicStats {
    /// 没有耗时数据时的零值统计
    pub fn zeroed(total_queries: usize) -> Self {
        Self {
            total_queries,
            avg_query_time: 0.0,
            median_query_time: 0.0,
            max_query_time: 0.0,
            min_query_time: 0.0,
        }
    }
}

/// 某一语句类型的耗时统计
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypePerformance {
    pub count: usize,
    pub avg_time: f64,
    pub max_time: f64,
}

/// 完整的性能统计
///
/// 各分布都是有序的 `(键, 数量)` 列表：
/// - `type_stats` / `user_stats` / `table_stats` 按数量降序，数量相同时保持首次出现的顺序
/// - `time_ranges` 按配置中的区间顺序，包含数量为 0 的区间
/// - `type_performance` 按类型首次出现的顺序
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceStats {
    pub basic_stats: BasicStats,
    pub type_stats: Vec<(StatementType, usize)>,
    pub time_ranges: Vec<(String, usize)>,
    pub user_stats: Vec<(String, usize)>,
    pub table_stats: Vec<(String, usize)>,
    pub type_performance: Vec<(StatementType, TypePerformance)>,
}

impl PerformanceStats {
    /// 按标签查找耗时区间的数量
    pub fn time_range(&self, label: &str) -> Option<usize> {
        self.time_ranges
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    /// 某一语句类型的记录数
    pub fn type_count(&self, statement_type: StatementType) -> usize {
        self.type_stats
            .iter()
            .find(|(t, _)| *t == statement_type)
            .map_or(0, |(_, count)| *count)
    }

    /// 某一语句类型的耗时统计
    pub fn performance_of(&self, statement_type: StatementType) -> Option<&TypePerformance> {
        self.type_performance
            .iter()
            .find(|(t, _)| *t == statement_type)
            .map(|(_, perf)| perf)
    }
}

/// 按首次出现顺序计数
struct OrderedCounter<K> {
    slots: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: &K) {
        match self.slots.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.slots.insert(key.clone(), self.entries.len());
                self.entries.push((key.clone(), 1));
            }
        }
    }

    /// 按数量降序取前 `limit` 个；排序稳定，数量相同时保持首次出现的顺序
    fn most_common(mut self, limit: Option<usize>) -> Vec<(K, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self.entries
    }
}

/// 性能统计计算器
#[derive(Debug, Clone, Default)]
pub struct PerformanceStatsCalculator {
    config: AnalyzerConfig,
}

impl PerformanceStatsCalculator {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// 计算统计
    ///
    /// # 错误
    ///
    /// - 时间区间配置无效时返回 [`AnalysisError::InvalidConfig`]
    /// - 没有任何记录带有查询耗时（包括空输入）时返回 [`AnalysisError::NoTimingData`]
    pub fn calculate(&self, events: &[QueryEvent]) -> Result<PerformanceStats, AnalysisError> {
        self.config.validate()?;

        let mut query_times: Vec<f64> = events.iter().filter_map(|e| e.query_time).collect();
        if query_times.is_empty() {
            tracing::debug!(events = events.len(), "no timing data in event set");
            return Err(AnalysisError::NoTimingData);
        }

        let decimals = self.config.round_decimals;

        let mut type_counter = OrderedCounter::new();
        let mut type_order: Vec<StatementType> = Vec::new();
        let mut times_by_type: HashMap<StatementType, Vec<f64>> = HashMap::new();
        let mut user_counter = OrderedCounter::new();
        let mut table_counter = OrderedCounter::new();

        for event in events {
            if let Some(sql) = event.sql.as_deref().filter(|s| !s.is_empty()) {
                let statement_type = classify_sql(sql);
                type_counter.add(&statement_type);
                if let Some(query_time) = event.query_time {
                    let times = times_by_type.entry(statement_type).or_default();
                    if times.is_empty() {
                        type_order.push(statement_type);
                    }
                    times.push(query_time);
                }
            }

            if let Some(user) = event.user.as_ref().filter(|u| !u.is_empty()) {
                user_counter.add(user);
            }

            for table in &event.tables_used {
                table_counter.add(table);
            }
        }

        let mut buckets = vec![0usize; self.config.time_buckets.len()];
        for &query_time in &query_times {
            if let Some(slot) = buckets.get_mut(self.config.bucket_index(query_time)) {
                *slot += 1;
            }
        }
        let time_ranges = self
            .config
            .time_buckets
            .iter()
            .zip(buckets)
            .map(|(bucket, count)| (bucket.label.to_string(), count))
            .collect();

        let type_performance = type_order
            .into_iter()
            .map(|statement_type| {
                let times = &times_by_type[&statement_type];
                let perf = TypePerformance {
                    count: times.len(),
                    avg_time: round_to(mean(times), decimals),
                    max_time: round_to(max(times), decimals),
                };
                (statement_type, perf)
            })
            .collect();

        query_times.sort_by(|a, b| a.total_cmp(b));
        let basic_stats = BasicStats {
            total_queries: events.len(),
            avg_query_time: round_to(mean(&query_times), decimals),
            median_query_time: round_to(median(&query_times), decimals),
            max_query_time: round_to(query_times[query_times.len() - 1], decimals),
            min_query_time: round_to(query_times[0], decimals),
        };

        tracing::debug!(
            events = events.len(),
            timed = query_times.len(),
            "calculated performance stats"
        );

        Ok(PerformanceStats {
            basic_stats,
            type_stats: type_counter.most_common(None),
            time_ranges,
            user_stats: user_counter.most_common(Some(self.config.top_users)),
            table_stats: table_counter.most_common(Some(self.config.top_tables)),
            type_performance,
        })
    }
}

/// 使用默认配置计算统计
pub fn calculate_performance_stats(
    events: &[QueryEvent],
) -> Result<PerformanceStats, AnalysisError> {
    PerformanceStatsCalculator::default().calculate(events)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// 输入必须已排序且非空；偶数个时取中间两个的平均
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
