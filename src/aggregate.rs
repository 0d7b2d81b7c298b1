//! 按样板聚合
//!
//! 把一组 [`QueryEvent`] 按归一化后的 SQL 样板分组，得到每个样板的统计摘要，
//! 同时建立样板到原始记录明细的索引。

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;

use crate::config::AnalyzerConfig;
use crate::event::QueryEvent;
use crate::sql::{LiteralMasker, SqlNormalizer, StatementType, classify_sql};
use crate::tools::round_to;

/// 单个样板的统计摘要
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryEntry {
    pub template: String,

    /// 由样板判断的语句类型
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub statement_type: StatementType,

    /// 归一化到该样板的记录数
    pub count: usize,

    /// 平均查询耗时（秒）；缺少耗时的记录按 0 计入
    pub avg_query_time: f64,

    /// 所有成员记录引用表的并集（排序）
    pub tables_used: Vec<String>,
}

/// 样板索引中的一条原始记录明细
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateDetail {
    /// 未屏蔽字面量的原始 SQL
    pub original_sql: String,
    pub query_time: Option<f64>,
    pub lock_time: Option<f64>,
    pub time: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub rows_examined: Option<i64>,
    pub rows_sent: Option<i64>,
    pub timestamp: Option<i64>,
    pub thread_id: Option<i64>,
    pub schema: Option<String>,
    pub tables_used: Vec<String>,
}

impl TemplateDetail {
    fn from_event(event: &QueryEvent, original_sql: &str) -> Self {
        Self {
            original_sql: original_sql.to_string(),
            query_time: event.query_time,
            lock_time: event.lock_time,
            time: event.time.clone(),
            user: event.user.clone(),
            host: event.host.clone(),
            rows_examined: event.rows_examined,
            rows_sent: event.rows_sent,
            timestamp: event.timestamp,
            thread_id: event.thread_id,
            schema: event.schema.clone(),
            tables_used: event.tables_used.clone(),
        }
    }
}

/// 样板 → 原始记录明细（保持输入顺序）
pub type TemplateIndex = HashMap<String, Vec<TemplateDetail>>;

/// 聚合结果
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aggregation {
    /// 按样板首次出现的顺序排列
    pub summaries: Vec<SummaryEntry>,
    pub template_index: TemplateIndex,
}

impl Aggregation {
    /// 参与分组的记录总数（即带 SQL 的记录数）
    pub fn total_count(&self) -> usize {
        self.summaries.iter().map(|s| s.count).sum()
    }

    /// 第 `index` 个摘要对应的原始记录明细
    pub fn details_for(&self, index: usize) -> Option<&[TemplateDetail]> {
        let summary = self.summaries.get(index)?;
        self.template_index
            .get(&summary.template)
            .map(|details| details.as_slice())
    }
}

/// 摘要排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOrder {
    /// 按样板字符串升序
    Template,
    /// 按记录数降序，相同时按样板升序
    CountDesc,
    /// 按平均耗时降序，相同时按样板升序
    AvgQueryTimeDesc,
}

/// 对摘要排序（聚合本身不保证调用方需要的顺序）
pub fn sort_summaries(summaries: &mut [SummaryEntry], order: SummaryOrder) {
    match order {
        SummaryOrder::Template => summaries.sort_by(|a, b| a.template.cmp(&b.template)),
        SummaryOrder::CountDesc => summaries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.template.cmp(&b.template))
        }),
        SummaryOrder::AvgQueryTimeDesc => summaries.sort_by(|a, b| {
            b.avg_query_time
                .total_cmp(&a.avg_query_time)
                .then_with(|| a.template.cmp(&b.template))
        }),
    }
}

/// 分组累加器
struct Group {
    template: String,
    count: usize,
    total_query_time: f64,
    tables: BTreeSet<String>,
}

/// 样板聚合器
///
/// 默认使用 [`LiteralMasker`] 归一化；可以通过 [`Aggregator::with_normalizer`]
/// 替换为其他 [`SqlNormalizer`] 实现。
pub struct Aggregator<N: SqlNormalizer = LiteralMasker> {
    normalizer: N,
    round_decimals: u32,
    parallel_threshold: usize,
}

impl Aggregator<LiteralMasker> {
    pub fn new() -> Self {
        Self::with_config(&AnalyzerConfig::default())
    }

    pub fn with_config(config: &AnalyzerConfig) -> Self {
        Aggregator {
            normalizer: LiteralMasker,
            round_decimals: config.round_decimals,
            parallel_threshold: config.parallel_threshold,
        }
    }
}

impl Default for Aggregator<LiteralMasker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SqlNormalizer> Aggregator<N> {
    /// 使用自定义归一化实现（保留其他配置）
    pub fn with_normalizer<M: SqlNormalizer>(self, normalizer: M) -> Aggregator<M> {
        Aggregator {
            normalizer,
            round_decimals: self.round_decimals,
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// 聚合一组记录
    ///
    /// 没有 SQL 的记录被跳过。归一化（map）在记录数超过并行阈值时并行执行，
    /// 分组（reduce）始终按输入顺序串行进行，因此结果与串行执行完全一致。
    pub fn aggregate(&self, events: &[QueryEvent]) -> Aggregation {
        let templates = self.templates_of(events);

        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        let mut template_index = TemplateIndex::new();

        for (event, template) in events.iter().zip(templates) {
            let (Some(sql), Some(template)) = (event.sql.as_deref(), template) else {
                continue;
            };

            let slot = *slots.entry(template.clone()).or_insert_with(|| {
                groups.push(Group {
                    template: template.clone(),
                    count: 0,
                    total_query_time: 0.0,
                    tables: BTreeSet::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.count += 1;
            group.total_query_time += event.query_time_or_zero();
            group.tables.extend(event.tables_used.iter().cloned());

            template_index
                .entry(template)
                .or_default()
                .push(TemplateDetail::from_event(event, sql));
        }

        let summaries: Vec<SummaryEntry> = groups
            .into_iter()
            .map(|group| SummaryEntry {
                statement_type: classify_sql(&group.template),
                count: group.count,
                avg_query_time: round_to(
                    group.total_query_time / group.count as f64,
                    self.round_decimals,
                ),
                tables_used: group.tables.into_iter().collect(),
                template: group.template,
            })
            .collect();

        tracing::debug!(
            events = events.len(),
            templates = summaries.len(),
            "aggregated events by template"
        );

        Aggregation {
            summaries,
            template_index,
        }
    }

    /// 合并多组记录后重新聚合
    ///
    /// 先按顺序拼接所有记录再聚合，计数和平均值反映合并后的完整集合，
    /// 而不是各组平均值的平均。
    pub fn merge(&self, sources: &[&[QueryEvent]]) -> Aggregation {
        let merged: Vec<QueryEvent> = sources
            .iter()
            .flat_map(|events| events.iter().cloned())
            .collect();
        self.aggregate(&merged)
    }

    fn templates_of(&self, events: &[QueryEvent]) -> Vec<Option<String>> {
        let normalize = |event: &QueryEvent| {
            event
                .sql
                .as_deref()
                .filter(|sql| !sql.is_empty())
                .map(|sql| self.normalizer.normalize(sql))
        };

        if self.parallel_threshold > 0 && events.len() > self.parallel_threshold {
            events.par_iter().map(normalize).collect()
        } else {
            events.iter().map(normalize).collect()
        }
    }
}

/// 使用默认配置聚合
pub fn aggregate(events: &[QueryEvent]) -> Aggregation {
    Aggregator::new().aggregate(events)
}
