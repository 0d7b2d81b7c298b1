//! 分析上下文
//!
//! [`Analysis`] 是一次加载得到的不可变快照：记录、样板摘要、样板索引和性能统计一次性
//! 计算完成后不再修改。[`ActiveAnalysis`] 持有“当前分析”，切换时整体替换指针，
//! 并发读者要么看到旧快照，要么看到新快照，不会看到一半更新的状态。

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::aggregate::{Aggregation, Aggregator, SummaryEntry, TemplateDetail, TemplateIndex};
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, ParseError};
use crate::event::QueryEvent;
use crate::parser::parse_events_with_config;
use crate::query::{Page, QueryFilter, filter_events, list_tables, paginate};
use crate::stats::{PerformanceStats, PerformanceStatsCalculator};

/// 合并来源的概况
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceDetail {
    pub name: String,
    pub queries: usize,
    pub templates: usize,
}

/// 合并信息
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeInfo {
    pub merged_from: Vec<String>,
    pub source_details: Vec<SourceDetail>,
}

/// 一次分析的不可变快照
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    name: String,
    events: Vec<QueryEvent>,
    aggregation: Aggregation,
    stats: Result<PerformanceStats, AnalysisError>,
    merge_info: Option<MergeInfo>,
}

impl Analysis {
    /// 空分析（没有任何记录）
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_events(name, Vec::new(), &AnalyzerConfig::default())
    }

    /// 从记录构建，摘要、索引与统计在这里一次性算完
    pub fn from_events(
        name: impl Into<String>,
        events: Vec<QueryEvent>,
        config: &AnalyzerConfig,
    ) -> Self {
        let aggregation = Aggregator::with_config(config).aggregate(&events);
        let stats = PerformanceStatsCalculator::new(config.clone()).calculate(&events);
        if let Err(AnalysisError::InvalidConfig(err)) = &stats {
            tracing::warn!(error = %err, "performance stats skipped");
        }

        Self {
            name: name.into(),
            events,
            aggregation,
            stats,
            merge_info: None,
        }
    }

    /// 解析日志文本并构建分析，同时返回被跳过的记录块的错误
    pub fn from_log_text(
        name: impl Into<String>,
        text: &str,
        config: &AnalyzerConfig,
    ) -> (Self, Vec<ParseError>) {
        let (events, errors) = parse_events_with_config(text, config);
        (Self::from_events(name, events, config), errors)
    }

    /// 合并多个分析
    ///
    /// 按来源顺序拼接记录后重新聚合与统计。
    ///
    /// # 错误
    ///
    /// - 来源少于 2 个时返回 [`AnalysisError::NotEnoughSources`]
    /// - 所有来源都没有记录时返回 [`AnalysisError::EmptyMerge`]
    pub fn merge(
        name: impl Into<String>,
        sources: &[&Analysis],
        config: &AnalyzerConfig,
    ) -> Result<Self, AnalysisError> {
        if sources.len() < 2 {
            return Err(AnalysisError::NotEnoughSources {
                count: sources.len(),
            });
        }

        let events: Vec<QueryEvent> = sources
            .iter()
            .flat_map(|source| source.events.iter().cloned())
            .collect();
        if events.is_empty() {
            return Err(AnalysisError::EmptyMerge);
        }

        let merge_info = MergeInfo {
            merged_from: sources.iter().map(|s| s.name.clone()).collect(),
            source_details: sources
                .iter()
                .map(|s| SourceDetail {
                    name: s.name.clone(),
                    queries: s.total_queries(),
                    templates: s.total_templates(),
                })
                .collect(),
        };

        let mut merged = Self::from_events(name, events, config);
        merged.merge_info = Some(merge_info);
        Ok(merged)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[QueryEvent] {
        &self.events
    }

    pub fn summaries(&self) -> &[SummaryEntry] {
        &self.aggregation.summaries
    }

    pub fn template_index(&self) -> &TemplateIndex {
        &self.aggregation.template_index
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    /// 性能统计；没有耗时数据时返回 [`AnalysisError::NoTimingData`]，
    /// 配置无效时返回 [`AnalysisError::InvalidConfig`]
    pub fn stats(&self) -> Result<&PerformanceStats, AnalysisError> {
        self.stats.as_ref().map_err(Clone::clone)
    }

    pub fn merge_info(&self) -> Option<&MergeInfo> {
        self.merge_info.as_ref()
    }

    pub fn total_queries(&self) -> usize {
        self.events.len()
    }

    pub fn total_templates(&self) -> usize {
        self.aggregation.summaries.len()
    }

    /// 第 `index` 个摘要对应的原始 SQL 明细
    pub fn raw_queries_for(&self, index: usize) -> Option<&[TemplateDetail]> {
        self.aggregation.details_for(index)
    }

    /// 所有引用过的表
    pub fn tables(&self) -> Vec<String> {
        list_tables(&self.events)
    }

    /// 筛选并分页浏览原始记录
    pub fn query(&self, filter: &QueryFilter, page: usize, size: usize) -> Page<&QueryEvent> {
        paginate(filter_events(&self.events, filter), page, size)
    }
}

/// 当前生效的分析
///
/// 读者通过 [`ActiveAnalysis::load`] 拿到一个 `Arc` 快照后可以随意使用；
/// 写者先完整构建新的 [`Analysis`]，再用 [`ActiveAnalysis::replace`] 一步换入。
#[derive(Debug)]
pub struct ActiveAnalysis {
    current: ArcSwap<Analysis>,
}

impl ActiveAnalysis {
    pub fn new(initial: Analysis) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// 当前快照
    pub fn load(&self) -> Arc<Analysis> {
        self.current.load_full()
    }

    /// 当前分析的名称
    pub fn name(&self) -> String {
        self.current.load().name.clone()
    }

    /// 换入新的分析，返回被替换的旧快照
    pub fn replace(&self, next: Analysis) -> Arc<Analysis> {
        tracing::info!(
            analysis = %next.name,
            queries = next.total_queries(),
            templates = next.total_templates(),
            "switching active analysis"
        );
        self.current.swap(Arc::new(next))
    }
}

impl Default for ActiveAnalysis {
    fn default() -> Self {
        Self::new(Analysis::empty("default"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    const LOG: &str = "# Time: 2025-05-31T01:00:00.000000Z
# User@Host: app[app] @  [10.0.0.1]
# Query_time: 0.500000  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 10
SET timestamp=1748653200;
SELECT * FROM orders WHERE id = 5;
# Time: 2025-05-31T01:00:01.000000Z
# User@Host: app[app] @  [10.0.0.1]
# Query_time: 2.500000  Lock_time: 0.000000 Rows_sent: 1  Rows_examined: 10
SET timestamp=1748653201;
SELECT * FROM orders WHERE id = 9;
";

    fn loaded(name: &str) -> Analysis {
        let (analysis, errors) = Analysis::from_log_text(name, LOG, &AnalyzerConfig::default());
        assert!(errors.is_empty());
        analysis
    }

    #[test]
    fn builds_everything_at_once() {
        let analysis = loaded("day1");
        assert_eq!(analysis.name(), "day1");
        assert_eq!(analysis.total_queries(), 2);
        assert_eq!(analysis.total_templates(), 1);
        assert_eq!(analysis.summaries()[0].count, 2);
        assert_eq!(analysis.summaries()[0].avg_query_time, 1.5);
        assert_eq!(analysis.stats().unwrap().basic_stats.total_queries, 2);
        assert_eq!(analysis.raw_queries_for(0).map(|d| d.len()), Some(2));
        assert_eq!(analysis.tables(), vec!["orders"]);
        assert!(analysis.merge_info().is_none());
    }

    #[test]
    fn empty_analysis_has_no_timing_data() {
        let analysis = Analysis::empty("nothing");
        assert!(analysis.summaries().is_empty());
        assert_eq!(analysis.stats(), Err(AnalysisError::NoTimingData));
        assert!(analysis.raw_queries_for(0).is_none());
    }

    #[test]
    fn invalid_config_surfaces_through_stats() {
        let config = AnalyzerConfig {
            time_buckets: Vec::new(),
            ..AnalyzerConfig::default()
        };
        let (analysis, errors) = Analysis::from_log_text("bad", LOG, &config);

        assert!(errors.is_empty());
        assert_eq!(analysis.total_templates(), 1);
        assert_eq!(
            analysis.stats(),
            Err(AnalysisError::InvalidConfig(ConfigError::NoTimeBuckets))
        );
    }

    #[test]
    fn merge_reaggregates_and_records_sources() {
        let first = loaded("day1");
        let second = loaded("day2");
        let merged = Analysis::merge("both", &[&first, &second], &AnalyzerConfig::default())
            .unwrap();

        assert_eq!(merged.total_queries(), 4);
        assert_eq!(merged.summaries()[0].count, 4);
        assert_eq!(merged.summaries()[0].avg_query_time, 1.5);

        let info = merged.merge_info().unwrap();
        assert_eq!(info.merged_from, vec!["day1", "day2"]);
        assert_eq!(
            info.source_details[1],
            SourceDetail {
                name: "day2".into(),
                queries: 2,
                templates: 1,
            }
        );
    }

    #[test]
    fn merge_rejects_bad_input() {
        let first = loaded("day1");
        assert_eq!(
            Analysis::merge("x", &[&first], &AnalyzerConfig::default()),
            Err(AnalysisError::NotEnoughSources { count: 1 })
        );

        let a = Analysis::empty("a");
        let b = Analysis::empty("b");
        assert_eq!(
            Analysis::merge("x", &[&a, &b], &AnalyzerConfig::default()),
            Err(AnalysisError::EmptyMerge)
        );
    }

    #[test]
    fn query_pages_sorted_by_time() {
        let analysis = loaded("day1");
        let page = analysis.query(&QueryFilter::default(), 1, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].query_time, Some(2.5));
    }

    #[test]
    fn active_analysis_swaps_whole_snapshots() {
        let active = ActiveAnalysis::default();
        assert_eq!(active.name(), "default");

        let reader_view = active.load();
        let previous = active.replace(loaded("day1"));

        assert_eq!(previous.name(), "default");
        assert_eq!(active.name(), "day1");
        assert_eq!(active.load().total_queries(), 2);
        // 已取得的快照不受替换影响
        assert_eq!(reader_view.total_queries(), 0);
    }

    #[test]
    fn concurrent_readers_see_complete_snapshots() {
        let active = Arc::new(ActiveAnalysis::default());
        let next = loaded("day1");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let active = Arc::clone(&active);
                scope.spawn(move || {
                    for _ in 0..100 {
                        let snapshot = active.load();
                        let consistent = snapshot.total_queries() == 0
                            && snapshot.total_templates() == 0
                            || snapshot.total_queries() == 2 && snapshot.total_templates() == 1;
                        assert!(consistent);
                    }
                });
            }
            active.replace(next);
        });

        assert_eq!(active.name(), "day1");
    }
}
