//! 分析器配置模块
//!
//! 统计口径（时间区间、Top-N 数量、保留小数位）以及并行解析阈值集中在这里定义，
//! 需要调整统计口径时只改配置，不需要修改核心统计逻辑。

use crate::error::ConfigError;

/// 查询耗时区间定义
///
/// 区间为左闭右开 `[上一个区间的上界, upper_bound)`，`upper_bound` 为 `None`
/// 表示没有上界。
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    /// 区间标签，如 "1-5s"
    pub label: &'static str,

    /// 上界（秒，不含）
    pub upper_bound: Option<f64>,
}

/// 分析器配置
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// 用户统计保留的条数
    pub top_users: usize,

    /// 表统计保留的条数
    pub top_tables: usize,

    /// 耗时分布区间，必须按上界递增，且最后一个没有上界
    pub time_buckets: Vec<TimeBucket>,

    /// 平均值等浮点结果保留的小数位
    pub round_decimals: u32,

    /// 记录块数量超过该值时使用 rayon 并行解析；0 表示始终串行
    pub parallel_threshold: usize,
}

impl AnalyzerConfig {
    /// MySQL 慢查询日志的默认配置
    pub fn mysql_default() -> Self {
        Self {
            top_users: 10,
            top_tables: 20,
            time_buckets: vec![
                TimeBucket {
                    label: "0-1s",
                    upper_bound: Some(1.0),
                },
                TimeBucket {
                    label: "1-5s",
                    upper_bound: Some(5.0),
                },
                TimeBucket {
                    label: "5-10s",
                    upper_bound: Some(10.0),
                },
                TimeBucket {
                    label: "10-30s",
                    upper_bound: Some(30.0),
                },
                TimeBucket {
                    label: "30s+",
                    upper_bound: None,
                },
            ],
            round_decimals: 4,
            parallel_threshold: 4096,
        }
    }

    /// 校验区间定义
    pub fn validate(&self) -> Result<(), ConfigError> {
        let last = self.time_buckets.last().ok_or(ConfigError::NoTimeBuckets)?;
        if last.upper_bound.is_some() {
            return Err(ConfigError::BoundedLastBucket {
                label: last.label.to_string(),
            });
        }

        let mut previous = f64::NEG_INFINITY;
        for bucket in &self.time_buckets[..self.time_buckets.len() - 1] {
            match bucket.upper_bound {
                None => {
                    return Err(ConfigError::UnboundedInnerBucket {
                        label: bucket.label.to_string(),
                    });
                }
                Some(bound) if bound <= previous => {
                    return Err(ConfigError::UnorderedTimeBucket {
                        label: bucket.label.to_string(),
                    });
                }
                Some(bound) => previous = bound,
            }
        }
        Ok(())
    }

    /// 返回耗时所属区间的下标
    pub fn bucket_index(&self, query_time: f64) -> usize {
        self.time_buckets
            .iter()
            .position(|b| b.upper_bound.is_none_or(|upper| query_time < upper))
            .unwrap_or(self.time_buckets.len().saturating_sub(1))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::mysql_default()
    }
}
