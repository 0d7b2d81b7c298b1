//! 原始查询筛选与分页
//!
//! 在不重新扫描日志的前提下，按关键字、耗时、类型、用户、表过滤记录，
//! 并按耗时降序分页返回。

use std::collections::BTreeSet;

use crate::event::QueryEvent;
use crate::sql::{StatementType, classify_sql};

/// 记录筛选条件，所有条件同时生效；字段为空表示不过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    /// SQL 中包含的关键字（不区分大小写）
    pub search: Option<String>,

    /// 最小查询耗时（秒），缺失耗时按 0 比较
    pub min_time: Option<f64>,

    /// 语句类型
    pub statement_type: Option<StatementType>,

    /// 用户名包含的子串（不区分大小写）
    pub user: Option<String>,

    /// 逗号分隔的表名子串，命中任意一个即可（不区分大小写）
    pub tables: Option<String>,
}

impl QueryFilter {
    /// 判断记录是否满足条件；没有 SQL 的记录始终不满足
    pub fn matches(&self, event: &QueryEvent) -> bool {
        let Some(sql) = event.sql.as_deref().filter(|s| !s.is_empty()) else {
            return false;
        };

        if let Some(min_time) = self.min_time {
            if event.query_time_or_zero() < min_time {
                return false;
            }
        }

        if let Some(statement_type) = self.statement_type {
            if classify_sql(sql) != statement_type {
                return false;
            }
        }

        if let Some(user) = non_empty(&self.user) {
            let actual = event.user.as_deref().unwrap_or("").to_lowercase();
            if !actual.contains(&user.to_lowercase()) {
                return false;
            }
        }

        if let Some(tables) = non_empty(&self.tables) {
            let wanted: Vec<String> = tables
                .split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if !wanted.is_empty()
                && !event.tables_used.iter().any(|table| {
                    let table = table.to_lowercase();
                    wanted.iter().any(|w| table.contains(w.as_str()))
                })
            {
                return false;
            }
        }

        if let Some(search) = non_empty(&self.search) {
            if !sql.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 一页结果
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 过滤后的总数
    pub total: usize,
    /// 页码，从 1 开始
    pub page: usize,
    pub size: usize,
    pub total_pages: usize,
}

/// 过滤记录并按查询耗时降序排列（耗时相同保持输入顺序）
pub fn filter_events<'a>(events: &'a [QueryEvent], filter: &QueryFilter) -> Vec<&'a QueryEvent> {
    let mut matched: Vec<&QueryEvent> = events.iter().filter(|e| filter.matches(e)).collect();
    matched.sort_by(|a, b| b.query_time_or_zero().total_cmp(&a.query_time_or_zero()));
    matched
}

/// 分页；`page` 和 `size` 小于 1 时按 1 处理，超出范围的页返回空列表
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> Page<T> {
    let page = page.max(1);
    let size = size.max(1);
    let total = items.len();
    let start = (page - 1).saturating_mul(size);

    let items = items.into_iter().skip(start).take(size).collect();
    Page {
        items,
        total,
        page,
        size,
        total_pages: total.div_ceil(size),
    }
}

/// 所有记录引用过的表（排序、去重）
pub fn list_tables(events: &[QueryEvent]) -> Vec<String> {
    events
        .iter()
        .flat_map(|e| e.tables_used.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sql: &str, query_time: Option<f64>, user: &str, tables: &[&str]) -> QueryEvent {
        QueryEvent {
            sql: Some(sql.to_string()),
            query_time,
            user: Some(user.to_string()),
            tables_used: tables.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<QueryEvent> {
        vec![
            event("SELECT * FROM orders", Some(0.5), "app", &["orders"]),
            event("UPDATE users SET a = 1", Some(3.0), "Admin", &[]),
            event("SELECT * FROM order_items", None, "report", &["order_items"]),
            QueryEvent {
                query_time: Some(100.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn empty_filter_keeps_events_with_sql_sorted_by_time() {
        let events = sample();
        let matched = filter_events(&events, &QueryFilter::default());
        let times: Vec<Option<f64>> = matched.iter().map(|e| e.query_time).collect();
        assert_eq!(times, vec![Some(3.0), Some(0.5), None]);
    }

    #[test]
    fn filter_by_min_time_and_type() {
        let events = sample();
        let filter = QueryFilter {
            min_time: Some(0.1),
            statement_type: Some(StatementType::Select),
            ..Default::default()
        };
        let matched = filter_events(&events, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].sql.as_deref(), Some("SELECT * FROM orders"));
    }

    #[test]
    fn filter_by_user_and_search_is_case_insensitive() {
        let events = sample();
        let filter = QueryFilter {
            user: Some("admin".into()),
            search: Some("update USERS".into()),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &filter).len(), 1);
    }

    #[test]
    fn filter_by_tables_matches_any_substring() {
        let events = sample();
        let filter = QueryFilter {
            tables: Some(" ORDER , missing ,".into()),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &filter).len(), 2);

        let filter = QueryFilter {
            tables: Some(" , ".into()),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &filter).len(), 3);
    }

    #[test]
    fn pagination() {
        let page = paginate((1..=7).collect::<Vec<_>>(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let last = paginate((1..=7).collect::<Vec<_>>(), 3, 3);
        assert_eq!(last.items, vec![7]);

        let beyond = paginate((1..=7).collect::<Vec<_>>(), 9, 3);
        assert!(beyond.items.is_empty());

        let clamped = paginate(vec![1, 2], 0, 0);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.size, 1);
        assert_eq!(clamped.items, vec![1]);
        assert_eq!(clamped.total_pages, 2);
    }

    #[test]
    fn tables_list() {
        assert_eq!(list_tables(&sample()), vec!["order_items", "orders"]);
        assert!(list_tables(&[]).is_empty());
    }
}
