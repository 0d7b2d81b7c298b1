/// 慢查询日志中的一条记录
///
/// 除 `tables_used` 外所有字段都是可选的：残缺或格式异常的记录只会得到部分数据，
/// 这属于正常情况而不是错误。未能解析的字段保持 `None`，不会被填充为零值。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryEvent {
    /// `# Time:` 行的内容（去除首尾空白）
    pub time: Option<String>,

    /// `# User@Host:` 行中方括号内的登录用户
    pub user: Option<String>,

    /// `# User@Host:` 行中 `@` 之后方括号内的主机地址
    pub host: Option<String>,

    /// 线程 ID
    pub thread_id: Option<i64>,

    /// 默认库
    pub schema: Option<String>,

    /// 查询缓存命中标记（原始 token，如 `No`）
    pub qc_hit: Option<String>,

    /// 查询耗时（秒）
    pub query_time: Option<f64>,

    /// 锁等待耗时（秒）
    pub lock_time: Option<f64>,

    /// 返回给客户端的行数
    pub rows_sent: Option<i64>,

    /// 扫描的行数
    pub rows_examined: Option<i64>,

    /// 影响的行数
    pub rows_affected: Option<i64>,

    /// 发送给客户端的字节数
    pub bytes_sent: Option<i64>,

    /// `SET timestamp=<int>;` 中的 Unix 时间戳
    pub timestamp: Option<i64>,

    /// 原始 SQL 文本
    pub sql: Option<String>,

    /// 引用的表名（小写、去重、排序），可能为空
    #[cfg_attr(feature = "serde", serde(default))]
    pub tables_used: Vec<String>,
}

impl QueryEvent {
    /// 是否带有非空 SQL
    pub fn has_sql(&self) -> bool {
        self.sql.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// 查询耗时，缺失时按 0 计
    pub fn query_time_or_zero(&self) -> f64 {
        self.query_time.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_event_is_empty() {
        let event = QueryEvent::default();
        assert!(!event.has_sql());
        assert!(event.tables_used.is_empty());
        assert_eq!(event.query_time_or_zero(), 0.0);
    }

    #[test]
    fn empty_sql_counts_as_absent() {
        let event = QueryEvent {
            sql: Some(String::new()),
            ..Default::default()
        };
        assert!(!event.has_sql());
    }
}
