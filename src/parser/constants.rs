//! 解析器使用的常量定义
//!
//! 定义了字段提取使用的行锚定正则表达式和字段名常量。

use once_cell::sync::Lazy;
use regex::Regex;

// 使用 Lazy 静态初始化正则，避免每条记录重复编译

/// `# Time: <任意文本>`
pub static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# Time: (.+)$").unwrap());

/// `# User@Host: user[login] @  [ip]`
///
/// `@` 与主机方括号之间要求恰好两个空格；其他 MySQL 版本只写一个空格时这一组不会匹配，
/// user/host 保持为空。
pub static USER_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^# User@Host: (.+)\[(.+)\] @  \[(.*)\]").unwrap());

/// `# Thread_id: <int>  Schema: <name>  QC_hit: <token>`
pub static THREAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^# Thread_id: (\d+)\s+Schema: (\w+)\s+QC_hit: (\w+)").unwrap()
});

/// `# Query_time: <f>  Lock_time: <f>  Rows_sent: <int>  Rows_examined: <int>`
pub static TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^# Query_time: ([\d.]+)\s+Lock_time: ([\d.]+)\s+Rows_sent: (\d+)\s+Rows_examined: (\d+)",
    )
    .unwrap()
});

/// `# Rows_affected: <int>  Bytes_sent: <int>`
pub static AFFECTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^# Rows_affected: (\d+)\s+Bytes_sent: (\d+)").unwrap());

/// `SET timestamp=<int>;`
pub static SET_TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^SET timestamp=(\d+);").unwrap());

// 字段名常量（用于错误信息）

/// 线程 ID
pub const FIELD_THREAD_ID: &str = "thread_id";
/// 查询耗时
pub const FIELD_QUERY_TIME: &str = "query_time";
/// 锁等待耗时
pub const FIELD_LOCK_TIME: &str = "lock_time";
/// 返回行数
pub const FIELD_ROWS_SENT: &str = "rows_sent";
/// 扫描行数
pub const FIELD_ROWS_EXAMINED: &str = "rows_examined";
/// 影响行数
pub const FIELD_ROWS_AFFECTED: &str = "rows_affected";
/// 发送字节数
pub const FIELD_BYTES_SENT: &str = "bytes_sent";
/// `SET timestamp` 中的时间戳
pub const FIELD_TIMESTAMP: &str = "timestamp";
