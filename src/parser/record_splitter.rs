//! RecordSplitter - 将整段日志文本切分为记录块
//!
//! 记录从每个 `# Time: ` 起始行开始，到下一个起始行（或文本末尾）为止。
//! 第一个起始行之前的文本会被丢弃，可以通过 [`RecordSplitter::leading_slice`] 取回。

use memchr::memchr;

use crate::tools::is_record_start_line;

/// 按记录起始行切分日志文本的迭代器
///
/// 迭代器是惰性的，不分配内存，产出的是原文本的切片。`Clone` 之后可以从当前位置重新开始，
/// 对同一文本再次调用 [`RecordSplitter::new`] 会得到完全相同的序列。
///
/// # 示例
///
/// ```
/// use mysql_slowlog_analyzer::RecordSplitter;
///
/// let text = "# Time: 1\nSELECT 1;\n# Time: 2\nSELECT 2;";
/// let blocks: Vec<&str> = RecordSplitter::new(text).collect();
///
/// assert_eq!(blocks, vec!["# Time: 1\nSELECT 1;\n", "# Time: 2\nSELECT 2;"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordSplitter<'a> {
    text: &'a str,
    first_start: Option<usize>,
    next_start: Option<usize>,
}

impl<'a> RecordSplitter<'a> {
    pub fn new(text: &'a str) -> Self {
        let first_start = find_record_start(text.as_bytes(), 0);
        Self {
            text,
            first_start,
            next_start: first_start,
        }
    }

    /// 第一个起始行之前的文本（没有或全为空白时返回 `None`）
    pub fn leading_slice(&self) -> Option<&'a str> {
        let end = self.first_start.unwrap_or(self.text.len());
        let leading = &self.text[..end];
        if leading.trim().is_empty() {
            None
        } else {
            Some(leading)
        }
    }
}

impl<'a> Iterator for RecordSplitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        loop {
            let start = self.next_start?;

            // 从起始行的下一行开始寻找下一条记录
            let following = memchr(b'\n', &bytes[start..])
                .and_then(|idx| find_record_start(bytes, start + idx + 1));
            self.next_start = following;

            let block = &self.text[start..following.unwrap_or(bytes.len())];
            if block.trim().is_empty() {
                continue;
            }
            return Some(block);
        }
    }
}

/// 从 `from`（必须是行首）开始查找下一个记录起始行的位置
fn find_record_start(bytes: &[u8], from: usize) -> Option<usize> {
    let mut line_start = from;
    loop {
        if is_record_start_line(&bytes[line_start..]) {
            return Some(line_start);
        }
        let idx = memchr(b'\n', &bytes[line_start..])?;
        line_start += idx + 1;
    }
}
