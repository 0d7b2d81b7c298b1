// 记录头常量
const TIME_HEADER: &[u8] = b"# Time: ";

/// 判断一行日志是否为记录起始行。
///
/// 慢查询日志的每条记录以 `# Time: ` 注释行开头，该行之后是其余 `#` 元信息行、
/// `SET timestamp=...;` 行以及 SQL 语句。起始行必须从行首开始，前面不能有空白。
#[inline(always)]
pub fn is_record_start_line(line: &[u8]) -> bool {
    line.starts_with(TIME_HEADER)
}

/// 四舍五入到指定小数位
///
/// 放大后超出 f64 范围（数值过大或小数位过多）时原样返回。
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let Ok(exponent) = i32::try_from(decimals) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
