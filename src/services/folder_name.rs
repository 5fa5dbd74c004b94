use regex::Regex;
use std::sync::LazyLock;

/// 文件路径中不允许出现的字符；空白类控制字符留给下一步合并
static ILLEGAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x08\x0e-\x1f\x7f]"#).expect("valid regex")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 先去掉非法字符，再把空白串合并为 `_`
pub fn sanitize_filename(name: &str) -> String {
    let stripped = ILLEGAL_CHARS.replace_all(name, "");
    WHITESPACE_RUN.replace_all(&stripped, "_").into_owned()
}

/// 下载目录名：两位序号 + 工程名称
///
/// `index` 从1开始。
pub fn folder_name(index: usize, title: &str) -> String {
    sanitize_filename(&format!("{:02}_{}", index, title))
}
