//! 附件识别规则
//!
//! 通过链接属性判断页面元素是否为附件下载入口。规则是针对目标站点总结出来的经验规则，
//! 可以通过配置替换。

/// 默认的下载接口标记
pub const DEFAULT_ENDPOINT_MARKERS: &[&str] = &["fileDownload"];

/// 默认的附件扩展名：文字处理、表格、演示文稿、PDF、CAD 图纸、压缩包
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "hwp", "hwpx", "xls", "xlsx", "doc", "docx", "pdf", "ppt", "pptx", "dwg", "dxf", "zip",
];

/// 附件识别规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPolicy {
    /// `href` 或 `onclick` 中包含这些字符串即视为下载入口
    pub endpoint_markers: Vec<String>,
    /// `href` 以这些扩展名结尾即视为附件（不带点）
    pub extensions: Vec<String>,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            endpoint_markers: DEFAULT_ENDPOINT_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AttachmentPolicy {
    /// 生成用于查找附件链接的 CSS 选择器
    pub fn css_selector(&self) -> String {
        let mut parts = Vec::new();
        for marker in &self.endpoint_markers {
            let marker = escape(marker);
            parts.push(format!("a[href*=\"{}\"]", marker));
            parts.push(format!("a[onclick*=\"{}\"]", marker));
        }
        for ext in &self.extensions {
            parts.push(format!("a[href$=\".{}\"]", escape(ext)));
        }
        parts.join(", ")
    }

    /// 按同样的规则判断一组属性
    pub fn matches(&self, href: Option<&str>, onclick: Option<&str>) -> bool {
        let marked = |attr: Option<&str>| {
            attr.is_some_and(|v| self.endpoint_markers.iter().any(|m| v.contains(m.as_str())))
        };
        let has_extension = href.is_some_and(|h| {
            self.extensions
                .iter()
                .any(|ext| h.ends_with(&format!(".{}", ext)))
        });
        marked(href) || marked(onclick) || has_extension
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
