//! 公告处理上下文
//!
//! 封装"我正在处理第几条公告"这一信息

use crate::utils::logging::truncate_text;
use std::fmt::Display;

/// 公告处理上下文
#[derive(Debug, Clone)]
pub struct ListingCtx {
    /// 公告在表中的位置（从1开始）
    pub index: usize,

    /// 本次处理的公告总数
    pub total: usize,

    /// 工程名称
    pub title: String,
}

impl ListingCtx {
    pub fn new(index: usize, total: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            total,
            title: title.into(),
        }
    }
}

impl Display for ListingCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[公告 {}/{} {}]",
            self.index,
            self.total,
            truncate_text(&self.title, 30)
        )
    }
}
