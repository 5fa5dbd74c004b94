//! 进度上报
//!
//! 收集按机构上报，附件下载按公告上报并附带剩余时间估计。进度只用于展示，不参与流程控制。

use std::time::Duration;
use tracing::info;

/// 机构收集进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectProgress {
    /// 当前机构序号（从1开始）
    pub index: usize,
    pub total: usize,
    pub organization: String,
    /// 成功时为本机构的记录数，失败时为 None
    pub collected: Option<usize>,
}

/// 附件下载进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveProgress {
    /// 已处理的公告数
    pub processed: usize,
    pub total: usize,
    pub title: String,
    pub elapsed: Duration,
    pub eta: Duration,
}

/// 进度接收方（界面层实现）
pub trait ProgressListener: Send + Sync {
    fn on_organization(&self, _progress: &CollectProgress) {}

    fn on_record(&self, _progress: &RetrieveProgress) {}
}

/// 把进度写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressListener for LogProgress {
    fn on_organization(&self, progress: &CollectProgress) {
        // 失败由收集器连同原因一起告警
        if let Some(count) = progress.collected {
            info!(
                "📥 [{}/{}] {} 数据收集完成: {} 条",
                progress.index, progress.total, progress.organization, count
            );
        }
    }

    fn on_record(&self, progress: &RetrieveProgress) {
        info!(
            "⏳ 处理中 ({}/{}): {} | 经过时间: {:.1}秒 | 预计剩余: {:.1}秒",
            progress.processed,
            progress.total,
            progress.title,
            progress.elapsed.as_secs_f64(),
            progress.eta.as_secs_f64()
        );
    }
}

/// 根据平均耗时估计剩余时间
pub fn estimate_remaining(elapsed: Duration, processed: usize, total: usize) -> Duration {
    if processed == 0 || processed >= total {
        return Duration::ZERO;
    }
    let per_item = elapsed / processed as u32;
    per_item * (total - processed) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_remaining() {
        assert_eq!(
            estimate_remaining(Duration::from_secs(10), 1, 3),
            Duration::from_secs(20)
        );
        assert_eq!(
            estimate_remaining(Duration::from_secs(10), 2, 3),
            Duration::from_secs(5)
        );
        assert_eq!(estimate_remaining(Duration::from_secs(10), 3, 3), Duration::ZERO);
        assert_eq!(estimate_remaining(Duration::from_secs(10), 0, 3), Duration::ZERO);
    }
}
