use std::path::PathBuf;

/// 一次附件下载的汇总计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetrievalOutcome {
    pub success_count: usize,
    pub fail_count: usize,
}

/// 单条公告的下载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 没有详情链接，未做任何处理
    NoDetailUrl,
    /// 创建目录失败，整条跳过
    FolderFailed { reason: String },
    /// 在等待时间内没有找到附件元素
    NoAttachments,
    /// 打开或检查详情页时出错
    PageFailed { reason: String },
    /// 逐个点击了附件元素
    Triggered { clicked: usize, failed: usize },
}

impl RecordOutcome {
    /// 该结果对 (成功, 失败) 计数的贡献
    pub fn counts(&self) -> (usize, usize) {
        match self {
            RecordOutcome::NoDetailUrl | RecordOutcome::FolderFailed { .. } => (0, 0),
            RecordOutcome::NoAttachments | RecordOutcome::PageFailed { .. } => (0, 1),
            RecordOutcome::Triggered { clicked, failed } => (*clicked, *failed),
        }
    }
}

/// 单条公告的处理报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    /// 在公告表中的位置（从1开始）
    pub index: usize,
    pub title: String,
    pub folder: PathBuf,
    pub outcome: RecordOutcome,
}

/// 一次附件下载运行的报告
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalReport {
    pub records: Vec<RecordReport>,
}

impl RetrievalReport {
    pub fn push(&mut self, report: RecordReport) {
        self.records.push(report);
    }

    /// 汇总成功/失败计数
    pub fn outcome(&self) -> RetrievalOutcome {
        self.records
            .iter()
            .fold(RetrievalOutcome::default(), |mut acc, r| {
                let (ok, failed) = r.outcome.counts();
                acc.success_count += ok;
                acc.fail_count += failed;
                acc
            })
    }
}
