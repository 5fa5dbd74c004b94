//! 附件下载器 - 编排层
//!
//! ## 职责
//!
//! 对公告表的前 N 条逐条下载附件到各自的目录。
//!
//! ## 核心功能
//!
//! 1. **数量上限**：只处理前 `max_listings` 条，限制最坏运行时间
//! 2. **目录隔离**：每条公告一个目录，下载目录随之切换
//! 3. **委托流程**：详情页的处理交给 `workflow::AttachmentFlow`
//! 4. **标签页清理**：无论成功或出错，结束前关闭主标签页以外的全部标签页
//! 5. **进度估计**：按平均耗时估计剩余时间

use crate::error::AppError;
use crate::infrastructure::{BrowserSession, TabHandle};
use crate::models::listing::{ListingRecord, ListingTable};
use crate::models::retrieval::{RecordOutcome, RecordReport, RetrievalReport};
use crate::services::{estimate_remaining, folder_name, AttachmentPolicy, ProgressListener, RetrieveProgress};
use crate::workflow::{close_stray_tabs, AttachmentFlow, ListingCtx, RetrievalSettings};
use anyhow::Result;
use std::path::Path;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// 附件下载器
pub struct AttachmentRetriever {
    flow: AttachmentFlow,
    max_listings: usize,
}

impl AttachmentRetriever {
    pub fn new(policy: &AttachmentPolicy, settings: RetrievalSettings) -> Self {
        let max_listings = settings.max_listings;
        Self {
            flow: AttachmentFlow::new(policy, settings),
            max_listings,
        }
    }

    /// 下载前 N 条公告的附件
    ///
    /// 出错时也会先清理残留标签页再返回错误。
    pub async fn retrieve<B: BrowserSession>(
        &self,
        browser: &B,
        table: &ListingTable,
        destination_root: &Path,
        progress: &dyn ProgressListener,
    ) -> Result<RetrievalReport> {
        let main = browser.current_tab().await?;

        let result = self
            .retrieve_prefix(browser, &main, table, destination_root, progress)
            .await;

        let cleanup = close_stray_tabs(browser, &main).await;
        if let Err(e) = &cleanup {
            error!("清理标签页失败: {}", e);
        }

        let report = result?;
        cleanup?;
        Ok(report)
    }

    async fn retrieve_prefix<B: BrowserSession>(
        &self,
        browser: &B,
        main: &TabHandle,
        table: &ListingTable,
        destination_root: &Path,
        progress: &dyn ProgressListener,
    ) -> Result<RetrievalReport> {
        let records = table.prefix(self.max_listings);
        let total = records.len();
        let started = Instant::now();
        let mut report = RetrievalReport::default();

        for (i, record) in records.iter().enumerate() {
            let ctx = ListingCtx::new(i + 1, total, record.title.as_str());
            let folder = destination_root.join(folder_name(ctx.index, &record.title));

            let outcome = self.retrieve_record(browser, main, record, &folder, &ctx).await?;
            report.push(RecordReport {
                index: ctx.index,
                title: record.title.clone(),
                folder,
                outcome,
            });

            let elapsed = started.elapsed();
            progress.on_record(&RetrieveProgress {
                processed: ctx.index,
                total,
                title: record.title.clone(),
                elapsed,
                eta: estimate_remaining(elapsed, ctx.index, total),
            });
        }

        let outcome = report.outcome();
        info!(
            "📎 附件下载结束: 成功 {}, 失败 {}, 总耗时 {:.1}秒",
            outcome.success_count,
            outcome.fail_count,
            started.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    async fn retrieve_record<B: BrowserSession>(
        &self,
        browser: &B,
        main: &TabHandle,
        record: &ListingRecord,
        folder: &Path,
        ctx: &ListingCtx,
    ) -> Result<RecordOutcome> {
        let Some(detail_url) = record.detail_url.as_deref() else {
            debug!("{} 没有详情链接，跳过", ctx);
            return Ok(RecordOutcome::NoDetailUrl);
        };

        if let Err(e) = prepare_folder(browser, folder).await {
            error!("{} ❌ 文件夹创建失败: {:#}", ctx, e);
            return Ok(RecordOutcome::FolderFailed {
                reason: format!("{:#}", e),
            });
        }

        info!("{} 📂 {}", ctx, folder.display());
        self.flow.run(browser, main, detail_url, ctx).await
    }
}

/// 创建目录（已存在不算错误）并把下载目录指向它
async fn prepare_folder<B: BrowserSession>(browser: &B, folder: &Path) -> Result<()> {
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| AppError::create_dir_failed(folder.display().to_string(), e))?;
    browser.set_download_target(folder).await
}
