//! 单条公告的附件下载流程 - 流程层
//!
//! 流程顺序：
//! 1. 新标签页打开详情页并等待渲染
//! 2. 在限定时间内轮询附件链接
//! 3. 逐个点击触发下载
//! 4. 无论结果如何都关闭详情页并切回主标签页

use crate::config::Config;
use crate::infrastructure::{BrowserSession, TabHandle};
use crate::models::retrieval::RecordOutcome;
use crate::services::AttachmentPolicy;
use crate::workflow::listing_ctx::ListingCtx;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// 附件下载的时间与数量设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalSettings {
    /// 只处理公告表的前 N 条
    pub max_listings: usize,
    /// 打开详情页后的等待时间
    pub page_settle: Duration,
    /// 查找附件元素的最长等待时间
    pub element_wait: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
    /// 每次点击后的等待时间
    pub click_settle: Duration,
    /// 关闭详情页后的等待时间
    pub tab_close_settle: Duration,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_listings: 3,
            page_settle: Duration::from_secs(2),
            element_wait: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
            click_settle: Duration::from_secs(3),
            tab_close_settle: Duration::from_secs(1),
        }
    }
}

impl RetrievalSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_listings: config.max_attachment_listings,
            page_settle: config.page_settle,
            element_wait: config.element_wait,
            click_settle: config.click_settle,
            ..Self::default()
        }
    }
}

/// 附件下载流程
///
/// 不持有浏览器，只依赖 `BrowserSession` 能力。
pub struct AttachmentFlow {
    selector: String,
    settings: RetrievalSettings,
}

impl AttachmentFlow {
    pub fn new(policy: &AttachmentPolicy, settings: RetrievalSettings) -> Self {
        Self {
            selector: policy.css_selector(),
            settings,
        }
    }

    /// 处理一条公告的详情页
    ///
    /// 页面级错误记为失败结果；只有关闭标签页 / 切回主标签页失败才返回 Err。
    pub async fn run<B: BrowserSession>(
        &self,
        browser: &B,
        main: &TabHandle,
        detail_url: &str,
        ctx: &ListingCtx,
    ) -> Result<RecordOutcome> {
        let tab = match browser.open_tab(detail_url).await {
            Ok(tab) => tab,
            Err(e) => {
                warn!("{} ⚠️ 打开详情页失败: {}", ctx, e);
                return Ok(RecordOutcome::PageFailed {
                    reason: e.to_string(),
                });
            }
        };

        let outcome = match self.trigger_downloads(browser, ctx).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{} ⚠️ 检查详情页失败: {}", ctx, e);
                RecordOutcome::PageFailed {
                    reason: e.to_string(),
                }
            }
        };

        let closed = close_tab(browser, &tab, main).await;
        sleep(self.settings.tab_close_settle).await;
        closed?;

        Ok(outcome)
    }

    async fn trigger_downloads<B: BrowserSession>(
        &self,
        browser: &B,
        ctx: &ListingCtx,
    ) -> Result<RecordOutcome> {
        sleep(self.settings.page_settle).await;

        let elements = self.wait_for_attachments(browser).await?;
        if elements.is_empty() {
            warn!("{} ⚠️ 找不到下载链接", ctx);
            return Ok(RecordOutcome::NoAttachments);
        }
        info!("{} 🔗 发现 {} 个下载链接", ctx, elements.len());

        let mut clicked = 0;
        let mut failed = 0;
        for element in &elements {
            match browser.click(element).await {
                Ok(()) => {
                    sleep(self.settings.click_settle).await;
                    clicked += 1;
                }
                Err(e) => {
                    warn!("{} ⚠️ 下载失败: {}", ctx, e);
                    failed += 1;
                }
            }
        }

        info!("{} ✓ 触发下载 {} 个, 失败 {} 个", ctx, clicked, failed);
        Ok(RecordOutcome::Triggered { clicked, failed })
    }

    /// 在 `element_wait` 内轮询附件元素，超时返回空列表
    async fn wait_for_attachments<B: BrowserSession>(&self, browser: &B) -> Result<Vec<B::Element>> {
        let deadline = Instant::now() + self.settings.element_wait;
        loop {
            let found = browser.find_elements(&self.selector).await?;
            let now = Instant::now();
            if !found.is_empty() || now >= deadline {
                return Ok(found);
            }
            debug!("尚未找到附件链接，继续等待...");
            sleep(self.settings.poll_interval.min(deadline - now)).await;
        }
    }
}

/// 关闭详情页并切回主标签页
async fn close_tab<B: BrowserSession>(browser: &B, tab: &TabHandle, main: &TabHandle) -> Result<()> {
    if browser.current_tab().await.ok().as_ref() != Some(tab) {
        browser.switch_to(tab).await?;
    }
    browser.close_current_tab().await?;
    browser.switch_to(main).await
}

/// 关闭主标签页以外的所有标签页并切回主标签页
///
/// 每个标签页都会尝试关闭，返回第一个错误。
pub async fn close_stray_tabs<B: BrowserSession>(browser: &B, main: &TabHandle) -> Result<usize> {
    let mut closed = 0;
    let mut first_error = None;

    for tab in browser.list_open_tabs().await? {
        if tab == *main {
            continue;
        }
        let result = match browser.switch_to(&tab).await {
            Ok(()) => browser.close_current_tab().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => closed += 1,
            Err(e) => {
                warn!("关闭标签页 {} 失败: {}", tab, e);
                first_error.get_or_insert(e);
            }
        }
    }

    browser.switch_to(main).await?;
    if closed > 0 {
        debug!("清理了 {} 个残留标签页", closed);
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(closed),
    }
}
