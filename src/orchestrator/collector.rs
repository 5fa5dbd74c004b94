//! 公告收集器 - 编排层
//!
//! ## 职责
//!
//! 按选择顺序逐个机构收集公告，汇总成一张公告表。
//!
//! ## 核心功能
//!
//! 1. **顺序导航**：复用同一个浏览器会话，不并行
//! 2. **等待渲染**：导航后固定等待，再读取 HTML
//! 3. **失败隔离**：单个机构失败只记录警告，继续处理其余机构
//! 4. **进度上报**：按机构上报，不按行

use crate::error::ConfigError;
use crate::infrastructure::BrowserSession;
use crate::models::listing::ListingTable;
use crate::models::organization::{Organization, OrganizationRegistry};
use crate::services::{CollectProgress, ListingParser, ParsedPage, ProgressListener, UrlNormalizer};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// 单个机构的收集失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationFailure {
    pub organization: String,
    pub reason: String,
}

/// 一次收集的结果
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub table: ListingTable,
    pub failures: Vec<OrganizationFailure>,
    /// 因单元格不足被跳过的行数
    pub skipped_rows: usize,
    pub collected_at: DateTime<Local>,
}

/// 公告收集器
pub struct Collector {
    registry: OrganizationRegistry,
    parser: ListingParser,
    page_settle: Duration,
}

impl Collector {
    pub fn new(registry: OrganizationRegistry, page_settle: Duration) -> Result<Self> {
        let parser = ListingParser::new(UrlNormalizer::new(&registry))?;
        Ok(Self {
            registry,
            parser,
            page_settle,
        })
    }

    /// 收集选中机构的公告
    ///
    /// 全部机构失败时返回空表，不返回错误。
    pub async fn collect<B: BrowserSession>(
        &self,
        browser: &B,
        selected: &[Organization],
        progress: &dyn ProgressListener,
    ) -> CollectionReport {
        let mut table = ListingTable::default();
        let mut failures = Vec::new();
        let mut skipped_rows = 0;

        for (i, organization) in selected.iter().enumerate() {
            info!("🔍 {} 数据收集中...", organization.name);

            let collected = match self.collect_one(browser, organization).await {
                Ok(page) => {
                    let count = page.records.len();
                    skipped_rows += page.row_errors.len();
                    table.extend(page.records);
                    Some(count)
                }
                Err(e) => {
                    warn!("⚠️ 数据收集失败 ({}): {:#}", organization.name, e);
                    failures.push(OrganizationFailure {
                        organization: organization.name.clone(),
                        reason: format!("{:#}", e),
                    });
                    None
                }
            };

            progress.on_organization(&CollectProgress {
                index: i + 1,
                total: selected.len(),
                organization: organization.name.clone(),
                collected,
            });
        }

        CollectionReport {
            table,
            failures,
            skipped_rows,
            collected_at: Local::now(),
        }
    }

    async fn collect_one<B: BrowserSession>(
        &self,
        browser: &B,
        organization: &Organization,
    ) -> Result<ParsedPage> {
        if !self.registry.contains(&organization.name) {
            return Err(ConfigError::UnknownOrganization {
                name: organization.name.clone(),
            }
            .into());
        }

        let url = self.registry.list_url(organization);
        browser.navigate(&url).await?;
        sleep(self.page_settle).await;

        let html = browser.current_html().await?;
        Ok(self.parser.parse(&html, &organization.name))
    }
}
