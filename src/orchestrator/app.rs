//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 管理应用生命周期和浏览器资源，依次执行两个阶段：
//!
//! 1. **收集**：从选中机构收集公告表
//! 2. **下载**：为前 N 条公告下载附件
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有浏览器会话的模块
//! - **向下委托**：收集交给 `Collector`，下载交给 `AttachmentRetriever`
//! - **致命错误**：只有配置错误和浏览器初始化失败会中断程序

use crate::browser;
use crate::config::Config;
use crate::infrastructure::ChromiumSession;
use crate::models::listing::ListingTable;
use crate::models::loaders::load_registry;
use crate::models::organization::{Organization, OrganizationCategory, OrganizationRegistry};
use crate::models::retrieval::RetrievalOutcome;
use crate::orchestrator::collector::Collector;
use crate::orchestrator::retriever::AttachmentRetriever;
use crate::services::{AttachmentPolicy, LogProgress};
use crate::utils::logging::{log_collection_stats, log_startup, print_final_stats, truncate_text};
use crate::workflow::RetrievalSettings;
use anyhow::Result;
use tokio::time::Instant;
use tracing::{info, warn};

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub table: ListingTable,
    /// 未下载附件时为 None
    pub retrieval: Option<RetrievalOutcome>,
}

/// 应用主结构
pub struct App {
    config: Config,
    selected: Vec<Organization>,
    collector: Collector,
    retriever: AttachmentRetriever,
    session: ChromiumSession,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let registry = match &config.registry_file {
            Some(path) => load_registry(path).await?,
            None => OrganizationRegistry::default(),
        };
        let selected = select_organizations(&registry, &config.organizations)?;

        log_startup(selected.len(), config.max_attachment_listings);

        let collector = Collector::new(registry, config.page_settle)?;
        let retriever = AttachmentRetriever::new(
            &AttachmentPolicy::default(),
            RetrievalSettings::from_config(&config),
        );

        // 浏览器初始化失败是致命错误
        let session = browser::open_session(&config).await?;

        Ok(Self {
            config,
            selected,
            collector,
            retriever,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        let table = narrow_to_organizations(self.collect().await, &self.config.organization_filter);

        if table.is_empty() {
            warn!("⚠️ 没有收集到任何公告，程序结束");
            return Ok(RunSummary {
                table,
                retrieval: None,
            });
        }

        if !self.config.download_attachments {
            return Ok(RunSummary {
                table,
                retrieval: None,
            });
        }

        let started = Instant::now();
        let report = self
            .retriever
            .retrieve(
                &self.session,
                &table,
                &self.config.download_path,
                &LogProgress,
            )
            .await?;
        let outcome = report.outcome();

        print_final_stats(
            outcome.success_count,
            outcome.fail_count,
            started.elapsed(),
            &self.config.output_log_file,
        );

        Ok(RunSummary {
            table,
            retrieval: Some(outcome),
        })
    }

    async fn collect(&self) -> ListingTable {
        let started = Instant::now();
        let report = self
            .collector
            .collect(&self.session, &self.selected, &LogProgress)
            .await;

        if report.skipped_rows > 0 {
            warn!("⚠️ 跳过了 {} 个不完整的数据行", report.skipped_rows);
        }

        log_collection_stats(started.elapsed(), report.table.len(), report.failures.len());
        for record in report.table.records() {
            info!(
                "[{}] {} | {} | {} | 投标日 {} | 登记日 {}",
                record.organization,
                record.sequence,
                truncate_text(&record.title, 40),
                record.announcement_no,
                record.bid_date,
                record.registered_date
            );
        }
        info!(
            "收集完成时间: {}",
            report.collected_at.format("%Y-%m-%d %H:%M:%S")
        );

        report.table
    }
}

/// 只保留过滤列表中的机构；列表为空时原样返回
fn narrow_to_organizations(table: ListingTable, filter: &[String]) -> ListingTable {
    if filter.is_empty() {
        return table;
    }
    let narrowed = table.filter_by_organizations(filter);
    info!(
        "🔎 按机构过滤: {} -> {} 条, 保留机构: {}",
        table.len(),
        narrowed.len(),
        narrowed.organizations().join(", ")
    );
    narrowed
}

/// 按名称选择机构；未指定时选择全部地方国土管理厅
fn select_organizations(
    registry: &OrganizationRegistry,
    names: &[String],
) -> Result<Vec<Organization>> {
    if names.is_empty() {
        return Ok(registry
            .by_category(OrganizationCategory::RegionalOffice)
            .into_iter()
            .cloned()
            .collect());
    }
    Ok(registry.select(names)?)
}
