//! # Tender Collector
//!
//! 从各地方国土管理厅 / 流域环境厅网站收集建设工程招标公告，并下载前几条公告的附件
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser / Page），只暴露能力
//! - `BrowserSession` - 导航、读取 HTML、查找元素、点击、标签页管理
//! - `ChromiumSession` - 基于 chromiumoxide 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `UrlNormalizer` - 详情链接规范化
//! - `ListingParser` - 公告列表解析
//! - `AttachmentPolicy` - 附件链接识别规则
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条公告"的附件下载流程
//! - `ListingCtx` - 上下文封装（序号 + 工程名称）
//! - `AttachmentFlow` - 打开详情页 → 查找附件 → 点击 → 关闭
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/collector` - 按机构收集公告表
//! - `orchestrator/retriever` - 前 N 条公告的附件下载
//! - `orchestrator/app` - 应用入口，管理浏览器资源
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::AppError;
pub use infrastructure::{BrowserSession, ChromiumSession, TabHandle};
pub use models::{ListingRecord, ListingTable, Organization, OrganizationRegistry, RetrievalOutcome};
pub use orchestrator::{App, AttachmentRetriever, Collector};
pub use workflow::{AttachmentFlow, ListingCtx, RetrievalSettings};
