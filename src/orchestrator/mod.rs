//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源管理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 加载配置和机构注册表
//! - 持有浏览器会话
//! - 先收集、再下载附件，输出统计信息
//!
//! ### `collector` - 公告收集器
//! - 按顺序遍历选中机构（Vec<Organization>）
//! - 导航、等待、解析，失败的机构只记录不中断
//!
//! ### `retriever` - 附件下载器
//! - 只处理公告表前 N 条
//! - 为每条公告准备目录并委托 `AttachmentFlow`
//! - 结束前清理所有残留标签页
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! collector / retriever
//!     ↓
//! workflow::AttachmentFlow (处理单条公告)
//!     ↓
//! services (能力层：normalize / parse / policy / progress)
//!     ↓
//! infrastructure (基础设施：BrowserSession)
//! ```

pub mod app;
pub mod collector;
pub mod retriever;

// 重新导出主要类型
pub use app::{App, RunSummary};
pub use collector::{CollectionReport, Collector, OrganizationFailure};
pub use retriever::AttachmentRetriever;
