//! 浏览器能力接口 - 基础设施层
//!
//! 上层只通过这个接口使用浏览器：导航、读取 HTML、查找元素、点击、标签页管理。

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// 标签页句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabHandle(pub String);

impl fmt::Display for TabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 浏览器会话
///
/// 一个会话同时持有多个标签页，但任一时刻只有一个"活动"标签页接收命令。
/// 下载目录是会话级的共享状态，每条公告处理时原地修改；
/// 只有在严格顺序调用的前提下才是安全的，并发使用需要每个任务各自一个会话。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 页面元素
    type Element: Send + Sync;

    /// 活动标签页导航到指定地址
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 活动标签页当前渲染后的 HTML
    async fn current_html(&self) -> Result<String>;

    /// 在活动标签页中按 CSS 选择器查找元素，找不到时返回空列表
    async fn find_elements(&self, css_selector: &str) -> Result<Vec<Self::Element>>;

    /// 模拟点击元素
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// 打开新标签页并设为活动标签页
    async fn open_tab(&self, url: &str) -> Result<TabHandle>;

    /// 关闭活动标签页；之后必须调用 `switch_to` 才能继续发送命令
    async fn close_current_tab(&self) -> Result<()>;

    /// 切换活动标签页
    async fn switch_to(&self, tab: &TabHandle) -> Result<()>;

    /// 设置下载目录
    async fn set_download_target(&self, path: &Path) -> Result<()>;

    /// 当前打开的所有标签页
    async fn list_open_tabs(&self) -> Result<Vec<TabHandle>>;

    /// 活动标签页
    async fn current_tab(&self) -> Result<TabHandle>;
}
