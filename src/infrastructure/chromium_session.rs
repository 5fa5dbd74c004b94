//! 基于 chromiumoxide 的浏览器会话
//!
//! 持有 Browser 和全部标签页（Page），通过 CDP 实现 `BrowserSession`

use crate::error::BrowserError;
use crate::infrastructure::browser_session::{BrowserSession, TabHandle};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, Page};
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

/// Chromium 会话
pub struct ChromiumSession {
    browser: Browser,
    /// 本会话管理的标签页，第一个是主标签页
    tabs: Mutex<Vec<(TabHandle, Page)>>,
    active: Mutex<Option<TabHandle>>,
    /// 连接时已经存在的其他标签页，不归本会话管理
    foreign: HashSet<TabHandle>,
}

impl ChromiumSession {
    /// 以 `main_page` 为主标签页创建会话
    pub async fn attach(browser: Browser, main_page: Page) -> Result<Self> {
        let main = handle_of(&main_page);
        let foreign = browser
            .pages()
            .await
            .context("获取页面列表失败")?
            .iter()
            .map(handle_of)
            .filter(|h| *h != main)
            .collect::<HashSet<_>>();
        debug!("会话主标签页: {}, 忽略已有标签页 {} 个", main, foreign.len());

        Ok(Self {
            browser,
            tabs: Mutex::new(vec![(main.clone(), main_page)]),
            active: Mutex::new(Some(main)),
            foreign,
        })
    }

    async fn active_page(&self) -> Result<Page> {
        let active = self.active.lock().await.clone();
        let handle = active.ok_or(BrowserError::NoActiveTab)?;
        self.page_of(&handle).await
    }

    async fn page_of(&self, handle: &TabHandle) -> Result<Page> {
        let tabs = self.tabs.lock().await;
        tabs.iter()
            .find(|(h, _)| h == handle)
            .map(|(_, page)| page.clone())
            .ok_or_else(|| {
                BrowserError::TabNotFound {
                    handle: handle.to_string(),
                }
                .into()
            })
    }
}

fn handle_of(page: &Page) -> TabHandle {
    TabHandle(page.target_id().inner().clone())
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.active_page().await?;
        page.goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        debug!("已导航到: {}", url);
        Ok(())
    }

    async fn current_html(&self) -> Result<String> {
        let page = self.active_page().await?;
        Ok(page.content().await?)
    }

    async fn find_elements(&self, css_selector: &str) -> Result<Vec<Element>> {
        let page = self.active_page().await?;
        Ok(page.find_elements(css_selector).await?)
    }

    async fn click(&self, element: &Element) -> Result<()> {
        // 用脚本点击，不受元素是否在可视区域影响
        element
            .call_js_fn("function() { this.click(); }", false)
            .await?;
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<TabHandle> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        let handle = handle_of(&page);
        self.tabs.lock().await.push((handle.clone(), page));
        *self.active.lock().await = Some(handle.clone());
        debug!("打开新标签页 {}: {}", handle, url);
        Ok(handle)
    }

    async fn close_current_tab(&self) -> Result<()> {
        let handle = self
            .active
            .lock()
            .await
            .clone()
            .ok_or(BrowserError::NoActiveTab)?;
        let page = self.page_of(&handle).await?;

        // 关闭成功后才从列表移除，失败的标签页留给最后的清理
        page.close().await?;
        self.tabs.lock().await.retain(|(h, _)| *h != handle);
        *self.active.lock().await = None;
        debug!("已关闭标签页 {}", handle);
        Ok(())
    }

    async fn switch_to(&self, tab: &TabHandle) -> Result<()> {
        let page = self.page_of(tab).await?;
        page.bring_to_front().await?;
        *self.active.lock().await = Some(tab.clone());
        Ok(())
    }

    async fn set_download_target(&self, path: &Path) -> Result<()> {
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(path.to_string_lossy().to_string())
            .build()
            .map_err(|message| BrowserError::CommandBuildFailed { message })?;
        self.browser.execute(params).await?;
        debug!("下载目录已设置为: {}", path.display());
        Ok(())
    }

    async fn list_open_tabs(&self) -> Result<Vec<TabHandle>> {
        let pages = self.browser.pages().await?;
        let present: HashSet<TabHandle> = pages.iter().map(handle_of).collect();

        let mut tabs = self.tabs.lock().await;
        tabs.retain(|(h, _)| present.contains(h));
        // 点击附件时由页面弹出的新标签页也归本会话管理
        for page in pages {
            let handle = handle_of(&page);
            if !self.foreign.contains(&handle) && !tabs.iter().any(|(h, _)| *h == handle) {
                tabs.push((handle, page));
            }
        }
        Ok(tabs.iter().map(|(h, _)| h.clone()).collect())
    }

    async fn current_tab(&self) -> Result<TabHandle> {
        Ok(self
            .active
            .lock()
            .await
            .clone()
            .ok_or(BrowserError::NoActiveTab)?)
    }
}
