//! 测试用的内存浏览器
//!
//! 按地址返回预设的 HTML，记录导航、点击和下载目录，可以注入各类失败。

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tender_collector::services::AttachmentPolicy;
use tender_collector::{BrowserSession, TabHandle};

pub const MAIN_TAB: &str = "main";

/// 页面元素（只保留属性）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    pub href: Option<String>,
    pub onclick: Option<String>,
}

#[derive(Debug, Clone)]
struct FakeTab {
    handle: TabHandle,
    url: String,
}

#[derive(Debug, Default)]
struct State {
    pages: HashMap<String, String>,
    failing_urls: HashSet<String>,
    failing_finds: HashSet<String>,
    failing_clicks: HashSet<String>,
    failing_closes: usize,
    tabs: Vec<FakeTab>,
    active: Option<TabHandle>,
    next_tab: usize,
    navigations: Vec<String>,
    opened: Vec<String>,
    clicks: Vec<String>,
    download_targets: Vec<PathBuf>,
}

pub struct FakeBrowser {
    state: Mutex<State>,
    policy: AttachmentPolicy,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        let main = TabHandle(MAIN_TAB.to_string());
        let state = State {
            tabs: vec![FakeTab {
                handle: main.clone(),
                url: "about:blank".to_string(),
            }],
            active: Some(main),
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
            policy: AttachmentPolicy::default(),
        }
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), html.to_string());
        self
    }

    /// 导航 / 打开标签页到该地址时失败
    pub fn failing_url(self, url: &str) -> Self {
        self.state.lock().unwrap().failing_urls.insert(url.to_string());
        self
    }

    /// 在该地址的页面上查找元素时失败
    pub fn failing_find(self, url: &str) -> Self {
        self.state.lock().unwrap().failing_finds.insert(url.to_string());
        self
    }

    /// 点击该 href 的元素时失败
    pub fn failing_click(self, href: &str) -> Self {
        self.state.lock().unwrap().failing_clicks.insert(href.to_string());
        self
    }

    /// 前 `n` 次关闭标签页失败（标签页保持打开）
    pub fn failing_closes(self, n: usize) -> Self {
        self.state.lock().unwrap().failing_closes = n;
        self
    }

    pub fn open_tab_count(&self) -> usize {
        self.state.lock().unwrap().tabs.len()
    }

    pub fn active(&self) -> Option<TabHandle> {
        self.state.lock().unwrap().active.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.state.lock().unwrap().opened.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn download_targets(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().download_targets.clone()
    }

    fn active_url(state: &State) -> Result<String> {
        let active = state.active.as_ref().ok_or_else(|| anyhow!("no active tab"))?;
        state
            .tabs
            .iter()
            .find(|t| t.handle == *active)
            .map(|t| t.url.clone())
            .ok_or_else(|| anyhow!("active tab {} is gone", active))
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        if state.failing_urls.contains(url) {
            bail!("net::ERR_CONNECTION_REFUSED at {}", url);
        }
        let active = state.active.clone().ok_or_else(|| anyhow!("no active tab"))?;
        if let Some(tab) = state.tabs.iter_mut().find(|t| t.handle == active) {
            tab.url = url.to_string();
        }
        Ok(())
    }

    async fn current_html(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        let url = Self::active_url(&state)?;
        Ok(state.pages.get(&url).cloned().unwrap_or_default())
    }

    async fn find_elements(&self, css_selector: &str) -> Result<Vec<FakeElement>> {
        let state = self.state.lock().unwrap();
        let url = Self::active_url(&state)?;
        if state.failing_finds.contains(&url) {
            bail!("DOM.querySelectorAll failed on {}", url);
        }
        let html = Html::parse_document(state.pages.get(&url).map(String::as_str).unwrap_or(""));

        // 附件选择器按属性规则匹配，其余选择器交给 scraper
        let (selector, policy) = if css_selector == self.policy.css_selector() {
            (Selector::parse("a").map_err(|e| anyhow!("bad selector: {:?}", e))?, Some(&self.policy))
        } else {
            let selector =
                Selector::parse(css_selector).map_err(|e| anyhow!("bad selector: {:?}", e))?;
            (selector, None)
        };

        Ok(html
            .select(&selector)
            .map(|e| FakeElement {
                href: e.value().attr("href").map(String::from),
                onclick: e.value().attr("onclick").map(String::from),
            })
            .filter(|e| policy.map_or(true, |p| p.matches(e.href.as_deref(), e.onclick.as_deref())))
            .collect())
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let href = element.href.clone().unwrap_or_default();
        if state.failing_clicks.contains(&href) {
            bail!("element is detached: {}", href);
        }
        state.clicks.push(href);
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<TabHandle> {
        let mut state = self.state.lock().unwrap();
        state.opened.push(url.to_string());
        if state.failing_urls.contains(url) {
            bail!("failed to open {}", url);
        }
        state.next_tab += 1;
        let handle = TabHandle(format!("tab-{}", state.next_tab));
        state.tabs.push(FakeTab {
            handle: handle.clone(),
            url: url.to_string(),
        });
        state.active = Some(handle.clone());
        Ok(handle)
    }

    async fn close_current_tab(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let active = state.active.clone().ok_or_else(|| anyhow!("no active tab"))?;
        if state.failing_closes > 0 {
            state.failing_closes -= 1;
            bail!("Target.closeTarget failed for {}", active);
        }
        state.tabs.retain(|t| t.handle != active);
        state.active = None;
        Ok(())
    }

    async fn switch_to(&self, tab: &TabHandle) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.tabs.iter().any(|t| t.handle == *tab) {
            bail!("no such tab: {}", tab);
        }
        state.active = Some(tab.clone());
        Ok(())
    }

    async fn set_download_target(&self, path: &Path) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .download_targets
            .push(path.to_path_buf());
        Ok(())
    }

    async fn list_open_tabs(&self) -> Result<Vec<TabHandle>> {
        let state = self.state.lock().unwrap();
        Ok(state.tabs.iter().map(|t| t.handle.clone()).collect())
    }

    async fn current_tab(&self) -> Result<TabHandle> {
        self.state
            .lock()
            .unwrap()
            .active
            .clone()
            .ok_or_else(|| anyhow!("no active tab"))
    }
}
