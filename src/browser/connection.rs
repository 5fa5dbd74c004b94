use crate::error::{AppError, BrowserError};
use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已运行的浏览器（远程调试端口）并获取页面
///
/// 优先复用第一个已有页面，没有页面时新建空白页。
pub async fn connect_to_browser_and_page(port: u16) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    let page = match pages.into_iter().next() {
        Some(page) => page,
        None => {
            debug!("创建空白页面");
            browser.new_page("about:blank").await.map_err(|e| {
                error!("创建空白页面失败: {}", e);
                BrowserError::NavigationFailed {
                    url: "about:blank".to_string(),
                    source: Box::new(e),
                }
            })?
        }
    };

    Ok((browser, page))
}
