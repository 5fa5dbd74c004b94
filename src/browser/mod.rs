pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

use crate::config::Config;
use crate::infrastructure::ChromiumSession;
use anyhow::Result;

/// 按配置打开浏览器会话
///
/// 配置了调试端口时连接已运行的浏览器，否则启动无头浏览器。失败是致命错误。
pub async fn open_session(config: &Config) -> Result<ChromiumSession> {
    let (browser, page) = match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port).await?,
        None => launch_headless_browser(config.chrome_executable.as_deref()).await?,
    };
    ChromiumSession::attach(browser, page).await
}
