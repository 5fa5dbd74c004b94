use std::time::Duration;
use tender_collector::browser::{connect_to_browser_and_page, launch_headless_browser};
use tender_collector::services::LogProgress;
use tender_collector::{BrowserSession, ChromiumSession, Collector, Config, OrganizationRegistry};

#[tokio::test]
#[ignore] // 默认忽略，需要本机 Chrome：cargo test -- --ignored
async fn test_collect_single_organization() {
    let _ = tracing_subscriber::fmt::try_init();

    let (browser, page) = launch_headless_browser(None)
        .await
        .expect("启动无头浏览器失败");
    let session = ChromiumSession::attach(browser, page)
        .await
        .expect("创建会话失败");

    let registry = OrganizationRegistry::default();
    let selected = registry.select(&["대전청"]).unwrap();
    let collector = Collector::new(registry, Duration::from_secs(2)).unwrap();

    let report = collector.collect(&session, &selected, &LogProgress).await;

    assert!(report.failures.is_empty(), "收集失败: {:?}", report.failures);
    println!("收集到 {} 条公告", report.table.len());
}

#[tokio::test]
#[ignore]
async fn test_browser_connection() {
    let _ = tracing_subscriber::fmt::try_init();

    // 需要先以 --remote-debugging-port 启动浏览器并设置 BROWSER_DEBUG_PORT
    let config = Config::from_env().expect("配置无效");
    let port = config.browser_debug_port.expect("未设置 BROWSER_DEBUG_PORT");

    let result = connect_to_browser_and_page(port).await;
    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_tab_lifecycle() {
    let _ = tracing_subscriber::fmt::try_init();

    let (browser, page) = launch_headless_browser(None)
        .await
        .expect("启动无头浏览器失败");
    let session = ChromiumSession::attach(browser, page)
        .await
        .expect("创建会话失败");

    let main = session.current_tab().await.unwrap();
    let tab = session.open_tab("about:blank").await.unwrap();
    assert_eq!(session.current_tab().await.unwrap(), tab);

    session.close_current_tab().await.unwrap();
    session.switch_to(&main).await.unwrap();
    assert_eq!(session.list_open_tabs().await.unwrap(), vec![main]);
}
