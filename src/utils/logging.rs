/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志：终端输出 + 日志文件
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug / info。
pub fn init(verbose: bool, log_file_path: &str) -> Result<()> {
    init_log_file(log_file_path)?;
    let file = OpenOptions::new().append(true).open(log_file_path)?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()?;
    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n招标信息收集日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `organizations`: 选中的机构数
/// - `max_listings`: 下载附件的公告数上限
pub fn log_startup(organizations: usize, max_listings: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 招标信息收集");
    info!("🏢 选中机构: {} 个", organizations);
    info!("📎 附件下载上限: 前 {} 条公告", max_listings);
    info!("{}", "=".repeat(60));
}

/// 记录收集阶段统计
pub fn log_collection_stats(elapsed: Duration, records: usize, failed_organizations: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📊 数据收集时间: {:.1}秒", elapsed.as_secs_f64());
    info!("📋 收集到的数据: {} 条", records);
    if failed_organizations > 0 {
        info!("⚠️ 收集失败的机构: {} 个", failed_organizations);
    }
    info!("{}", "─".repeat(60));
}

/// 打印附件下载统计
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `elapsed`: 下载耗时
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, elapsed: Duration, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 附件下载完成统计");
    info!(
        "最后下载: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("⏱️ 文件下载时间: {:.1}秒", elapsed.as_secs_f64());
    info!("✅ 成功: {}", success);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
