use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口；为 None 时启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<PathBuf>,
    /// 附件下载根目录
    pub download_path: PathBuf,
    /// 要收集的机构名称；为空时使用全部地方国土管理厅
    pub organizations: Vec<String>,
    /// 收集后只保留这些机构的公告；为空时不过滤
    pub organization_filter: Vec<String>,
    /// 机构注册表 TOML 文件
    pub registry_file: Option<PathBuf>,
    /// 下载附件的公告数上限
    pub max_attachment_listings: usize,
    /// 页面加载后的等待时间
    pub page_settle: Duration,
    /// 查找附件元素的最长等待时间
    pub element_wait: Duration,
    /// 每次点击后的等待时间
    pub click_settle: Duration,
    /// 收集完成后是否下载附件
    pub download_attachments: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            browser_debug_port: None,
            chrome_executable: None,
            download_path: home.join("Downloads"),
            organizations: Vec::new(),
            organization_filter: Vec::new(),
            registry_file: None,
            max_attachment_listings: 3,
            page_settle: Duration::from_secs(2),
            element_wait: Duration::from_secs(5),
            click_settle: Duration::from_secs(3),
            download_attachments: true,
            verbose_logging: false,
            output_log_file: "bid_scraper.log".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，未设置的项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Ok(Self {
            browser_debug_port: match lookup("BROWSER_DEBUG_PORT") {
                Some(v) => Some(parse_var("BROWSER_DEBUG_PORT", &v, "u16")?),
                None => default.browser_debug_port,
            },
            chrome_executable: lookup("CHROME_EXECUTABLE").map(PathBuf::from),
            download_path: lookup("DOWNLOAD_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.download_path),
            organizations: lookup("ORGANIZATIONS")
                .map(|v| parse_list(&v))
                .unwrap_or(default.organizations),
            organization_filter: lookup("ORGANIZATION_FILTER")
                .map(|v| parse_list(&v))
                .unwrap_or(default.organization_filter),
            registry_file: lookup("REGISTRY_FILE").map(PathBuf::from),
            max_attachment_listings: parse_or(
                &lookup,
                "MAX_ATTACHMENT_LISTINGS",
                "usize",
                default.max_attachment_listings,
            )?,
            page_settle: parse_millis_or(&lookup, "PAGE_SETTLE_MS", default.page_settle)?,
            element_wait: parse_millis_or(&lookup, "ELEMENT_WAIT_MS", default.element_wait)?,
            click_settle: parse_millis_or(&lookup, "CLICK_SETTLE_MS", default.click_settle)?,
            download_attachments: parse_or(
                &lookup,
                "DOWNLOAD_ATTACHMENTS",
                "bool",
                default.download_attachments,
            )?,
            verbose_logging: parse_or(
                &lookup,
                "VERBOSE_LOGGING",
                "bool",
                default.verbose_logging,
            )?,
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }
}

/// 逗号分隔的名称列表，忽略空项
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

fn parse_or<F, T>(lookup: &F, var_name: &str, expected_type: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        Some(v) => parse_var(var_name, &v, expected_type),
        None => Ok(default),
    }
}

fn parse_millis_or<F>(lookup: &F, var_name: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        Some(v) => parse_var::<u64>(var_name, &v, "u64").map(Duration::from_millis),
        None => Ok(default),
    }
}
