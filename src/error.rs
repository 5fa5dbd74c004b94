use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 链接规范化错误
    #[error("链接规范化错误: {0}")]
    Normalize(#[from] NormalizeError),
    /// 表格行解析错误
    #[error("行解析错误: {0}")]
    RowParse(#[from] RowParseError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动无头浏览器失败
    #[error("启动无头浏览器失败: {message}")]
    LaunchFailed { message: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 没有处于活动状态的标签页
    #[error("没有活动的标签页")]
    NoActiveTab,
    /// 标签页不存在
    #[error("标签页不存在: {handle}")]
    TabNotFound { handle: String },
    /// CDP 命令参数构造失败
    #[error("CDP 命令构造失败: {message}")]
    CommandBuildFailed { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 机构名称不在注册表中
    #[error("未知机构: {name}")]
    UnknownOrganization { name: String },
    /// 同一类别中机构名称重复
    #[error("机构名称在同一类别中重复: {name}")]
    DuplicateOrganization { name: String },
    /// 站点根地址无效
    #[error("站点根地址无效: {value}")]
    InvalidSiteRoot { value: String },
}

/// 链接规范化错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// 机构没有对应的基础路径
    #[error("未知机构: {organization}")]
    UnknownOrganization { organization: String },
    /// 查询参数缺少 '='
    #[error("查询参数格式错误: '{pair}'")]
    MalformedQueryPair { pair: String },
    /// 查询参数值无法解码
    #[error("查询参数值无法解码: '{value}'")]
    UndecodableValue { value: String },
    /// 相对地址解析失败
    #[error("相对地址解析失败: {message}")]
    JoinFailed { message: String },
}

/// 表格行解析错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowParseError {
    /// 单元格数量不足
    #[error("第 {row} 行单元格不足: 需要 {expected} 个, 实际 {actual} 个")]
    MissingCells {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建目录创建错误
    pub fn create_dir_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }
}
