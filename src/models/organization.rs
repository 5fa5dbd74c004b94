use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 默认站点根地址
pub const DEFAULT_SITE_ROOT: &str = "https://www.molit.go.kr";

/// 机构类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrganizationCategory {
    /// 地方国土管理厅
    RegionalOffice,
    /// 流域环境厅
    RiverBasinOffice,
}

/// 发布招标公告的机构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// 显示名称（类别内唯一）
    pub name: String,
    pub category: OrganizationCategory,
    /// 列表页相对路径，例如 `/drocm/USR/tender/m_16067/lst.jsp`
    pub path: String,
}

impl Organization {
    pub fn new(
        name: impl Into<String>,
        category: OrganizationCategory,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            path: path.into(),
        }
    }

    /// 列表页所在目录（去掉末尾的 `lst.jsp` 文件名）
    pub fn base_path(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((dir, _file)) => dir,
            None => "",
        }
    }
}

/// 机构注册表
///
/// 进程启动时构建一次，之后只读；按注册顺序保存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRegistry {
    /// 站点根地址（不带末尾 `/`）
    pub site_root: String,
    pub organizations: Vec<Organization>,
}

impl Default for OrganizationRegistry {
    fn default() -> Self {
        use OrganizationCategory::{RegionalOffice, RiverBasinOffice};

        let regional = [
            ("대전청", "/drocm/USR/tender/m_16067/lst.jsp"),
            ("익산청", "/irocm/USR/tender/m_15646/lst.jsp"),
            ("부산청", "/brocm/USR/tender/m_15120/lst.jsp"),
            ("원주청", "/wrocm/USR/tender/m_15962/lst.jsp"),
            ("서울청", "/srocm/USR/tender/m_13081/lst.jsp"),
        ];
        let river = [
            ("한강유역환경청", "/hepm/USR/tender/m_14626/lst.jsp"),
            ("낙동강유역환경청", "/nepm/USR/tender/m_14626/lst.jsp"),
            ("금강유역환경청", "/gepm/USR/tender/m_14626/lst.jsp"),
            ("영산강유역환경청", "/yepm/USR/tender/m_14626/lst.jsp"),
            ("원주지방환경청", "/wjepm/USR/tender/m_14626/lst.jsp"),
            ("대구지방환경청", "/wjepm/USR/tender/m_14626/lst.jsp"),
            ("전북지방환경청", "/wjepm/USR/tender/m_14626/lst.jsp"),
            ("수도권대기환경청", "/wjepm/USR/tender/m_14626/lst.jsp"),
            ("환경부", "/wjepm/USR/tender/m_14626/lst.jsp"),
        ];

        let organizations = regional
            .iter()
            .map(|(name, path)| Organization::new(*name, RegionalOffice, *path))
            .chain(
                river
                    .iter()
                    .map(|(name, path)| Organization::new(*name, RiverBasinOffice, *path)),
            )
            .collect();

        Self {
            site_root: DEFAULT_SITE_ROOT.to_string(),
            organizations,
        }
    }
}

impl OrganizationRegistry {
    /// 创建注册表，校验站点根地址
    pub fn new(
        site_root: impl Into<String>,
        organizations: Vec<Organization>,
    ) -> Result<Self, ConfigError> {
        let site_root = site_root.into().trim_end_matches('/').to_string();
        if url::Url::parse(&site_root).is_err() {
            return Err(ConfigError::InvalidSiteRoot { value: site_root });
        }
        Ok(Self {
            site_root,
            organizations,
        })
    }

    /// 按显示名称查找机构
    pub fn get(&self, name: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 某一类别下的全部机构
    pub fn by_category(&self, category: OrganizationCategory) -> Vec<&Organization> {
        self.organizations
            .iter()
            .filter(|o| o.category == category)
            .collect()
    }

    /// 按名称选出机构，保持调用方给出的顺序
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Organization>, ConfigError> {
        names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownOrganization {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect()
    }

    /// 列表页完整地址
    pub fn list_url(&self, organization: &Organization) -> String {
        format!("{}{}", self.site_root, organization.path)
    }
}
