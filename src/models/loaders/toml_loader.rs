use crate::error::{ConfigError, FileError};
use crate::models::organization::OrganizationRegistry;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载机构注册表
///
/// 文件格式：
/// ```toml
/// site_root = "https://www.molit.go.kr"
///
/// [[organizations]]
/// name = "대전청"
/// category = "regional-office"
/// path = "/drocm/USR/tender/m_16067/lst.jsp"
/// ```
pub async fn load_registry(toml_file_path: &Path) -> Result<OrganizationRegistry> {
    let path_str = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let registry = parse_registry(&content, &path_str)?;
    tracing::info!(
        "已加载机构注册表: {} ({} 个机构)",
        path_str,
        registry.organizations.len()
    );
    Ok(registry)
}

/// 解析注册表文本并校验站点根地址
pub fn parse_registry(content: &str, source_name: &str) -> Result<OrganizationRegistry> {
    let raw: OrganizationRegistry =
        toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: source_name.to_string(),
            source,
        })?;

    let registry = OrganizationRegistry::new(raw.site_root, raw.organizations)
        .with_context(|| format!("注册表校验失败: {}", source_name))?;

    for (i, org) in registry.organizations.iter().enumerate() {
        let duplicated = registry.organizations[..i]
            .iter()
            .any(|o| o.name == org.name && o.category == org.category);
        if duplicated {
            return Err(ConfigError::DuplicateOrganization {
                name: org.name.clone(),
            }
            .into());
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::organization::OrganizationCategory;

    const SAMPLE: &str = r#"
site_root = "https://example.org/"

[[organizations]]
name = "대전청"
category = "regional-office"
path = "/drocm/USR/tender/m_16067/lst.jsp"

[[organizations]]
name = "한강유역환경청"
category = "river-basin-office"
path = "/hepm/USR/tender/m_14626/lst.jsp"
"#;

    #[test]
    fn test_parse_registry() {
        let registry = parse_registry(SAMPLE, "sample.toml").unwrap();
        assert_eq!(registry.site_root, "https://example.org");
        assert_eq!(registry.organizations.len(), 2);
        assert_eq!(
            registry.get("한강유역환경청").unwrap().category,
            OrganizationCategory::RiverBasinOffice
        );
    }

    #[test]
    fn test_parse_registry_rejects_duplicate_names() {
        let doubled = format!(
            "{}\n[[organizations]]\nname = \"대전청\"\ncategory = \"regional-office\"\npath = \"/x/lst.jsp\"\n",
            SAMPLE
        );
        assert!(parse_registry(&doubled, "doubled.toml").is_err());
    }

    #[test]
    fn test_parse_registry_rejects_bad_category() {
        let bad = SAMPLE.replace("river-basin-office", "ministry");
        assert!(parse_registry(&bad, "bad.toml").is_err());
    }

    #[tokio::test]
    async fn test_load_registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let registry = load_registry(&path).await.unwrap();
        assert_eq!(registry.organizations.len(), 2);
        assert!(registry.contains("대전청"));
    }

    #[tokio::test]
    async fn test_load_registry_missing_file() {
        let result = load_registry(Path::new("/nonexistent/registry.toml")).await;
        assert!(result.is_err());
    }
}
