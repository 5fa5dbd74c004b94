//! 详情链接规范化 - 业务能力层
//!
//! 把各机构页面上不一致的相对地址 / 查询参数地址转换成稳定的绝对地址

use crate::error::NormalizeError;
use crate::models::organization::OrganizationRegistry;
use std::collections::HashMap;
use tracing::error;
use url::Url;

const QUERY_PAGE: &str = "mng.jsp";

/// 链接规范化器
///
/// 站点根地址和各机构基础路径在创建时从注册表计算一次。
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    site_root: String,
    base_paths: HashMap<String, String>,
}

impl UrlNormalizer {
    pub fn new(registry: &OrganizationRegistry) -> Self {
        let base_paths = registry
            .organizations
            .iter()
            .map(|org| (org.name.clone(), org.base_path().to_string()))
            .collect();

        Self {
            site_root: registry.site_root.clone(),
            base_paths,
        }
    }

    /// 规范化详情链接
    ///
    /// 空链接返回 None；任何解析失败都会记录日志并原样返回输入，不会中断收集。
    pub fn normalize(&self, raw_href: Option<&str>, organization: &str) -> Option<String> {
        let href = raw_href.filter(|h| !h.is_empty())?;

        match self.try_normalize(href, organization) {
            Ok(url) => Some(url),
            Err(e) => {
                error!("URL 规范化失败: {} - {}", e, href);
                Some(href.to_string())
            }
        }
    }

    /// 规范化单个非空链接，失败时返回错误
    pub fn try_normalize(&self, href: &str, organization: &str) -> Result<String, NormalizeError> {
        let base_path = self.base_paths.get(organization).ok_or_else(|| {
            NormalizeError::UnknownOrganization {
                organization: organization.to_string(),
            }
        })?;

        if let Some(pos) = href.find(QUERY_PAGE) {
            let query = href[pos + QUERY_PAGE.len()..].trim_start_matches('?');
            let encoded = reencode_query(query)?;
            return Ok(format!(
                "{}{}/{}?{}",
                self.site_root, base_path, QUERY_PAGE, encoded
            ));
        }

        let base = format!("{}{}/", self.site_root, base_path);
        let joined = Url::parse(&base)
            .and_then(|b| b.join(href))
            .map_err(|e| NormalizeError::JoinFailed {
                message: e.to_string(),
            })?;
        Ok(joined.into())
    }
}

/// 重新编码查询串中的每个值，空值保留为 `k=`
fn reencode_query(query: &str) -> Result<String, NormalizeError> {
    let mut pairs = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) =
            pair.split_once('=')
                .ok_or_else(|| NormalizeError::MalformedQueryPair {
                    pair: pair.to_string(),
                })?;

        if value.is_empty() {
            pairs.push(format!("{}=", key));
            continue;
        }

        // 先解码再编码，已编码的值不会被二次编码
        let decoded = urlencoding::decode(value).map_err(|_| NormalizeError::UndecodableValue {
            value: value.to_string(),
        })?;
        pairs.push(format!("{}={}", key, encode_keeping_slash(&decoded)));
    }
    Ok(pairs.join("&"))
}

/// 百分号编码，`/` 保持原样
fn encode_keeping_slash(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> UrlNormalizer {
        UrlNormalizer::new(&OrganizationRegistry::default())
    }

    const BASE: &str = "https://www.molit.go.kr/drocm/USR/tender/m_16067";

    #[test]
    fn test_empty_href_is_none() {
        let n = normalizer();
        assert_eq!(n.normalize(None, "대전청"), None);
        assert_eq!(n.normalize(Some(""), "대전청"), None);
        assert_eq!(n.normalize(Some(""), "없는청"), None);
    }

    #[test]
    fn test_relative_forms() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("./dtl.jsp?id=1"), "대전청").unwrap(),
            format!("{}/dtl.jsp?id=1", BASE)
        );
        assert_eq!(
            n.normalize(Some("../x"), "대전청").unwrap(),
            "https://www.molit.go.kr/drocm/USR/tender/x"
        );
        assert_eq!(
            n.normalize(Some("/abs/x"), "대전청").unwrap(),
            "https://www.molit.go.kr/abs/x"
        );
        assert_eq!(
            n.normalize(Some("//cdn.example.org/f"), "대전청").unwrap(),
            "https://cdn.example.org/f"
        );
    }

    #[test]
    fn test_relative_resolution_for_every_organization() {
        let registry = OrganizationRegistry::default();
        let n = UrlNormalizer::new(&registry);
        for org in &registry.organizations {
            let url = n.normalize(Some("dtl.jsp"), &org.name).unwrap();
            assert_eq!(
                url,
                format!("{}{}/dtl.jsp", registry.site_root, org.base_path())
            );
        }
    }

    #[test]
    fn test_query_style_preserves_empty_values() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("mng.jsp?a=1&b="), "대전청").unwrap(),
            format!("{}/mng.jsp?a=1&b=", BASE)
        );
    }

    #[test]
    fn test_query_style_encodes_reserved_characters() {
        let n = normalizer();
        let url = n
            .normalize(Some("/old/path/mng.jsp?mode=view&q=a b&c=대전"), "대전청")
            .unwrap();
        assert_eq!(
            url,
            format!("{}/mng.jsp?mode=view&q=a%20b&c=%EB%8C%80%EC%A0%84", BASE)
        );
    }

    #[test]
    fn test_query_style_keeps_slash_literal() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("mng.jsp?ret=/drocm/lst.jsp"), "대전청").unwrap(),
            format!("{}/mng.jsp?ret=/drocm/lst.jsp", BASE)
        );
        assert_eq!(
            n.normalize(Some("mng.jsp?ret=%2Fdrocm%2Flst.jsp&t=a+b"), "대전청").unwrap(),
            format!("{}/mng.jsp?ret=/drocm/lst.jsp&t=a%2Bb", BASE)
        );
    }

    #[test]
    fn test_query_style_does_not_double_encode() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("mng.jsp?q=a%20b"), "대전청").unwrap(),
            format!("{}/mng.jsp?q=a%20b", BASE)
        );
    }

    #[test]
    fn test_failures_return_raw_href() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("mng.jsp?broken&a=1"), "대전청").unwrap(),
            "mng.jsp?broken&a=1"
        );
        assert_eq!(
            n.normalize(Some("./dtl.jsp"), "없는청").unwrap(),
            "./dtl.jsp"
        );
    }

    #[test]
    fn test_try_normalize_reports_error_kind() {
        let n = normalizer();
        assert_eq!(
            n.try_normalize("mng.jsp?x", "대전청"),
            Err(NormalizeError::MalformedQueryPair {
                pair: "x".to_string()
            })
        );
    }
}
