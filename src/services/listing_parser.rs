//! 公告列表解析 - 业务能力层
//!
//! 只负责把一页渲染后的 HTML 转成公告记录，不关心导航和流程

use crate::error::RowParseError;
use crate::models::listing::ListingRecord;
use crate::services::url_normalizer::UrlNormalizer;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

/// 一条记录需要的单元格数量
const REQUIRED_CELLS: usize = 5;

/// 一页的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub records: Vec<ListingRecord>,
    /// 被跳过的数据行
    pub row_errors: Vec<RowParseError>,
}

/// 公告列表解析器
///
/// 列位置固定：序号 / 工程名称(含详情链接) / 公告编号 / 招标日期 / 登记日期
pub struct ListingParser {
    normalizer: UrlNormalizer,
    tbody: Selector,
    link: Selector,
}

impl ListingParser {
    pub fn new(normalizer: UrlNormalizer) -> Result<Self> {
        Ok(Self {
            normalizer,
            tbody: compile("tbody")?,
            link: compile("a[href]")?,
        })
    }

    /// 解析一页列表
    pub fn parse(&self, html: &str, organization: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        let mut page = ParsedPage::default();

        let Some(tbody) = document.select(&self.tbody).next() else {
            debug!("{} 页面中没有找到表格", organization);
            return page;
        };

        for (index, row) in child_elements(tbody, "tr").enumerate() {
            let cells: Vec<ElementRef> = child_elements(row, "td").collect();
            // 表头、分隔行
            if cells.len() < 2 {
                continue;
            }

            match self.parse_row(&cells, index + 1, organization) {
                Ok(record) => page.records.push(record),
                Err(e) => {
                    error!("行数据处理中出错 ({}): {}", organization, e);
                    page.row_errors.push(e);
                }
            }
        }

        debug!(
            "{} 解析完成: {} 条记录, {} 行出错",
            organization,
            page.records.len(),
            page.row_errors.len()
        );
        page
    }

    fn parse_row(
        &self,
        cells: &[ElementRef],
        row: usize,
        organization: &str,
    ) -> Result<ListingRecord, RowParseError> {
        if cells.len() < REQUIRED_CELLS {
            return Err(RowParseError::MissingCells {
                row,
                expected: REQUIRED_CELLS,
                actual: cells.len(),
            });
        }

        let href = cells[1]
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"));

        Ok(ListingRecord {
            organization: organization.to_string(),
            sequence: cell_text(cells[0]),
            title: cell_text(cells[1]),
            announcement_no: cell_text(cells[2]),
            bid_date: cell_text(cells[3]),
            registered_date: cell_text(cells[4]),
            detail_url: self.normalizer.normalize(href, organization),
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("无法编译选择器 '{}': {}", selector, e))
}

/// 指定标签名的直接子元素
fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == tag)
}

/// 单元格文本：每段文本去掉首尾空白后拼接
fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::organization::OrganizationRegistry;

    fn parser() -> ListingParser {
        ListingParser::new(UrlNormalizer::new(&OrganizationRegistry::default())).unwrap()
    }

    #[test]
    fn test_header_row_skipped_and_link_normalized() {
        let html = r#"
            <table><tbody>
              <tr><td colspan="5">번호 공사명</td></tr>
              <tr>
                <td>12</td>
                <td><a href="./dtl.jsp?id=7"> 도로 확장 공사 </a></td>
                <td>2024-0012</td>
                <td>2024-05-01</td>
                <td>2024-04-20</td>
              </tr>
            </tbody></table>"#;

        let page = parser().parse(html, "대전청");
        assert!(page.row_errors.is_empty());
        assert_eq!(page.records.len(), 1);

        let record = &page.records[0];
        assert_eq!(record.organization, "대전청");
        assert_eq!(record.sequence, "12");
        assert_eq!(record.title, "도로 확장 공사");
        assert_eq!(record.announcement_no, "2024-0012");
        assert_eq!(record.bid_date, "2024-05-01");
        assert_eq!(record.registered_date, "2024-04-20");
        assert_eq!(
            record.detail_url.as_deref(),
            Some("https://www.molit.go.kr/drocm/USR/tender/m_16067/dtl.jsp?id=7")
        );
    }

    #[test]
    fn test_short_row_is_reported_not_raised() {
        let html = r#"
            <table><tbody>
              <tr><td>1</td><td>교량 보수</td><td>A-1</td></tr>
              <tr><td>2</td><td>하천 정비</td><td>A-2</td><td>2024-06-01</td><td>2024-05-30</td></tr>
            </tbody></table>"#;

        let page = parser().parse(html, "부산청");
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "하천 정비");
        assert_eq!(page.records[0].detail_url, None);
        assert_eq!(
            page.row_errors,
            vec![RowParseError::MissingCells {
                row: 1,
                expected: 5,
                actual: 3
            }]
        );
    }

    #[test]
    fn test_only_first_tbody_and_document_order() {
        let html = r#"
            <table><tbody>
              <tr><td>3</td><td>C</td><td>c</td><td>d</td><td>e</td></tr>
              <tr><td>1</td><td>A</td><td>c</td><td>d</td><td>e</td></tr>
            </tbody></table>
            <table><tbody>
              <tr><td>9</td><td>Z</td><td>c</td><td>d</td><td>e</td></tr>
            </tbody></table>"#;

        let page = parser().parse(html, "서울청");
        let titles: Vec<&str> = page.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn test_no_table_yields_empty_page() {
        let page = parser().parse("<html><body><p>점검 중</p></body></html>", "원주청");
        assert_eq!(page, ParsedPage::default());
    }
}
