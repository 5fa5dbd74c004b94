use serde::{Deserialize, Serialize};

/// 一条招标公告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// 机构名称
    pub organization: String,
    /// 页面上显示的序号
    pub sequence: String,
    /// 工程名称
    pub title: String,
    /// 招标公告编号
    pub announcement_no: String,
    /// 招标日期
    pub bid_date: String,
    /// 登记日期
    pub registered_date: String,
    /// 规范化后的详情页地址，没有链接时为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

/// 一次收集得到的公告表
///
/// 顺序 = 机构处理顺序，其次是页面中的行顺序。每次收集整体替换，不做增量修改。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingTable {
    records: Vec<ListingRecord>,
}

impl ListingTable {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 前 `n` 条记录
    pub fn prefix(&self, n: usize) -> &[ListingRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// 出现过的机构名称（去重，保持首次出现顺序）
    pub fn organizations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.organization.as_str()) {
                names.push(&record.organization);
            }
        }
        names
    }

    /// 只保留指定机构的记录
    pub fn filter_by_organizations<S: AsRef<str>>(&self, organizations: &[S]) -> ListingTable {
        let records = self
            .records
            .iter()
            .filter(|r| organizations.iter().any(|o| o.as_ref() == r.organization))
            .cloned()
            .collect();
        ListingTable { records }
    }
}

impl Extend<ListingRecord> for ListingTable {
    fn extend<T: IntoIterator<Item = ListingRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}
