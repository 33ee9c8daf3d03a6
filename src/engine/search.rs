// ==========================================
// 货代单证管理系统 - 运单/单证检索
// ==========================================
// 规则:
//   - 关键词: 大小写不敏感的子串匹配，任一字段命中即可
//   - 状态: All 表示不过滤，否则精确匹配
//   - 空关键词匹配全部
//   - 结果保持原有顺序
// ==========================================

use crate::domain::document::DocumentRecord;
use crate::domain::shipment::ShipmentSummary;
use crate::domain::types::{DocumentStatus, ShipmentStatus};
use serde::{Deserialize, Serialize};

/// 状态过滤器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter<T> {
    All,
    Only(T),
}

impl<T: PartialEq> StatusFilter<T> {
    pub fn matches(&self, status: &T) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl<T> Default for StatusFilter<T> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter<ShipmentStatus> {
    /// 解析下拉框状态码（"all" 或未知码 => All）
    pub fn from_shipment_code(code: &str) -> Self {
        ShipmentStatus::parse_code(code)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }
}

impl StatusFilter<DocumentStatus> {
    pub fn from_document_code(code: &str) -> Self {
        DocumentStatus::parse_code(code)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }
}

/// 运单查询
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentQuery {
    pub term: String,
    pub status: StatusFilter<ShipmentStatus>,
}

impl ShipmentQuery {
    pub fn new(term: impl Into<String>, status: StatusFilter<ShipmentStatus>) -> Self {
        Self {
            term: term.into(),
            status,
        }
    }

    /// 匹配字段: 运单号、客户、起运地、目的地
    pub fn matches(&self, shipment: &ShipmentSummary) -> bool {
        let needle = self.term.trim().to_lowercase();
        let term_hit = contains_any(
            &needle,
            [
                shipment.id.as_str(),
                shipment.client.as_str(),
                shipment.origin.as_str(),
                shipment.destination.as_str(),
            ],
        );
        term_hit && self.status.matches(&shipment.status)
    }
}

/// 单证查询
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentQuery {
    pub term: String,
    pub status: StatusFilter<DocumentStatus>,
}

impl DocumentQuery {
    pub fn new(term: impl Into<String>, status: StatusFilter<DocumentStatus>) -> Self {
        Self {
            term: term.into(),
            status,
        }
    }

    /// 匹配字段: 名称、类型、运单号
    pub fn matches(&self, document: &DocumentRecord) -> bool {
        let needle = self.term.trim().to_lowercase();
        let term_hit = contains_any(
            &needle,
            [
                document.name.as_str(),
                document.doc_type.as_str(),
                document.shipment_id.as_str(),
            ],
        );
        term_hit && self.status.matches(&document.status)
    }
}

pub fn filter_shipments<'a>(
    shipments: &'a [ShipmentSummary],
    query: &ShipmentQuery,
) -> Vec<&'a ShipmentSummary> {
    shipments.iter().filter(|s| query.matches(s)).collect()
}

pub fn filter_documents<'a>(
    documents: &'a [DocumentRecord],
    query: &DocumentQuery,
) -> Vec<&'a DocumentRecord> {
    documents.iter().filter(|d| query.matches(d)).collect()
}

/// `needle` 需已小写
fn contains_any<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seed::{sample_documents, sample_shipments};

    #[test]
    fn test_empty_term_matches_all_in_order() {
        let shipments = sample_shipments();
        let result = filter_shipments(&shipments, &ShipmentQuery::default());
        let ids: Vec<&str> = result.iter().map(|s| s.id.as_str()).collect();
        let expected: Vec<&str> = shipments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_term_is_case_insensitive() {
        let shipments = sample_shipments();
        let upper = filter_shipments(&shipments, &ShipmentQuery::new("ACME", StatusFilter::All));
        let lower = filter_shipments(&shipments, &ShipmentQuery::new("acme", StatusFilter::All));
        assert!(!upper.is_empty());
        assert_eq!(upper, lower);
        assert!(upper.iter().all(|s| s.client.to_lowercase().contains("acme")));
    }

    #[test]
    fn test_matches_route_fields() {
        let shipments = sample_shipments();
        let result = filter_shipments(&shipments, &ShipmentQuery::new("miami", StatusFilter::All));
        assert!(result
            .iter()
            .all(|s| s.origin.to_lowercase().contains("miami")
                || s.destination.to_lowercase().contains("miami")));
    }

    #[test]
    fn test_status_filter_combined_with_term() {
        let shipments = sample_shipments();
        let status = shipments[0].status;
        let query = ShipmentQuery::new("", StatusFilter::Only(status));
        let result = filter_shipments(&shipments, &query);
        assert!(!result.is_empty());
        assert!(result.iter().all(|s| s.status == status));

        let none = ShipmentQuery::new("no-such-client", StatusFilter::Only(status));
        assert!(filter_shipments(&shipments, &none).is_empty());
    }

    #[test]
    fn test_status_filter_codes() {
        assert_eq!(StatusFilter::<ShipmentStatus>::from_shipment_code("all"), StatusFilter::All);
        assert_eq!(
            StatusFilter::<ShipmentStatus>::from_shipment_code("en_transito"),
            StatusFilter::Only(ShipmentStatus::InTransit)
        );
        assert_eq!(
            StatusFilter::<DocumentStatus>::from_document_code("rejected"),
            StatusFilter::Only(DocumentStatus::Rejected)
        );
    }

    #[test]
    fn test_document_search_by_shipment_id() {
        let documents = sample_documents();
        let query = DocumentQuery::new("shp-2024-001", StatusFilter::All);
        assert_eq!(filter_documents(&documents, &query).len(), 3);

        let factura = DocumentQuery::new("FACTURA", StatusFilter::All);
        let result = filter_documents(&documents, &factura);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "DOC-002");
    }

    #[test]
    fn test_document_status_filter() {
        let documents = sample_documents();
        let query = DocumentQuery::new("", StatusFilter::Only(DocumentStatus::Validated));
        let ids: Vec<&str> = filter_documents(&documents, &query)
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["DOC-001", "DOC-003"]);
    }
}
