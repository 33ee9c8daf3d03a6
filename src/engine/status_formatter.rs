// ==========================================
// 货代单证管理系统 - 状态展示映射
// ==========================================
// 职责: 状态 -> {文案, 颜色, 图标}
// 红线: 对每个状态枚举穷尽；未知状态码回退默认项
//   - 运单: preparacion
//   - 单证: pending_review
// ==========================================

use crate::domain::types::{AlertLevel, DocumentStatus, ShipmentStatus, UploadStatus};
use crate::i18n;
use serde::{Deserialize, Serialize};

/// 图标标识（界面层映射为具体图标组件）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusIcon {
    Package,
    FileText,
    Truck,
    CheckCircle,
    Clock,
    AlertTriangle,
    AlertCircle,
    Loader,
    Scan,
    Info,
}

/// 状态徽标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    /// CSS 类名
    pub color: &'static str,
    pub icon: StatusIcon,
}

#[derive(Debug, Clone)]
pub struct StatusFormatter {
    locale: &'static str,
}

impl StatusFormatter {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: i18n::normalize_locale(locale),
        }
    }

    pub fn locale(&self) -> &str {
        self.locale
    }

    fn badge(&self, key: &str, color: &'static str, icon: StatusIcon) -> StatusBadge {
        StatusBadge {
            label: i18n::t_in(self.locale, key),
            color,
            icon,
        }
    }

    pub fn shipment(&self, status: ShipmentStatus) -> StatusBadge {
        let (color, icon) = match status {
            ShipmentStatus::Preparation => ("bg-gray-100 text-gray-700", StatusIcon::Package),
            ShipmentStatus::Documentation => ("bg-yellow-100 text-yellow-700", StatusIcon::FileText),
            ShipmentStatus::InTransit => ("bg-blue-100 text-blue-700", StatusIcon::Truck),
            ShipmentStatus::Delivered => ("bg-green-100 text-green-700", StatusIcon::CheckCircle),
        };
        self.badge(&format!("status.shipment.{}", status.as_code()), color, icon)
    }

    /// 按状态码格式化（未知码回退为备货）
    pub fn shipment_code(&self, code: &str) -> StatusBadge {
        self.shipment(ShipmentStatus::from_code(code))
    }

    pub fn document(&self, status: DocumentStatus) -> StatusBadge {
        let (color, icon) = match status {
            DocumentStatus::Validated => ("bg-green-100 text-green-700", StatusIcon::CheckCircle),
            DocumentStatus::PendingReview => ("bg-yellow-100 text-yellow-700", StatusIcon::Clock),
            DocumentStatus::Rejected => ("bg-red-100 text-red-700", StatusIcon::AlertTriangle),
        };
        self.badge(&format!("status.document.{}", status.as_code()), color, icon)
    }

    /// 按状态码格式化（未知码回退为待审核）
    pub fn document_code(&self, code: &str) -> StatusBadge {
        self.document(DocumentStatus::from_code(code))
    }

    pub fn upload(&self, status: UploadStatus) -> StatusBadge {
        let (color, icon) = match status {
            UploadStatus::Uploading => ("text-blue-600", StatusIcon::Loader),
            UploadStatus::Processing => ("text-yellow-600", StatusIcon::Scan),
            UploadStatus::Completed => ("text-green-600", StatusIcon::CheckCircle),
            UploadStatus::Error => ("text-red-600", StatusIcon::AlertCircle),
        };
        self.badge(&format!("status.upload.{}", status.as_code()), color, icon)
    }

    /// 已完成文件的详情文案（含置信度）
    pub fn completed_detail(&self, confidence: f64) -> String {
        i18n::t_in_with_args(
            self.locale,
            "intake.completed_detail",
            &[("confidence", &format!("{:.0}", confidence))],
        )
    }

    pub fn alert(&self, level: AlertLevel) -> StatusBadge {
        let (key, color, icon) = match level {
            AlertLevel::Info => ("status.alert.info", "text-blue-500", StatusIcon::Info),
            AlertLevel::Warning => ("status.alert.warning", "text-yellow-500", StatusIcon::Clock),
            AlertLevel::Urgent => ("status.alert.urgent", "text-red-500", StatusIcon::AlertTriangle),
        };
        self.badge(key, color, icon)
    }
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self::new("es")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_badges_spanish() {
        let f = StatusFormatter::default();
        let badge = f.shipment(ShipmentStatus::InTransit);
        assert_eq!(badge.label, "En Tránsito");
        assert_eq!(badge.color, "bg-blue-100 text-blue-700");
        assert_eq!(badge.icon, StatusIcon::Truck);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let f = StatusFormatter::default();
        assert_eq!(f.shipment_code("perdido"), f.shipment(ShipmentStatus::Preparation));
        assert_eq!(f.document_code("archived"), f.document(DocumentStatus::PendingReview));
        assert_eq!(f.document_code("archived").label, "Pendiente Revisión");
    }

    #[test]
    fn test_every_status_has_a_label() {
        for locale in ["es", "en"] {
            let f = StatusFormatter::new(locale);
            for s in ShipmentStatus::ALL {
                assert!(!f.shipment(s).label.contains("status."), "{:?}", s);
            }
            for s in DocumentStatus::ALL {
                assert!(!f.document(s).label.contains("status."), "{:?}", s);
            }
            for s in UploadStatus::ALL {
                assert!(!f.upload(s).label.contains("status."), "{:?}", s);
            }
        }
    }

    #[test]
    fn test_english_labels() {
        let f = StatusFormatter::new("en-US");
        assert_eq!(f.locale(), "en");
        assert_eq!(f.shipment(ShipmentStatus::InTransit).label, "In Transit");
    }

    #[test]
    fn test_completed_detail_rounds_confidence() {
        let f = StatusFormatter::default();
        assert_eq!(f.completed_detail(87.6), "Procesado (88% precisión)");
    }

    #[test]
    fn test_alert_colors() {
        let f = StatusFormatter::default();
        assert_eq!(f.alert(AlertLevel::Urgent).color, "text-red-500");
        assert_eq!(f.alert(AlertLevel::Warning).color, "text-yellow-500");
        assert_eq!(f.alert(AlertLevel::Info).color, "text-blue-500");
    }
}
