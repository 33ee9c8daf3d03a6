// ==========================================
// 货代单证管理系统 - 运单领域模型
// ==========================================
// 用途: 运单目录只读数据（由外部数据服务提供）
// ==========================================

use crate::domain::types::{LoadType, ShipmentStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ShipmentSummary - 运单摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    // ===== 主键 =====
    pub id: String, // 运单号 (如 SHP-2024-001)

    // ===== 客户与路线 =====
    pub client: String,
    pub origin: String,
    pub destination: String,

    // ===== 状态 =====
    pub status: ShipmentStatus,

    // ===== 时间 =====
    pub departure: Option<NaiveDate>,         // 离港日期
    pub estimated_arrival: Option<NaiveDate>, // 预计到港日期

    // ===== 单证计数 =====
    pub documents_total: u32,
    pub documents_pending: u32,

    // ===== 装载 =====
    pub load_type: LoadType,
    pub container: Option<String>, // 箱号
}

impl ShipmentSummary {
    /// 路线描述（起运地 → 目的地）
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    /// 下拉选择项文本: "SHP-2024-001 - ACME Corp (Barcelona → Miami)"
    pub fn selector_label(&self) -> String {
        format!(
            "{} - {} ({} → {})",
            self.id,
            self.client,
            short_place(&self.origin),
            short_place(&self.destination)
        )
    }

    pub fn has_pending_documents(&self) -> bool {
        self.documents_pending > 0
    }
}

/// 取地名逗号前的部分（"Barcelona, España" -> "Barcelona"）
fn short_place(place: &str) -> &str {
    place.split(',').next().map(str::trim).unwrap_or(place)
}
