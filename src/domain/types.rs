// ==========================================
// 货代单证管理系统 - 领域类型定义
// ==========================================
// 职责: 定义封闭的状态枚举（运单/单证/上传/提醒）
// 序列化格式: 与前端状态码一致 (snake_case 西语代码)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运单状态 (Shipment Status)
// ==========================================
// 顺序: 备货 < 制单 < 在途 < 已交付
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "preparacion")]
    Preparation, // 备货
    #[serde(rename = "documentacion")]
    Documentation, // 制单
    #[serde(rename = "en_transito")]
    InTransit, // 在途
    #[serde(rename = "entregado")]
    Delivered, // 已交付
}

impl ShipmentStatus {
    /// 全部状态（按生命周期顺序）
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Preparation,
        ShipmentStatus::Documentation,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
    ];

    /// 状态码
    pub fn as_code(&self) -> &'static str {
        match self {
            ShipmentStatus::Preparation => "preparacion",
            ShipmentStatus::Documentation => "documentacion",
            ShipmentStatus::InTransit => "en_transito",
            ShipmentStatus::Delivered => "entregado",
        }
    }

    /// 严格解析状态码（未知返回 None）
    pub fn parse_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "preparacion" => Some(ShipmentStatus::Preparation),
            "documentacion" => Some(ShipmentStatus::Documentation),
            "en_transito" => Some(ShipmentStatus::InTransit),
            "entregado" => Some(ShipmentStatus::Delivered),
            _ => None,
        }
    }

    /// 宽松解析状态码（未知回退为备货）
    pub fn from_code(code: &str) -> Self {
        Self::parse_code(code).unwrap_or_default()
    }

    /// 是否仍在处理中（未交付）
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, ShipmentStatus::Delivered)
    }
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        ShipmentStatus::Preparation
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ==========================================
// 单证审核状态 (Document Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Validated,     // 已校验
    PendingReview, // 待审核
    Rejected,      // 已驳回
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Validated,
        DocumentStatus::PendingReview,
        DocumentStatus::Rejected,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            DocumentStatus::Validated => "validated",
            DocumentStatus::PendingReview => "pending_review",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "validated" => Some(DocumentStatus::Validated),
            "pending_review" => Some(DocumentStatus::PendingReview),
            "rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }

    /// 宽松解析状态码（未知回退为待审核）
    pub fn from_code(code: &str) -> Self {
        Self::parse_code(code).unwrap_or_default()
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::PendingReview
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ==========================================
// 上传文件生命周期状态 (Upload Status)
// ==========================================
// 流转: Uploading -> Processing -> Completed | Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,  // 上传中
    Processing, // 识别中
    Completed,  // 已完成
    Error,      // 失败
}

impl UploadStatus {
    pub const ALL: [UploadStatus; 4] = [
        UploadStatus::Uploading,
        UploadStatus::Processing,
        UploadStatus::Completed,
        UploadStatus::Error,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "uploading",
            UploadStatus::Processing => "processing",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ==========================================
// 评论类型 (Comment Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    Request,  // 货代发起的修改请求
    Response, // 客户答复
    Note,     // 普通备注
}

impl CommentKind {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "request" => CommentKind::Request,
            "response" => CommentKind::Response,
            _ => CommentKind::Note,
        }
    }
}

// ==========================================
// 装载方式 (Load Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoadType {
    Fcl, // 整箱
    Lcl, // 拼箱
}

impl LoadType {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "LCL" => LoadType::Lcl,
            _ => LoadType::Fcl,
        }
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadType::Fcl => write!(f, "FCL"),
            LoadType::Lcl => write!(f, "LCL"),
        }
    }
}

// ==========================================
// 上传优先级 (Upload Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for UploadPriority {
    fn default() -> Self {
        UploadPriority::Normal
    }
}

impl UploadPriority {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "low" => UploadPriority::Low,
            "high" => UploadPriority::High,
            "urgent" => UploadPriority::Urgent,
            _ => UploadPriority::Normal,
        }
    }
}

// ==========================================
// 提醒等级 (Alert Level)
// ==========================================
// 顺序: Info < Warning < Urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Urgent,
}
