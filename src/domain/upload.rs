// ==========================================
// 货代单证管理系统 - 上传文件领域模型
// ==========================================
// 职责: 单证上传会话中的文件实体、识别结果与提交批次
// 红线: 分类标签与识别结果仅在 Completed 状态下填充
// ==========================================

use crate::domain::types::{UploadPriority, UploadStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 上传文件 ID
pub type FileId = String;

// ==========================================
// FileSource - 用户选择的原始文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
    pub name: String,
    pub size_bytes: u64,
    pub path: Option<PathBuf>, // 本地路径（拖拽/选择时可用）
}

impl FileSource {
    /// 仅由文件名和大小构造（无本地路径）
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }

    /// 从本地文件读取元数据构造
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    /// 小写扩展名（无扩展名返回 None）
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// 以 MB 为单位的大小（两位小数展示用）
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

// ==========================================
// PreviewHandle - 预览句柄
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewHandle(pub String);

impl PreviewHandle {
    pub fn for_file(id: &str, source: &FileSource) -> Self {
        PreviewHandle(format!("preview://{}/{}", id, source.name))
    }
}

// ==========================================
// OcrPayload - 识别结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrPayload {
    pub text: String,
    pub confidence: f64, // 百分比 [0, 100)
}

// ==========================================
// UploadedFile - 上传会话中的文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: FileId,
    pub source: FileSource,
    pub preview: PreviewHandle,
    pub status: UploadStatus,
    pub classification: Option<String>,
    pub ocr: Option<OcrPayload>,
    pub error: Option<String>,
}

impl UploadedFile {
    /// 新文件（进入 Uploading 状态）
    pub fn uploading(id: FileId, source: FileSource) -> Self {
        let preview = PreviewHandle::for_file(&id, &source);
        Self {
            id,
            source,
            preview,
            status: UploadStatus::Uploading,
            classification: None,
            ocr: None,
            error: None,
        }
    }

    /// 被拒绝的文件（直接进入 Error 状态）
    pub fn rejected(id: FileId, source: FileSource, reason: String) -> Self {
        let mut file = Self::uploading(id, source);
        file.status = UploadStatus::Error;
        file.error = Some(reason);
        file
    }

    pub fn confidence(&self) -> Option<f64> {
        self.ocr.as_ref().map(|o| o.confidence)
    }
}

// ==========================================
// SubmissionOptions - 提交附加选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    pub tags: Vec<String>,
    pub priority: UploadPriority,
    pub notes: Option<String>,
}

impl SubmissionOptions {
    /// 解析逗号分隔的标签输入（"urgente, BL, exportación"）
    pub fn parse_tags(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ==========================================
// SubmissionBatch - 提交到外部存储的批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    pub batch_id: String,
    pub shipment_id: String,
    pub files: Vec<UploadedFile>,
    pub options: SubmissionOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_extension() {
        assert_eq!(FileSource::new("BL_container.PDF", 10).extension().as_deref(), Some("pdf"));
        assert_eq!(FileSource::new("README", 10).extension(), None);
    }

    #[test]
    fn test_rejected_file_has_reason() {
        let file = UploadedFile::rejected(
            "abc".to_string(),
            FileSource::new("virus.exe", 1),
            "formato".to_string(),
        );
        assert_eq!(file.status, UploadStatus::Error);
        assert_eq!(file.error.as_deref(), Some("formato"));
        assert!(file.classification.is_none());
        assert_eq!(file.preview.0, "preview://abc/virus.exe");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            SubmissionOptions::parse_tags(" urgente, BL,, exportación "),
            vec!["urgente", "BL", "exportación"]
        );
        assert!(SubmissionOptions::parse_tags("  ").is_empty());
    }
}
