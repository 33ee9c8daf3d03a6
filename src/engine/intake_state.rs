// ==========================================
// 货代单证管理系统 - 上传会话状态与归约
// ==========================================
// 职责: 上传会话的显式状态容器 + 纯函数状态转换
// 红线:
//   1. 每次转换只替换 id 匹配的那一条记录，其余保持不变
//   2. 对不存在的 id 的转换一律忽略（已移除的文件不会复活）
//   3. 分类与识别结果只在进入 Completed 时写入
//   4. 仅允许 Uploading -> Processing -> Completed，非终态 -> Error
//   5. 提交完成只移出批次内文件，不覆盖提交期间的新改动
// ==========================================

use crate::domain::types::UploadStatus;
use crate::domain::upload::{FileId, SubmissionOptions, UploadedFile};
use crate::engine::classifier::Classification;
use serde::{Deserialize, Serialize};

/// 上传会话状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeState {
    pub files: Vec<UploadedFile>,
    /// 关联运单
    pub shipment_id: Option<String>,
    pub options: SubmissionOptions,
}

/// 状态转换动作
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeAction {
    FilesAdded(Vec<UploadedFile>),
    UploadFinished { id: FileId },
    ProcessingFinished { id: FileId, classification: Classification },
    ProcessingFailed { id: FileId, reason: String },
    FileRemoved { id: FileId },
    ShipmentSelected(Option<String>),
    OptionsChanged(SubmissionOptions),
    /// 批次已提交：移出批次内文件；运单与选项仍为提交时的值才清除
    BatchSubmitted {
        ids: Vec<FileId>,
        shipment_id: String,
        options: SubmissionOptions,
    },
    /// 整体重置
    Cleared,
}

impl IntakeState {
    pub fn find(&self, id: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn count_by_status(&self, status: UploadStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    /// 所有文件均已到达终态
    pub fn is_settled(&self) -> bool {
        self.files.iter().all(|f| f.status.is_terminal())
    }

    /// 提交按钮是否可用（有文件且已选运单）
    pub fn can_submit(&self) -> bool {
        !self.files.is_empty() && self.shipment_id.is_some()
    }
}

/// 归约函数: (旧状态, 动作) -> 新状态
pub fn reduce(mut state: IntakeState, action: IntakeAction) -> IntakeState {
    match action {
        IntakeAction::FilesAdded(files) => {
            for file in files {
                if !state.contains(&file.id) {
                    state.files.push(file);
                }
            }
        }
        IntakeAction::UploadFinished { id } => {
            update_file(&mut state, &id, |f| {
                if f.status == UploadStatus::Uploading {
                    f.status = UploadStatus::Processing;
                }
            });
        }
        IntakeAction::ProcessingFinished { id, classification } => {
            update_file(&mut state, &id, |f| {
                if f.status == UploadStatus::Processing {
                    f.status = UploadStatus::Completed;
                    f.classification = Some(classification.label);
                    f.ocr = Some(classification.payload);
                }
            });
        }
        IntakeAction::ProcessingFailed { id, reason } => {
            update_file(&mut state, &id, |f| {
                if !f.status.is_terminal() {
                    f.status = UploadStatus::Error;
                    f.error = Some(reason);
                }
            });
        }
        IntakeAction::FileRemoved { id } => {
            state.files.retain(|f| f.id != id);
        }
        IntakeAction::ShipmentSelected(shipment_id) => {
            state.shipment_id = shipment_id;
        }
        IntakeAction::OptionsChanged(options) => {
            state.options = options;
        }
        IntakeAction::BatchSubmitted {
            ids,
            shipment_id,
            options,
        } => {
            state.files.retain(|f| !ids.contains(&f.id));
            if state.shipment_id.as_deref() == Some(shipment_id.as_str()) {
                state.shipment_id = None;
            }
            if state.options == options {
                state.options = SubmissionOptions::default();
            }
        }
        IntakeAction::Cleared => {
            state = IntakeState::default();
        }
    }
    state
}

fn update_file<F>(state: &mut IntakeState, id: &str, apply: F)
where
    F: FnOnce(&mut UploadedFile),
{
    if let Some(file) = state.files.iter_mut().find(|f| f.id == id) {
        apply(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::{FileSource, OcrPayload};

    fn file(id: &str, name: &str) -> UploadedFile {
        UploadedFile::uploading(id.to_string(), FileSource::new(name, 1024))
    }

    fn classification(label: &str) -> Classification {
        Classification {
            label: label.to_string(),
            payload: OcrPayload {
                text: "ok".to_string(),
                confidence: 88.0,
            },
        }
    }

    fn with_files(ids: &[&str]) -> IntakeState {
        let files = ids.iter().map(|id| file(id, &format!("{}.pdf", id))).collect();
        reduce(IntakeState::default(), IntakeAction::FilesAdded(files))
    }

    #[test]
    fn test_happy_path_transitions() {
        let state = with_files(&["a"]);
        assert_eq!(state.files[0].status, UploadStatus::Uploading);

        let state = reduce(state, IntakeAction::UploadFinished { id: "a".into() });
        assert_eq!(state.files[0].status, UploadStatus::Processing);
        assert!(state.files[0].classification.is_none());
        assert!(state.files[0].ocr.is_none());

        let state = reduce(
            state,
            IntakeAction::ProcessingFinished {
                id: "a".into(),
                classification: classification("Bill of Lading"),
            },
        );
        let f = &state.files[0];
        assert_eq!(f.status, UploadStatus::Completed);
        assert_eq!(f.classification.as_deref(), Some("Bill of Lading"));
        assert_eq!(f.confidence(), Some(88.0));
        assert!(state.is_settled());
    }

    #[test]
    fn test_transition_touches_only_matching_file() {
        let state = with_files(&["a", "b", "c"]);
        let before_a = state.files[0].clone();
        let before_c = state.files[2].clone();

        let state = reduce(state, IntakeAction::UploadFinished { id: "b".into() });

        assert_eq!(state.files[0], before_a);
        assert_eq!(state.files[1].status, UploadStatus::Processing);
        assert_eq!(state.files[2], before_c);
    }

    #[test]
    fn test_removed_file_is_not_resurrected() {
        let state = with_files(&["a", "b"]);
        let state = reduce(state, IntakeAction::FileRemoved { id: "a".into() });
        let state = reduce(state, IntakeAction::UploadFinished { id: "a".into() });
        let state = reduce(
            state,
            IntakeAction::ProcessingFinished {
                id: "a".into(),
                classification: classification("Certificado"),
            },
        );

        assert_eq!(state.files.len(), 1);
        assert!(!state.contains("a"));
    }

    #[test]
    fn test_completion_requires_processing() {
        let state = with_files(&["a"]);
        let state = reduce(
            state,
            IntakeAction::ProcessingFinished {
                id: "a".into(),
                classification: classification("Certificado"),
            },
        );
        assert_eq!(state.files[0].status, UploadStatus::Uploading);
        assert!(state.files[0].classification.is_none());
    }

    #[test]
    fn test_failure_only_from_non_terminal() {
        let state = with_files(&["a"]);
        let state = reduce(
            state,
            IntakeAction::ProcessingFailed {
                id: "a".into(),
                reason: "ocr caído".into(),
            },
        );
        assert_eq!(state.files[0].status, UploadStatus::Error);
        assert_eq!(state.files[0].error.as_deref(), Some("ocr caído"));

        // Error 为终态，后续转换无效
        let state = reduce(state, IntakeAction::UploadFinished { id: "a".into() });
        assert_eq!(state.files[0].status, UploadStatus::Error);
    }

    #[test]
    fn test_duplicate_ids_are_not_appended_twice() {
        let state = with_files(&["a"]);
        let state = reduce(state, IntakeAction::FilesAdded(vec![file("a", "other.pdf")]));
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].source.name, "a.pdf");
    }

    #[test]
    fn test_can_submit_and_clear() {
        let state = with_files(&["a"]);
        assert!(!state.can_submit());

        let state = reduce(state, IntakeAction::ShipmentSelected(Some("SHP-2024-001".into())));
        assert!(state.can_submit());

        let state = reduce(state, IntakeAction::Cleared);
        assert_eq!(state, IntakeState::default());
    }

    #[test]
    fn test_batch_submitted_keeps_later_changes() {
        let state = with_files(&["a", "b"]);
        let state = reduce(state, IntakeAction::ShipmentSelected(Some("SHP-2024-001".into())));
        let submitted_options = state.options.clone();

        // 批次只含 a；之后加入 c 并改选运单
        let state = reduce(state, IntakeAction::FilesAdded(vec![file("c", "c.pdf")]));
        let state = reduce(state, IntakeAction::ShipmentSelected(Some("SHP-2024-002".into())));
        let state = reduce(
            state,
            IntakeAction::BatchSubmitted {
                ids: vec!["a".into()],
                shipment_id: "SHP-2024-001".into(),
                options: submitted_options,
            },
        );

        let ids: Vec<&str> = state.files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(state.shipment_id.as_deref(), Some("SHP-2024-002"));
    }

    #[test]
    fn test_batch_submitted_clears_unchanged_selection() {
        let state = with_files(&["a"]);
        let state = reduce(state, IntakeAction::ShipmentSelected(Some("SHP-2024-001".into())));
        let options = SubmissionOptions {
            tags: vec!["urgente".into()],
            ..SubmissionOptions::default()
        };
        let state = reduce(state, IntakeAction::OptionsChanged(options.clone()));
        let state = reduce(
            state,
            IntakeAction::BatchSubmitted {
                ids: vec!["a".into()],
                shipment_id: "SHP-2024-001".into(),
                options,
            },
        );
        assert_eq!(state, IntakeState::default());
    }
}
