// ==========================================
// 货代单证管理系统 - 上传文件约束
// ==========================================
// 规则: 格式 PDF/JPG/JPEG/PNG（按扩展名，大小写不敏感）
//       单文件不超过 10 MB
// 开关: enforce=false 时全部放行
// ==========================================

use crate::config::IntakeConfig;
use crate::domain::upload::FileSource;
use crate::engine::error::IntakeError;

#[derive(Debug, Clone, PartialEq)]
pub struct FileConstraints {
    accepted_extensions: Vec<String>,
    max_size_bytes: u64,
    enforce: bool,
}

impl FileConstraints {
    pub fn new(accepted_extensions: Vec<String>, max_size_bytes: u64, enforce: bool) -> Self {
        Self {
            accepted_extensions: accepted_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .collect(),
            max_size_bytes,
            enforce,
        }
    }

    pub fn from_config(config: &IntakeConfig) -> Self {
        Self::new(
            config.accepted_extensions.clone(),
            config.max_file_size_bytes,
            config.enforce_file_constraints,
        )
    }

    /// 不做任何校验
    pub fn permissive() -> Self {
        Self::new(Vec::new(), u64::MAX, false)
    }

    pub fn is_enforced(&self) -> bool {
        self.enforce
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// 校验单个文件
    pub fn check(&self, file: &FileSource) -> Result<(), IntakeError> {
        if !self.enforce {
            return Ok(());
        }

        let extension = file.extension().unwrap_or_default();
        if !self.accepted_extensions.iter().any(|e| *e == extension) {
            return Err(IntakeError::UnsupportedFormat {
                name: file.name.clone(),
                extension,
            });
        }

        if file.size_bytes > self.max_size_bytes {
            return Err(IntakeError::FileTooLarge {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                max_bytes: self.max_size_bytes,
            });
        }

        Ok(())
    }
}

impl Default for FileConstraints {
    fn default() -> Self {
        Self::from_config(&IntakeConfig::default())
    }
}
