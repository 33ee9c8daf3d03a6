// ==========================================
// 货代单证管理系统 - 单证分类器
// ==========================================
// 职责: 根据文件推断单证类型并生成识别结果
// 接口: DocumentClassifier（可替换为真实 OCR 服务）
// 默认实现: KeywordClassifier
//   - 文件名小写后做子串匹配
//   - 规则按顺序匹配，首个命中生效
//   - 均未命中时使用默认标签
//   - 置信度在 [min, max) 内随机生成
// ==========================================

use crate::config::{ClassificationConfig, IntakeConfig};
use crate::domain::upload::{FileSource, OcrPayload};
use crate::engine::error::IntakeError;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// 分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub payload: OcrPayload,
}

/// 单证分类器
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    /// 分类器名称（日志用）
    fn name(&self) -> &str;

    /// 对单个文件分类
    async fn classify(&self, file: &FileSource) -> Result<Classification, IntakeError>;
}

// ==========================================
// KeywordRule - 关键词规则
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    keywords: Vec<String>,
    label: String,
}

impl KeywordRule {
    pub fn new<I, S>(keywords: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            label: label.into(),
        }
    }

    /// `name` 需已转为小写
    fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

// ==========================================
// ConfidenceSampler - 模拟置信度
// ==========================================
pub struct ConfidenceSampler {
    rng: Mutex<StdRng>,
    min: f64,
    max: f64,
}

impl ConfidenceSampler {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            min,
            max,
        }
    }

    /// 固定种子（可复现）
    pub fn seeded(min: f64, max: f64, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            min,
            max,
        }
    }

    /// 采样，结果在 [min, max)
    pub fn sample(&self) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(self.min..self.max),
            Err(_) => self.min,
        }
    }
}

// ==========================================
// KeywordClassifier - 关键词分类器
// ==========================================
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
    default_label: String,
    sampler: ConfidenceSampler,
    ocr_text: String,
}

impl KeywordClassifier {
    pub fn new(
        rules: Vec<KeywordRule>,
        default_label: impl Into<String>,
        sampler: ConfidenceSampler,
        ocr_text: impl Into<String>,
    ) -> Self {
        Self {
            rules,
            default_label: default_label.into(),
            sampler,
            ocr_text: ocr_text.into(),
        }
    }

    /// 按配置构造
    pub fn from_config(classification: &ClassificationConfig, intake: &IntakeConfig) -> Self {
        let rules = classification
            .rules
            .iter()
            .map(|r| KeywordRule::new(&r.keywords, r.label.clone()))
            .collect();

        Self::new(
            rules,
            classification.default_label.clone(),
            ConfidenceSampler::new(intake.confidence_min, intake.confidence_max),
            intake.ocr_text.clone(),
        )
    }

    /// 默认规则表
    pub fn with_defaults() -> Self {
        Self::from_config(&ClassificationConfig::default(), &IntakeConfig::default())
    }

    /// 替换置信度采样器（测试用固定种子）
    pub fn with_sampler(mut self, sampler: ConfidenceSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// 由文件名推断单证类型
    pub fn label_for(&self, filename: &str) -> &str {
        let name = filename.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map(KeywordRule::label)
            .unwrap_or(self.default_label.as_str())
    }
}

#[async_trait]
impl DocumentClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, file: &FileSource) -> Result<Classification, IntakeError> {
        let label = self.label_for(&file.name).to_string();
        let confidence = self.sampler.sample();

        tracing::debug!(file = %file.name, %label, confidence, "关键词分类完成");

        Ok(Classification {
            label,
            payload: OcrPayload {
                text: self.ocr_text.clone(),
                confidence,
            },
        })
    }
}
