// ==========================================
// 货代单证管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 存储: TOML 文件 (可选) + 环境变量
// 优先级: 环境变量 > 配置文件 > 内置默认值
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ==========================================
// 配置键（环境变量）
// ==========================================
pub mod config_keys {
    pub const CONFIG_PATH: &str = "FREIGHT_DOCS_CONFIG";
    pub const UPLOAD_DELAY_MS: &str = "FREIGHT_DOCS_UPLOAD_DELAY_MS";
    pub const PROCESSING_DELAY_MS: &str = "FREIGHT_DOCS_PROCESSING_DELAY_MS";
    pub const LOCALE: &str = "FREIGHT_DOCS_LOCALE";
    pub const ENFORCE_FILE_CONSTRAINTS: &str = "FREIGHT_DOCS_ENFORCE_FILE_CONSTRAINTS";
}

/// 10 MB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

// ==========================================
// 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("配置值无效 ({key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// 配置结构
// ==========================================

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub intake: IntakeConfig,
    pub classification: ClassificationConfig,
    pub data: DataConfig,
    pub ui: UiConfig,
}

/// 上传流水线配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// 上传阶段时长（毫秒）
    pub upload_delay_ms: u64,
    /// 识别阶段时长（毫秒）
    pub processing_delay_ms: u64,
    pub max_file_size_bytes: u64,
    /// 小写扩展名，不带点
    pub accepted_extensions: Vec<String>,
    /// false 时不校验格式与大小
    pub enforce_file_constraints: bool,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub ocr_text: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            upload_delay_ms: 1000,
            processing_delay_ms: 2000,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            accepted_extensions: ["pdf", "jpg", "jpeg", "png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enforce_file_constraints: true,
            confidence_min: 70.0,
            confidence_max: 100.0,
            ocr_text: "Documento procesado exitosamente".to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

/// 关键词分类规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRuleConfig {
    pub keywords: Vec<String>,
    pub label: String,
}

/// 分类配置（规则按顺序匹配，首个命中生效）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub rules: Vec<KeywordRuleConfig>,
    pub default_label: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        let rule = |keywords: &[&str], label: &str| KeywordRuleConfig {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            label: label.to_string(),
        };

        Self {
            rules: vec![
                rule(&["bl", "lading"], "Bill of Lading"),
                rule(&["invoice", "factura"], "Factura Comercial"),
                rule(&["packing", "lista"], "Lista de Empaque"),
                rule(&["certificate", "certificado"], "Certificado"),
            ],
            default_label: "Documento General".to_string(),
        }
    }
}

/// 外部目录数据源（为空时使用内置样例数据）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub shipments_path: Option<PathBuf>,
    pub documents_path: Option<PathBuf>,
}

/// 界面相关配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub locale: String,
    pub recent_activity_limit: usize,
    /// 待补单证数达到该值时提醒升级为紧急
    pub urgent_pending_threshold: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: "es".to_string(),
            recent_activity_limit: 10,
            urgent_pending_threshold: 3,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn with_defaults() -> Self {
        Self {
            config: AppConfig::default(),
            source: None,
        }
    }

    /// 使用给定配置（测试/嵌入场景）
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        validate(&config)?;
        Ok(Self {
            config,
            source: None,
        })
    }

    /// 加载配置
    ///
    /// # 查找顺序
    /// 1. 显式路径 `explicit`
    /// 2. 环境变量 FREIGHT_DOCS_CONFIG
    /// 3. `<config_dir>/freight-docs/config.toml`
    ///
    /// 文件不存在时使用默认值；之后应用环境变量覆写。
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(config_keys::CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(default_config_path);

        let (mut config, source) = match path {
            Some(p) if p.exists() => (Self::read_file(&p)?, Some(p)),
            Some(p) if explicit.is_some() => {
                return Err(ConfigError::Io {
                    path: p,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                })
            }
            _ => (AppConfig::default(), None),
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        validate(&config)?;

        match &source {
            Some(p) => tracing::info!("配置已加载: {}", p.display()),
            None => tracing::info!("未找到配置文件，使用默认配置"),
        }

        Ok(Self { config, source })
    }

    /// 从 TOML 文本解析（缺省字段取默认值）
    pub fn from_toml_str(raw: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        validate(&config)?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn intake(&self) -> &IntakeConfig {
        &self.config.intake
    }

    pub fn classification(&self) -> &ClassificationConfig {
        &self.config.classification
    }

    pub fn data(&self) -> &DataConfig {
        &self.config.data
    }

    pub fn ui(&self) -> &UiConfig {
        &self.config.ui
    }

    /// 配置来源文件（None 表示默认值）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("freight-docs").join("config.toml"))
}

/// 应用环境变量覆写
///
/// `lookup` 抽象环境变量读取，便于测试
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(config_keys::UPLOAD_DELAY_MS) {
        config.intake.upload_delay_ms = parse_u64(config_keys::UPLOAD_DELAY_MS, &v)?;
    }
    if let Some(v) = lookup(config_keys::PROCESSING_DELAY_MS) {
        config.intake.processing_delay_ms = parse_u64(config_keys::PROCESSING_DELAY_MS, &v)?;
    }
    if let Some(v) = lookup(config_keys::LOCALE) {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            config.ui.locale = trimmed.to_string();
        }
    }
    if let Some(v) = lookup(config_keys::ENFORCE_FILE_CONSTRAINTS) {
        config.intake.enforce_file_constraints = is_true(&v);
    }
    Ok(())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} ({})", value, e),
        })
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 配置校验
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let intake = &config.intake;
    if intake.confidence_min < 0.0 || intake.confidence_min >= intake.confidence_max {
        return Err(ConfigError::InvalidValue {
            key: "intake.confidence_min".to_string(),
            message: format!(
                "需满足 0 <= min < max (min={}, max={})",
                intake.confidence_min, intake.confidence_max
            ),
        });
    }
    if intake.confidence_max > 100.0 {
        return Err(ConfigError::InvalidValue {
            key: "intake.confidence_max".to_string(),
            message: format!("不能超过 100 (max={})", intake.confidence_max),
        });
    }
    if intake.accepted_extensions.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "intake.accepted_extensions".to_string(),
            message: "至少需要一种格式".to_string(),
        });
    }
    if config.classification.default_label.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "classification.default_label".to_string(),
            message: "默认分类不能为空".to_string(),
        });
    }
    if let Some(rule) = config
        .classification
        .rules
        .iter()
        .find(|r| r.keywords.iter().all(|k| k.trim().is_empty()))
    {
        return Err(ConfigError::InvalidValue {
            key: "classification.rules".to_string(),
            message: format!("规则缺少关键词: {}", rule.label),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.intake.upload_delay(), Duration::from_millis(1000));
        assert_eq!(config.intake.processing_delay(), Duration::from_millis(2000));
        assert_eq!(config.intake.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.classification.rules.len(), 4);
        assert_eq!(config.classification.default_label, "Documento General");
        assert_eq!(config.ui.locale, "es");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConfigManager::from_toml_str(
            r#"
            [intake]
            upload_delay_ms = 10
            processing_delay_ms = 20

            [ui]
            locale = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.intake.upload_delay_ms, 10);
        assert_eq!(config.intake.processing_delay_ms, 20);
        assert!(config.intake.enforce_file_constraints);
        assert_eq!(config.ui.locale, "en");
        assert_eq!(config.ui.recent_activity_limit, 10);
    }

    #[test]
    fn test_invalid_confidence_range_rejected() {
        let result = ConfigManager::from_toml_str(
            r#"
            [intake]
            confidence_min = 90.0
            confidence_max = 80.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (config_keys::UPLOAD_DELAY_MS, "5"),
            (config_keys::LOCALE, "en"),
            (config_keys::ENFORCE_FILE_CONSTRAINTS, "off"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.intake.upload_delay_ms, 5);
        assert_eq!(config.intake.processing_delay_ms, 2000);
        assert_eq!(config.ui.locale, "en");
        assert!(!config.intake.enforce_file_constraints);
    }

    #[test]
    fn test_env_override_invalid_number() {
        let mut config = AppConfig::default();
        let result = apply_env_overrides(&mut config, |k| {
            (k == config_keys::PROCESSING_DELAY_MS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[classification]\ndefault_label = \"Otro\"\n[[classification.rules]]\nkeywords = [\"awb\"]\nlabel = \"Air Waybill\""
        )
        .unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.source(), Some(file.path()));
        assert_eq!(manager.classification().default_label, "Otro");
        assert_eq!(manager.classification().rules.len(), 1);
        assert_eq!(manager.classification().rules[0].label, "Air Waybill");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = ConfigManager::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
