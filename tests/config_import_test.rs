// ==========================================
// 配置加载与目录导入集成测试
// ==========================================
// 测试目标: TOML 配置 / 环境变量覆写 / CSV、JSON 目录导入后的应用组装
// ==========================================

mod test_helpers;

use std::collections::HashMap;
use std::path::Path;

use freight_docs::app::AppState;
use freight_docs::config::{config_keys, config_manager::apply_env_overrides, AppConfig, ConfigError, ConfigManager};
use freight_docs::ShipmentStatus;
use test_helpers::write_temp_file;

#[test]
fn test_load_config_from_toml_file() {
    let file = write_temp_file(
        ".toml",
        r#"
[intake]
upload_delay_ms = 10
processing_delay_ms = 20

[ui]
locale = "en"
recent_activity_limit = 3
"#,
    );

    let manager = ConfigManager::load(Some(file.path())).unwrap();
    assert_eq!(manager.source(), Some(file.path()));
    assert_eq!(manager.intake().upload_delay_ms, 10);
    assert_eq!(manager.intake().processing_delay_ms, 20);
    assert_eq!(manager.ui().locale, "en");
    assert_eq!(manager.ui().recent_activity_limit, 3);
    // 未写出的字段取默认值
    assert!(manager.intake().enforce_file_constraints);
    assert_eq!(manager.classification().default_label, "Documento General");
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let result = ConfigManager::load(Some(Path::new("/nonexistent/freight-docs.toml")));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let file = write_temp_file(".toml", "[intake\nupload_delay_ms = ");
    let result = ConfigManager::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        (config_keys::UPLOAD_DELAY_MS, "5"),
        (config_keys::LOCALE, "en"),
        (config_keys::ENFORCE_FILE_CONSTRAINTS, "false"),
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
fn test_env_override_rejects_non_numeric_delay() {
    let mut config = AppConfig::default();
    let result = apply_env_overrides(&mut config, |k| {
        (k == config_keys::PROCESSING_DELAY_MS).then(|| "pronto".to_string())
    });
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[tokio::test]
async fn test_app_state_uses_imported_directories() {
    let shipments = write_temp_file(
        ".csv",
        "id,client,origin,destination,status,departure,estimated,documents,pendingDocs,type,container\n\
         SHP-2025-100,Nordic Foods,Oslo,Santos,entregado,2025-02-01,2025-03-01,4,0,LCL,MSCU-000001-1\n\
         SHP-2025-101,Andes Mining,Callao,Rotterdam,en_transito,2025-02-03,2025-03-10,6,4,FCL,\n",
    );
    let documents = write_temp_file(
        ".json",
        r#"[{
            "id": "DOC-900",
            "shipment_id": "SHP-2025-101",
            "name": "Certificado de Origen",
            "doc_type": "Certificado",
            "upload_date": "2025-02-04",
            "status": "rejected",
            "size_label": "0.4 MB"
        }]"#,
    );

    let mut config = AppConfig::default();
    config.data.shipments_path = Some(shipments.path().to_path_buf());
    config.data.documents_path = Some(documents.path().to_path_buf());
    let state = AppState::new(ConfigManager::from_config(config).unwrap()).unwrap();

    let views = state.shipment_api.search("", "all").unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].shipment.status, ShipmentStatus::Delivered);
    assert_eq!(views[1].shipment.container, None);

    let summary = state.dashboard_api.summary().unwrap();
    assert_eq!(summary.kpis.shipments_in_progress, 1);
    assert_eq!(summary.kpis.pending_documents, 4);
    // 4 个待处理 => Urgent；1 个被驳回单证 => Info
    assert_eq!(summary.alerts.len(), 2);
    assert_eq!(summary.alerts[1].message, "Documento rechazado: Certificado de Origen");
}

#[test]
fn test_app_state_reports_missing_data_file() {
    let mut config = AppConfig::default();
    config.data.shipments_path = Some("/nonexistent/envios.csv".into());
    let result = AppState::new(ConfigManager::from_config(config).unwrap());
    assert!(result.is_err());
}
