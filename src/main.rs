// ==========================================
// 货代单证管理系统 - 命令行入口
// ==========================================
// 子命令: shipments / documents / upload / comment / dashboard
// 输出: stdout 为 JSON，日志写 stderr
// ==========================================

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use freight_docs::api::{ApiError, Notification};
use freight_docs::app::AppState;
use freight_docs::config::{config_keys, ConfigManager};
use freight_docs::domain::{SubmissionOptions, UploadPriority};
use freight_docs::engine::{DocumentQuery, StatusFilter};
use freight_docs::logging::{self, LogFormat};
use freight_docs::{i18n, DocumentStatus};

#[derive(Debug, Parser)]
#[command(name = "freight-docs", version, about = "Gestión documental de carga")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true, env = config_keys::CONFIG_PATH)]
    config: Option<PathBuf>,

    /// 日志格式
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 运单列表
    Shipments {
        #[arg(long, default_value = "")]
        search: String,
        /// 状态码 (all / preparacion / documentacion / en_transito / entregado)
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// 客户单证
    Documents {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: String,
        /// 仅列出某运单下的单证
        #[arg(long)]
        shipment: Option<String>,
    },
    /// 上传单证并等待识别完成后提交
    Upload {
        #[arg(long)]
        shipment: Option<String>,
        /// 逗号分隔的标签
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "normal")]
        priority: String,
        #[arg(long)]
        notes: Option<String>,
        files: Vec<PathBuf>,
    },
    /// 对单证提交评论
    Comment {
        #[arg(long)]
        document: String,
        message: String,
    },
    /// 驾驶舱汇总
    Dashboard,
}

#[derive(Serialize)]
struct ErrorOutput {
    code: &'static str,
    notification: Notification,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_with(match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    });

    tracing::info!("{} v{}", freight_docs::APP_NAME, freight_docs::VERSION);

    let config = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    let locale = i18n::normalize_locale(&config.ui().locale);
    i18n::set_locale(locale);

    let state = AppState::new(config).context("初始化应用失败")?;

    match run(&state, cli.command).await {
        Ok(()) => Ok(()),
        Err(err) => {
            let output = ErrorOutput {
                code: err.code(),
                notification: Notification::from_error(&err, locale),
            };
            print_json(&output)?;
            if err.is_validation() {
                std::process::exit(2);
            }
            Err(err.into())
        }
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Shipments { search, status } => {
            let views = state.shipment_api.search(&search, &status)?;
            print_json(&views)?;
        }
        Command::Documents {
            search,
            status,
            shipment,
        } => match shipment {
            Some(id) => print_json(&state.shipment_api.documents_for(&id)?)?,
            None => {
                let query = DocumentQuery::new(
                    search,
                    StatusFilter::<DocumentStatus>::from_document_code(&status),
                );
                let documents = state
                    .portal_api
                    .visible_documents()?
                    .into_iter()
                    .filter(|v| query.matches(&v.document))
                    .collect::<Vec<_>>();
                print_json(&documents)?;
            }
        },
        Command::Upload {
            shipment,
            tags,
            priority,
            notes,
            files,
        } => {
            let intake = &state.intake_api;
            intake.add_paths(&files)?;
            intake.select_shipment(shipment.as_deref())?;
            intake.set_options(SubmissionOptions {
                tags: SubmissionOptions::parse_tags(&tags),
                priority: UploadPriority::from_code(&priority),
                notes: notes.filter(|n| !n.trim().is_empty()),
            })?;

            intake.settle().await;
            let processed = intake.files()?;
            let receipt = intake.submit().await?;

            print_json(&serde_json::json!({
                "files": processed,
                "receipt": receipt,
            }))?;
        }
        Command::Comment { document, message } => {
            let notification = state.portal_api.submit_comment(&document, &message).await?;
            print_json(&notification)?;
        }
        Command::Dashboard => {
            print_json(&state.dashboard_api.summary()?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InternalError(format!("JSON 序列化失败: {}", e)))?;
    println!("{}", text);
    Ok(())
}
