use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::types::Readiness;

async fn run(cfg: configs::AppConfig) -> anyhow::Result<Readiness> {
    let products = service::runtime::bootstrap(&cfg).await?;
    let entities = products.count().await?;
    Ok(Readiness::ready(entities))
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG / DATABASE_URL 等环境变量生效
    dotenv().ok();

    // 优先 config.toml，文件不存在时才退回环境变量
    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            let chain = format!("{e:#}");
            error!(service = "catalog", event = "config_invalid", error = %chain, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.logging);

    let run_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "catalog", event = "panic", %run_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.runtime.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "catalog", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "catalog",
        event = "start",
        %run_id,
        pid,
        version,
        threads = cfg.runtime.worker_threads.unwrap_or_default(),
        "catalog store starting"
    );

    match rt.block_on(run(cfg)) {
        Ok(readiness) => match serde_json::to_string(&readiness) {
            Ok(report) => {
                info!(service = "catalog", event = "ready", %run_id, entities = readiness.entities, "product store ready");
                println!("{report}");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "catalog", event = "report_failed", %run_id, error = %e, "cannot serialize readiness report");
                std::process::ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(service = "catalog", event = "bootstrap_failed", %run_id, error = %e, "product store bootstrap failed");
            std::process::ExitCode::FAILURE
        }
    }
}
