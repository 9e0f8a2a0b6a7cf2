use std::sync::Arc;

use mimalloc::MiMalloc;
use ratecard_search::agent::{ChatModel, SqlAgent};
use ratecard_search::api::OpenAiApi;
use ratecard_search::config::Config;
use ratecard_search::db::{self, Credentials};
use ratecard_search::router::{SearchState, search_router};
use ratecard_search::service::{InteractionLoop, schema_loader};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        db_user = %cfg.db_user,
        db_connect = %cfg.db_connect,
        model = %cfg.llm_model,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel
    );

    let schema = schema_loader::load_descriptor(cfg.schema_path.as_deref())?;

    let creds = Credentials::from_config(&cfg);
    let database = db::connect(&creds, cfg.sample_rows).await?;
    let tables = database.usable_table_names().await?;
    info!(dialect = %database.dialect(), tables = ?tables, "database connected");
    for described in schema.table_names() {
        if !tables.iter().any(|t| t.eq_ignore_ascii_case(described)) {
            warn!(table = described, "described table not visible in database");
        }
    }

    let http = OpenAiApi::http_client(&cfg)?;
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiApi::new(http, &cfg)?);
    let agent = SqlAgent::for_database(
        database,
        model,
        &schema,
        cfg.sql_top_k,
        cfg.agent_max_steps,
    );

    let interaction = InteractionLoop::new(Arc::new(agent), cfg.max_in_flight);
    let state = SearchState::new(interaction, cfg.page_title.clone());
    let app = search_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
