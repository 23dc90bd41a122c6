use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use switchboard_agent::ChatAgent;
use switchboard_api::{build_router, config::Config, state::AppState};
use switchboard_llm::{ClientFactory, OpenAIConfig};
use switchboard_persist::PersistenceBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // A missing key stops the process here, before any route is served
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Switchboard API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!(model = %config.llm.model, "Initializing LLM client");
    let mut llm = OpenAIConfig::new(config.openai_api_key.clone());
    if let Some(base_url) = &config.llm.base_url {
        llm = llm.with_base_url(base_url);
    }
    if let Some(secs) = config.llm.request_timeout_secs {
        llm = llm.with_timeout_secs(secs);
    }
    let chat_client = ClientFactory::create_chat_client(llm)?;

    let backend = config.storage_backend()?;
    tracing::info!(backend = ?backend, "Initializing storage");
    let store = PersistenceBuilder::new()
        .backend(backend)
        .mongodb_uri(config.mongodb_uri.clone())
        .database(&config.storage.database)
        .build()
        .await?;

    let mut agent = ChatAgent::builder()
        .store(store)
        .chat_client(chat_client)
        .llm_config((&config.llm).into());
    if let Some(secs) = config.llm.request_timeout_secs {
        agent = agent.completion_timeout(Duration::from_secs(secs));
    }
    let agent = agent.build()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, agent));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
