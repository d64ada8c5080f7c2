use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use chat_relay::adapters::ai::{OpenAICompletionClient, OpenAIConfig};
use chat_relay::adapters::http::{create_router, ChatHandlers};
use chat_relay::adapters::postgres::PostgresConversationRepository;
use chat_relay::config::{AppConfig, ValidationError};
use chat_relay::observability::init_tracing;
use chat_relay::ports::{CompletionClient, ConversationRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server)?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let api_key = config
        .ai
        .api_key()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
    let openai_config = OpenAIConfig::new(api_key)
        .with_model(config.ai.model.clone())
        .with_base_url(config.ai.base_url.clone())
        .with_max_tokens(config.ai.max_tokens)
        .with_temperature(config.ai.temperature)
        .with_timeout(config.ai.timeout());

    let repository: Arc<dyn ConversationRepository> =
        Arc::new(PostgresConversationRepository::new(pool));
    let completion_client: Arc<dyn CompletionClient> =
        Arc::new(OpenAICompletionClient::new(openai_config)?);

    let handlers = ChatHandlers::from_ports(repository, completion_client);
    let router = create_router(handlers, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        model = %config.ai.model,
        log_format = ?config.server.log_format,
        "Chat relay listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Chat relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
