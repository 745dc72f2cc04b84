//! helpdesk-sim server binary.
//!
//! Loads configuration, wires the simulation pipeline and serves the REST API.

use std::sync::Arc;

use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use helpdesk_sim::adapters::http::{simulation_routes, SimulationAppState};
use helpdesk_sim::adapters::{
    AnthropicConfig, AnthropicProvider, IdleEvictor, IdleEvictorConfig,
    InMemoryConversationRegistry, InMemoryTicketThreads, LlmPersonaResponder,
    LlmPersonaResponderConfig, MockAIProvider,
};
use helpdesk_sim::config::AppConfig;
use helpdesk_sim::ports::{AIProvider, ConversationRegistry, PersonaResponder};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let provider = build_provider(&config)?;
    tracing::info!(
        provider = %provider.provider_info().name,
        model = %provider.provider_info().model,
        "AI provider ready"
    );

    let registry = Arc::new(InMemoryConversationRegistry::new());
    let threads = Arc::new(InMemoryTicketThreads::new());
    let responder: Arc<dyn PersonaResponder> = Arc::new(LlmPersonaResponder::with_config(
        provider,
        LlmPersonaResponderConfig {
            max_tokens: config.ai.max_tokens,
            temperature: config.ai.temperature,
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let evictor = IdleEvictor::with_config(
        registry.clone() as Arc<dyn ConversationRegistry>,
        IdleEvictorConfig::default()
            .with_sweep_interval(config.registry.sweep_interval())
            .with_idle_ttl(config.registry.idle_ttl()),
    );
    let eviction = tokio::spawn(async move { evictor.run(shutdown_rx).await });

    let app_state = SimulationAppState::new(registry, threads, responder, config.hints);
    let app = simulation_routes()
        .with_state(app_state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        environment = ?config.server.environment,
        hints_enabled = config.hints.enabled,
        "helpdesk-sim listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = eviction.await;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    match &config.ai.anthropic_api_key {
        Some(key) if config.ai.has_anthropic() => {
            use secrecy::ExposeSecret;
            let provider = AnthropicProvider::new(
                AnthropicConfig::new(key.expose_secret().clone())
                    .with_model(config.ai.model.clone())
                    .with_timeout(config.ai.timeout())
                    .with_max_retries(config.ai.max_retries),
            )?;
            Ok(Arc::new(provider))
        }
        _ => {
            tracing::warn!("No Anthropic API key configured, persona replies come from the mock provider");
            Ok(Arc::new(MockAIProvider::new()))
        }
    }
}
