//! StoryNest HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::sync::Arc;

use ai_speech::{HttpSpeechProvider, NullSink, SilenceSource, SpeechToText, TextToSpeech};
use application::{PlaybackRegistry, StoryService};
use application::ports::ListenOptions;
use infrastructure::{
    AppConfig, IllustrationAdapter, InMemoryStoryStore, SpeechInputAdapter, SpeechOutputAdapter,
    StoryGenerationAdapter,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storynest_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("StoryNest v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        story_model = %config.generation.story_model,
        "Configuration loaded"
    );

    // Generation adapters
    let generator = StoryGenerationAdapter::new(config.generation.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize story generation: {e}"))?;
    let illustrator = IllustrationAdapter::new(config.generation.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize illustration: {e}"))?;

    // Speech provider shared by playback and the synthesis proxy
    let speech_provider = Arc::new(
        HttpSpeechProvider::new(config.speech.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech provider: {e}"))?,
    );

    // Speech adapters for server-side playback sessions. The server has no
    // audio devices: synthesized audio is discarded and listening is
    // unavailable, so sessions run in read-only mode. Clients that play and
    // listen themselves use the synthesis proxy instead.
    let speech_output = SpeechOutputAdapter::connect(
        Arc::clone(&speech_provider) as Arc<dyn TextToSpeech>,
        Arc::new(NullSink),
    )
    .await;
    let speech_input = SpeechInputAdapter::connect(
        Arc::clone(&speech_provider) as Arc<dyn SpeechToText>,
        Arc::new(SilenceSource),
    )
    .await;

    // Services
    let store = Arc::new(InMemoryStoryStore::new());
    let story_service = StoryService::new(
        Arc::new(generator),
        Some(Arc::new(illustrator)),
        Arc::clone(&store) as Arc<dyn application::ports::StoryStorePort>,
    );

    let listen_options = ListenOptions {
        language: config.playback.language.clone(),
        continuous: config.playback.continuous,
        interim_results: config.playback.interim_results,
    };
    let playback = PlaybackRegistry::new(
        Arc::new(speech_output),
        Arc::new(speech_input),
        listen_options,
    );

    let config = Arc::new(config);
    let state = AppState {
        story_service: Arc::new(story_service),
        playback: Arc::new(playback),
        tts: speech_provider,
        config: Arc::clone(&config),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
