use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use video_blogger::groq_client::GroqClient;
use video_blogger::workflow::{create_blog_workflow_executor, WorkflowOptions};
use video_blogger::youtube_transcript::YouTubeTranscriptSource;
use video_blogger::{handlers, middleware, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    // Missing credentials stop the process before anything binds
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    let model = Arc::new(GroqClient::from_config(&config));
    tracing::info!("Initializing Groq client (model {})...", model.model());

    let transcript_source = Arc::new(YouTubeTranscriptSource::new(config.transcript_languages.clone()));

    let executor = create_blog_workflow_executor(model, transcript_source, &WorkflowOptions::from(&config))?;
    tracing::info!(
        score_parse_policy = ?config.score_parse_policy,
        transcript_error_policy = ?config.transcript_error_policy,
        "✅ Blog workflow compiled"
    );

    let shared_state = Arc::new(AppState {
        executor,
        model_name: config.groq_model.clone(),
    });

    let app = Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::blog::blog_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,video_blogger=debug,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,video_blogger=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!("📺 Video blogger starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
