mod cli;
mod console;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use catalog_ai::{
    CatalogAssistant, ChatSession, DocumentSource, GeminiClient, GeminiConfig, GenerationSettings,
};
use catalog_common::{CatalogError, Credentials};
use catalog_config::CatalogConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "catalog=info";

/// `debug` becomes `catalog=debug`; anything with `=` is a full directive.
fn log_directive(arg: Option<&str>, config: &CatalogConfig) -> String {
    match arg {
        Some(d) if d.contains('=') => d.to_string(),
        Some(level) => format!("catalog={level}"),
        None => format!("catalog={}", config.logging.level.as_directive()),
    }
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .or_else(|_| DEFAULT_DIRECTIVE.parse())
        .unwrap_or_else(|_| Directive::from(LevelFilter::INFO));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

fn generation_settings(config: &CatalogConfig) -> GenerationSettings {
    let g = &config.generation;
    GenerationSettings {
        temperature: g.temperature,
        top_p: g.top_p,
        top_k: g.top_k,
        max_output_tokens: g.max_output_tokens,
        system_instruction: g.system_instruction.clone(),
    }
}

fn gemini_config(config: &CatalogConfig, credentials: &Credentials) -> GeminiConfig {
    let model = &config.model;
    GeminiConfig::new(credentials.api_key())
        .with_model(&model.name)
        .with_api_base(&model.api_base)
        .with_timeouts(
            Duration::from_secs(model.connect_timeout_secs),
            Duration::from_secs(model.request_timeout_secs),
        )
        .with_polling(
            Duration::from_millis(config.document.poll_interval_ms),
            config.document.max_polls,
        )
}

fn document_source(config: &CatalogConfig) -> DocumentSource {
    let doc = &config.document;
    DocumentSource::new(&doc.path, &doc.mime_type).with_display_name(&doc.display_name)
}

async fn run(args: cli::Args) -> catalog_common::Result<()> {
    let loaded = catalog_config::load_config(args.config.as_deref());
    let mut config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => CatalogConfig::default(),
    };
    if let Some(ref path) = args.document {
        config.document.path = path.clone();
    }

    init_logging(&log_directive(args.log_level.as_deref(), &config));
    tracing::info!("Catalog assistant v{} starting...", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => {
            if let Err(e) = catalog_config::validation::validate(&config) {
                tracing::warn!("config validation warning: {e}");
            }
        }
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => tracing::warn!("Config load failed, using defaults: {e}"),
    }

    if args.print_config {
        println!("{}", catalog_config::config_to_json(&config));
        return Ok(());
    }

    let credentials = Arc::new(catalog_config::load_credentials(args.secrets.as_deref())?);
    let client = GeminiClient::new(gemini_config(&config, &credentials))
        .map_err(|e| CatalogError::Chat(e.to_string()))?;
    tracing::info!(model = %config.model.name, document = %config.document.path.display(), "Assistant configured");

    let assistant = CatalogAssistant::new(
        Arc::new(client),
        document_source(&config),
        generation_settings(&config),
    );
    let mut session = ChatSession::new(credentials);
    tracing::debug!(session = %session.id().short(), "session started");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    console::run(
        &assistant,
        &mut session,
        &config.ui,
        config.model.stream && !args.no_stream,
        stdin,
        &mut stdout,
    )
    .await?;

    let usage = assistant.dispatcher().usage();
    tracing::info!(
        answered = assistant.dispatcher().answered(),
        tokens = usage.total_tokens(),
        "Shutdown complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
