//! threadline binary: interactive chat, scripted demo, one-shot turn, HTTP server

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use threadline::api::{create_router, AppState};
use threadline::cli::{run_demo, run_interactive, DEFAULT_CONVERSATION_ID};
use threadline::config::AppConfig;
use threadline::llm::{LlmService, LoggingService, OpenRouterService};
use threadline::runtime::{production_engine, ModelClient, ServiceModelClient};
use tokio::io::{AsyncWriteExt, BufReader};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "threadline", version, about = "Multi-turn conversational agent")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat session (default)
    Chat,
    /// Run the scripted three-turn test conversation
    Demo,
    /// Run a single turn and print the reply
    Ask {
        message: String,
        #[arg(long, default_value = DEFAULT_CONVERSATION_ID)]
        conversation_id: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Overrides THREADLINE_PORT
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_logging(json: bool) {
    let default_filter = if json {
        "threadline=info,tower_http=debug"
    } else {
        "threadline=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Chat);
    init_logging(matches!(command, Command::Serve { .. }));

    let config = AppConfig::from_env()?;
    let api_key = config
        .llm
        .require_api_key()
        .context("Please set your API key in the environment")?;

    let service = OpenRouterService::new(&config.llm, api_key)?;
    let llm: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(service)));
    let model: Arc<dyn ModelClient> = Arc::new(ServiceModelClient::new(llm));
    tracing::info!(model = %model.model_id(), "Model client initialized");

    let engine = production_engine(model);

    match command {
        Command::Chat => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(&engine, stdin, tokio::io::stdout()).await?;
        }
        Command::Demo => {
            run_demo(&engine, tokio::io::stdout()).await?;
        }
        Command::Ask {
            message,
            conversation_id,
        } => {
            let state = engine.run_turn(&conversation_id, &message).await?;
            let mut out = tokio::io::stdout();
            out.write_all(format!("{}\n", state.assistant_response).as_bytes())
                .await?;
            out.flush().await?;
        }
        Command::Serve { port } => {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);

            let app = create_router(AppState::new(engine))
                .layer(cors)
                .layer(TraceLayer::new_for_http());

            let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));
            tracing::info!("threadline server listening on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
