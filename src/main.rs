use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use askdoc_core::{Config, Engine};
use askdoc_llm::{LlmProvider, OllamaProvider};
use askdoc_web::WebServer;
use tokio::sync::watch;

#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Quit,
    Skip,
    Ask(String),
}

fn classify_input(line: &str) -> CliAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return CliAction::Skip;
    }
    if trimmed.eq_ignore_ascii_case("exit") {
        return CliAction::Quit;
    }
    CliAction::Ask(trimmed.to_owned())
}

fn resolve_config_path(args: &[String]) -> PathBuf {
    args.first()
        .cloned()
        .or_else(|| std::env::var("ASKDOC_CONFIG").ok())
        .map_or_else(|| PathBuf::from("askdoc.toml"), PathBuf::from)
}

fn read_question() -> std::io::Result<Option<String>> {
    print!("\nYour Question: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        // EOF
        return Ok(None);
    }
    Ok(Some(line))
}

async fn run_cli_loop<P: LlmProvider>(engine: &Engine<P>) -> anyhow::Result<()> {
    println!("Query Assistant");
    println!("Ask any question about the document or type 'exit' to quit.");

    loop {
        let line = tokio::task::spawn_blocking(read_question)
            .await
            .context("stdin task failed")??;
        let Some(line) = line else { break };

        match classify_input(&line) {
            CliAction::Skip => {}
            CliAction::Quit => {
                println!("Goodbye!");
                break;
            }
            CliAction::Ask(question) => match engine.answer(&question).await {
                Ok(answer) => {
                    println!("\nAnswer:");
                    println!("{}", answer.text);
                    println!("\nSources:");
                    for source in &answer.sources {
                        println!("- {source}");
                    }
                }
                Err(e) => println!("An error occurred: {e}"),
            },
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let serve = args.first().is_some_and(|a| a == "serve");
    if serve {
        args.remove(0);
    }

    let config_path = resolve_config_path(&args);
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    config.validate()?;

    let provider = Arc::new(
        OllamaProvider::new(
            &config.llm.base_url,
            config.llm.model.clone(),
            config.llm.embedding_model.clone(),
        )
        .with_temperature(config.llm.temperature),
    );
    provider.health_check().await?;

    let engine = Engine::build(&config, provider)
        .await
        .context("failed to build the document index")?;
    tracing::info!(entries = engine.index_len(), "ready");

    if serve {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = shutdown_tx.send(true);
        });

        WebServer::new(
            &config.web.bind,
            config.web.port,
            Arc::new(engine),
            shutdown_rx,
        )
        .serve()
        .await?;
    } else {
        run_cli_loop(&engine).await?;
    }

    Ok(())
}
