use anyhow::Result;
use reelchat::{config::Config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Load configuration before logging so the configured level applies
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    config.validate();

    // One-shot query: reelchat ask <text...>
    if args.len() >= 2 && args[1] == "ask" {
        if args.len() < 3 {
            eprintln!("Usage: reelchat ask <question>");
            std::process::exit(1);
        }

        let session = server::build_session(&config)?;
        let question = args[2..].join(" ");

        match session.submit(&question).await {
            Some(reply) => println!("{}", reply.text),
            None => {
                eprintln!("Question is empty");
                std::process::exit(1);
            }
        }

        return Ok(());
    }

    if args.len() >= 2 {
        eprintln!("Unknown command: {}", args[1]);
        eprintln!("Usage: reelchat [ask <question>]");
        std::process::exit(1);
    }

    info!("🎬 reelchat v{}", reelchat::VERSION);
    info!("✓ Configuration loaded");
    info!("  HTTP: {}", config.server.bind);

    server::run(config).await?;

    Ok(())
}
