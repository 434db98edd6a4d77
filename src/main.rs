use sampletask::cli::{self, Command};
use sampletask::{manifest, task, PipelineHost};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the agent; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli::get_command()? {
        Command::Run => {
            let host = PipelineHost::from_env();
            let mut stdout = std::io::stdout();
            let state = task::run(&host, &mut stdout).await;
            info!(?state, "task finished");

            let code = host.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Validate(path) => {
            manifest::validate_manifest_file(&path)?;
        }
    }

    Ok(())
}
