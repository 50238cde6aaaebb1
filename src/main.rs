use artifact_redirector::{config, server, telemetry};
use clap::Parser;

/// Serves cached CI artifact download links.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// AppVeyor account name (overrides APPVEYOR_USERNAME)
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// AppVeyor project slug(s), separated by semicolons (overrides APPVEYOR_PROJECT)
    #[arg(short = 'p', long)]
    project: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::Config::from_env()?;
    if let Some(username) = cli.username {
        config.username = username;
    }
    if let Some(project) = cli.project {
        config.project = project;
    }
    config.validate()?;

    telemetry::init(&config.log_level, &config.log_format);
    config.print_summary();

    server::run(config).await
}
