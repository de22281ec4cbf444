use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

mod actuator;
use actuator::PullRequestEventHandler;

mod config;
use config::ActuatorConfig;

mod github;
use github::RestClient;

mod openshift;
use openshift::CommandLineClient;

mod shell;
use shell::Shell;

#[cfg(test)]
mod testing;

mod webhooks;

#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Configuration file for actuator
    #[arg(short, long)]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: ActuatorConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let github = RestClient::new(config.github_api_url.clone(), config.github_token.clone())
        .context("failed to create GitHub client")?;
    let openshift = CommandLineClient::new(Shell, config.openshift.clone());
    let handler = PullRequestEventHandler::new(
        config.repositories.clone(),
        config.openshift.route_name.clone(),
        Arc::new(openshift),
        Arc::new(github),
    );

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port))
        .merge(("shutdown.grace", config.shutdown_grace));

    info!("listening on {}:{}", config.address, config.port);
    let rocket = webhooks::mount(
        rocket::custom(figment),
        Box::new(handler),
        config.github_secret,
    );
    rocket.launch().await.map_err(|err| anyhow::anyhow!(err))?;

    Ok(())
}
