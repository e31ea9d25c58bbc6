use clap::Parser;
use ecolens::{Analyzer, ServiceConfig, classifier, server};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    // Defaults < config file < environment < command line
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env();
    args.apply(&mut config);

    let addr = config.socket_addr()?;

    // Loaded once; a failure leaves the service up but unable to classify
    let classifier = classifier::load(&config.classifier).await;
    if !classifier.is_available() {
        ::log::warn!("Serving without a classifier; /analyze will report the model as unavailable");
    }

    let analyzer = Arc::new(Analyzer::from_config(&config, classifier)?);

    let listener = TcpListener::bind(addr).await?;
    ::log::info!("{} listening on {}", server::SERVICE_NAME, listener.local_addr()?);

    if let Err(e) = server::serve(listener, analyzer).await {
        ::log::error!("Server exited with error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
