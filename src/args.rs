use clap::Parser;
use ecolens::ServiceConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecolens")]
#[command(about = "HTTP service that scores the sustainability of product pages")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Page fetch timeout in seconds
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Zero-shot classification endpoint
    #[arg(long)]
    pub classifier_url: Option<String>,

    /// Skip the startup test classification
    #[arg(long)]
    pub no_warm_up: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(timeout) = self.fetch_timeout {
            config.fetch.timeout_secs = timeout;
        }
        if let Some(url) = &self.classifier_url {
            config.classifier.endpoint = url.clone();
        }
        if self.no_warm_up {
            config.classifier.warm_up = false;
        }
    }
}
