//! `fred`: call any FRED endpoint from the shell.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use fred_core::{Body, Endpoint, FileType, Fred, FredConfig, FredError, ParamValue, Params};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fred", about = "Query the FRED economic data API")]
struct Cli {
    /// FRED API key
    #[arg(long, env = "FRED_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "FRED_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue one request and print the body
    Get {
        /// Endpoint path, e.g. `category/children`
        endpoint: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,

        /// Ask for XML instead of JSON
        #[arg(long)]
        xml: bool,

        /// Skip local parameter checks and let the API judge
        #[arg(long)]
        raw: bool,
    },
    /// List the known endpoints
    Endpoints,
}

fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), ParamValue::infer(value)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Endpoints => {
            for endpoint in Endpoint::ALL {
                let required: Vec<&str> = endpoint
                    .requirements()
                    .iter()
                    .filter(|r| r.required)
                    .map(|r| r.name)
                    .collect();
                println!("{:<28} {:<14} {}", endpoint.path(), endpoint.root_field(), required.join(", "));
            }
            Ok(())
        }
        Command::Get {
            endpoint,
            params,
            xml,
            raw,
        } => {
            let api_key = cli
                .api_key
                .ok_or_else(|| anyhow!("no API key: pass --api-key or set FRED_API_KEY"))?;
            let mut config = FredConfig::new(api_key)?;
            if let Some(base_url) = &cli.base_url {
                config = config.with_base_url(base_url);
            }
            if xml {
                config = config.with_file_type(FileType::Xml);
            }
            debug!(?config, "client configured");

            let fred = Fred::from_config(config);
            let params: Params = params.into_iter().collect();
            let endpoint: Endpoint = endpoint.parse().map_err(|e: FredError| anyhow!("{endpoint}: {e}"))?;
            let body = if raw {
                fred.request(endpoint, &params)
            } else {
                fred.fetch(endpoint, &params)
            }
            .with_context(|| format!("GET {endpoint}"))?;
            print_body(&body)
        }
    }
}

fn print_body(body: &Body) -> Result<()> {
    match body {
        Body::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Body::Xml(text) | Body::Text(text) => println!("{text}"),
    }
    Ok(())
}
