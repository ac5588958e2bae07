use clap::{Parser, Subcommand};
use reqwest::header::COOKIE;
use serde_json::{json, Value};

use header_compliance::compliance::mode::builtin_modes;
use header_compliance::compliance::{Category, ComplianceMode, ModeRegistryBuilder, ViolationKind};
use header_compliance::http::{parse_properties, X_COMPLIANCE_VIOLATIONS};
use header_compliance::{cookie, host};

#[derive(Parser)]
#[command(name = "compliance-cli")]
#[command(about = "Inspect Cookie and Host header compliance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in compliance modes
    Modes,
    /// Parse a Cookie header value locally
    Cookie {
        value: String,
        #[arg(short, long, default_value = "RFC6265")]
        mode: String,
        /// Extra violation kinds to tolerate on top of the mode
        #[arg(short, long)]
        tolerate: Vec<ViolationKind>,
    },
    /// Validate one or more Host header values locally
    Host {
        #[arg(required = true)]
        values: Vec<String>,
        #[arg(short, long, default_value = "RFC6265")]
        mode: String,
        #[arg(short, long)]
        tolerate: Vec<ViolationKind>,
    },
    /// Send a request to a running server and decode its report
    Probe {
        #[arg(short, long, default_value = "http://localhost:8080/cookie")]
        url: String,
        #[arg(short, long)]
        cookie: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Modes => {
            let modes: Vec<Value> = builtin_modes()
                .iter()
                .map(|m| {
                    let of = |category: Category| {
                        m.tolerated()
                            .filter(|k| k.category() == category)
                            .collect::<Vec<_>>()
                    };
                    json!({
                        "name": m.name(),
                        "tolerated": {
                            "cookie": of(Category::Cookie),
                            "http": of(Category::Http),
                        },
                    })
                })
                .collect();
            json!(modes)
        }
        Commands::Cookie {
            value,
            mode,
            tolerate,
        } => {
            let mode = select_mode(&mode, tolerate)?;
            let (result, violations) = cookie::parse(Some(&value), &mode);
            json!({ "mode": mode.to_string(), "result": result, "violations": violations })
        }
        Commands::Host {
            values,
            mode,
            tolerate,
        } => {
            let mode = select_mode(&mode, tolerate)?;
            let (result, violations) = host::validate(values.as_slice(), &mode);
            json!({
                "mode": mode.to_string(),
                "accepted": result.is_accepted(),
                "result": result,
                "violations": violations,
            })
        }
        Commands::Probe { url, cookie } => probe(&url, cookie.as_deref()).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Look up a built-in mode and widen it with `--tolerate` kinds.
fn select_mode(
    name: &str,
    tolerate: Vec<ViolationKind>,
) -> Result<ComplianceMode, Box<dyn std::error::Error>> {
    let base = ModeRegistryBuilder::with_builtins().build().lookup(name)?;
    if tolerate.is_empty() {
        return Ok((*base).clone());
    }
    Ok(base.with(format!("{}+CUSTOM", base.name()), tolerate))
}

async fn probe(url: &str, cookie: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let mut request = client.get(url);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }

    let res = request.send().await?;
    let status = res.status();
    let violations = res
        .headers()
        .get(X_COMPLIANCE_VIOLATIONS.as_str())
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let body = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
    }

    let entries: Vec<Value> = parse_properties(&body)
        .into_iter()
        .map(|(key, value)| json!([key, value]))
        .collect();
    Ok(json!({
        "status": status.as_u16(),
        "violations": violations,
        "report": entries,
    }))
}
