use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query the CEP weather services", long_about = None)]
struct Cli {
    /// Base URL of the service to call.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the entry service (POST /cep)
    Cep { cep: String },
    /// Ask the weather service directly (POST /weather)
    Weather { cep: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, cep) = match cli.command {
        Commands::Cep { cep } => ("cep", cep),
        Commands::Weather { cep } => ("weather", cep),
    };

    let res = client
        .post(format!("{}/{}", base, path))
        .json(&json!({ "cep": cep }))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: service returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: service returned status {} with non-JSON body", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
