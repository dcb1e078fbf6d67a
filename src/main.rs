use anyhow::{bail, Context, Result};
use ifthenpay::{IfthenpayClient, PaymentGateway, Registry, RequestMap};
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  ifthenpay multibanco <orderid> <amount>
  ifthenpay mbway <orderid> <amount> <mobilenumber>
  ifthenpay mbway-status <orderid>
  ifthenpay credit-card <orderid> <amount>

Credentials are read from IFTHENPAY_* environment variables, or from the
settings file named by IFTHENPAY_SETTINGS.";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let registry = match env::var("IFTHENPAY_SETTINGS") {
        Ok(path) => Registry::from_file(&path)
            .with_context(|| format!("failed to load settings from {}", path))?,
        Err(_) => Registry::new(),
    };
    let client = IfthenpayClient::from_registry(registry)?;

    match (command.as_str(), &args[1..]) {
        ("multibanco", [order_id, amount]) => {
            let request = RequestMap::new().with("orderid", order_id.as_str()).with("amount", amount.as_str());
            print_json(&client.create_multibanco_reference(request).await?)
        }
        ("mbway", [order_id, amount, mobile]) => {
            let request = RequestMap::new()
                .with("orderid", order_id.as_str())
                .with("amount", amount.as_str())
                .with("mobilenumber", mobile.as_str());
            print_json(&client.init_mbway(request).await?)
        }
        ("mbway-status", [order_id]) => {
            let request = RequestMap::new().with("orderid", order_id.as_str());
            print_json(&client.mbway_status(request).await?)
        }
        ("credit-card", [order_id, amount]) => {
            let request = RequestMap::new().with("orderid", order_id.as_str()).with("amount", amount.as_str());
            print_json(&client.init_credit_card(request).await?)
        }
        _ => bail!(USAGE),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
