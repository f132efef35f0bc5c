/*
 * dxsp - quote harness
 * Usage: dxsp <asset_in_address> <asset_out_address> [amount]
 */

use dxsp::{config::Config, DexSwap};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let mut args = std::env::args().skip(1);
    let (Some(asset_in), Some(asset_out)) = (args.next(), args.next()) else {
        error!("Usage: dxsp <asset_in_address> <asset_out_address> [amount]");
        std::process::exit(2);
    };
    let amount = match args.next() {
        Some(raw) => Decimal::from_str(&raw)?,
        None => Decimal::ONE,
    };

    let dex = DexSwap::new(config)?;

    match dex.get_quote(&asset_in, &asset_out, amount).await {
        Ok(Some(quote)) => println!("{quote}"),
        Ok(None) => info!("No quote for {} -> {}", asset_in, asset_out),
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dxsp={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
