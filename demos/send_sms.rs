use std::io;

use m360_sms::{GatewayConfig, M360Client, RawSmsRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let phone = std::env::var("SMS_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_TO environment variable is required",
        )
    })?;
    let from = std::env::var("SMS_FROM").unwrap_or_else(|_| "M360".to_owned());
    let text = std::env::var("SMS_TEXT")
        .unwrap_or_else(|_| "Hello from the m360-sms demo.".to_owned());

    let client = M360Client::new(GatewayConfig::from_env()?)?;
    let outcome = client
        .send(RawSmsRequest {
            from: Some(from),
            to: Some(vec![phone]),
            text: Some(text),
            ..Default::default()
        })
        .await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
