use std::time::Duration;

use ratelimit_transport::{
    ClientConfig, ClientOperation, DirectSubmitter, HttpRequest, RetryOptions, RetryableTransport,
    Submitter,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("RATELIMIT_DEMO_URL")?;
    let options = RetryOptions::from_env().map_err(anyhow::Error::msg)?;

    let cancel = CancellationToken::new();
    let request = HttpRequest::get(url)?.with_cancellation(cancel.clone());
    let operation = ClientOperation::new("demo", request).with_client(ClientConfig {
        transport: None,
        timeout: Some(Duration::from_secs(10)),
    });

    // Abandon any cooldown longer than a minute.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        cancel.cancel();
    });

    let response = RetryableTransport::new(DirectSubmitter, options)
        .submit(operation)
        .await?;

    println!("{} {}", response.status(), response.text().await?);

    Ok(())
}
