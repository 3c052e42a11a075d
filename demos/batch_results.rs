//! Batch results example
//!
//! Downloads the JSONL results of a finished message batch and prints one
//! line per request without holding the whole file in memory.
//!
//! ## Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY=sk-ant-api03-...
//! cargo run --example batch_results -- msgbatch_01HkcTjaV5uDC8jWR4ZsDV8d
//! ```

use futures::StreamExt;
use integrations_anthropic_streaming::{
    BatchResultType, JsonlRecord, LoggingConfig, StreamConfig, StreamingResponse,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingConfig::new().init()?;

    let api_key = std::env::var("ANTHROPIC_API_KEY")?;
    let batch_id = std::env::args()
        .nth(1)
        .ok_or("usage: batch_results <batch-id>")?;

    let response = reqwest::Client::new()
        .get(format!(
            "https://api.anthropic.com/v1/messages/batches/{}/results",
            batch_id
        ))
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .send()
        .await?;

    let mut stream = StreamingResponse::from_reqwest(response)
        .error_for_status()
        .await?
        .into_batch_results(&StreamConfig::from_env()?);

    let (mut succeeded, mut failed) = (0, 0);
    while let Some(record) = stream.next().await {
        match record? {
            JsonlRecord::Typed(result) => match &result.result {
                BatchResultType::Succeeded { message } => {
                    succeeded += 1;
                    println!("{}: {}", result.custom_id, message.text());
                }
                BatchResultType::Errored { error } => {
                    failed += 1;
                    println!("{}: {} ({})", result.custom_id, error.error.message, error.error.error_type);
                }
                other => {
                    failed += 1;
                    println!("{}: {:?}", result.custom_id, other);
                }
            },
            JsonlRecord::Raw(value) => println!("unrecognized line: {}", value),
        }
    }

    println!("\n{} succeeded, {} failed", succeeded, failed);
    Ok(())
}
