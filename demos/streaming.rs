//! Streaming message example
//!
//! Sends a streaming Messages API request with `reqwest` and decodes the
//! response body as it arrives, printing text token by token.
//!
//! ## Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY=sk-ant-api03-...
//! cargo run --example streaming
//! ```

use futures::StreamExt;
use integrations_anthropic_streaming::{
    LogLevel, LoggingConfig, StreamConfig, StreamEvent, StreamingResponse,
};
use serde_json::json;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingConfig::new().with_level(LogLevel::Warn).init()?;

    let api_key = std::env::var("ANTHROPIC_API_KEY")?;
    let config = StreamConfig::from_env()?;

    println!("Anthropic Streaming Example");
    println!("===========================\n");

    let response = reqwest::Client::new()
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .json(&json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "stream": true,
            "messages": [{
                "role": "user",
                "content": "Write a short story about a robot learning to paint. Keep it under 200 words."
            }]
        }))
        .send()
        .await?;

    let response = StreamingResponse::from_reqwest(response)
        .error_for_status()
        .await?;
    if let Some(request_id) = response.request_id() {
        println!("Request ID: {}\n", request_id);
    }

    let mut stream = response.into_message_stream(&config);

    // Process stream events as they arrive
    while let Some(event) = stream.next().await {
        let event = event?;
        if let Some(text) = event.text_delta() {
            print!("{}", text);
            io::stdout().flush()?;
        }
        if event == StreamEvent::MessageStop {
            println!();
        }
    }

    let message = stream.final_message().await?;
    println!("---");
    println!("Message ID: {}", message.id);
    println!("Stop reason: {:?}", message.stop_reason);
    println!(
        "Tokens: {} in, {} out",
        message.usage.input_tokens, message.usage.output_tokens
    );

    Ok(())
}
