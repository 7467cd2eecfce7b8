//! Generate (or reuse) a couple of functions against a local OpenAI-compatible endpoint.
//!
//! ```sh
//! LLMFN_BASE_URL=http://localhost:11434 LLMFN_MODEL=qwen2.5-coder cargo run --example echo
//! ```
//!
//! Artifacts land in `./generated`. Delete them to force regeneration.

use llmfn::prelude::*;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> llmfn::Result<()> {
    let mut patch = ConfigurationPatch::new();
    if let Ok(base_url) = std::env::var("LLMFN_BASE_URL") {
        patch = patch.base_url(base_url);
    }
    if let Ok(model) = std::env::var("LLMFN_MODEL") {
        patch = patch.model(model);
    }
    if let Ok(api_key) = std::env::var("LLMFN_API_KEY") {
        patch = patch.api_key(api_key);
    }

    let factory = Factory::new(Configuration::default().merged(patch));

    let echo = factory
        .llmfn(signature!("echo: string -> string"))
        .instruct("echo the input back as the output")
        .await?;
    println!("echo(\"hello\") = {}", echo.call(&[json!("hello")])?);

    match echo.call(&[json!(1)]) {
        Ok(value) => println!("echo(1) unexpectedly returned {}", value),
        Err(e) => println!("echo(1) rejected: {}", e),
    }

    let limit = 3;
    let initials = factory
        .llmfn(
            Signature::new("initials")
                .input(json!({"type": "array", "items": {"type": "string"}}))
                .output(json!({"type": "string"})),
        )
        .instruct(instruction!(
            "join the first letter of at most {limit} names, upper-cased"
        ))
        .await?;
    println!(
        "initials = {}",
        initials.call(&[json!(["ada", "grace", "barbara", "frances"])])?
    );

    Ok(())
}
