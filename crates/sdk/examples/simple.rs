//! Simple SDK Example
//!
//! Imports an app (or reuses it), trains it, and recognizes one utterance.
//!
//! # Usage
//!
//! ```bash
//! LUIS_SUBSCRIPTION_KEY=... cargo run --example simple -- app.json "book a flight"
//! ```

use luis_sdk::{LuisConfig, ManagementClient, PublishAppOptions, RecognitionClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let app_file = args.next().ok_or("usage: simple <app.json> <utterance>")?;
    let utterance = args.next().unwrap_or_else(|| "book a flight".to_string());

    println!("LUIS SDK - Simple Example");
    println!("=========================\n");

    let config = LuisConfig::from_env()?;
    let management = ManagementClient::new(config.clone())?;

    // 1. Import (idempotent)
    println!("1. Importing {}...", app_file);
    let app: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&app_file)?)?;
    let version_id = app["versionId"].as_str().unwrap_or("0.1").to_string();
    let app_id = management.try_import_app(&app).await?;
    println!("   ✓ App ID: {}\n", app_id);

    // 2. Train and wait
    println!("2. Training version {}...", version_id);
    management.train_app(&app_id, &version_id).await?;
    management.wait_for_training(&app_id, &version_id).await?;
    println!("   ✓ Trained\n");

    // 3. Publish to staging
    println!("3. Publishing to staging...");
    let mut publish = PublishAppOptions::new(&version_id);
    publish.is_staging = Some(true);
    management.publish_app(&app_id, publish).await?;
    println!("   ✓ Published\n");

    // 4. Recognize
    println!("4. Recognizing \"{}\"...", utterance);
    let mut options = config.recognizer.clone();
    options.staging = true;
    let recognizer =
        RecognitionClient::new(config.with_app_id(app_id).with_recognizer_options(options))?;
    let result = recognizer.recognize(&utterance).await?;

    println!(
        "   ✓ {} ({:.2})",
        result.top_scoring_intent.intent, result.top_scoring_intent.score
    );
    for entity in &result.entities {
        println!("     - {} [{}]", entity.entity, entity.entity_type);
    }

    Ok(())
}
