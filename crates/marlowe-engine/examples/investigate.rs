//! Investigate a claim against in-process providers
//!
//! ```text
//! cargo run -p marlowe-engine --example investigate -- "Unemployment was 3.9% in March"
//! ```
//!
//! Set `RUST_LOG=marlowe_engine=debug` to follow the investigation phases.

use marlowe_connectors::{ConnectorError, StaticConnector};
use marlowe_domain::{Claim, EvidenceCandidate};
use marlowe_engine::InvestigationEngine;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so stdout carries only the record
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let text = env::args()
        .nth(1)
        .unwrap_or_else(|| "The unemployment rate was 3.9% in March 2024".to_string());

    let engine = match InvestigationEngine::builder()
        .connector(Arc::new(StaticConnector::new(
            "economic_data",
            vec![EvidenceCandidate::new(
                "https://www.bls.gov/news.release/empsit.nr0.htm",
                "Employment Situation Summary",
                "The unemployment rate was 3.9 percent in March 2024.",
                "Bureau of Labor Statistics",
                95.0,
                90.0,
            )],
        )))
        .connector(Arc::new(StaticConnector::failing(
            "web_search",
            ConnectorError::RateLimited,
        )))
        .build()
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let investigation = engine.investigate_claim(&Claim::new(text, "economy")).await;
    println!("{}", investigation.reasoning);

    match serde_json::to_string_pretty(&engine.audit_trail()) {
        Ok(trail) => println!("\nAUDIT TRAIL:\n{}", trail),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
