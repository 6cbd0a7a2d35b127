//! One-shot generation from the command line.

use std::sync::Arc;
use zenith::{
    GenerationPreferences, GenerationRequest, GenerationService, OutcomeResponse, ZenithConfig,
    azure_service,
};

/// Run one request through the orchestrator and print the outcome.
///
/// A failed request is printed the same way and then reported as an error,
/// so the exit status reflects it.
pub async fn run_generate(
    config: &ZenithConfig,
    count: u32,
    species: Option<String>,
    district: Option<String>,
    age_range: Option<String>,
) -> anyhow::Result<()> {
    let prefs = GenerationPreferences {
        species_preference: species,
        district_preference: district,
        age_range,
        count,
    };

    let service: Arc<dyn GenerationService> = Arc::new(azure_service(config)?);
    let request = GenerationRequest::new(prefs);
    tracing::info!(request_id = %request.request_id, count, "Generating from CLI");

    let result = service.handle(request).await;
    let failed = result.as_ref().err().map(|e| e.to_string());

    println!(
        "{}",
        serde_json::to_string_pretty(&OutcomeResponse::from(result))?
    );

    match failed {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}
