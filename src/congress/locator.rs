// src/congress/locator.rs
use crate::congress::models::{BillReference, TextVersion};
use crate::congress::BillTextSource;
use crate::utils::error::ExtractionError;

/// Resolves a bill to its newest published text version.
///
/// Upstream lists versions newest first, so index 0 is taken as-is.
pub async fn locate_latest_version<S>(source: &S, bill: &BillReference) -> Result<TextVersion, ExtractionError>
where
    S: BillTextSource + ?Sized,
{
    let versions = source.text_versions(bill).await?;
    tracing::info!("Found {} text versions for {}", versions.len(), bill);

    let latest = versions
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::NotFound("no text versions".to_string()))?;

    tracing::info!(
        "Using text version {:?} ({}) with formats: {:?}",
        latest.label.as_deref().unwrap_or("unlabelled"),
        latest.date.as_deref().unwrap_or("undated"),
        latest.artifacts.iter().map(|a| a.kind.as_str()).collect::<Vec<_>>()
    );
    Ok(latest)
}
