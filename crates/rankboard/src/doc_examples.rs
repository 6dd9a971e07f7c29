use crate::{CsvSource, DashboardRequest, DashboardView, DataSource, Pipeline};

/// Load CSV text and run the default dashboard pipeline over it.
///
/// This helper is intended for documentation examples to avoid repetitive setup.
///
/// # Example
///
/// ```rust
/// # use rankboard::doc_examples::dashboard_from_csv;
/// let view = dashboard_from_csv("cat,val\nA,10\nB,30\nA,5\n")?;
/// assert_eq!(view.summary.total, 45.0);
/// assert_eq!(view.ranking[0].label, "B");
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub fn dashboard_from_csv(
    csv: &str,
) -> Result<DashboardView, Box<dyn std::error::Error + Send + Sync>> {
    let dataset = CsvSource::from_bytes("doc", csv.as_bytes()).load()?;
    let view = Pipeline::default().run(&dataset, &DashboardRequest::default())?;
    Ok(view)
}
