//! Candidate fallback loading.
//!
//! Candidates are tried strictly in order; a later candidate is never
//! started before the earlier one resolves. The first candidate that yields
//! at least one normalized record wins. Nothing here returns an error: every
//! failure degrades to the next candidate and, finally, to an empty result.

use std::sync::Arc;

use formats::{DatasetId, PointRecord, RowNormalizer, parse_delimited};
use tracing::{debug, info, warn};

use crate::locator::{Identity, LocatorRewrite};
use crate::source::{DataSourceError, Transport};

/// Outcome of one load: the records and the locator that produced them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub records: Vec<PointRecord>,
    /// Candidate (before rewriting) that supplied the records, if any did.
    pub source: Option<String>,
}

#[derive(Clone)]
pub struct DatasetLoader {
    transport: Arc<dyn Transport>,
    rewrite: Arc<dyn LocatorRewrite>,
    normalizer: RowNormalizer,
}

impl DatasetLoader {
    pub fn new(transport: Arc<dyn Transport>, normalizer: RowNormalizer) -> Self {
        Self {
            transport,
            rewrite: Arc::new(Identity),
            normalizer,
        }
    }

    pub fn with_rewrite(mut self, rewrite: Arc<dyn LocatorRewrite>) -> Self {
        self.rewrite = rewrite;
        self
    }

    pub fn normalizer(&self) -> &RowNormalizer {
        &self.normalizer
    }

    async fn attempt(&self, locator: &str) -> Result<Vec<PointRecord>, DataSourceError> {
        let target = self.rewrite.rewrite(locator);
        let text = self.transport.fetch_text(&target).await?;
        let rows = parse_delimited(&text)
            .map_err(|e| DataSourceError::with_source(format!("cannot parse {target}"), e))?;
        Ok(self.normalizer.normalize_rows(rows))
    }

    pub async fn load(&self, dataset: &DatasetId, candidates: &[String]) -> LoadReport {
        for locator in candidates {
            match self.attempt(locator).await {
                Ok(records) if !records.is_empty() => {
                    info!("{dataset}: {} records from {locator}", records.len());
                    return LoadReport {
                        records,
                        source: Some(locator.clone()),
                    };
                }
                Ok(_) => debug!("{dataset}: {locator} yielded no records"),
                Err(e) => warn!("{dataset}: candidate {locator} failed: {e}"),
            }
        }
        warn!("{dataset}: all {} candidates exhausted", candidates.len());
        LoadReport::default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DatasetLoader;
    use crate::locator::ProxyPrefix;
    use crate::source::MemoryTransport;
    use formats::{DatasetId, RowNormalizer, TableGrid};
    use foundation::LonLat;
    use pretty_assertions::assert_eq;

    fn normalizer() -> RowNormalizer {
        let grid = TableGrid::new(0.5).with_cell("c1", LonLat::new(1.0, 2.0));
        RowNormalizer::new(Arc::new(grid))
    }

    fn candidates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn falls_back_past_failing_and_empty_candidates() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_failure("a.csv", "HTTP error: 404 Not Found")
                .with_text("b.csv", "h3,value\nbogus,1\n")
                .with_text("c.csv", "h3,value\nc1,1\nc1,2\n")
                .with_text("d.csv", "h3,value\nc1,9\n"),
        );
        let loader = DatasetLoader::new(transport.clone(), normalizer());
        let report = loader
            .load(
                &DatasetId::Plankton,
                &candidates(&["a.csv", "b.csv", "c.csv", "d.csv"]),
            )
            .await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.source.as_deref(), Some("c.csv"));
        assert_eq!(
            transport.requests().await,
            candidates(&["a.csv", "b.csv", "c.csv"])
        );
    }

    #[tokio::test]
    async fn exhaustion_yields_empty() {
        let transport = Arc::new(MemoryTransport::new().with_failure("a.csv", "HTTP error: 500"));
        let loader = DatasetLoader::new(transport, normalizer());
        let report = loader.load(&DatasetId::Eddies, &candidates(&["a.csv"])).await;
        assert!(report.records.is_empty());
        assert_eq!(report.source, None);

        let none = loader.load(&DatasetId::Eddies, &[]).await;
        assert!(none.records.is_empty());
    }

    #[tokio::test]
    async fn rewrite_is_applied_per_candidate() {
        let transport = Arc::new(
            MemoryTransport::new()
                .with_text("p/https%3A%2F%2Fh%2Fa.csv", "lat,lon\n1,2\n")
                .with_text("local.csv", "lat,lon\n3,4\n"),
        );
        let loader = DatasetLoader::new(transport.clone(), normalizer())
            .with_rewrite(Arc::new(ProxyPrefix::new("p/")));

        let report = loader
            .load(&DatasetId::Occurrences, &candidates(&["https://h/a.csv"]))
            .await;
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.source.as_deref(), Some("https://h/a.csv"));

        let local = loader
            .load(&DatasetId::Occurrences, &candidates(&["local.csv"]))
            .await;
        assert_eq!(local.records[0].latitude, Some(3.0));
    }
}
