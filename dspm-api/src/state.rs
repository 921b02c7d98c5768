//! Shared application state

use std::sync::Arc;

use tokio::sync::Mutex;

use dspm_core::config::DspmConfig;
use dspm_core::types::Provider;
use dspm_engine::{DspmScanner, DspmScannerBuilder, EngineError, PiiRuleLoader, ScanConfig, ScanResult};

/// State handed to every route.
///
/// `DspmScanner::scan` takes `&mut self` and owns the accumulating lineage
/// graph, so requests are serialized through one async mutex.
#[derive(Clone)]
pub struct AppState {
    scanner: Arc<Mutex<DspmScanner>>,
}

impl AppState {
    pub fn new(scanner: DspmScanner) -> Self {
        Self {
            scanner: Arc::new(Mutex::new(scanner)),
        }
    }

    /// Build the scanner from the effective configuration.
    ///
    /// A missing rules file falls back to the built-in rules.
    pub async fn from_config(config: &DspmConfig) -> Result<Self, EngineError> {
        let scan_config = ScanConfig::from_core(config);
        let rules = PiiRuleLoader::load(&scan_config.rules_path).await?;
        let scanner = DspmScannerBuilder::new()
            .config(scan_config)
            .rules(rules)
            .build()?;
        Ok(Self::new(scanner))
    }

    /// Run one scan over the given providers.
    pub async fn scan<S: AsRef<str>>(&self, providers: &[S]) -> Result<ScanResult, EngineError> {
        let mut scanner = self.scanner.lock().await;
        scanner.scan(providers)
    }

    /// Scan every supported provider.
    pub async fn scan_all(&self) -> Result<ScanResult, EngineError> {
        self.scan(&all_providers()).await
    }
}

/// Identifiers used when a request names no providers.
pub fn all_providers() -> Vec<&'static str> {
    Provider::ALL.iter().map(|p| p.as_str()).collect()
}
