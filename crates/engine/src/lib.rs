#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`EngineError`)
//! - [`config`]: Scan configuration (`ScanConfig`, builder)
//! - [`asset`]: Asset model (`StorageAsset`, `AssetInventory`, boolean coercion)
//! - [`provider`]: Provider scanners (`ProviderScanner` trait, AWS/Azure/GCP, `ProviderRegistry`)
//! - [`misconfig`]: Misconfiguration rules (`MisconfigurationDetector`, `MisconfigurationFinding`)
//! - [`pii`]: PII detection (`PiiRule`, `PiiRuleSet`, `PiiRuleLoader`, `PiiDetector`)
//! - [`lineage`]: Lineage graph (`LineageGraph`, `LineageExport`)
//! - [`risk`]: Risk scoring (`RiskAssessor`, `RiskBreakdown`)
//! - [`scanner`]: Main orchestrator (`DspmScanner`, `DspmScannerBuilder`, `ScanResult`)
//! - [`report`]: Report rendering (`ReportGenerator`, Markdown, JSON)

pub mod asset;
pub mod config;
pub mod error;
pub mod lineage;
pub mod misconfig;
pub mod pii;
pub mod provider;
pub mod report;
pub mod risk;
pub mod scanner;

// --- Public API Re-exports ---

// Scanner (main orchestrator)
pub use scanner::{DspmScanner, DspmScannerBuilder, ScanResult, SeverityCounts};

// Configuration
pub use config::{ScanConfig, ScanConfigBuilder};

// Error
pub use error::EngineError;

// Asset model
pub use asset::{AssetInventory, StorageAsset, coerce_bool};

// Providers
pub use provider::aws::AwsStorageScanner;
pub use provider::azure::AzureStorageScanner;
pub use provider::gcp::GcpStorageScanner;
pub use provider::{ProviderRegistry, ProviderScanner};

// Detectors
pub use misconfig::{MisconfigurationDetector, MisconfigurationFinding, sort_findings};
pub use pii::rules::{PiiRule, PiiRuleLoader, PiiRuleSet};
pub use pii::{PiiDetector, PiiFinding};

// Lineage / Risk
pub use lineage::{LineageExport, LineageGraph};
pub use risk::{RiskAssessor, RiskBreakdown};

// Report
pub use report::{ReportFormat, ReportGenerator};
