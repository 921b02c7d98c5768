//! DSPM 스캔 오케스트레이터 -- 전체 스캔 흐름 관리
//!
//! [`DspmScanner`]는 요청된 프로바이더마다 자산 탐색, 설정 오류 평가,
//! PII 탐지, lineage 확장을 순서대로 수행하고 마지막에 위험 점수를 한 번 계산합니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! providers --> validate --> ProviderRegistry --> discover()
//!                                                    |
//!                     +------------------------------+------------------+
//!                     |                              |                  |
//!           MisconfigurationDetector            PiiDetector       LineageGraph (long-lived)
//!                     |                              |
//!                     +--------------+---------------+
//!                                    |
//!                              RiskAssessor --> ScanResult
//! ```
//!
//! # Lineage 수명
//!
//! 기본적으로 lineage 그래프는 인스턴스 수명 동안 누적됩니다.
//! `ScanConfig::retain_lineage = false`이면 `scan` 호출마다 새 그래프로 시작합니다.

use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use dspm_core::metrics as m;
use dspm_core::types::{Provider, Severity};

use crate::asset::AssetInventory;
use crate::config::ScanConfig;
use crate::error::EngineError;
use crate::lineage::LineageGraph;
use crate::misconfig::{MisconfigurationDetector, MisconfigurationFinding, sort_findings};
use crate::pii::rules::PiiRuleSet;
use crate::pii::{PiiDetector, PiiFinding};
use crate::provider::ProviderRegistry;
use crate::risk::{RiskAssessor, RiskBreakdown};

/// 스캔 결과
///
/// 어댑터(CLI, 리포트)는 읽기만 합니다.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// 스캔 식별자
    pub scan_id: Uuid,
    /// 스캔 완료 시각
    pub scanned_at: DateTime<Utc>,
    /// 처리된 프로바이더 (처리 순서)
    pub providers: Vec<Provider>,
    /// 발견된 자산
    pub assets: AssetInventory,
    /// PII finding
    pub pii_findings: Vec<PiiFinding>,
    /// 설정 오류 finding (탐지 순서)
    pub misconfigurations: Vec<MisconfigurationFinding>,
    /// 스캔 종료 시점의 lineage 그래프 스냅샷
    pub lineage: LineageGraph,
    /// 위험 점수
    pub risk: RiskBreakdown,
}

impl ScanResult {
    /// 심각도별 설정 오류 개수를 반환합니다.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for finding in &self.misconfigurations {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// 심각도 내림차순으로 정렬된 설정 오류를 반환합니다.
    pub fn sorted_misconfigurations(&self) -> Vec<MisconfigurationFinding> {
        sort_findings(&self.misconfigurations)
    }
}

/// 심각도별 finding 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    /// 전체 finding 수를 반환합니다.
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    /// 심각도의 개수를 반환합니다.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// DSPM 스캔 오케스트레이터
///
/// 인스턴스는 하나의 lineage 그래프를 소유합니다. `scan`이 `&mut self`를 요구하므로
/// 동시에 두 스캔이 같은 그래프를 변경할 수 없습니다.
pub struct DspmScanner {
    config: ScanConfig,
    registry: ProviderRegistry,
    misconfig: MisconfigurationDetector,
    pii: PiiDetector,
    assessor: RiskAssessor,
    lineage: LineageGraph,
    scans_completed: u64,
}

impl DspmScanner {
    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 프로바이더 레지스트리를 반환합니다.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// 누적된 lineage 그래프를 반환합니다.
    pub fn lineage(&self) -> &LineageGraph {
        &self.lineage
    }

    /// lineage 그래프를 비웁니다.
    pub fn reset_lineage(&mut self) {
        self.lineage.clear();
    }

    /// 성공한 스캔 수를 반환합니다.
    pub fn scans_completed(&self) -> u64 {
        self.scans_completed
    }

    /// 설정의 기본 프로바이더로 스캔합니다.
    pub fn scan_default(&mut self) -> Result<ScanResult, EngineError> {
        let providers: Vec<&'static str> =
            self.config.providers.iter().map(|p| p.as_str()).collect();
        self.scan(&providers)
    }

    /// 요청된 프로바이더를 스캔합니다.
    ///
    /// 식별자는 소문자로 정규화되며, 요청된 순서대로 항목마다 처리됩니다.
    /// 같은 프로바이더가 두 번 요청되면 탐색도 두 번 수행됩니다.
    /// 지원하지 않는 식별자가 하나라도 있으면 탐색 전에
    /// `EngineError::UnsupportedProviders`(정렬된 전체 목록)를 반환합니다.
    /// 빈 요청은 빈 결과를 반환합니다.
    pub fn scan<S: AsRef<str>>(&mut self, providers: &[S]) -> Result<ScanResult, EngineError> {
        let start = Instant::now();
        let result = self.run_scan(providers);
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(scan) => {
                self.scans_completed += 1;
                counter!(m::SCAN_RUNS_TOTAL, m::LABEL_RESULT => "success").increment(1);
                histogram!(m::SCAN_DURATION_SECONDS).record(elapsed);
                gauge!(m::RISK_SCORE).set(f64::from(scan.risk.score));
                gauge!(m::LINEAGE_NODES).set(scan.lineage.node_count() as f64);
                gauge!(m::LINEAGE_EDGES).set(scan.lineage.edge_count() as f64);
                info!(
                    scan_id = %scan.scan_id,
                    assets = scan.assets.len(),
                    misconfigurations = scan.misconfigurations.len(),
                    pii_findings = scan.pii_findings.len(),
                    score = scan.risk.score,
                    elapsed_secs = elapsed,
                    "scan completed"
                );
            }
            Err(e) => {
                counter!(m::SCAN_RUNS_TOTAL, m::LABEL_RESULT => "failure").increment(1);
                warn!(error = %e, "scan failed");
            }
        }

        result
    }

    fn run_scan<S: AsRef<str>>(&mut self, requested: &[S]) -> Result<ScanResult, EngineError> {
        let providers = self.resolve_providers(requested)?;

        if !self.config.retain_lineage {
            self.lineage.clear();
        }

        let mut assets = AssetInventory::new();
        let mut pii_findings = Vec::new();
        let mut misconfigurations = Vec::new();

        for provider in &providers {
            info!(provider = %provider, "scanning provider");
            let discovered = self.registry.get(provider.as_str())?.discover()?;
            counter!(m::SCAN_ASSETS_DISCOVERED_TOTAL, m::LABEL_PROVIDER => provider.as_str())
                .increment(discovered.len() as u64);

            let found = self.misconfig.evaluate(*provider, &discovered);
            for finding in &found {
                counter!(
                    m::MISCONFIG_FINDINGS_TOTAL,
                    m::LABEL_PROVIDER => provider.as_str(),
                    m::LABEL_SEVERITY => finding.severity.label()
                )
                .increment(1);
            }
            misconfigurations.extend(found);

            let matches = self.pii.scan(*provider, &discovered);
            for finding in &matches {
                counter!(
                    m::PII_MATCHES_TOTAL,
                    m::LABEL_PROVIDER => provider.as_str(),
                    m::LABEL_RULE => finding.kind.clone()
                )
                .increment(1);
            }
            pii_findings.extend(matches);

            self.lineage.add_provider_assets(*provider, &discovered);
            assets.extend(discovered);
        }

        let risk = self.assessor.calculate(&pii_findings, &misconfigurations);

        Ok(ScanResult {
            scan_id: Uuid::new_v4(),
            scanned_at: Utc::now(),
            providers,
            assets,
            pii_findings,
            misconfigurations,
            lineage: self.lineage.clone(),
            risk,
        })
    }

    /// 요청 식별자를 집합으로 검증한 뒤 요청 순서 그대로 프로바이더 목록으로 변환합니다.
    fn resolve_providers<S: AsRef<str>>(
        &self,
        requested: &[S],
    ) -> Result<Vec<Provider>, EngineError> {
        let lowered: Vec<String> = requested
            .iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .collect();

        let mut unsupported: Vec<String> = lowered
            .iter()
            .filter(|id| !self.registry.supports(id))
            .cloned()
            .collect();
        if !unsupported.is_empty() {
            unsupported.sort();
            unsupported.dedup();
            return Err(EngineError::UnsupportedProviders(unsupported));
        }

        Ok(lowered
            .iter()
            .filter_map(|id| Provider::from_str_loose(id))
            .collect())
    }
}

/// DSPM 스캐너 빌더
pub struct DspmScannerBuilder {
    config: ScanConfig,
    rules: Option<PiiRuleSet>,
    registry: Option<ProviderRegistry>,
}

impl DspmScannerBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
            rules: None,
            registry: None,
        }
    }

    /// 스캔 설정을 지정합니다.
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// PII 규칙 집합을 지정합니다.
    ///
    /// 설정하지 않으면 내장 규칙을 사용합니다.
    pub fn rules(mut self, rules: PiiRuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// 프로바이더 레지스트리를 지정합니다.
    ///
    /// 설정하지 않으면 `ProviderRegistry::from_config`로 생성합니다.
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// - 설정 검증 실패 시 `EngineError::Config`
    /// - PII 패턴 컴파일 실패 시 `EngineError::RuleCompile`
    pub fn build(self) -> Result<DspmScanner, EngineError> {
        self.config.validate()?;

        let rules = self.rules.unwrap_or_default();
        let pii = PiiDetector::new(rules)?;
        gauge!(m::PII_RULES_LOADED).set(pii.rule_count() as f64);

        let registry = self
            .registry
            .unwrap_or_else(|| ProviderRegistry::from_config(&self.config));

        debug!(
            providers = registry.len(),
            rules = pii.rule_count(),
            retain_lineage = self.config.retain_lineage,
            "dspm scanner built"
        );

        Ok(DspmScanner {
            config: self.config,
            registry,
            misconfig: MisconfigurationDetector::new(),
            pii,
            assessor: RiskAssessor::new(),
            lineage: LineageGraph::new(),
            scans_completed: 0,
        })
    }
}

impl Default for DspmScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
