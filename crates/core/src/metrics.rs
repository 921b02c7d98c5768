//! 메트릭 상수 및 설명 등록
//!
//! 스캔 파이프라인의 메트릭 이름과 설명을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! 레코더가 설치되지 않으면 매크로 호출은 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `dspm_`
//! - 단계명: `scan_`, `misconfig_`, `pii_`, `lineage_`, `risk_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(dspm_core::metrics::SCAN_ASSETS_DISCOVERED_TOTAL, "provider" => "aws").increment(2);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 프로바이더 레이블 키 (aws, azure, gcp)
pub const LABEL_PROVIDER: &str = "provider";

/// 심각도 레이블 키 (low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// PII 규칙 레이블 키
pub const LABEL_RULE: &str = "rule";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 스캔 메트릭 ───────────────────────────────────────────────────

/// 완료된 스캔 수 (counter, label: result)
pub const SCAN_RUNS_TOTAL: &str = "dspm_scan_runs_total";

/// 발견된 스토리지 자산 수 (counter, label: provider)
pub const SCAN_ASSETS_DISCOVERED_TOTAL: &str = "dspm_scan_assets_discovered_total";

/// 스캔 소요 시간 (histogram, 초)
pub const SCAN_DURATION_SECONDS: &str = "dspm_scan_duration_seconds";

// ─── 탐지 메트릭 ───────────────────────────────────────────────────

/// 설정 오류 finding 수 (counter, labels: provider, severity)
pub const MISCONFIG_FINDINGS_TOTAL: &str = "dspm_misconfig_findings_total";

/// PII 매치 수 (counter, labels: provider, rule)
pub const PII_MATCHES_TOTAL: &str = "dspm_pii_matches_total";

/// 로드된 PII 규칙 수 (gauge)
pub const PII_RULES_LOADED: &str = "dspm_pii_rules_loaded";

// ─── Lineage / Risk 메트릭 ─────────────────────────────────────────

/// lineage 그래프 노드 수 (gauge)
pub const LINEAGE_NODES: &str = "dspm_lineage_nodes";

/// lineage 그래프 엣지 수 (gauge)
pub const LINEAGE_EDGES: &str = "dspm_lineage_edges";

/// 마지막 스캔의 위험 점수 (gauge, 0-100)
pub const RISK_SCORE: &str = "dspm_risk_score";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(SCAN_RUNS_TOTAL, "Total number of DSPM scans executed");
    describe_counter!(
        SCAN_ASSETS_DISCOVERED_TOTAL,
        "Total number of storage assets discovered per provider"
    );
    describe_histogram!(
        SCAN_DURATION_SECONDS,
        "Time to complete a single DSPM scan in seconds"
    );

    describe_counter!(
        MISCONFIG_FINDINGS_TOTAL,
        "Total number of misconfiguration findings by provider and severity"
    );
    describe_counter!(
        PII_MATCHES_TOTAL,
        "Total number of PII matches by provider and rule"
    );
    describe_gauge!(PII_RULES_LOADED, "Number of PII rules currently compiled");

    describe_gauge!(LINEAGE_NODES, "Number of nodes in the lineage graph");
    describe_gauge!(LINEAGE_EDGES, "Number of edges in the lineage graph");
    describe_gauge!(RISK_SCORE, "Risk score of the most recent scan (0-100)");
}
