//! PII 탐지 -- 정규식 규칙 기반 샘플 콘텐츠 스캔
//!
//! [`PiiDetector`]는 생성 시 [`PiiRuleSet`]의 모든 패턴을 대소문자 무시로 컴파일하며,
//! 이후에는 변경되지 않습니다.
//!
//! 자산마다 `provider://name/sample.txt` 위치의 샘플 콘텐츠를 규칙 순서대로 검사하고,
//! 겹치지 않는 매치마다 finding 하나를 생성합니다 (중복 제거 없음).

pub mod rules;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::info;

use dspm_core::types::Provider;

use crate::asset::StorageAsset;
use crate::error::EngineError;

use self::rules::{PiiRule, PiiRuleSet};

/// PII 매치 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PiiFinding {
    /// 매치된 규칙 이름
    #[serde(rename = "type")]
    pub kind: String,
    /// 매치된 원문 (마스킹하지 않음)
    pub sample: String,
    /// 샘플 위치 (`provider://name/sample.txt`)
    pub location: String,
    /// 프로바이더
    pub provider: Provider,
}

/// 컴파일된 규칙
#[derive(Debug)]
struct CompiledRule {
    rule: PiiRule,
    regex: Regex,
}

/// 정규식 기반 PII 탐지기
#[derive(Debug)]
pub struct PiiDetector {
    rules: Vec<CompiledRule>,
}

impl PiiDetector {
    /// 규칙 집합을 컴파일하여 탐지기를 생성합니다.
    ///
    /// # Errors
    ///
    /// 패턴이 유효한 정규식이 아니면 `EngineError::RuleCompile`
    pub fn new(rule_set: PiiRuleSet) -> Result<Self, EngineError> {
        let rules = rule_set
            .rules()
            .iter()
            .map(|rule| {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| EngineError::RuleCompile {
                        rule: rule.name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(CompiledRule {
                    rule: rule.clone(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self { rules })
    }

    /// 내장 기본 규칙으로 탐지기를 생성합니다.
    pub fn with_builtin_rules() -> Result<Self, EngineError> {
        Self::new(PiiRuleSet::builtin())
    }

    /// 자산의 샘플 콘텐츠에서 PII를 찾습니다.
    ///
    /// 결과 순서: 입력 자산 순서 → 규칙 순서 → 콘텐츠 내 매치 위치.
    pub fn scan(&self, provider: Provider, assets: &[StorageAsset]) -> Vec<PiiFinding> {
        let mut findings = Vec::new();
        for asset in assets {
            let location = sample_location(provider, asset.name());
            let content = asset.sample_content().unwrap_or_default();
            for compiled in &self.rules {
                findings.extend(compiled.regex.find_iter(content).map(|m| PiiFinding {
                    kind: compiled.rule.name.clone(),
                    sample: m.as_str().to_owned(),
                    location: location.clone(),
                    provider,
                }));
            }
        }
        info!(provider = %provider, count = findings.len(), "detected PII matches");
        findings
    }

    /// 설정된 규칙 목록 (탐지 순서)
    pub fn rules(&self) -> impl Iterator<Item = &PiiRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// 샘플 콘텐츠 위치 문자열
pub fn sample_location(provider: Provider, asset_name: &str) -> String {
    format!("{provider}://{asset_name}/sample.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_with(name: &str, content: &str) -> StorageAsset {
        StorageAsset::new(name, Provider::Aws).with_sample_content(content)
    }

    #[test]
    fn medicare_match_is_verbatim() {
        let detector = PiiDetector::with_builtin_rules().unwrap();
        let findings = detector.scan(Provider::Aws, &[asset_with("b", "Medicare: 1234 56789 1")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "Medicare");
        assert_eq!(findings[0].sample, "1234 56789 1");
        assert_eq!(findings[0].location, "aws://b/sample.txt");
        assert_eq!(findings[0].provider, Provider::Aws);
    }

    #[test]
    fn rule_order_then_match_order() {
        let detector = PiiDetector::with_builtin_rules().unwrap();
        let content = "TFN 111 222 333, Medicare 1234 56789 1, TFN 444 555 666";
        let findings = detector.scan(Provider::Gcp, &[asset_with("x", content)]);
        let got: Vec<(&str, &str)> = findings
            .iter()
            .map(|f| (f.kind.as_str(), f.sample.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Medicare", "1234 56789 1"),
                ("TFN", "111 222 333"),
                ("TFN", "444 555 666"),
            ]
        );
    }

    #[test]
    fn missing_content_scans_as_empty() {
        let detector = PiiDetector::with_builtin_rules().unwrap();
        let asset = StorageAsset::new("empty", Provider::Azure);
        assert!(detector.scan(Provider::Azure, &[asset]).is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = PiiRuleSet::new(vec![PiiRule::new("Secret", "secret-[a-z]+", "secret token")]);
        let detector = PiiDetector::new(rules).unwrap();
        let findings = detector.scan(Provider::Aws, &[asset_with("s", "SECRET-ABC and secret-def")]);
        let samples: Vec<&str> = findings.iter().map(|f| f.sample.as_str()).collect();
        assert_eq!(samples, vec!["SECRET-ABC", "secret-def"]);
    }

    #[test]
    fn no_deduplication_across_assets() {
        let detector = PiiDetector::with_builtin_rules().unwrap();
        let assets = [
            asset_with("a", "123 456 789"),
            asset_with("b", "123 456 789"),
        ];
        let findings = detector.scan(Provider::Aws, &assets);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].location, "aws://a/sample.txt");
        assert_eq!(findings[1].location, "aws://b/sample.txt");
    }

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let rules = PiiRuleSet::new(vec![PiiRule::new("Broken", "(unclosed", "bad")]);
        let err = PiiDetector::new(rules).unwrap_err();
        assert!(matches!(err, EngineError::RuleCompile { ref rule, .. } if rule == "Broken"));
    }

    #[test]
    fn empty_rule_set_finds_nothing() {
        let detector = PiiDetector::new(PiiRuleSet::new(Vec::new())).unwrap();
        let findings = detector.scan(Provider::Aws, &[asset_with("a", "1234 56789 1")]);
        assert!(findings.is_empty());
        assert_eq!(detector.rule_count(), 0);
    }

    #[test]
    fn finding_serializes_type_field() {
        let finding = PiiFinding {
            kind: "TFN".to_owned(),
            sample: "123 456 789".to_owned(),
            location: "gcp://x/sample.txt".to_owned(),
            provider: Provider::Gcp,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "TFN");
        assert!(json.get("kind").is_none());
    }
}
