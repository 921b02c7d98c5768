//! PII 규칙 정의 및 로딩
//!
//! 규칙 파일 형식은 `[{name, pattern, description}]` JSON 배열입니다.
//!
//! # 로딩 정책
//!
//! - 파일 없음: 내장 규칙 2개(Medicare, TFN)로 대체하고 경고 로그
//! - 빈 배열: 규칙 0개 (유효)
//! - 잘못된 JSON / 빈 규칙 이름: `EngineError::RuleLoad`
//!
//! 정규식 컴파일은 [`PiiDetector::new`](super::PiiDetector::new)에서 수행합니다.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;

/// 규칙 파일 최대 크기 (1 MB)
const MAX_RULES_FILE_SIZE: u64 = 1024 * 1024;

/// PII 탐지 규칙
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiRule {
    /// 규칙 이름 (finding의 `type`)
    pub name: String,
    /// 정규식 패턴 (대소문자 무시로 컴파일)
    pub pattern: String,
    /// 설명
    pub description: String,
}

impl PiiRule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            description: description.into(),
        }
    }
}

/// 규칙 집합의 출처
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// 규칙 파일
    File(String),
    /// 내장 기본 규칙
    BuiltIn,
    /// 코드에서 직접 구성
    Inline,
}

/// 검증된 불변 PII 규칙 집합
///
/// 순서가 곧 탐지 순서입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiiRuleSet {
    rules: Vec<PiiRule>,
    source: RuleSource,
}

impl PiiRuleSet {
    /// 규칙 목록으로 집합을 생성합니다.
    pub fn new(rules: Vec<PiiRule>) -> Self {
        Self {
            rules,
            source: RuleSource::Inline,
        }
    }

    /// 내장 기본 규칙 (Medicare, TFN)
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                PiiRule::new(
                    "Medicare",
                    r"\b\d{4} \d{5} \d\b",
                    "Australian Medicare number",
                ),
                PiiRule::new(
                    "TFN",
                    r"\b\d{3} \d{3} \d{3}\b",
                    "Australian Tax File Number",
                ),
            ],
            source: RuleSource::BuiltIn,
        }
    }

    pub fn rules(&self) -> &[PiiRule] {
        &self.rules
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PiiRuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 규칙 파일 로더
pub struct PiiRuleLoader;

impl PiiRuleLoader {
    /// 파일에서 규칙을 비동기로 로드합니다.
    ///
    /// 파일이 없으면 내장 규칙을 반환합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<PiiRuleSet, EngineError> {
        Self::read(path.as_ref(), true).await
    }

    /// 내장 규칙으로 대체하지 않고 파일을 로드합니다.
    ///
    /// 파일이 없으면 `RuleLoad`입니다. 크기 제한은 [`load`](Self::load)와 같습니다.
    pub async fn load_strict(path: impl AsRef<Path>) -> Result<PiiRuleSet, EngineError> {
        Self::read(path.as_ref(), false).await
    }

    async fn read(path: &Path, builtin_when_missing: bool) -> Result<PiiRuleSet, EngineError> {
        let path_str = path.display().to_string();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if builtin_when_missing && e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path_str, "PII rules file not found; using minimal defaults");
                return Ok(PiiRuleSet::builtin());
            }
            Err(e) => {
                return Err(EngineError::RuleLoad {
                    path: path_str,
                    reason: e.to_string(),
                });
            }
        };

        if metadata.len() > MAX_RULES_FILE_SIZE {
            return Err(EngineError::RuleLoad {
                path: path_str,
                reason: format!(
                    "file size {} bytes exceeds maximum {} bytes",
                    metadata.len(),
                    MAX_RULES_FILE_SIZE
                ),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EngineError::RuleLoad {
                path: path_str.clone(),
                reason: e.to_string(),
            })?;

        let rule_set = Self::parse(&content, &path_str)?;
        info!(path = %path_str, rules = rule_set.len(), "loaded PII rules");
        Ok(rule_set)
    }

    /// JSON 문자열에서 규칙을 파싱합니다.
    ///
    /// `origin`은 에러 메시지와 출처 표시에 사용됩니다.
    pub fn parse(json: &str, origin: &str) -> Result<PiiRuleSet, EngineError> {
        let rules: Vec<PiiRule> = serde_json::from_str(json).map_err(|e| EngineError::RuleLoad {
            path: origin.to_owned(),
            reason: format!("invalid rule JSON: {e}"),
        })?;

        if let Some(index) = rules.iter().position(|r| r.name.trim().is_empty()) {
            return Err(EngineError::RuleLoad {
                path: origin.to_owned(),
                reason: format!("rule {index} has an empty name"),
            });
        }

        Ok(PiiRuleSet {
            rules,
            source: RuleSource::File(origin.to_owned()),
        })
    }
}
