//! 자산 모델 -- 프로바이더 중립 스토리지 자산 표현
//!
//! [`StorageAsset`]은 버킷/컨테이너 하나의 보안 상태를 정규화한 값입니다.
//! 생성 후에는 변경되지 않으며, 모든 탐지기는 공유 참조로만 읽습니다.
//!
//! 느슨한 타입의 입력(JSON fixture 등)은 [`StorageAsset::from_value`]와
//! [`coerce_bool`]을 통해서만 변환됩니다.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use dspm_core::types::Provider;

/// 기본 접근 정책
pub const DEFAULT_POLICY: &str = "restricted";

/// 이름이 없는 원시 자산에 사용하는 이름
pub const UNKNOWN_ASSET_NAME: &str = "unknown";

/// 참으로 해석되는 문자열 토큰 (소문자 비교)
const TRUTHY_TOKENS: [&str; 5] = ["true", "yes", "1", "public", "allusers"];

/// 느슨한 타입의 값을 bool로 변환합니다.
///
/// - JSON bool: 그대로
/// - 문자열: `true`/`yes`/`1`/`public`/`allusers` (대소문자 무시)이면 true, 나머지 false
/// - 숫자: 0이 아니면 true
/// - null: false
/// - 배열/객체: 비어있지 않으면 true
///
/// 문자열은 공백을 제거하지 않습니다. `" true "`는 false입니다.
/// 키 자체가 없는 경우의 기본값은 호출자가 결정합니다.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => TRUTHY_TOKENS.contains(&s.to_lowercase().as_str()),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// 정규화된 스토리지 자산
///
/// 프로바이더 안에서 `name`이 식별자입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageAsset {
    name: String,
    provider: Provider,
    public: bool,
    encryption: Option<String>,
    versioning: bool,
    policy: String,
    region: Option<String>,
    tags: BTreeMap<String, String>,
    sample_content: Option<String>,
}

impl StorageAsset {
    /// 기본 보안 상태를 가진 자산을 생성합니다.
    ///
    /// 기본값: 비공개, 암호화 없음, 버저닝 활성, 정책 `restricted`.
    pub fn new(name: impl Into<String>, provider: Provider) -> Self {
        Self {
            name: name.into(),
            provider,
            public: false,
            encryption: None,
            versioning: true,
            policy: DEFAULT_POLICY.to_owned(),
            region: None,
            tags: BTreeMap::new(),
            sample_content: None,
        }
    }

    /// 공개 여부를 설정합니다.
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// 암호화 방식을 설정합니다. 대문자로 정규화되며, 빈 문자열은 미암호화로 취급합니다.
    pub fn with_encryption(mut self, encryption: impl AsRef<str>) -> Self {
        let encryption = encryption.as_ref();
        self.encryption = if encryption.is_empty() {
            None
        } else {
            Some(encryption.to_uppercase())
        };
        self
    }

    /// 버저닝 여부를 설정합니다.
    pub fn with_versioning(mut self, versioning: bool) -> Self {
        self.versioning = versioning;
        self
    }

    /// 접근 정책을 설정합니다. 빈 문자열이면 `restricted`를 유지합니다.
    ///
    /// 값은 그대로 저장되며, 비교 시 대소문자만 무시합니다.
    pub fn with_policy(mut self, policy: impl AsRef<str>) -> Self {
        let policy = policy.as_ref();
        self.policy = if policy.is_empty() {
            DEFAULT_POLICY.to_owned()
        } else {
            policy.to_owned()
        };
        self
    }

    /// 리전을 설정합니다.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// 태그 하나를 추가합니다.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// 샘플 콘텐츠를 설정합니다.
    pub fn with_sample_content(mut self, content: impl Into<String>) -> Self {
        self.sample_content = Some(content.into());
        self
    }

    /// 느슨한 타입의 JSON 객체에서 자산을 생성합니다.
    ///
    /// 객체가 아니면 `None`을 반환합니다. 누락된 필드는 기본값
    /// (name `unknown`, provider `aws`, public false, versioning true,
    /// policy `restricted`, tags 없음)을 사용합니다.
    /// 키가 있고 값이 null이면 기본값이 아니라 [`coerce_bool`] 결과(false)를 씁니다.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_map)
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let name = map
            .get("name")
            .and_then(value_to_string)
            .unwrap_or_else(|| UNKNOWN_ASSET_NAME.to_owned());

        let provider = map
            .get("provider")
            .and_then(Value::as_str)
            .and_then(Provider::from_str_loose)
            .unwrap_or(Provider::Aws);

        let mut asset = Self::new(name, provider)
            .with_public(map.get("public").is_some_and(coerce_bool))
            .with_versioning(map.get("versioning").is_none_or(coerce_bool));

        if let Some(encryption) = map.get("encryption").and_then(value_to_string) {
            asset = asset.with_encryption(encryption);
        }
        if let Some(policy) = map.get("policy").and_then(value_to_string) {
            asset = asset.with_policy(policy);
        }
        if let Some(region) = map.get("region").and_then(value_to_string) {
            asset = asset.with_region(region);
        }
        if let Some(content) = map.get("sample_content").and_then(value_to_string) {
            asset = asset.with_sample_content(content);
        }
        if let Some(Value::Object(tags)) = map.get("tags") {
            for (key, value) in tags {
                if let Some(value) = value_to_string(value) {
                    asset = asset.with_tag(key.clone(), value);
                }
            }
        }

        asset
    }

    /// 같은 자산을 다른 프로바이더 소속으로 복제합니다.
    pub(crate) fn reassigned_to(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// 대문자로 정규화된 암호화 방식 (`None`이면 미암호화)
    pub fn encryption(&self) -> Option<&str> {
        self.encryption.as_deref()
    }

    pub fn versioning(&self) -> bool {
        self.versioning
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// 태그 값을 조회합니다.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn sample_content(&self) -> Option<&str> {
        self.sample_content.as_deref()
    }
}

/// null은 `None`, 문자열은 그대로, 나머지 스칼라는 JSON 표기로 변환합니다.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 스캔 중 수집된 자산의 순서 있는 목록
///
/// 추가만 가능하며, 순서는 프로바이더 처리 순서 → 스캐너 방출 순서입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetInventory {
    assets: Vec<StorageAsset>,
}

impl AssetInventory {
    /// 빈 인벤토리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 자산 목록을 순서대로 추가합니다.
    pub fn extend(&mut self, assets: impl IntoIterator<Item = StorageAsset>) {
        self.assets.extend(assets);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StorageAsset> {
        self.assets.iter()
    }

    pub fn as_slice(&self) -> &[StorageAsset] {
        &self.assets
    }

    /// 특정 프로바이더의 자산만 순서대로 반환합니다.
    pub fn for_provider(&self, provider: Provider) -> impl Iterator<Item = &StorageAsset> {
        self.assets.iter().filter(move |a| a.provider() == provider)
    }
}

impl<'a> IntoIterator for &'a AssetInventory {
    type Item = &'a StorageAsset;
    type IntoIter = std::slice::Iter<'a, StorageAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
