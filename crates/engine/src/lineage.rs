//! Lineage 그래프 -- 프로바이더 내부 자산 간 복제 관계
//!
//! 노드 ID는 `"{provider}:{asset}"`이며, 같은 프로바이더의 노드들은
//! ID 오름차순으로 인접 쌍마다 `replication` 엣지가 연결됩니다.
//!
//! 그래프는 추가만 가능합니다. 노드와 엣지는 제거되지 않으며,
//! 같은 (source, target) 엣지는 한 번만 기록됩니다.
//! 노드/엣지 순회 순서는 삽입 순서로 결정적입니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use dspm_core::types::Provider;

use crate::asset::StorageAsset;

/// 엣지가 없을 때 Mermaid 출력에 사용하는 자리표시 노드
const MERMAID_EMPTY_PLACEHOLDER: &str = "    No_Lineage[/No lineage detected/]";

/// Lineage 노드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageNode {
    /// `"{provider}:{asset}"`
    pub id: String,
    /// 소속 프로바이더
    pub provider: Provider,
    /// 자산 리전
    pub region: Option<String>,
    /// 후속 노드 인덱스 (엣지 삽입 순서)
    successors: Vec<usize>,
}

/// JSON 내보내기 형식
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageExport {
    /// 노드 ID (삽입 순서)
    pub nodes: Vec<String>,
    /// `[source, target]` 쌍 (source 노드 삽입 순서 → 엣지 삽입 순서)
    pub edges: Vec<(String, String)>,
}

/// 방향 lineage 그래프
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    nodes: Vec<LineageNode>,
    index: HashMap<String, usize>,
    edge_count: usize,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 노드 ID를 생성합니다.
    pub fn node_id(provider: Provider, asset_name: &str) -> String {
        format!("{provider}:{asset_name}")
    }

    /// 자산을 노드로 추가하고 해당 프로바이더의 엣지 체인을 다시 연결합니다.
    ///
    /// 이미 있는 노드는 속성(provider, region)만 갱신합니다.
    pub fn add_provider_assets(&mut self, provider: Provider, assets: &[StorageAsset]) {
        for asset in assets {
            let id = Self::node_id(provider, asset.name());
            let region = asset.region().map(str::to_owned);
            match self.index.get(&id) {
                Some(&idx) => {
                    let node = &mut self.nodes[idx];
                    node.provider = provider;
                    node.region = region;
                }
                None => {
                    self.index.insert(id.clone(), self.nodes.len());
                    self.nodes.push(LineageNode {
                        id,
                        provider,
                        region,
                        successors: Vec::new(),
                    });
                }
            }
        }
        self.connect_provider(provider);
    }

    /// 프로바이더 소속 노드를 ID 오름차순으로 정렬하고 인접 쌍을 연결합니다.
    fn connect_provider(&mut self, provider: Provider) {
        let mut members: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.provider == provider)
            .map(|(idx, _)| idx)
            .collect();
        if members.len() < 2 {
            return;
        }
        members.sort_by(|a, b| self.nodes[*a].id.cmp(&self.nodes[*b].id));

        for pair in members.windows(2) {
            let (upstream, downstream) = (pair[0], pair[1]);
            let successors = &mut self.nodes[upstream].successors;
            if !successors.contains(&downstream) {
                successors.push(downstream);
                self.edge_count += 1;
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 노드를 ID로 조회합니다.
    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&s), Some(&t)) => self.nodes[s].successors.contains(&t),
            _ => false,
        }
    }

    /// 노드 목록 (삽입 순서)
    pub fn nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.nodes.iter()
    }

    /// 엣지 목록 (source 노드 삽입 순서 → 엣지 삽입 순서)
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(move |node| {
            node.successors
                .iter()
                .map(move |&t| (node.id.as_str(), self.nodes[t].id.as_str()))
        })
    }

    /// 모든 노드와 엣지를 제거합니다.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edge_count = 0;
    }

    /// JSON 내보내기 형식으로 변환합니다.
    pub fn to_json(&self) -> LineageExport {
        LineageExport {
            nodes: self.nodes.iter().map(|n| n.id.clone()).collect(),
            edges: self
                .edges()
                .map(|(s, t)| (s.to_owned(), t.to_owned()))
                .collect(),
        }
    }

    /// Mermaid flowchart 텍스트로 변환합니다.
    ///
    /// 노드 ID의 `:`는 `_`로 치환됩니다.
    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["flowchart LR".to_owned()];
        lines.extend(
            self.edges()
                .map(|(s, t)| format!("    {} --> {}", sanitize(s), sanitize(t))),
        );
        if lines.len() == 1 {
            lines.push(MERMAID_EMPTY_PLACEHOLDER.to_owned());
        }
        lines.join("\n")
    }
}

impl Serialize for LineageGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn sanitize(id: &str) -> String {
    id.replace(':', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(provider: Provider, names: &[&str]) -> Vec<StorageAsset> {
        names
            .iter()
            .map(|n| StorageAsset::new(*n, provider).with_region("ap-southeast-2"))
            .collect()
    }

    #[test]
    fn single_asset_has_no_edges() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["only"]));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn edges_follow_sorted_ids() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Gcp, &assets(Provider::Gcp, &["marketing", "backups"]));

        let export = graph.to_json();
        assert_eq!(export.nodes, vec!["gcp:marketing", "gcp:backups"]);
        assert_eq!(
            export.edges,
            vec![("gcp:backups".to_owned(), "gcp:marketing".to_owned())]
        );
    }

    #[test]
    fn providers_are_not_linked_to_each_other() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["a", "b"]));
        graph.add_provider_assets(Provider::Azure, &assets(Provider::Azure, &["c", "d"]));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge("aws:a", "aws:b"));
        assert!(graph.contains_edge("azure:c", "azure:d"));
        assert!(!graph.contains_edge("aws:b", "azure:c"));
    }

    #[test]
    fn overlapping_calls_create_no_duplicates() {
        let mut graph = LineageGraph::new();
        let batch = assets(Provider::Aws, &["a", "b"]);
        graph.add_provider_assets(Provider::Aws, &batch);
        graph.add_provider_assets(Provider::Aws, &batch);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn stale_edges_are_kept_when_chain_changes() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["a", "c"]));
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["b"]));

        // a->c는 유지되고 a->b, b->c가 추가됨
        assert!(graph.contains_edge("aws:a", "aws:c"));
        assert!(graph.contains_edge("aws:a", "aws:b"));
        assert!(graph.contains_edge("aws:b", "aws:c"));
        assert_eq!(graph.edge_count(), 3);

        let export = graph.to_json();
        assert_eq!(
            export.edges,
            vec![
                ("aws:a".to_owned(), "aws:c".to_owned()),
                ("aws:a".to_owned(), "aws:b".to_owned()),
                ("aws:b".to_owned(), "aws:c".to_owned()),
            ]
        );
    }

    #[test]
    fn readding_node_updates_region() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Azure, &[StorageAsset::new("x", Provider::Azure)]);
        assert_eq!(graph.node("azure:x").unwrap().region, None);

        graph.add_provider_assets(
            Provider::Azure,
            &[StorageAsset::new("x", Provider::Azure).with_region("australiaeast")],
        );
        assert_eq!(graph.node_count(), 1);
        assert_eq!(
            graph.node("azure:x").unwrap().region.as_deref(),
            Some("australiaeast")
        );
    }

    #[test]
    fn membership_uses_provider_attribute() {
        // "aws"로 시작하는 다른 프로바이더 자산명이 있어도 섞이지 않음
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Gcp, &assets(Provider::Gcp, &["aws-mirror", "z"]));
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["solo"]));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge("gcp:aws-mirror", "gcp:z"));
    }

    #[test]
    fn mermaid_output() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["b", "a"]));
        assert_eq!(graph.to_mermaid(), "flowchart LR\n    aws_a --> aws_b");
    }

    #[test]
    fn mermaid_placeholder_without_edges() {
        let graph = LineageGraph::new();
        assert_eq!(
            graph.to_mermaid(),
            "flowchart LR\n    No_Lineage[/No lineage detected/]"
        );
    }

    #[test]
    fn json_round_trip() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["a", "b", "c"]));
        let export = graph.to_json();
        let text = serde_json::to_string(&export).unwrap();
        let parsed: LineageExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, export);

        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["edges"][0][0], "aws:a");
        assert_eq!(value["edges"][0][1], "aws:b");
    }

    #[test]
    fn clear_resets_graph() {
        let mut graph = LineageGraph::new();
        graph.add_provider_assets(Provider::Aws, &assets(Provider::Aws, &["a", "b"]));
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node("aws:a").is_none());
    }
}
