//! Smoke tests for fob-build-graph.
//!
//! Fast, deterministic checks of the behaviour pipeline stages rely on. For
//! randomized coverage see property_tests.rs.

use std::io::Write;

use crate::{
    ContentGraph, EdgeFilter, EdgeType, Graph, GraphConfig, GraphError, MutationBatch, NodeId,
    TraversalActions,
};

const T1: EdgeType = EdgeType::new(1);
const T2: EdgeType = EdgeType::new(2);

#[test]
fn test_three_node_scenario() {
    let mut graph = Graph::new();
    let a = graph.add_node("A").unwrap();
    let b = graph.add_node("B").unwrap();
    let c = graph.add_node("C").unwrap();
    graph.add_edge(a, b, T1).unwrap();
    graph.add_edge(b, c, T1).unwrap();
    graph.add_edge(a, c, T2).unwrap();

    assert_eq!(graph.topo_sort(T1).unwrap(), vec![a, b, c]);
    assert_eq!(graph.get_node_ids_connected_from(a, T1), vec![b]);

    graph.remove_edge(a, b, T1).unwrap();
    assert!(!graph.has_edge(a, b, T1));
    assert!(graph.has_edge(a, c, T2));
}

#[test]
fn test_second_insert_reports_existing_edge() {
    let mut graph = Graph::new();
    let a = graph.add_node(()).unwrap();
    let b = graph.add_node(()).unwrap();

    assert!(graph.add_edge(a, b, T1).unwrap());
    assert!(!graph.add_edge(a, b, T1).unwrap());
    assert!(graph.has_edge(a, b, T1));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_removal_leaves_no_dangling_edges() {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..6).map(|i| graph.add_node(i).unwrap()).collect();
    for &from in &ids {
        for &to in &ids {
            if from != to {
                graph.add_edge(from, to, T1).unwrap();
                graph.add_edge(from, to, T2).unwrap();
            }
        }
    }

    let victim = ids[2];
    graph.remove_node(victim).unwrap();

    assert!(graph.get_node(victim).is_none());
    for &other in &ids {
        assert!(!graph.has_edge(victim, other, EdgeFilter::All));
        assert!(!graph.has_edge(other, victim, EdgeFilter::All));
    }
    assert!(graph.get_all_edges().all(|e| e.from != victim && e.to != victim));
    assert_eq!(graph.edge_count(), 5 * 4 * 2);
}

#[test]
fn test_handles_survive_growth_and_compaction() {
    let config = GraphConfig {
        initial_node_capacity: 2,
        initial_edge_capacity: 2,
        initial_bucket_count: 2,
        ..GraphConfig::default()
    };
    let mut graph = Graph::with_config(&config).unwrap();
    let ids: Vec<NodeId> = (0..500u32).map(|i| graph.add_node(i).unwrap()).collect();

    for window in ids.windows(2) {
        graph.add_edge(window[0], window[1], T1).unwrap();
    }
    // Churn: drop every other edge and re-add it under a new type.
    for window in ids.windows(2).step_by(2) {
        graph.remove_edge(window[0], window[1], T1).unwrap();
        graph.add_edge(window[0], window[1], T2).unwrap();
    }

    for (i, &id) in ids.iter().enumerate() {
        assert_eq!(graph.get_node(id), Some(&(i as u32)));
    }
    for (i, window) in ids.windows(2).enumerate() {
        let expected = if i % 2 == 0 { T2 } else { T1 };
        assert!(graph.has_edge(window[0], window[1], expected));
    }
    assert_eq!(graph.edge_count(), ids.len() - 1);
}

#[test]
fn test_stop_ends_traversal_immediately() {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..10).map(|i| graph.add_node(i).unwrap()).collect();
    for window in ids.windows(2) {
        graph.add_edge(window[0], window[1], T1).unwrap();
    }

    let mut visited = Vec::new();
    graph
        .traverse(
            |id, _: Option<&()>, actions: &mut TraversalActions| {
                visited.push(id);
                if visited.len() == 4 {
                    actions.stop();
                }
                None
            },
            Some(ids[0]),
            T1,
        )
        .unwrap();

    assert_eq!(visited, ids[..4].to_vec());
}

#[test]
fn test_cycle_is_reported_not_truncated() {
    let mut graph = Graph::new();
    let a = graph.add_node('a').unwrap();
    let b = graph.add_node('b').unwrap();
    graph.add_edge(a, b, T1).unwrap();
    graph.add_edge(b, a, T1).unwrap();

    assert_eq!(
        graph.topo_sort(T1),
        Err(GraphError::Cycle { nodes: vec![a, b] })
    );
}

#[test]
fn test_incremental_dependency_update() {
    // A file's imports are recomputed after an edit.
    let mut graph = ContentGraph::new();
    let index = graph.add_node_by_content_key("src/index.ts", 0).unwrap();
    let old: Vec<NodeId> = ["src/a.ts", "src/b.ts"]
        .iter()
        .map(|key| graph.add_node_by_content_key_if_needed(*key, 0).unwrap())
        .collect();
    graph.replace_node_ids_connected_to(index, &old, T1).unwrap();

    let c = graph.add_node_by_content_key_if_needed("src/c.ts", 0).unwrap();
    let b = graph.get_node_id_by_content_key("src/b.ts").unwrap();
    let delta = graph
        .replace_node_ids_connected_to(index, &[b, c], T1)
        .unwrap();

    assert_eq!(delta.added, vec![c]);
    assert_eq!(delta.removed, vec![old[0]]);
    assert_eq!(graph.get_node_ids_connected_from(index, T1), vec![b, c]);
}

#[test]
fn test_batches_from_workers_apply_in_order() {
    let mut graph: ContentGraph<String> = ContentGraph::new();

    let batches: Vec<MutationBatch<String>> = (0..3)
        .map(|worker| {
            let mut batch = MutationBatch::new();
            let key = format!("src/file{worker}.ts");
            batch.add_node("src/index.ts", "index".to_string());
            batch.add_node(key.clone(), format!("transformed {worker}"));
            batch.add_edge("src/index.ts", key, T1);
            batch
        })
        .collect();

    for batch in batches {
        graph.apply(batch).unwrap();
    }

    let index = graph.get_node_id_by_content_key("src/index.ts").unwrap();
    assert_eq!(graph.get_node_ids_connected_from(index, T1).len(), 3);
    assert_eq!(graph.node_count(), 4);
}

#[test]
fn test_cache_round_trip_through_file() {
    let mut graph = ContentGraph::new();
    let entry = graph.add_node_by_content_key("entry", "entry".to_string()).unwrap();
    let dep = graph.add_node_by_content_key("dep", "dep".to_string()).unwrap();
    graph.add_edge(entry, dep, T1).unwrap();
    graph.set_root_node_id(Some(entry)).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&graph.to_bytes().unwrap()).unwrap();
    file.flush().unwrap();

    let bytes = std::fs::read(file.path()).unwrap();
    let restored = ContentGraph::<String>::from_bytes(&bytes).unwrap();

    assert_eq!(restored.root_node_id(), Some(entry));
    assert_eq!(restored.get_node_id_by_content_key("dep"), Ok(dep));
    assert_eq!(restored.get_node_ids_connected_from(entry, T1), vec![dep]);
    assert_eq!(restored.content_key_for(entry), Some("entry"));
}

#[test]
fn test_stats_are_serializable() {
    let mut graph = Graph::new();
    let a = graph.add_node(()).unwrap();
    let b = graph.add_node(()).unwrap();
    graph.add_edge(a, b, T1).unwrap();

    let json = serde_json::to_value(graph.stats()).unwrap();
    assert_eq!(json["edges"], 1);
    assert_eq!(json["nodes"], 2);
}
