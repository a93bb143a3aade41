//! Property-based tests for the relationship graph, the catalog and the
//! recommender.
//!
//! 1. Vertex insertion is idempotent
//! 2. Outgoing and incoming views agree
//! 3. Removing a vertex leaves no trace and touches nothing else
//! 4. Distance matches the returned path and is minimal
//! 5. Play ingestion counts every repeated pair
//! 6. Similar-item lists are bounded and ordered
//! 7. Auto-play lists have the requested length

use proptest::prelude::*;
use segue::{Catalog, ItemKey, ItemRecord, RelationGraph, Recommender, MAX_RECOMMENDATIONS};
use std::collections::BTreeMap;

const VERTICES: usize = 7;

// ============================================================================
// Strategies
// ============================================================================

fn key(index: usize) -> ItemKey {
    ItemKey::new(format!("k{index:02}"))
}

/// Edges between the fixed vertex set, positive weights.
fn edge_strategy() -> impl Strategy<Value = Vec<(usize, usize, u32)>> {
    prop::collection::vec((0..VERTICES, 0..VERTICES, 1u32..20), 0..30)
}

/// Play sessions over the fixed vertex set.
fn sessions_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..VERTICES, 0..8), 0..6)
}

fn graph_with(edges: &[(usize, usize, u32)]) -> (RelationGraph, BTreeMap<(usize, usize), u32>) {
    let mut graph = RelationGraph::new();
    for index in 0..VERTICES {
        graph.insert_vertex(key(index), ItemRecord::new(format!("k{index:02}.mp3")).unwrap());
    }
    let mut expected = BTreeMap::new();
    for &(from, to, weight) in edges {
        graph.insert_edge(&key(from), &key(to), weight).unwrap();
        expected.insert((from, to), weight);
    }
    (graph, expected)
}

fn catalog_with(sessions: &[Vec<usize>]) -> Catalog {
    let mut catalog = Catalog::new("/media");
    for index in 0..VERTICES {
        catalog.add_item(key(index), &format!("k{index:02}.mp3")).unwrap();
    }
    for session in sessions {
        let keys: Vec<ItemKey> = session.iter().map(|&index| key(index)).collect();
        catalog.ingest_play_sequence(&keys);
    }
    catalog
}

/// All-pairs lightest path weights by Floyd-Warshall.
fn lightest_weights(catalog: &Catalog) -> Vec<Vec<Option<u64>>> {
    let graph = catalog.graph();
    let mut dist = vec![vec![None; VERTICES]; VERTICES];
    for (from, row) in dist.iter_mut().enumerate() {
        row[from] = Some(0);
        for (to, cell) in row.iter_mut().enumerate() {
            if from != to {
                if let Some(weight) = graph.edge_weight(&key(from), &key(to)) {
                    *cell = Some(u64::from(weight));
                }
            }
        }
    }
    for via in 0..VERTICES {
        for from in 0..VERTICES {
            for to in 0..VERTICES {
                if let (Some(a), Some(b)) = (dist[from][via], dist[via][to]) {
                    if dist[from][to].map_or(true, |current| a + b < current) {
                        dist[from][to] = Some(a + b);
                    }
                }
            }
        }
    }
    dist
}

// ============================================================================
// Graph Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn insert_vertex_is_idempotent(edges in edge_strategy(), index in 0..VERTICES) {
        let (mut graph, _) = graph_with(&edges);
        let before = graph.len();

        let other = ItemRecord::new("someone-else.mp3").unwrap();
        let stored = graph.insert_vertex(key(index), other).clone();

        prop_assert_eq!(graph.len(), before);
        prop_assert_eq!(stored.filename(), format!("k{index:02}.mp3"));
        prop_assert_eq!(graph.get(&key(index)).unwrap().filename(), stored.filename());
    }

    #[test]
    fn edge_views_agree(edges in edge_strategy()) {
        let (graph, expected) = graph_with(&edges);

        prop_assert_eq!(graph.edge_count(), expected.len());
        for (&(from, to), &weight) in &expected {
            prop_assert!(graph.has_edge(&key(from), &key(to)));
            prop_assert_eq!(graph.edge_weight(&key(from), &key(to)), Some(weight));
            prop_assert_eq!(graph.incoming_weight(&key(from), &key(to)), Some(weight));
        }
    }

    #[test]
    fn remove_vertex_leaves_no_trace(edges in edge_strategy(), victim in 0..VERTICES) {
        let (mut graph, expected) = graph_with(&edges);
        let gone = key(victim);

        graph.remove_vertex(&gone).unwrap();

        prop_assert!(!graph.contains(&gone));
        prop_assert!(graph.out_degree_weight(&gone).is_err());
        prop_assert!(graph.in_degree_weight(&gone).is_err());
        for index in 0..VERTICES {
            prop_assert!(!graph.has_edge(&gone, &key(index)));
            prop_assert!(!graph.has_edge(&key(index), &gone));
            prop_assert_eq!(graph.incoming_weight(&key(index), &gone), None);
        }
        for (&(from, to), &weight) in &expected {
            if from != victim && to != victim {
                prop_assert_eq!(graph.edge_weight(&key(from), &key(to)), Some(weight));
            }
        }
    }
}

// ============================================================================
// Catalog Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_matches_route(sessions in sessions_strategy()) {
        let catalog = catalog_with(&sessions);
        let lightest = lightest_weights(&catalog);

        for from in 0..VERTICES {
            for to in 0..VERTICES {
                if from == to {
                    continue;
                }
                let (hops, weight) = catalog.distance(&key(from), &key(to));
                match catalog.route(&key(from), &key(to)) {
                    Some(route) => {
                        prop_assert_eq!(hops, route.len() - 1);
                        let along: u64 = route
                            .windows(2)
                            .map(|pair| u64::from(catalog.graph().edge_weight(&pair[0], &pair[1]).unwrap()))
                            .sum();
                        prop_assert_eq!(weight, along);
                        prop_assert_eq!(Some(weight), lightest[from][to]);
                    }
                    None => {
                        prop_assert_eq!((hops, weight), (0, 0));
                        prop_assert_eq!(lightest[from][to], None);
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_pairs_accumulate(runs in prop::collection::vec(1usize..4, 1..5)) {
        let mut catalog = catalog_with(&[]);
        let (a, b) = (key(0), key(1));

        let mut total = 0;
        for repeats in &runs {
            let sequence: Vec<ItemKey> = (0..*repeats)
                .flat_map(|_| [a.clone(), b.clone(), key(2)])
                .collect();
            catalog.ingest_play_sequence(&sequence);
            total += repeats;
        }

        prop_assert_eq!(catalog.graph().edge_weight(&a, &b), Some(total as u32));
    }
}

// ============================================================================
// Recommender Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn similar_items_are_bounded_and_ordered(
        sessions in sessions_strategy(),
        index in 0..VERTICES,
        count in 0usize..40,
    ) {
        let catalog = catalog_with(&sessions);
        let engine = Recommender::new(&catalog);
        let subject = key(index);

        let similar = engine.similar_items(&subject, count);

        prop_assert!(similar.len() <= count.min(MAX_RECOMMENDATIONS));
        prop_assert!(!similar.contains(&subject));
        for pair in similar.windows(2) {
            let first = engine.similarity(&subject, &pair[0]);
            let second = engine.similarity(&subject, &pair[1]);
            prop_assert!(first > second || (first == second && pair[0] < pair[1]));
        }
    }

    #[test]
    fn auto_play_has_requested_length(sessions in sessions_strategy(), length in 0usize..30) {
        let catalog = catalog_with(&sessions);
        let list = Recommender::new(&catalog).auto_play(length);

        prop_assert_eq!(list.len(), length);
        let chosen: Vec<&ItemKey> = list.iter().flatten().collect();
        let mut unique = chosen.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), chosen.len());
    }
}

#[test]
fn ingest_alternating_pairs_creates_two_edges() {
    let mut catalog = catalog_with(&[]);
    let (a, b) = (key(0), key(1));

    catalog.ingest_play_sequence(&[a.clone(), b.clone(), a.clone(), b.clone()]);

    // (a, b) twice, (b, a) once.
    assert_eq!(catalog.graph().edge_weight(&a, &b), Some(2));
    assert_eq!(catalog.graph().edge_weight(&b, &a), Some(1));
    assert_eq!(catalog.graph().edge_count(), 2);
}
