//! Weighted directed relationship graph.
//!
//! Each vertex holds one [`ItemRecord`]. Edges count how often the target was
//! played straight after the source. Both directions of every edge are stored:
//! `outgoing[u][v] == incoming[v][u]` holds after every public mutation, and
//! all edge writes go through one private helper to keep it so.

use crate::error::{GraphError, GraphResult};
use crate::item::{ItemKey, ItemRecord};
use log::trace;
use std::cmp::Reverse;
use std::collections::{btree_map, BTreeMap, BinaryHeap, HashMap, HashSet};

type Adjacency = BTreeMap<ItemKey, BTreeMap<ItemKey, u32>>;

/// Adjacency-map graph over item keys.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    vertices: BTreeMap<ItemKey, ItemRecord>,
    outgoing: Adjacency,
    incoming: Adjacency,
}

/// Lazy, restartable view over one vertex's `(neighbor, weight)` pairs.
///
/// Yields neighbors in ascending key order. Clone it to walk the edges again.
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    inner: btree_map::Iter<'a, ItemKey, u32>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = (&'a ItemKey, u32);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, &weight)| (key, weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Edges<'_> {}

impl RelationGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex. An existing key keeps its record and is returned
    /// unchanged.
    pub fn insert_vertex(&mut self, key: ItemKey, record: ItemRecord) -> &ItemRecord {
        self.outgoing.entry(key.clone()).or_default();
        self.incoming.entry(key.clone()).or_default();
        self.vertices.entry(key).or_insert(record)
    }

    /// Swap the record stored under an existing key.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn replace_record(&mut self, key: &ItemKey, record: ItemRecord) -> GraphResult<ItemRecord> {
        let slot = self
            .vertices
            .get_mut(key)
            .ok_or_else(|| GraphError::VertexNotFound(key.clone()))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Remove a vertex and every edge touching it, in either direction.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn remove_vertex(&mut self, key: &ItemKey) -> GraphResult<ItemRecord> {
        let record = self
            .vertices
            .remove(key)
            .ok_or_else(|| GraphError::VertexNotFound(key.clone()))?;

        for successor in self.outgoing.remove(key).unwrap_or_default().into_keys() {
            if let Some(edges) = self.incoming.get_mut(&successor) {
                edges.remove(key);
            }
        }
        for predecessor in self.incoming.remove(key).unwrap_or_default().into_keys() {
            if let Some(edges) = self.outgoing.get_mut(&predecessor) {
                edges.remove(key);
            }
        }

        Ok(record)
    }

    pub fn get(&self, key: &ItemKey) -> Option<&ItemRecord> {
        self.vertices.get(key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.vertices.contains_key(key)
    }

    /// Vertex keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> + '_ {
        self.vertices.keys()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(BTreeMap::len).sum()
    }

    /// Set the weight of `from -> to`, overwriting any previous weight.
    /// Weights are expected to be positive play counts.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if either endpoint is absent.
    pub fn insert_edge(&mut self, from: &ItemKey, to: &ItemKey, weight: u32) -> GraphResult<()> {
        self.require_vertex(from)?;
        self.require_vertex(to)?;
        self.write_edge(from, to, weight);
        Ok(())
    }

    /// Change the weight of an existing edge. Not an upsert.
    ///
    /// # Errors
    ///
    /// [`GraphError::EdgeNotFound`] if `from -> to` does not exist.
    pub fn update_edge_weight(&mut self, from: &ItemKey, to: &ItemKey, weight: u32) -> GraphResult<()> {
        if !self.has_edge(from, to) {
            return Err(GraphError::EdgeNotFound {
                from: from.clone(),
                to: to.clone(),
            });
        }
        self.write_edge(from, to, weight);
        Ok(())
    }

    fn write_edge(&mut self, from: &ItemKey, to: &ItemKey, weight: u32) {
        self.outgoing
            .entry(from.clone())
            .or_default()
            .insert(to.clone(), weight);
        self.incoming
            .entry(to.clone())
            .or_default()
            .insert(from.clone(), weight);
    }

    fn require_vertex(&self, key: &ItemKey) -> GraphResult<()> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(key.clone()))
        }
    }

    pub fn has_edge(&self, from: &ItemKey, to: &ItemKey) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Weight of `from -> to` read from the outgoing view.
    pub fn edge_weight(&self, from: &ItemKey, to: &ItemKey) -> Option<u32> {
        self.outgoing.get(from)?.get(to).copied()
    }

    /// Weight of `from -> to` read from the incoming view of `to`.
    pub fn incoming_weight(&self, from: &ItemKey, to: &ItemKey) -> Option<u32> {
        self.incoming.get(to)?.get(from).copied()
    }

    /// Sum of outgoing edge weights.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn out_degree_weight(&self, key: &ItemKey) -> GraphResult<u64> {
        Ok(self.edges_out(key)?.map(|(_, weight)| u64::from(weight)).sum())
    }

    /// Sum of incoming edge weights.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn in_degree_weight(&self, key: &ItemKey) -> GraphResult<u64> {
        Ok(self.edges_in(key)?.map(|(_, weight)| u64::from(weight)).sum())
    }

    /// Successors of `key` with edge weights.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn edges_out(&self, key: &ItemKey) -> GraphResult<Edges<'_>> {
        Self::edges(&self.outgoing, key)
    }

    /// Predecessors of `key` with edge weights.
    ///
    /// # Errors
    ///
    /// [`GraphError::VertexNotFound`] if the key is absent.
    pub fn edges_in(&self, key: &ItemKey) -> GraphResult<Edges<'_>> {
        Self::edges(&self.incoming, key)
    }

    fn edges<'a>(adjacency: &'a Adjacency, key: &ItemKey) -> GraphResult<Edges<'a>> {
        adjacency
            .get(key)
            .map(|edges| Edges { inner: edges.iter() })
            .ok_or_else(|| GraphError::VertexNotFound(key.clone()))
    }

    /// Minimum-weight path from `source` to `target`, both ends included.
    ///
    /// Single-pair Dijkstra that stops once `target` is settled. Among equal
    /// tentative distances the lowest key is settled first, and a predecessor
    /// is only replaced by a strictly shorter route, so results are
    /// reproducible. Returns `None` when either key is absent or `target` is
    /// unreachable; `Some(vec![source])` when they are equal.
    pub fn shortest_path(&self, source: &ItemKey, target: &ItemKey) -> Option<Vec<ItemKey>> {
        if !self.contains(source) || !self.contains(target) {
            return None;
        }

        let mut distance: HashMap<&ItemKey, u64> = HashMap::new();
        let mut previous: HashMap<&ItemKey, &ItemKey> = HashMap::new();
        let mut settled: HashSet<&ItemKey> = HashSet::new();
        let mut frontier = BinaryHeap::new();

        distance.insert(source, 0);
        frontier.push(Reverse((0_u64, source)));

        while let Some(Reverse((cost, node))) = frontier.pop() {
            if !settled.insert(node) {
                continue;
            }
            if node == target {
                trace!("Settled {target} at cost {cost} after {} vertices", settled.len());
                break;
            }

            for (next, &weight) in self.outgoing.get(node).into_iter().flatten() {
                if settled.contains(next) {
                    continue;
                }
                let candidate = cost + u64::from(weight);
                if distance.get(next).map_or(true, |&known| candidate < known) {
                    distance.insert(next, candidate);
                    previous.insert(next, node);
                    frontier.push(Reverse((candidate, next)));
                }
            }
        }

        if !settled.contains(target) {
            return None;
        }

        let mut path = vec![target.clone()];
        let mut current = target;
        while current != source {
            current = *previous.get(current)?;
            path.push(current.clone());
        }
        path.reverse();
        Some(path)
    }

    /// Sum of edge weights along consecutive keys of `path`; `None` if any
    /// step is not an edge.
    pub fn path_weight(&self, path: &[ItemKey]) -> Option<u64> {
        path.windows(2)
            .map(|pair| self.edge_weight(&pair[0], &pair[1]).map(u64::from))
            .sum()
    }
}
