use log::debug;
use ndarray::{s, Array2};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{GraphError, Result};
use crate::product::Product;

/// Stable handle of an original vertex; doubles as the identity of the
/// super-vertex that currently contains it after contractions.
pub type VertexId = usize;

/// Stable handle into the edge arena. Handles are never reused, so a handle
/// held across a merge still names the same edge after its endpoint has been
/// rewritten.
pub type EdgeId = usize;

/// Minimum edge density `2·|E| / (N·(N−1))` a generated graph must reach
/// before generation is considered done.
pub const DENSITY_THRESHOLD: f64 = 0.7;

/// An undirected edge between two super-vertices.
///
/// Endpoints always name *current* super-vertices: a merge rewrites the
/// absorbed endpoint in place, and every holder of the [`EdgeId`] observes
/// the rewrite. An edge never survives with both endpoints equal; merges
/// discard would-be self-loops instead of re-adding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    a: VertexId,
    b: VertexId,
}

impl Edge {
    fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.a, self.b)
    }

    /// Returns the endpoint opposite to `v`.
    pub fn opposite(&self, v: VertexId) -> VertexId {
        if v == self.a {
            self.b
        } else {
            self.a
        }
    }

    fn replace_end(&mut self, from: VertexId, to: VertexId) {
        if self.a == from {
            self.a = to;
        } else if self.b == from {
            self.b = to;
        }
    }
}

/// Set of live edge handles with O(1) insert, removal, and uniform random
/// selection (dense vec for indexing, position map for removal).
#[derive(Debug, Clone, Default)]
struct EdgeSet {
    order: Vec<EdgeId>,
    index: HashMap<EdgeId, usize>,
}

impl EdgeSet {
    fn insert(&mut self, id: EdgeId) {
        if self.index.contains_key(&id) {
            return;
        }
        self.index.insert(id, self.order.len());
        self.order.push(id);
    }

    fn remove(&mut self, id: EdgeId) {
        if let Some(pos) = self.index.remove(&id) {
            self.order.swap_remove(pos);
            if let Some(&moved) = self.order.get(pos) {
                self.index.insert(moved, pos);
            }
        }
    }

    fn pick<R: Rng>(&self, rng: &mut R) -> Option<EdgeId> {
        if self.order.is_empty() {
            None
        } else {
            Some(self.order[rng.gen_range(0..self.order.len())])
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    fn iter(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.order.iter().copied()
    }
}

/// A mutable undirected multigraph over synthetic products.
///
/// The graph owns four views of its state:
/// - the product payloads, keyed by original [`VertexId`];
/// - a symmetric connectivity matrix recording which original pairs were
///   linked at generation time (diagonal always true, never touched after
///   generation succeeds);
/// - per-super-vertex incident edge sets plus the global live-edge set,
///   which all store [`EdgeId`] handles into one edge arena;
/// - the grouping map from each live super-vertex to the ordered list of
///   original vertices it contains (itself included), so the groups
///   partition the original vertex set at every point of a contraction.
///
/// Randomness is always injected per call; the graph holds no RNG state and
/// replays exactly under a seeded generator.
#[derive(Debug, Clone)]
pub struct MultiGraph {
    products: BTreeMap<VertexId, Product>,
    matrix: Array2<bool>,
    // Ordered maps keep edge migration and reporting deterministic, which is
    // what makes a seeded run replayable.
    incident: BTreeMap<VertexId, BTreeSet<EdgeId>>,
    groups: BTreeMap<VertexId, Vec<VertexId>>,
    edges: Vec<Edge>,
    live: EdgeSet,
}

impl MultiGraph {
    /// Creates an empty graph for `n` vertices. Products and edges are
    /// created by [`fill`](Self::fill) (or supplied via
    /// [`from_edges`](Self::from_edges)).
    pub fn new(n: usize) -> Self {
        Self {
            products: BTreeMap::new(),
            matrix: Array2::from_elem((n, n), false),
            incident: BTreeMap::new(),
            groups: BTreeMap::new(),
            edges: Vec::new(),
            live: EdgeSet::default(),
        }
    }

    /// Builds a graph directly from an explicit edge list, bypassing random
    /// generation. Vertices get placeholder products. Parallel edges are
    /// allowed; self-loops and out-of-range endpoints are not.
    ///
    /// # Returns
    /// * `Ok(graph)` - The populated graph
    /// * `Err(GraphError::InvalidInput)` - On a self-loop or an endpoint `>= n`
    pub fn from_edges(n: usize, edges: &[(VertexId, VertexId)]) -> Result<Self> {
        let mut graph = Self::new(n);
        for i in 0..n {
            graph
                .products
                .insert(i, Product::new(format!("product-{i}"), 1, 0.0));
            graph.incident.insert(i, BTreeSet::new());
            graph.groups.insert(i, vec![i]);
            graph.matrix[(i, i)] = true;
        }
        for &(a, b) in edges {
            if a >= n || b >= n {
                return Err(GraphError::invalid_input(format!(
                    "edge ({a}, {b}) is out of range for {n} vertices"
                )));
            }
            if a == b {
                return Err(GraphError::invalid_input(format!(
                    "self-loop ({a}, {b}) is not allowed"
                )));
            }
            graph.matrix[(a, b)] = true;
            graph.matrix[(b, a)] = true;
            graph.add_edge(a, b);
        }
        Ok(graph)
    }

    /// Number of original vertices (grows only via
    /// [`add_product`](Self::add_product)).
    pub fn vertex_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of live super-vertices.
    pub fn super_vertex_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.live.len()
    }

    /// Whether original vertices `i` and `j` were linked at generation time.
    /// Symmetric, and true on the diagonal.
    pub fn linked(&self, i: VertexId, j: VertexId) -> bool {
        self.matrix[(i, j)]
    }

    /// Current edge density `2·|E| / (N·(N−1))`. Graphs with fewer than two
    /// vertices are trivially dense (1.0); the denominator is never zero.
    pub fn density(&self) -> f64 {
        let n = self.vertex_count();
        if n < 2 {
            return 1.0;
        }
        (2 * self.live.len()) as f64 / ((n * (n - 1)) as f64)
    }

    /// Populates the graph: random products for every vertex, then repeated
    /// fair-coin edge passes until [`DENSITY_THRESHOLD`] is reached.
    ///
    /// Each pass flips one coin per unordered pair `i < j`; a linked pair
    /// yields one edge in both incident sets and the global set, plus a
    /// symmetric matrix write. A pass that falls short of the threshold is
    /// discarded wholesale before the next one starts. The retry loop is
    /// unbounded; see [`fill_bounded`](Self::fill_bounded) for a capped
    /// variant. With fewer than two vertices there is nothing to link and
    /// the graph is trivially dense.
    pub fn fill<R: Rng>(&mut self, rng: &mut R) {
        self.reset_vertices(rng);
        if self.vertex_count() < 2 {
            return;
        }
        let mut attempts = 1usize;
        while !self.density_pass(rng) {
            attempts += 1;
        }
        debug!(
            "generated {} edges over {} vertices (density {:.3}) in {attempts} attempts",
            self.edge_count(),
            self.vertex_count(),
            self.density()
        );
    }

    /// Like [`fill`](Self::fill), but gives up after `max_attempts` failed
    /// density passes. On failure no edges are left behind.
    ///
    /// # Returns
    /// * `Ok(())` - The density threshold was reached
    /// * `Err(GraphError::DensityNotReached)` - The cap was exhausted first
    pub fn fill_bounded<R: Rng>(&mut self, rng: &mut R, max_attempts: usize) -> Result<()> {
        self.reset_vertices(rng);
        if self.vertex_count() < 2 {
            return Ok(());
        }
        for _ in 0..max_attempts {
            if self.density_pass(rng) {
                return Ok(());
            }
        }
        Err(GraphError::DensityNotReached {
            attempts: max_attempts,
        })
    }

    /// Appends one vertex with the given payload after construction. The
    /// matrix grows symmetrically (diagonal entry true), and the vertex gets
    /// an empty incident set and a singleton group. No edges are created for
    /// it; generation is not re-run.
    pub fn add_product(&mut self, product: Product) -> VertexId {
        let id = self.vertex_count();
        let grown = id + 1;
        let mut matrix = Array2::from_elem((grown, grown), false);
        matrix.slice_mut(s![..id, ..id]).assign(&self.matrix);
        matrix[(id, id)] = true;
        self.matrix = matrix;
        self.products.insert(id, product);
        self.incident.insert(id, BTreeSet::new());
        self.groups.insert(id, vec![id]);
        id
    }

    /// Selects a live edge uniformly at random.
    ///
    /// # Returns
    /// * `Ok(edge)` - A handle valid until the edge is cut or merged away
    /// * `Err(GraphError::EmptyEdgeSet)` - No live edges to choose from
    pub fn random_edge<R: Rng>(&self, rng: &mut R) -> Result<EdgeId> {
        self.live.pick(rng).ok_or(GraphError::EmptyEdgeSet)
    }

    /// Reads an edge from the arena. The handle must have been obtained from
    /// this graph.
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id]
    }

    /// Removes an edge from the live set and from both endpoints' incident
    /// sets. The arena entry is retired, not reused.
    pub fn cut(&mut self, id: EdgeId) {
        let edge = self.edges[id];
        self.live.remove(id);
        if let Some(set) = self.incident.get_mut(&edge.a) {
            set.remove(&id);
        }
        if let Some(set) = self.incident.get_mut(&edge.b) {
            set.remove(&id);
        }
    }

    /// Merges super-vertex `absorbed` into `kept`.
    ///
    /// `kept`'s group gains `absorbed` and everything it had previously
    /// absorbed, and `absorbed` disappears from the registry. Every edge
    /// still incident to `absorbed` has that endpoint rewritten to `kept`
    /// and stays in the far endpoint's incident set and the live set,
    /// except edges whose far endpoint *is* `kept`, which would become
    /// self-loops and are discarded for good.
    ///
    /// Both arguments must be distinct live super-vertices; typically this
    /// is called through [`contract_random_edge`](Self::contract_random_edge).
    pub fn merge(&mut self, kept: VertexId, absorbed: VertexId) {
        let members = self.groups.remove(&absorbed).unwrap_or_default();
        if let Some(group) = self.groups.get_mut(&kept) {
            group.extend(members);
        }
        let migrating: Vec<EdgeId> = self
            .incident
            .remove(&absorbed)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for id in migrating {
            self.live.remove(id);
            let far = self.edges[id].opposite(absorbed);
            if far == kept {
                // Self-loop after the rewrite; drop it instead of re-adding.
                if let Some(set) = self.incident.get_mut(&kept) {
                    set.remove(&id);
                }
                continue;
            }
            self.edges[id].replace_end(absorbed, kept);
            if let Some(set) = self.incident.get_mut(&kept) {
                set.insert(id);
            }
            if let Some(set) = self.incident.get_mut(&far) {
                set.insert(id);
            }
            self.live.insert(id);
        }
        debug!(
            "merged super-vertex {absorbed} into {kept}; {} super-vertices, {} edges remain",
            self.super_vertex_count(),
            self.edge_count()
        );
    }

    /// Performs one contraction step: pick a uniform random live edge, cut
    /// it, and merge its second endpoint into its first.
    ///
    /// # Returns
    /// * `Ok((kept, absorbed))` - The surviving and absorbed super-vertices
    /// * `Err(GraphError::EmptyEdgeSet)` - The live edge set was empty
    pub fn contract_random_edge<R: Rng>(&mut self, rng: &mut R) -> Result<(VertexId, VertexId)> {
        let id = self.random_edge(rng)?;
        let (kept, absorbed) = self.edges[id].endpoints();
        self.cut(id);
        self.merge(kept, absorbed);
        Ok((kept, absorbed))
    }

    /// Payload of an original vertex, if the graph has been populated.
    pub fn product(&self, id: VertexId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Resolves a vertex id from its payload by linear scan. Adequate for
    /// the expected graph sizes; not indexed on purpose.
    pub fn vertex_id(&self, product: &Product) -> Option<VertexId> {
        self.products
            .iter()
            .find(|(_, candidate)| *candidate == product)
            .map(|(&id, _)| id)
    }

    /// Resolves a super-vertex key from its exact member list by linear scan.
    pub fn group_key(&self, members: &[VertexId]) -> Option<VertexId> {
        self.groups
            .iter()
            .find(|(_, group)| group.as_slice() == members)
            .map(|(&id, _)| id)
    }

    /// Member list of a live super-vertex (the key itself included).
    pub fn group(&self, id: VertexId) -> Option<&[VertexId]> {
        self.groups.get(&id).map(Vec::as_slice)
    }

    /// Iterates over all live super-vertices and their member lists.
    pub fn groups(&self) -> impl Iterator<Item = (VertexId, &[VertexId])> {
        self.groups.iter().map(|(&id, group)| (id, group.as_slice()))
    }

    /// Iterates over the edges incident to a live super-vertex.
    pub fn incident_edges(&self, id: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incident.get(&id).into_iter().flatten().copied()
    }

    /// Iterates over all live edges.
    pub fn live_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.live.iter()
    }

    fn reset_vertices<R: Rng>(&mut self, rng: &mut R) {
        let n = self.vertex_count();
        self.products.clear();
        self.incident.clear();
        self.groups.clear();
        self.edges.clear();
        self.live.clear();
        for i in 0..n {
            self.products.insert(i, Product::random(rng));
            self.incident.insert(i, BTreeSet::new());
            self.groups.insert(i, vec![i]);
            self.matrix[(i, i)] = true;
        }
    }

    /// One full fair-coin pass over all unordered pairs. Returns whether the
    /// resulting graph met the density threshold; if not, the pass's edges
    /// are discarded so nothing leaks into the next attempt.
    fn density_pass<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.vertex_count();
        for i in 0..n {
            for j in (i + 1)..n {
                let buy = rng.gen_bool(0.5);
                self.matrix[(i, j)] = buy;
                self.matrix[(j, i)] = buy;
                if buy {
                    self.add_edge(i, j);
                }
            }
        }
        if self.density() >= DENSITY_THRESHOLD {
            true
        } else {
            self.discard_edges();
            false
        }
    }

    fn add_edge(&mut self, a: VertexId, b: VertexId) {
        let id = self.edges.len();
        self.edges.push(Edge::new(a, b));
        self.incident.entry(a).or_default().insert(id);
        self.incident.entry(b).or_default().insert(id);
        self.live.insert(id);
    }

    fn discard_edges(&mut self) {
        self.live.clear();
        self.edges.clear();
        for set in self.incident.values_mut() {
            set.clear();
        }
    }
}
