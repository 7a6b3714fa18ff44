//! Randomized minimum cut estimation over generated co-purchase multigraphs.
//!
//! The crate builds a random undirected multigraph over synthetic products,
//! retrying generation until the edge density `2·|E| / (N·(N−1))` reaches a
//! fixed threshold, and estimates the minimum cut with Karger's contraction
//! algorithm: repeatedly cut a uniform random edge and merge its endpoints
//! until two super-vertices remain, then count the edges between them.
//!
//! A single trial yields a probabilistic upper bound on the true minimum
//! cut; [`karger::min_cut_trials`] amplifies confidence over independent
//! trials. All randomness is injected as a [`rand::Rng`], so seeded runs
//! replay exactly.
//!
//! ```
//! use copurchase_mincut::{karger, MultiGraph};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut graph = MultiGraph::new(8);
//! graph.fill(&mut rng);
//! let cut = karger::min_cut(&mut graph, &mut rng).unwrap();
//! assert!(cut >= 1);
//! ```

pub mod error;
pub mod karger;
pub mod multigraph;
pub mod product;
pub mod report;

pub use error::{GraphError, Result};
pub use karger::{min_cut, min_cut_trials};
pub use multigraph::{Edge, EdgeId, MultiGraph, VertexId, DENSITY_THRESHOLD};
pub use product::Product;
