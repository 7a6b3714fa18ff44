use log::debug;
use rand::Rng;

use crate::error::{GraphError, Result};
use crate::multigraph::MultiGraph;

/// Runs one trial of Karger's randomized contraction on the graph.
///
/// Uniformly random live edges are cut and their endpoints merged until only
/// two super-vertices remain; the edges still joining those two form the cut
/// estimate. A single trial yields an upper bound on the true minimum cut,
/// not an exact answer; use [`min_cut_trials`] to amplify the success
/// probability over independent trials.
///
/// # Arguments
/// * `graph` - A populated multigraph; consumed destructively (contract a
///   clone to keep the original)
/// * `rng` - Randomness source; seeded generators replay exactly
///
/// # Returns
/// * `Ok(cut)` - Number of edges crossing the final two super-vertices
/// * `Err(GraphError::InvalidInput)` - Fewer than two super-vertices to start
/// * `Err(GraphError::EmptyEdgeSet)` - The graph ran out of edges before
///   reaching two super-vertices (a disconnected or unpopulated graph)
pub fn min_cut<R: Rng>(graph: &mut MultiGraph, rng: &mut R) -> Result<usize> {
    if graph.super_vertex_count() < 2 {
        return Err(GraphError::invalid_input(
            "minimum cut requires at least two super-vertices",
        ));
    }
    while graph.super_vertex_count() > 2 {
        let (kept, absorbed) = graph.contract_random_edge(rng)?;
        debug!(
            "contracted {absorbed} into {kept}; {} super-vertices left",
            graph.super_vertex_count()
        );
    }
    Ok(graph.edge_count())
}

/// Runs `trials` independent contraction trials on clones of the graph and
/// returns the smallest cut found.
///
/// The failure probability of a single trial shrinks polynomially with the
/// number of trials; small graphs reach the true minimum cut with near
/// certainty after a modest count.
pub fn min_cut_trials<R: Rng>(graph: &MultiGraph, trials: usize, rng: &mut R) -> Result<usize> {
    if trials == 0 {
        return Err(GraphError::invalid_input("at least one trial is required"));
    }
    let mut best = usize::MAX;
    for _ in 0..trials {
        let mut candidate = graph.clone();
        best = best.min(min_cut(&mut candidate, rng)?);
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_four_cycle_cut_is_two() {
        // Contracting a cycle always yields a smaller cycle, so every trial
        // lands exactly on the true minimum cut of 2.
        let cycle = MultiGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let mut graph = cycle.clone();
            let cut = min_cut(&mut graph, &mut rng).unwrap();
            assert_eq!(cut, 2);
            assert_eq!(graph.super_vertex_count(), 2);
        }
    }

    #[test]
    fn test_path_trials_reach_true_min_cut() {
        // A path has minimum cut 1; every trial must report at least that,
        // and repeated trials must find it.
        let path = MultiGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut rng = StdRng::seed_from_u64(29);
        let mut best = usize::MAX;
        for _ in 0..50 {
            let mut graph = path.clone();
            let cut = min_cut(&mut graph, &mut rng).unwrap();
            assert!(cut >= 1);
            best = best.min(cut);
        }
        assert_eq!(best, 1);
    }

    #[test]
    fn test_two_vertices_return_parallel_edge_count() {
        let mut graph = MultiGraph::from_edges(2, &[(0, 1), (0, 1), (0, 1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        // Already at two super-vertices; the loop body never runs.
        assert_eq!(min_cut(&mut graph, &mut rng).unwrap(), 3);
    }

    #[test]
    fn test_single_vertex_is_a_precondition_error() {
        let mut graph = MultiGraph::from_edges(1, &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            min_cut(&mut graph, &mut rng),
            Err(GraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_disconnected_graph_fails_fast() {
        // Three isolated vertices: no edge to contract.
        let mut graph = MultiGraph::from_edges(3, &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            min_cut(&mut graph, &mut rng),
            Err(GraphError::EmptyEdgeSet)
        ));
    }

    #[test]
    fn test_generated_graph_contracts_to_two_super_vertices() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut graph = MultiGraph::new(10);
        graph.fill(&mut rng);
        let total_edges = graph.edge_count();
        let cut = min_cut(&mut graph, &mut rng).unwrap();
        assert_eq!(graph.super_vertex_count(), 2);
        assert!(cut >= 1, "a dense generated graph cannot have an empty cut");
        assert!(cut <= total_edges);
    }

    #[test]
    fn test_min_cut_trials_replays_under_a_fixed_seed() {
        let mut setup = StdRng::seed_from_u64(53);
        let mut graph = MultiGraph::new(8);
        graph.fill(&mut setup);
        let first = min_cut_trials(&graph, 20, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = min_cut_trials(&graph, 20, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
        assert!(first >= 1);
        // The amplified estimate is the minimum over its own trials, so any
        // prefix of the same trial sequence can only be looser.
        let shorter = min_cut_trials(&graph, 5, &mut StdRng::seed_from_u64(9)).unwrap();
        assert!(first <= shorter);
    }

    #[test]
    fn test_min_cut_trials_rejects_zero_trials() {
        let graph = MultiGraph::from_edges(2, &[(0, 1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            min_cut_trials(&graph, 0, &mut rng),
            Err(GraphError::InvalidInput(_))
        ));
    }
}
