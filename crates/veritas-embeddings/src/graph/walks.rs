//! node2vec second-order biased random walks.

use rand::seq::SliceRandom;
use rand::Rng;

/// Walk sampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct WalkParams {
    /// Nodes per walk, including the start node.
    pub walk_length: usize,
    pub walks_per_node: usize,
    /// Return parameter `p`: weight `1/p` for stepping back to the previous node.
    pub return_param: f64,
    /// In-out parameter `q`: weight `1/q` for moving away from the previous node.
    pub in_out_param: f64,
}

/// Sample `walks_per_node` walks from every node over `adjacency`.
///
/// Start order is reshuffled each round. Walks that cannot leave their start
/// node are dropped, so isolated nodes contribute no tokens.
pub fn generate_walks<R: Rng>(
    adjacency: &[Vec<usize>],
    params: &WalkParams,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let mut starts: Vec<usize> = (0..adjacency.len()).collect();
    let mut walks = Vec::with_capacity(adjacency.len() * params.walks_per_node);

    for _ in 0..params.walks_per_node {
        starts.shuffle(rng);
        for &start in &starts {
            let walk = walk_from(adjacency, start, params, rng);
            if walk.len() > 1 {
                walks.push(walk);
            }
        }
    }
    walks
}

fn walk_from<R: Rng>(
    adjacency: &[Vec<usize>],
    start: usize,
    params: &WalkParams,
    rng: &mut R,
) -> Vec<usize> {
    let mut walk = Vec::with_capacity(params.walk_length);
    walk.push(start);

    while walk.len() < params.walk_length {
        let current = walk[walk.len() - 1];
        let neighbors = &adjacency[current];
        if neighbors.is_empty() {
            break;
        }
        let next = if walk.len() == 1 {
            neighbors[rng.random_range(0..neighbors.len())]
        } else {
            let previous = walk[walk.len() - 2];
            biased_step(adjacency, previous, neighbors, params, rng)
        };
        walk.push(next);
    }
    walk
}

/// Pick the next node from `neighbors` with node2vec transition weights.
fn biased_step<R: Rng>(
    adjacency: &[Vec<usize>],
    previous: usize,
    neighbors: &[usize],
    params: &WalkParams,
    rng: &mut R,
) -> usize {
    let weight = |candidate: usize| -> f64 {
        if candidate == previous {
            1.0 / params.return_param
        } else if adjacency[previous].binary_search(&candidate).is_ok() {
            1.0
        } else {
            1.0 / params.in_out_param
        }
    };

    let total: f64 = neighbors.iter().map(|&n| weight(n)).sum();
    let mut target = rng.random::<f64>() * total;
    for &candidate in neighbors {
        target -= weight(candidate);
        if target <= 0.0 {
            return candidate;
        }
    }
    // Rounding can leave a sliver past the last bucket.
    neighbors[neighbors.len() - 1]
}
