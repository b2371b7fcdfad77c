// Graph clustering for the deck core.
//
// Cards are nodes, the edge weight between two cards is 1 minus the cosine
// similarity of their embeddings. After closing the matrix under shortest
// paths (so a chain of similar cards counts as close), we look for the
// cheapest tree spanning exactly k nodes, trying every node and every edge as
// the tree's center.

use thiserror::Error;
use tracing::debug;

use crate::card::Card;

/// Distance assigned when either card lacks an embedding.
pub const MAX_DISTANCE: f64 = 1.0;

/// The candidate pool has fewer distinct nodes than the cluster needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough cards to form a cluster of {requested} (only {available} available)")]
pub struct InsufficientPoolError {
    pub requested: usize,
    pub available: usize,
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Cosine similarity of two vectors. `None` for mismatched lengths or a zero
/// vector.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

/// 1 - cosine similarity, or [`MAX_DISTANCE`] when it can't be computed.
pub fn card_distance(a: &Card, b: &Card) -> f64 {
    match (a.embedding(), b.embedding()) {
        (Some(ea), Some(eb)) => cosine_similarity(ea, eb).map_or(MAX_DISTANCE, |s| 1.0 - s),
        _ => MAX_DISTANCE,
    }
}

/// Floyd-Warshall closure of a square distance matrix.
pub fn all_pairs_shortest_path(distances: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = distances.len();
    let mut result = distances.to_vec();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = result[i][k] + result[k][j];
                if result[i][j] > through {
                    result[i][j] = through;
                }
            }
        }
    }
    result
}

// ---------------------------------------------------------------------------
// k-spanning tree
// ---------------------------------------------------------------------------

/// Neighbors of a node as `(distance, index)`, closest first.
type Neighbors = Vec<(f64, usize)>;

#[derive(Clone, Copy)]
enum Side {
    I,
    J,
}

/// Find `k` of the `n` nodes forming the shortest tree-like cluster under
/// `distance` (assumed symmetric). Returns node indices.
///
/// Node centers take the k-1 closest neighbors and are scored by the two
/// longest arms. Edge centers grow out of both endpoints: a side is extended
/// when its arm is shorter than the other side's by more than the edge
/// length; otherwise the side whose next candidate is closer goes next.
/// That look-ahead only sees one step, so a slightly farther but denser
/// group on the other side can be missed. This is accepted: an exact
/// solver is much more expensive.
pub fn find_shortest_k_spanning_tree<F>(
    n: usize,
    distance: F,
    k: usize,
) -> Result<Vec<usize>, InsufficientPoolError>
where
    F: Fn(usize, usize) -> f64,
{
    let insufficient = InsufficientPoolError {
        requested: k,
        available: n,
    };
    if k == 0 {
        return Ok(Vec::new());
    }
    if n < k {
        return Err(insufficient);
    }
    if k == 1 {
        return Ok(vec![0]);
    }

    let mut direct = vec![vec![0.0; n]; n];
    for i in 1..n {
        for j in 0..i {
            let d = distance(i, j);
            direct[i][j] = d;
            direct[j][i] = d;
        }
    }
    let distances = all_pairs_shortest_path(&direct);

    let closest = nearest_neighbors(&distances);

    let mut best_length = f64::INFINITY;
    let mut best_nodes: Vec<usize> = Vec::new();

    for i in 0..n {
        // Node i as the center: the tree's span is its two longest arms.
        let arms = &closest[i];
        let length = arms[k - 2].0 + if k >= 3 { arms[k - 3].0 } else { 0.0 };
        if length < best_length {
            best_length = length;
            best_nodes = arms[..k - 1].iter().map(|&(_, idx)| idx).collect();
            best_nodes.push(i);
        }

        for j in 0..i {
            let (length, nodes) = grow_from_edge(&closest, &distances, i, j, k).ok_or(insufficient)?;
            if length < best_length {
                best_length = length;
                best_nodes = nodes;
            }
        }
    }

    if best_nodes.len() < k {
        return Err(insufficient);
    }
    debug!(k, n, length = best_length, "k-spanning tree selected");
    Ok(best_nodes)
}

/// Every node's neighbors sorted by distance. Ties keep index order.
fn nearest_neighbors(distances: &[Vec<f64>]) -> Vec<Neighbors> {
    distances
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut neighbors: Neighbors = row
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, &d)| (d, j))
                .collect();
            neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
            neighbors
        })
        .collect()
}

/// Grow a k-node cluster around the edge (i, j). Returns the tree's span and
/// its nodes, or `None` when both sides run out before reaching k.
fn grow_from_edge(
    closest: &[Neighbors],
    distances: &[Vec<f64>],
    i: usize,
    j: usize,
    k: usize,
) -> Option<(f64, Vec<usize>)> {
    let side_i: Neighbors = closest[i].iter().copied().filter(|&(_, x)| x != j).collect();
    let side_j: Neighbors = closest[j].iter().copied().filter(|&(_, x)| x != i).collect();
    let edge = distances[i][j];

    let mut nodes = vec![i, j];
    let mut taken_i = 0usize;
    let mut taken_j = 0usize;

    // Arm length is the distance to the farthest neighbor admitted so far.
    let arm = |side: &Neighbors, taken: usize| if taken == 0 { 0.0 } else { side[taken - 1].0 };

    while nodes.len() < k {
        let arm_i = arm(&side_i, taken_i);
        let arm_j = arm(&side_j, taken_j);
        let next_i = side_i.get(taken_i).map(|&(d, _)| d);
        let next_j = side_j.get(taken_j).map(|&(d, _)| d);

        let step = match (next_i, next_j) {
            (None, None) => return None,
            (Some(_), None) => Side::I,
            (None, Some(_)) => Side::J,
            // Keep the center on the edge: a lagging side catches up first.
            (Some(_), Some(_)) if arm_i + edge < arm_j => Side::I,
            (Some(_), Some(_)) if arm_j + edge < arm_i => Side::J,
            (Some(ni), Some(nj)) => {
                if nj < ni {
                    Side::J
                } else {
                    Side::I
                }
            }
        };

        let (side, taken) = match step {
            Side::I => (&side_i, &mut taken_i),
            Side::J => (&side_j, &mut taken_j),
        };
        let (_, node) = side[*taken];
        *taken += 1;
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }

    let length = edge + arm(&side_i, taken_i) + arm(&side_j, taken_j);
    Some((length, nodes))
}

/// Carve `total` cards out of `candidates` as `kernels` successive clusters.
///
/// Each pass takes `floor(remaining / passes_left)` cards and removes them
/// from the pool before the next pass. The selected cards move out of
/// `candidates` into the returned core.
pub fn select_core(
    candidates: &mut Vec<Card>,
    total: usize,
    kernels: usize,
) -> Result<Vec<Card>, InsufficientPoolError> {
    let mut core = Vec::new();
    let mut remaining = total.min(candidates.len());
    for pass in 0..kernels {
        let k = remaining / (kernels - pass);
        remaining -= k;
        let picked = find_shortest_k_spanning_tree(
            candidates.len(),
            |a, b| card_distance(&candidates[a], &candidates[b]),
            k,
        )?;

        let mut slots: Vec<Option<Card>> = candidates.drain(..).map(Some).collect();
        for idx in picked {
            if let Some(card) = slots[idx].take() {
                core.push(card);
            }
        }
        candidates.extend(slots.into_iter().flatten());
    }
    Ok(core)
}
