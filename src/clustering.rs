// Centroid-based clustering of text fragments.
//
// Texts are vectorized against a vocabulary built from the same batch,
// L2-normalized (so squared Euclidean distance ranks like cosine distance),
// then grouped with Lloyd-style k-means:
//
//   1. Seed centroids by farthest-point selection, starting from the first
//      text. Deterministic: no random restarts.
//   2. Assign every point to its nearest centroid. Ties go to the lower
//      cluster index.
//   3. Refill any empty cluster with the point farthest from its own
//      centroid (taken from a cluster that can spare one).
//   4. Recompute centroids as member means and repeat until assignments stop
//      changing or the iteration cap is hit.
//
// Step 3 guarantees exactly min(k, n) distinct cluster ids in the output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{require_positive, Result};
use crate::vector::Vocabulary;

/// One input text and the cluster it landed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub text: String,
    /// In `[0, min(k, texts.len()))`
    pub cluster_id: usize,
}

/// k-means over TF-IDF vectors.
pub struct KMeansClusterer {
    /// Hard cap on assign/update rounds
    pub max_iterations: usize,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl KMeansClusterer {
    /// Partition `texts` into `k` groups, one result per text in input order.
    ///
    /// `k < 1` is an error. `k > texts.len()` is capped so every text gets its
    /// own cluster. An empty batch returns an empty list.
    pub fn cluster<S: AsRef<str>>(&self, texts: &[S], k: usize) -> Result<Vec<ClusterResult>> {
        require_positive("k", k)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let k = k.min(texts.len());
        let vocabulary = Vocabulary::build(texts);
        let points: Vec<Vec<f64>> = texts
            .iter()
            .map(|t| normalized(vocabulary.to_dense(&vocabulary.vectorize(t.as_ref()))))
            .collect();

        let (labels, iterations) = self.run(&points, k);

        info!(
            texts = texts.len(),
            k,
            vocabulary = vocabulary.len(),
            iterations,
            "Clustered texts"
        );

        Ok(texts
            .iter()
            .zip(labels)
            .map(|(text, cluster_id)| ClusterResult {
                text: text.as_ref().to_string(),
                cluster_id,
            })
            .collect())
    }

    /// Core loop. Returns the label per point and the rounds used.
    fn run(&self, points: &[Vec<f64>], k: usize) -> (Vec<usize>, usize) {
        let mut centroids = seed_centroids(points, k);
        let mut labels: Vec<usize> = Vec::new();
        let mut rounds = 0;

        for round in 0..self.max_iterations.max(1) {
            rounds = round + 1;

            let mut next: Vec<usize> = points.iter().map(|p| nearest(p, &centroids)).collect();
            fill_empty_clusters(points, &centroids, &mut next, k);

            if next == labels {
                break;
            }
            labels = next;
            centroids = recompute_centroids(points, &labels, k, &centroids);
        }

        if rounds == self.max_iterations {
            debug!(rounds, "Clustering stopped at the iteration cap");
        }

        (labels, rounds)
    }
}

/// Convenience wrapper with the default iteration cap.
pub fn cluster_texts<S: AsRef<str>>(texts: &[S], k: usize) -> Result<Vec<ClusterResult>> {
    KMeansClusterer::default().cluster(texts, k)
}

/// Group results as cluster id -> input indices (ascending).
pub fn group_by_cluster(results: &[ClusterResult]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, result) in results.iter().enumerate() {
        groups.entry(result.cluster_id).or_default().push(i);
    }
    groups
}

fn normalized(mut v: Vec<f64>) -> Vec<f64> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the nearest centroid; strict comparison keeps the lower index
/// on ties.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}

/// Farthest-point seeding: first point, then repeatedly the unchosen point
/// whose nearest chosen seed is farthest away (lowest index on ties).
fn seed_centroids(points: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let mut chosen = vec![false; points.len()];
    let mut centroids = vec![points[0].clone()];
    chosen[0] = true;

    while centroids.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for (i, point) in points.iter().enumerate() {
            if chosen[i] {
                continue;
            }
            let d = centroids
                .iter()
                .map(|c| squared_distance(point, c))
                .fold(f64::INFINITY, f64::min);
            if best.is_none_or(|(_, best_d)| d > best_d) {
                best = Some((i, d));
            }
        }
        // k <= points.len(), so an unchosen point always exists here
        let Some((idx, _)) = best else { break };
        chosen[idx] = true;
        centroids.push(points[idx].clone());
    }

    centroids
}

/// Move points into empty clusters so every cluster id in `0..k` is used.
fn fill_empty_clusters(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize], k: usize) {
    let mut sizes = vec![0usize; k];
    for &l in labels.iter() {
        sizes[l] += 1;
    }

    for cluster in 0..k {
        if sizes[cluster] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (i, point) in points.iter().enumerate() {
            let current = labels[i];
            if sizes[current] <= 1 {
                continue;
            }
            let d = squared_distance(point, &centroids[current]);
            if donor.is_none_or(|(_, best_d)| d > best_d) {
                donor = Some((i, d));
            }
        }

        if let Some((i, _)) = donor {
            sizes[labels[i]] -= 1;
            labels[i] = cluster;
            sizes[cluster] += 1;
        }
    }
}

fn recompute_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    k: usize,
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dims = points.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (s, x) in sums[label].iter_mut().zip(point) {
            *s += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(j, (sum, count))| {
            if count == 0 {
                previous[j].clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}
