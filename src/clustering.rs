//! DBSCAN over a precomputed distance matrix.
//!
//! Neighborhoods are read straight from the matrix (`d <= eps`, self included). Clusters
//! grow from core points in ascending index order, so cluster ids are dense, start at 0
//! and a border point belongs to the first cluster that reaches it.

use crate::distance::DistanceMatrix;
use crate::error::{AnalysisError, AnalysisResult, InputField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    Noise,
    Cluster(usize),
}

impl ClusterLabel {
    pub fn cluster_id(self) -> Option<usize> {
        match self {
            ClusterLabel::Cluster(id) => Some(id),
            ClusterLabel::Noise => None,
        }
    }

    pub fn is_noise(self) -> bool {
        self == ClusterLabel::Noise
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    labels: Vec<ClusterLabel>,
    n_clusters: usize,
}

impl ClusterAssignment {
    pub fn labels(&self) -> &[ClusterLabel] {
        &self.labels
    }

    pub fn label(&self, row: usize) -> ClusterLabel {
        self.labels[row]
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_noise()).count()
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.n_clusters];
        for id in self.labels.iter().filter_map(|l| l.cluster_id()) {
            sizes[id] += 1;
        }
        sizes
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self {
            eps: 2.0,
            min_samples: 5,
        }
    }
}

impl Dbscan {
    pub fn new(eps: f64, min_samples: usize) -> AnalysisResult<Self> {
        if !eps.is_finite() || eps < 0.0 {
            return Err(AnalysisError::invalid_input(
                InputField::Parameter,
                format!("dbscan eps {eps}"),
            ));
        }
        if min_samples == 0 {
            return Err(AnalysisError::invalid_input(
                InputField::Parameter,
                "dbscan min_samples 0",
            ));
        }
        Ok(Self { eps, min_samples })
    }

    pub fn fit(&self, distances: &DistanceMatrix) -> ClusterAssignment {
        let n = distances.len();
        let neighborhoods: Vec<Vec<usize>> =
            (0..n).map(|i| distances.neighbors(i, self.eps)).collect();
        let core: Vec<bool> = neighborhoods
            .iter()
            .map(|hood| hood.len() >= self.min_samples)
            .collect();

        let mut labels = vec![ClusterLabel::Noise; n];
        let mut next_id = 0usize;
        let mut stack: Vec<usize> = Vec::new();

        for seed in 0..n {
            if !labels[seed].is_noise() || !core[seed] {
                continue;
            }
            stack.push(seed);
            while let Some(point) = stack.pop() {
                if !labels[point].is_noise() {
                    continue;
                }
                labels[point] = ClusterLabel::Cluster(next_id);
                if !core[point] {
                    continue;
                }
                for &neighbor in &neighborhoods[point] {
                    if labels[neighbor].is_noise() {
                        stack.push(neighbor);
                    }
                }
            }
            next_id += 1;
        }

        ClusterAssignment {
            labels,
            n_clusters: next_id,
        }
    }
}
