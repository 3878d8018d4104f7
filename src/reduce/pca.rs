use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::Reducer2D;
use crate::data::model::{EmbeddingMatrix, Projection};
use crate::error::{Result, VizError};

const MAX_ITER: usize = 300;
const TOLERANCE: f64 = 1e-10;

// ---------------------------------------------------------------------------
// Pca – top-k principal components by power iteration with deflation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
    seed: u64,
}

/// Scores of every row on the extracted components.
#[derive(Debug, Clone)]
pub struct PcaResult {
    /// n_samples × k, k = min(n_components, dims)
    pub scores: Vec<Vec<f64>>,
    /// Share of the total variance carried by each component.
    pub explained_variance_ratio: Vec<f64>,
}

impl Pca {
    pub fn new(n_components: usize) -> Self {
        Pca {
            n_components,
            seed: 42,
        }
    }

    /// Center the rows and project them onto the leading eigenvectors of the
    /// covariance matrix.
    pub fn fit_transform(&self, data: &[Vec<f64>]) -> Result<PcaResult> {
        let n = data.len();
        if n < 2 {
            return Err(VizError::Reduction(format!(
                "PCA needs at least 2 rows, got {n}"
            )));
        }
        let d = data[0].len();
        if d == 0 {
            return Err(VizError::Reduction("PCA needs at least 1 column".into()));
        }
        let k = self.n_components.min(d);

        let centered = center(data, d);
        let cov = covariance(&centered, d);
        let (eigenvalues, eigenvectors) = self.power_iteration(&cov, d, k);

        let total: f64 = (0..d).map(|i| cov[i * d + i]).sum::<f64>().max(1e-12);
        let explained_variance_ratio = eigenvalues
            .iter()
            .map(|&ev| (ev / total).max(0.0))
            .collect();

        let scores = centered
            .iter()
            .map(|row| eigenvectors.iter().map(|v| dot(row, v)).collect())
            .collect();

        Ok(PcaResult {
            scores,
            explained_variance_ratio,
        })
    }

    fn power_iteration(&self, cov: &[f64], d: usize, k: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut work = cov.to_vec();
        let mut eigenvalues = Vec::with_capacity(k);
        let mut eigenvectors: Vec<Vec<f64>> = Vec::with_capacity(k);

        for _ in 0..k {
            let mut v: Vec<f64> = (0..d).map(|_| rng.gen_range(-1.0..1.0)).collect();
            normalize(&mut v);
            let mut eigenvalue = 0.0;

            for _ in 0..MAX_ITER {
                let mut w: Vec<f64> = (0..d).map(|i| dot(&work[i * d..(i + 1) * d], &v)).collect();
                eigenvalue = dot(&v, &w);
                normalize(&mut w);
                let diff = v
                    .iter()
                    .zip(&w)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt();
                v = w;
                if diff < TOLERANCE {
                    break;
                }
            }

            let eigenvalue = eigenvalue.max(0.0);
            for i in 0..d {
                for j in 0..d {
                    work[i * d + j] -= eigenvalue * v[i] * v[j];
                }
            }
            eigenvalues.push(eigenvalue);
            eigenvectors.push(v);
        }

        (eigenvalues, eigenvectors)
    }

    /// Reduce a matrix to `n_components` columns, keeping the header-less shape.
    pub fn reduce_matrix(&self, matrix: &EmbeddingMatrix) -> Result<EmbeddingMatrix> {
        let result = self.fit_transform(matrix.rows())?;
        log::info!(
            "PCA {} -> {} dims keeps {:.1}% of the variance",
            matrix.dims(),
            result.scores.first().map_or(0, Vec::len),
            100.0 * result.explained_variance_ratio.iter().sum::<f64>()
        );
        EmbeddingMatrix::from_rows(result.scores)
    }
}

fn center(data: &[Vec<f64>], d: usize) -> Vec<Vec<f64>> {
    let n = data.len() as f64;
    let means: Vec<f64> = (0..d)
        .map(|j| data.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect();
    data.iter()
        .map(|row| row.iter().zip(&means).map(|(v, m)| v - m).collect())
        .collect()
}

/// d × d sample covariance, row-major.
fn covariance(centered: &[Vec<f64>], d: usize) -> Vec<f64> {
    let denom = (centered.len() as f64 - 1.0).max(1.0);
    let mut cov = vec![0.0; d * d];
    for row in centered {
        for i in 0..d {
            for j in i..d {
                cov[i * d + j] += row[i] * row[j];
            }
        }
    }
    for i in 0..d {
        for j in i..d {
            let v = cov[i * d + j] / denom;
            cov[i * d + j] = v;
            cov[j * d + i] = v;
        }
    }
    cov
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalize(v: &mut [f64]) {
    let norm = dot(v, v).sqrt().max(1e-12);
    v.iter_mut().for_each(|x| *x /= norm);
}

// ---------------------------------------------------------------------------
// PcaReducer – linear 2D projection
// ---------------------------------------------------------------------------

/// Linear [`Reducer2D`]. Also what t-SNE falls back to on tiny inputs.
#[derive(Debug, Clone, Default)]
pub struct PcaReducer;

impl Reducer2D for PcaReducer {
    fn name(&self) -> &'static str {
        "pca"
    }

    fn reduce(&self, matrix: &EmbeddingMatrix) -> Result<Projection> {
        match matrix.len() {
            0 => Err(VizError::EmptyInput),
            1 => Ok(Projection::new(vec![[0.0, 0.0]])),
            _ => {
                let result = Pca::new(2).fit_transform(matrix.rows())?;
                let points = result
                    .scores
                    .iter()
                    .map(|s| [s[0], s.get(1).copied().unwrap_or(0.0)])
                    .collect();
                Ok(Projection::new(points))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0, 0.0],
            vec![0.1, 0.1, 0.0],
            vec![0.0, 0.1, 0.1],
            vec![10.0, 10.0, 10.0],
            vec![10.1, 10.0, 10.0],
            vec![10.0, 10.1, 10.0],
        ]
    }

    #[test]
    fn linear_data_has_one_dominant_component() {
        let data: Vec<Vec<f64>> = (1..=5).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let result = Pca::new(2).fit_transform(&data).unwrap();
        assert_eq!(result.scores.len(), 5);
        assert!(
            result.explained_variance_ratio[0] > 0.95,
            "got {:?}",
            result.explained_variance_ratio
        );
    }

    #[test]
    fn clusters_stay_apart() {
        let result = Pca::new(2).fit_transform(&two_clusters()).unwrap();
        let mean = |rows: &[Vec<f64>]| rows.iter().map(|r| r[0]).sum::<f64>() / rows.len() as f64;
        let gap = (mean(&result.scores[..3]) - mean(&result.scores[3..])).abs();
        assert!(gap > 1.0, "clusters collapsed: gap {gap}");
    }

    #[test]
    fn components_capped_by_dims() {
        let data = vec![vec![1.0], vec![2.0], vec![4.0]];
        let result = Pca::new(5).fit_transform(&data).unwrap();
        assert!(result.scores.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn too_few_rows_is_an_error() {
        assert!(Pca::new(2).fit_transform(&[vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn reduce_matrix_changes_width_only() {
        let m = EmbeddingMatrix::from_rows(two_clusters()).unwrap();
        let reduced = Pca::new(2).reduce_matrix(&m).unwrap();
        assert_eq!(reduced.len(), 6);
        assert_eq!(reduced.dims(), 2);
    }

    #[test]
    fn reducer_handles_single_and_empty_inputs() {
        let one = EmbeddingMatrix::from_rows(vec![vec![3.0, 4.0]]).unwrap();
        assert_eq!(PcaReducer.reduce(&one).unwrap().points(), &[[0.0, 0.0]]);

        let none = EmbeddingMatrix::from_rows(Vec::new()).unwrap();
        assert!(matches!(PcaReducer.reduce(&none), Err(VizError::EmptyInput)));
    }

    #[test]
    fn reducer_projects_one_dimensional_rows() {
        let m = EmbeddingMatrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let p = PcaReducer.reduce(&m).unwrap();
        assert_eq!(p.len(), 3);
        assert!(p.points().iter().all(|pt| pt[1] == 0.0));
    }
}
