use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub};

use crate::math::backend::Backend;

/// Dense row-major matrix. Row vectors (`1 × n`) carry single examples
/// through the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// A `1 × n` matrix holding one example.
    pub fn row(values: &[f64]) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values.to_vec()],
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, Vec::len);
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// True when `data` really holds `rows` rows of `cols` values each, and
    /// those match the declared dimensions.
    pub fn has_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows
            && self.cols == cols
            && self.data.len() == rows
            && self.data.iter().all(|row| row.len() == cols)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// He initialization, N(0, sqrt(2 / rows)). Used ahead of ReLU.
    ///
    /// Weights are stored `(fan_in, fan_out)`, so `rows` is the fan-in.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / rows as f64).sqrt(), rng)
    }

    /// Xavier initialization, N(0, sqrt(1 / rows)). Used ahead of softmax.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / rows as f64).sqrt(), rng)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_same_shape(self, rhs);
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix::from_data(data)
    }

    /// Matrix product `self × rhs` on the given backend.
    pub fn matmul(&self, rhs: &Matrix, backend: Backend) -> Matrix {
        if self.cols != rhs.rows {
            panic!(
                "Matrices are of incorrect sizes: {}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )
        }

        let data: Vec<Vec<f64>> = match backend {
            Backend::Sequential => self.data.iter().map(|row| dot_row(row, rhs)).collect(),
            Backend::Parallel => self.data.par_iter().map(|row| dot_row(row, rhs)).collect(),
        };

        Matrix {
            rows: self.rows,
            cols: rhs.cols,
            data,
        }
    }

    /// Values of a `1 × n` matrix.
    pub fn into_row(self) -> Vec<f64> {
        self.data.into_iter().next().unwrap_or_default()
    }
}

fn dot_row(row: &[f64], rhs: &Matrix) -> Vec<f64> {
    (0..rhs.cols)
        .map(|j| row.iter().zip(rhs.data.iter()).map(|(a, r)| a * r[j]).sum())
        .collect()
}

fn assert_same_shape(a: &Matrix, b: &Matrix) {
    if a.rows != b.rows || a.cols != b.cols {
        panic!(
            "Matrices are of incorrect sizes: {}x{} vs {}x{}",
            a.rows, a.cols, b.rows, b.cols
        )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix {
            rows: 0,
            cols: 0,
            data: vec![],
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        assert_same_shape(&self, &rhs);
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
        self
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(mut self, rhs: Self) -> Self::Output {
        assert_same_shape(&self, &rhs);
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= y;
            }
        }
        self
    }
}
