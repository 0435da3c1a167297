//! Derivative-free minimization (Nelder–Mead simplex).
//!
//! Candidate points are projected into `[-bound, bound]` on every axis, so
//! the search stays inside a box even when the objective keeps improving
//! towards infinity. A NaN objective is treated as `+inf`.

/// Nelder–Mead settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    pub max_iterations: usize,
    /// Convergence on objective spread, relative to `1 + |f_best|`.
    pub f_tol: f64,
    /// Convergence on the largest coordinate distance from the best vertex.
    pub x_tol: f64,
    pub initial_step: f64,
    pub bound: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 5_000,
            f_tol: 1e-10,
            x_tol: 1e-6,
            initial_step: 0.5,
            bound: 8.0,
        }
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    pub fn minimize<F>(&self, mut objective: F, x0: &[f64]) -> Minimum
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = x0.len();
        let mut eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_nan() {
                f64::INFINITY
            } else {
                value
            }
        };

        if n == 0 {
            return Minimum {
                x: Vec::new(),
                value: eval(x0),
                iterations: 0,
                converged: true,
            };
        }

        let start = self.project(x0.to_vec());
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        let start_value = eval(&start);
        simplex.push((start.clone(), start_value));
        for axis in 0..n {
            let mut vertex = start.clone();
            vertex[axis] += self.initial_step;
            if vertex[axis] > self.bound {
                vertex[axis] = start[axis] - self.initial_step;
            }
            let vertex = self.project(vertex);
            let value = eval(&vertex);
            simplex.push((vertex, value));
        }

        for iteration in 0..self.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            if self.has_converged(&simplex) {
                let (x, value) = simplex.swap_remove(0);
                return Minimum {
                    x,
                    value,
                    iterations: iteration,
                    converged: true,
                };
            }

            let worst = simplex[n].1;
            let second_worst = simplex[n - 1].1;
            let best = simplex[0].1;

            let centroid = centroid(&simplex[..n]);
            let reflected = self.project(along(&centroid, &simplex[n].0, -REFLECT));
            let reflected_value = eval(&reflected);

            if reflected_value < best {
                let expanded = self.project(along(&centroid, &reflected, EXPAND));
                let expanded_value = eval(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < second_worst {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            let (contracted, accept_below) = if reflected_value < worst {
                (
                    self.project(along(&centroid, &reflected, CONTRACT)),
                    reflected_value,
                )
            } else {
                (
                    self.project(along(&centroid, &simplex[n].0, CONTRACT)),
                    worst,
                )
            };
            let contracted_value = eval(&contracted);
            if contracted_value < accept_below {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            let anchor = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk = self.project(along(&anchor, &vertex.0, SHRINK));
                let value = eval(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (x, value) = simplex.swap_remove(0);
        Minimum {
            x,
            value,
            iterations: self.max_iterations,
            converged: false,
        }
    }

    fn has_converged(&self, sorted: &[(Vec<f64>, f64)]) -> bool {
        let best = &sorted[0];
        let worst = &sorted[sorted.len() - 1];
        if !best.1.is_finite() {
            return false;
        }

        let f_spread = worst.1 - best.1;
        if f_spread > self.f_tol * (1.0 + best.1.abs()) {
            return false;
        }

        sorted.iter().skip(1).all(|(vertex, _)| {
            vertex
                .iter()
                .zip(&best.0)
                .all(|(a, b)| (a - b).abs() <= self.x_tol)
        })
    }

    fn project(&self, mut x: Vec<f64>) -> Vec<f64> {
        for value in &mut x {
            *value = value.clamp(-self.bound, self.bound);
        }
        x
    }
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let n = vertices[0].0.len();
    let mut center = vec![0.0; n];
    for (vertex, _) in vertices {
        for (c, v) in center.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    let count = vertices.len() as f64;
    for c in &mut center {
        *c /= count;
    }
    center
}

/// `origin + factor * (target - origin)`.
fn along(origin: &[f64], target: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, t)| o + factor * (t - o))
        .collect()
}
