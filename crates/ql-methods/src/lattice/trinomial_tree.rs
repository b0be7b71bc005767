//! Recombining trinomial tree for additive-noise processes.
//!
//! The conditional variance of the process must not depend on its value
//! (Ornstein-Uhlenbeck and other Gaussian short-rate factors). Node spacing
//! at slice `i + 1` is `dx = sqrt(3 · Var_i)`; each node branches to the three
//! neighbours of the node closest to its conditional mean, which yields the
//! centered, shifted-up and shifted-down branching patterns of the usual
//! Hull-White construction.

use ql_core::{ensure, errors::Result, Real, Size};
use ql_processes::StochasticProcess1D;

use super::TimeGrid;

/// Branching data for a single time step of the trinomial tree.
#[derive(Debug, Clone)]
struct Branching {
    /// Integer offset of the middle descendant of each node.
    k: Vec<i64>,
    /// Probabilities for each branch (0=down, 1=mid, 2=up) for each node.
    probs: [Vec<Real>; 3],
    /// Minimum and maximum descendant offsets, defining the next slice.
    j_min: i64,
    j_max: i64,
}

impl Branching {
    fn with_capacity(n: Size) -> Self {
        Self {
            k: Vec::with_capacity(n),
            probs: [
                Vec::with_capacity(n),
                Vec::with_capacity(n),
                Vec::with_capacity(n),
            ],
            j_min: i64::MAX,
            j_max: i64::MIN,
        }
    }

    fn add(&mut self, k: i64, p_down: Real, p_mid: Real, p_up: Real) {
        self.k.push(k);
        self.probs[0].push(p_down);
        self.probs[1].push(p_mid);
        self.probs[2].push(p_up);
        self.j_min = self.j_min.min(k - 1);
        self.j_max = self.j_max.max(k + 1);
    }

    /// Number of nodes in the slice this branching leads to.
    fn size(&self) -> Size {
        (self.j_max - self.j_min + 1) as Size
    }

    fn descendant(&self, index: Size, branch: Size) -> Size {
        (self.k[index] - self.j_min - 1 + branch as i64) as Size
    }

    fn probability(&self, index: Size, branch: Size) -> Real {
        self.probs[branch][index]
    }
}

/// A recombining trinomial tree approximating a 1-D stochastic process.
///
/// Node `(i, index)` sits at `x0 + (j_min_i + index) · dx_i`. Branch `0` is
/// the down move, `1` the middle and `2` the up move.
#[derive(Debug, Clone)]
pub struct TrinomialTree {
    x0: Real,
    /// Node spacing per slice; `dx[0] = 0` for the root.
    dx: Vec<Real>,
    /// Lowest node offset per slice; `j_min[0] = 0` for the root.
    j_min: Vec<i64>,
    branchings: Vec<Branching>,
    time_grid: TimeGrid,
}

impl TrinomialTree {
    /// Build a trinomial tree from a 1-D stochastic process and time grid.
    ///
    /// Fails if a step has non-positive variance, which would collapse the
    /// node spacing. A grid with no steps gives a single root node.
    pub fn new(process: &dyn StochasticProcess1D, grid: &TimeGrid) -> Result<Self> {
        let x0 = process.x0();
        let n = grid.steps();

        let mut dx: Vec<Real> = Vec::with_capacity(n + 1);
        dx.push(0.0);
        let mut j_mins: Vec<i64> = Vec::with_capacity(n + 1);
        j_mins.push(0);
        let mut branchings = Vec::with_capacity(n);

        let (mut j_min, mut j_max) = (0i64, 0i64);

        for i in 0..n {
            let t = grid.time(i);
            let dt = grid.dt(i);

            let v2 = process.variance(t, 0.0, dt);
            ensure!(
                v2 > 0.0 && v2.is_finite(),
                "process variance over step {i} (t = {t}, dt = {dt}) must be positive, got {v2}"
            );
            let v = v2.sqrt();
            let dx_next = v * 3.0_f64.sqrt();

            let mut branching = Branching::with_capacity((j_max - j_min + 1) as Size);
            for j in j_min..=j_max {
                let x = x0 + j as Real * dx[i];
                let m = process.expectation(t, x, dt);
                let k = ((m - x0) / dx_next + 0.5).floor() as i64;

                let e = m - (x0 + k as Real * dx_next);
                let e2 = e * e;
                let e3 = e * 3.0_f64.sqrt();

                let p_down = (1.0 + e2 / v2 - e3 / v) / 6.0;
                let p_mid = (2.0 - e2 / v2) / 3.0;
                let p_up = (1.0 + e2 / v2 + e3 / v) / 6.0;

                branching.add(k, p_down, p_mid, p_up);
            }

            j_min = branching.j_min;
            j_max = branching.j_max;
            dx.push(dx_next);
            j_mins.push(j_min);
            branchings.push(branching);
        }

        Ok(Self {
            x0,
            dx,
            j_min: j_mins,
            branchings,
            time_grid: grid.clone(),
        })
    }

    /// The time grid the tree was built on.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.time_grid.steps()
    }

    /// Number of nodes at time slice `i`.
    pub fn size(&self, i: Size) -> Size {
        if i == 0 {
            1
        } else {
            self.branchings[i - 1].size()
        }
    }

    /// Node spacing at slice `i` (zero for the root slice).
    pub fn dx(&self, i: Size) -> Real {
        self.dx[i]
    }

    /// State value at node `(i, index)`.
    pub fn underlying(&self, i: Size, index: Size) -> Real {
        self.x0 + (self.j_min[i] + index as i64) as Real * self.dx[i]
    }

    /// Descendant index at step `i` for node `index` and `branch` (0..2).
    pub fn descendant(&self, i: Size, index: Size, branch: Size) -> Size {
        self.branchings[i].descendant(index, branch)
    }

    /// Transition probability at step `i`, node `index`, branch `branch`.
    pub fn probability(&self, i: Size, index: Size, branch: Size) -> Real {
        self.branchings[i].probability(index, branch)
    }

    /// Conditional expectation over one step: maps values on slice `i + 1`
    /// to probability-weighted values on slice `i`, without discounting.
    pub fn expectation_step(&self, i: Size, next: &[Real]) -> Vec<Real> {
        (0..self.size(i))
            .map(|j| {
                (0..3)
                    .map(|b| self.probability(i, j, b) * next[self.descendant(i, j, b)])
                    .sum()
            })
            .collect()
    }
}
