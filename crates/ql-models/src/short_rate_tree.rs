//! Short-rate trees: a trinomial state tree with the short rate, one-period
//! discount factor and Arrow-Debreu state price attached to every node.

use crate::short_rate_model::ShortRateDynamics;
use ql_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Size};
use ql_methods::{TimeGrid, TrinomialTree};

/// A trinomial tree of short rates.
///
/// Rates and one-period discounts are defined on slices `0..steps`; state
/// prices on every slice `0..=steps`, with a unit price at the root.
#[derive(Debug, Clone)]
pub struct ShortRateTree {
    tree: TrinomialTree,
    short_rates: Vec<Vec<Rate>>,
    discounts: Vec<Vec<DiscountFactor>>,
    state_prices: Vec<Vec<Real>>,
}

impl ShortRateTree {
    /// Attach short rates given by `dynamics` to the nodes of `tree`.
    pub fn new(tree: TrinomialTree, dynamics: &dyn ShortRateDynamics) -> Result<Self> {
        let grid = tree.time_grid().clone();
        Self::with_rates(tree, |i, x| dynamics.short_rate(grid.time(i), x))
    }

    /// Attach short rates given per slice index: `rate(i, x)` is the rate at
    /// state `x` on slice `i`.
    pub(crate) fn with_rates<F>(tree: TrinomialTree, rate: F) -> Result<Self>
    where
        F: Fn(Size, Real) -> Result<Rate>,
    {
        let steps = tree.steps();

        let mut short_rates = Vec::with_capacity(steps);
        let mut discounts = Vec::with_capacity(steps);
        let mut state_prices = Vec::with_capacity(steps + 1);
        state_prices.push(vec![1.0]);

        for i in 0..steps {
            let dt = tree.time_grid().dt(i);
            let rates = (0..tree.size(i))
                .map(|j| rate(i, tree.underlying(i, j)))
                .collect::<Result<Vec<_>>>()?;
            let slice_discounts: Vec<_> = rates.iter().map(|r| (-r * dt).exp()).collect();
            let next = advance_state_prices(&tree, i, &state_prices[i], &slice_discounts);

            short_rates.push(rates);
            discounts.push(slice_discounts);
            state_prices.push(next);
        }

        Ok(Self {
            tree,
            short_rates,
            discounts,
            state_prices,
        })
    }

    /// The underlying state tree.
    pub fn trinomial_tree(&self) -> &TrinomialTree {
        &self.tree
    }

    /// The time grid of the tree.
    pub fn time_grid(&self) -> &TimeGrid {
        self.tree.time_grid()
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.tree.steps()
    }

    /// Number of nodes on slice `i`.
    pub fn size(&self, i: Size) -> Size {
        self.tree.size(i)
    }

    /// State value at node `(i, j)`.
    pub fn underlying(&self, i: Size, j: Size) -> Real {
        self.tree.underlying(i, j)
    }

    /// Short rate at node `(i, j)`, for `i < steps`.
    pub fn short_rate(&self, i: Size, j: Size) -> Rate {
        self.short_rates[i][j]
    }

    /// One-period discount factor at node `(i, j)`, for `i < steps`.
    pub fn discount(&self, i: Size, j: Size) -> DiscountFactor {
        self.discounts[i][j]
    }

    /// Descendant of node `(i, j)` along `branch` (0 = down, 1 = mid, 2 = up).
    pub fn descendant(&self, i: Size, j: Size, branch: Size) -> Size {
        self.tree.descendant(i, j, branch)
    }

    /// Transition probability from node `(i, j)` along `branch`.
    pub fn probability(&self, i: Size, j: Size, branch: Size) -> Real {
        self.tree.probability(i, j, branch)
    }

    /// Arrow-Debreu state prices on slice `i`.
    pub fn state_prices(&self, i: Size) -> &[Real] {
        &self.state_prices[i]
    }

    /// Price of the zero-coupon bond maturing at the time of slice `i`.
    pub fn discount_bond(&self, i: Size) -> DiscountFactor {
        self.state_prices[i].iter().sum()
    }

    /// Tree-implied discount ratio `P(t_{i+1}) / P(t_i)`.
    pub fn forward_discount(&self, i: Size) -> DiscountFactor {
        let q = &self.state_prices[i];
        let weighted: Real = q.iter().zip(&self.discounts[i]).map(|(q, d)| q * d).sum();
        weighted / q.iter().sum::<Real>()
    }

    /// Present value at time 0 of `values` paid on slice `i`.
    pub fn present_value(&self, values: &[Real], i: Size) -> Result<Real> {
        ensure!(i <= self.steps(), "slice {i} beyond the last slice {}", self.steps());
        ensure!(
            values.len() == self.size(i),
            "expected {} values on slice {i}, got {}",
            self.size(i),
            values.len()
        );
        Ok(self.state_prices[i].iter().zip(values).map(|(q, v)| q * v).sum())
    }

    /// Discounted expectation of `values` from slice `from` back to slice `to`.
    pub fn rollback(&self, values: &[Real], from: Size, to: Size) -> Result<Vec<Real>> {
        ensure!(
            to <= from && from <= self.steps(),
            "cannot roll back from slice {from} to slice {to} on a tree with {} steps",
            self.steps()
        );
        ensure!(
            values.len() == self.size(from),
            "expected {} values on slice {from}, got {}",
            self.size(from),
            values.len()
        );

        let mut current = values.to_vec();
        for i in (to..from).rev() {
            current = self.tree.expectation_step(i, &current);
            for (v, d) in current.iter_mut().zip(&self.discounts[i]) {
                *v *= d;
            }
        }
        Ok(current)
    }
}

/// Forward induction of state prices over step `i`.
pub(crate) fn advance_state_prices(
    tree: &TrinomialTree,
    i: Size,
    state_prices: &[Real],
    discounts: &[DiscountFactor],
) -> Vec<Real> {
    let mut next = vec![0.0; tree.size(i + 1)];
    for (j, (q, d)) in state_prices.iter().zip(discounts).enumerate() {
        let weight = q * d;
        for branch in 0..3 {
            next[tree.descendant(i, j, branch)] += weight * tree.probability(i, j, branch);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_core::Time;
    use ql_processes::{OrnsteinUhlenbeckProcess, StochasticProcess1D};

    /// `r = r0 + x`, enough to exercise the tree bookkeeping.
    #[derive(Debug)]
    struct ShiftedDynamics {
        process: OrnsteinUhlenbeckProcess,
        r0: Rate,
    }

    impl ShortRateDynamics for ShiftedDynamics {
        fn process(&self) -> &dyn StochasticProcess1D {
            &self.process
        }

        fn variable(&self, _t: Time, r: Rate) -> Result<Real> {
            Ok(r - self.r0)
        }

        fn short_rate(&self, _t: Time, x: Real) -> Result<Rate> {
            Ok(self.r0 + x)
        }
    }

    fn shifted_tree(sigma: Real) -> ShortRateTree {
        let dynamics = ShiftedDynamics {
            process: OrnsteinUhlenbeckProcess::centered(0.1, sigma).unwrap(),
            r0: 0.04,
        };
        let grid = TimeGrid::uniform(2.0, 8).unwrap();
        let tree = TrinomialTree::new(dynamics.process(), &grid).unwrap();
        ShortRateTree::new(tree, &dynamics).unwrap()
    }

    #[test]
    fn root_slice() {
        let tree = shifted_tree(0.01);
        assert_eq!(tree.state_prices(0), &[1.0]);
        assert_abs_diff_eq!(tree.short_rate(0, 0), 0.04, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.discount(0, 0), (-0.04_f64 * 0.25).exp(), epsilon = 1e-15);
    }

    #[test]
    fn rollback_matches_state_prices() {
        let tree = shifted_tree(0.01);
        for i in 1..=tree.steps() {
            let ones = vec![1.0; tree.size(i)];
            let rolled = tree.rollback(&ones, i, 0).unwrap();
            assert_eq!(rolled.len(), 1);
            assert_abs_diff_eq!(rolled[0], tree.discount_bond(i), epsilon = 1e-14);
            assert_abs_diff_eq!(
                tree.present_value(&ones, i).unwrap(),
                tree.discount_bond(i),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn forward_discount_chains_to_bond_prices() {
        let tree = shifted_tree(0.01);
        for i in 0..tree.steps() {
            assert_abs_diff_eq!(
                tree.discount_bond(i) * tree.forward_discount(i),
                tree.discount_bond(i + 1),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn rollback_to_same_slice_is_identity() {
        let tree = shifted_tree(0.01);
        let values: Vec<_> = (0..tree.size(3)).map(|j| j as Real).collect();
        assert_eq!(tree.rollback(&values, 3, 3).unwrap(), values);
    }

    #[test]
    fn bad_rollback_arguments() {
        let tree = shifted_tree(0.01);
        assert!(tree.rollback(&[1.0], 0, 1).is_err());
        assert!(tree.rollback(&[1.0], 9, 0).is_err());
        assert!(tree.rollback(&[1.0, 2.0], 1, 0).is_err());
        assert!(tree.present_value(&[1.0], 2).is_err());
    }
}
