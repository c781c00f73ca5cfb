//! Water additive solver
//!
//! Finds salt and acid dosing rates that move a starting water toward a
//! target ion profile.
//!
//! # Formulation
//!
//! ```text
//! variables   x_j ≥ 0            dosing rate of addition j, mg/L
//! objective   min/max Σ x_j
//! ion i       s_i + Σ A_ij x_j  (≥ | ≤ | =)  t_i     per IonConstraint
//! always      s_i + Σ A_ij x_j  ≥ 0
//! disallowed  x_j = 0
//! ```
//!
//! `A` is the fixed 6×9 molar-mass coefficient matrix from
//! [`WaterSalt::matrix`]. Disallowed additions stay in the variable set and
//! are pinned to zero so every program has the same shape.
//!
//! [`best_fit`] searches every goal and per-ion constraint direction
//! (2 × 3⁶ = 1,458 programs) and keeps the feasible solution whose treated
//! profile is closest to the target by mean squared error.

use super::profile::{Ion, WaterProfile};
use super::salts::{SaltAdditions, SaltMatrix, WaterSalt, SALT_COUNT};
use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Direction constraint on one ion's treated concentration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IonConstraint {
    #[default]
    DontCare,
    AtLeast,
    AtMost,
    Exactly,
}

impl IonConstraint {
    /// The directions the best-fit search enumerates
    pub const SEARCHED: [IonConstraint; 3] = [
        IonConstraint::DontCare,
        IonConstraint::AtLeast,
        IonConstraint::AtMost,
    ];

    fn comparison(self) -> Option<ComparisonOp> {
        match self {
            IonConstraint::DontCare => None,
            IonConstraint::AtLeast => Some(ComparisonOp::Ge),
            IonConstraint::AtMost => Some(ComparisonOp::Le),
            IonConstraint::Exactly => Some(ComparisonOp::Eq),
        }
    }
}

/// Objective applied to the total dosing rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    Minimise,
    Maximise,
}

impl Goal {
    pub const ALL: [Goal; 2] = [Goal::Minimise, Goal::Maximise];

    fn direction(self) -> OptimizationDirection {
        match self {
            Goal::Minimise => OptimizationDirection::Minimize,
            Goal::Maximise => OptimizationDirection::Maximize,
        }
    }
}

/// Number of programs [`best_fit`] solves
pub const SEARCH_SIZE: usize = 2 * 729;

/// Dosing rates for the given goal and constraints.
///
/// Returns `None` when the program is infeasible or unbounded; neither is an
/// error, the caller simply has no solution for that combination.
pub fn calc_additions(
    start: &WaterProfile,
    target: &WaterProfile,
    allowed: &[WaterSalt],
    constraints: &[IonConstraint; 6],
    goal: Goal,
) -> Option<SaltAdditions> {
    let matrix = WaterSalt::matrix();
    let mut problem = Problem::new(goal.direction());

    let vars: Vec<_> = (0..SALT_COUNT)
        .map(|_| problem.add_var(1.0, (0.0, f64::INFINITY)))
        .collect();

    for salt in WaterSalt::ALL {
        if !allowed.contains(&salt) {
            let mut pin = LinearExpr::empty();
            pin.add(vars[salt.index()], 1.0);
            problem.add_constraint(pin, ComparisonOp::Eq, 0.0);
        }
    }

    for ion in Ion::ALL {
        let row = ion.index();
        let start_ppm = start.get(ion).ppm();

        problem.add_constraint(ion_change(&vars, &matrix, row), ComparisonOp::Ge, -start_ppm);

        if let Some(op) = constraints[row].comparison() {
            problem.add_constraint(
                ion_change(&vars, &matrix, row),
                op,
                target.get(ion).ppm() - start_ppm,
            );
        }
    }

    match problem.solve() {
        Ok(solution) => {
            let mut rates = [0.0; SALT_COUNT];
            for (rate, var) in rates.iter_mut().zip(&vars) {
                // Clamp simplex round-off
                *rate = solution[*var].max(0.0);
            }
            Some(SaltAdditions::new(rates))
        }
        Err(e) => {
            debug!("no solution for {goal:?} {constraints:?}: {e}");
            None
        }
    }
}

/// `Σ A_ij x_j` for ion row `row`
fn ion_change(vars: &[Variable], matrix: &SaltMatrix, row: usize) -> LinearExpr {
    let mut expr = LinearExpr::empty();
    for (col, var) in vars.iter().enumerate() {
        let coefficient = matrix[(row, col)];
        if coefficient != 0.0 {
            expr.add(*var, coefficient);
        }
    }
    expr
}

/// Best solution found by [`best_fit`]
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub additions: SaltAdditions,
    /// `start` treated with `additions`
    pub profile: WaterProfile,
    pub mse: f64,
    pub goal: Goal,
    pub constraints: [IonConstraint; 6],
    /// Position of the winning combination in the fixed enumeration order
    pub index: usize,
}

/// Goal and constraint set for enumeration position `index`
fn combination(index: usize) -> (Goal, [IonConstraint; 6]) {
    let goal = Goal::ALL[index / 729];
    let mut rest = index % 729;
    let mut constraints = [IonConstraint::DontCare; 6];
    for c in &mut constraints {
        *c = IonConstraint::SEARCHED[rest % 3];
        rest /= 3;
    }
    (goal, constraints)
}

/// Exhaustive search over goals and constraint directions.
///
/// Ties in MSE resolve to the earliest combination in enumeration order, so
/// the result does not depend on the number of worker threads. Returns `None`
/// only if no combination is feasible.
pub fn best_fit(
    start: &WaterProfile,
    target: &WaterProfile,
    allowed: &[WaterSalt],
) -> Option<FitResult> {
    let best = (0..SEARCH_SIZE)
        .into_par_iter()
        .filter_map(|index| {
            let (goal, constraints) = combination(index);
            let additions = calc_additions(start, target, allowed, &constraints, goal)?;
            let profile = additions.apply(start);
            let mse = profile.mse(target);
            Some(FitResult {
                additions,
                profile,
                mse,
                goal,
                constraints,
                index,
            })
        })
        .min_by(|a, b| a.mse.total_cmp(&b.mse).then(a.index.cmp(&b.index)));

    if let Some(fit) = &best {
        info!(
            "water best fit: mse {:.3} from combination {} ({:?})",
            fit.mse, fit.index, fit.goal
        );
    }
    best
}
