//! Step ordering
//!
//! Steps form a graph with an edge `A → B` whenever a volume A writes is one
//! B reads. Two steps that both read and write the same volume (a lauter and
//! a sparge draining one mash) are not linked through it; their order comes
//! from the fixed per-kind rank instead.
//!
//! # Algorithm
//! 1. Edges are added one at a time; an edge whose target already reaches
//!    its source would close a cycle and aborts the sort
//! 2. Kahn's algorithm emits ready steps by `(sort order, original index)`,
//!    so unrelated steps come out in a stable, documented order

use crate::error::{BrewError, BrewResult};
use crate::process::ProcessStep;
use std::collections::BTreeSet;
use tracing::debug;

/// Whether `consumer` reads something `producer` writes, ignoring volumes
/// both of them update in place
fn feeds(producer: &ProcessStep, consumer: &ProcessStep) -> bool {
    let produced = producer.output_volumes();
    let consumed_by_producer = producer.input_volumes();
    let consumed = consumer.input_volumes();
    let produced_by_consumer = consumer.output_volumes();
    produced.iter().any(|name| {
        consumed.contains(name)
            && !(consumed_by_producer.contains(name) && produced_by_consumer.contains(name))
    })
}

/// Depth-first reachability over the edges added so far
fn reaches(successors: &[Vec<usize>], from: usize, to: usize) -> bool {
    let mut visited = vec![false; successors.len()];
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if std::mem::replace(&mut visited[node], true) {
            continue;
        }
        stack.extend(successors[node].iter().copied());
    }
    false
}

/// Execution order of `steps`, as indices into the slice
///
/// # Errors
/// [`BrewError::CircularDependency`] naming the two steps whose link would
/// close a cycle.
pub fn sort_steps(steps: &[ProcessStep]) -> BrewResult<Vec<usize>> {
    let n = steps.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (a, producer) in steps.iter().enumerate() {
        for (b, consumer) in steps.iter().enumerate() {
            if a == b || !feeds(producer, consumer) {
                continue;
            }
            if reaches(&successors, b, a) {
                return Err(BrewError::CircularDependency {
                    from: producer.name.clone(),
                    to: consumer.name.clone(),
                });
            }
            successors[a].push(b);
        }
    }

    let mut in_degree = vec![0_usize; n];
    for &b in successors.iter().flatten() {
        in_degree[b] += 1;
    }
    let mut ready: BTreeSet<(u32, usize)> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(|i| (steps[i].sort_order(), i))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some((_, i)) = ready.pop_first() {
        order.push(i);
        for &b in &successors[i] {
            in_degree[b] -= 1;
            if in_degree[b] == 0 {
                ready.insert((steps[b].sort_order(), b));
            }
        }
    }

    debug!(
        "step order: {:?}",
        order.iter().map(|&i| steps[i].name.as_str()).collect::<Vec<_>>()
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{FluidVolume, Temperature, Time};
    use crate::process::{Boil, Dilute, Lauter, Mash, MashInfusion, Package, StepKind, BatchSparge};

    fn names(steps: &[ProcessStep], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| steps[i].name.clone()).collect()
    }

    fn mash() -> ProcessStep {
        ProcessStep::new(
            "Mash",
            StepKind::Mash(Mash::new("mash", Time::from_minutes(60.0), Temperature::new(20.0))),
        )
    }

    #[test]
    fn test_updaters_follow_sort_order() {
        let steps = vec![
            ProcessStep::new("Sparge", StepKind::BatchSparge(BatchSparge::new("mash", "wort"))),
            ProcessStep::new("Lauter", StepKind::Lauter(Lauter::new("mash", "wort"))),
            ProcessStep::new(
                "Infusion",
                StepKind::MashInfusion(MashInfusion::new("mash", Time::from_minutes(30.0))),
            ),
            mash(),
        ];
        let order = sort_steps(&steps).unwrap();
        assert_eq!(names(&steps, &order), vec!["Mash", "Infusion", "Lauter", "Sparge"]);
    }

    #[test]
    fn test_unrelated_steps_tie_break_on_index() {
        let steps = vec![
            ProcessStep::new("B", StepKind::Dilute(Dilute::new("x", "y"))),
            ProcessStep::new("A", StepKind::Dilute(Dilute::new("p", "q"))),
        ];
        assert_eq!(sort_steps(&steps).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_two_step_cycle() {
        let steps = vec![
            ProcessStep::new("Boil", StepKind::Boil(Boil::new("a", "b", Time::from_minutes(60.0)))),
            ProcessStep::new(
                "Package",
                StepKind::Package(Package::new("b", "a", FluidVolume::ZERO)),
            ),
        ];
        let err = sort_steps(&steps).unwrap_err();
        assert!(matches!(err, BrewError::CircularDependency { .. }));
    }
}
