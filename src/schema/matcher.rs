//! Matching child type sequences against grammar expressions.
//!
//! Works on sets of reachable input positions rather than backtracking, so
//! every alternative is explored exactly once per position.

use std::collections::BTreeSet;

use super::Expr;
use crate::model::NodeType;

/// Check whether `expr` matches the whole of `input`.
pub fn matches(expr: &Expr, input: &[NodeType]) -> bool {
    ends(expr, input, &BTreeSet::from([0])).contains(&input.len())
}

/// Positions reachable after matching `expr` from any of `starts`.
fn ends(expr: &Expr, input: &[NodeType], starts: &BTreeSet<usize>) -> BTreeSet<usize> {
    match expr {
        Expr::Empty => starts.clone(),
        Expr::Node(kind) => starts
            .iter()
            .filter(|&&p| input.get(p) == Some(kind))
            .map(|p| p + 1)
            .collect(),
        Expr::Seq(items) => items
            .iter()
            .fold(starts.clone(), |positions, item| ends(item, input, &positions)),
        Expr::Choice(alternatives) => alternatives
            .iter()
            .flat_map(|alt| ends(alt, input, starts))
            .collect(),
        Expr::Repeat { expr, min, max } => repeat_ends(expr, *min, *max, input, starts),
    }
}

fn repeat_ends(
    expr: &Expr,
    min: usize,
    max: Option<usize>,
    input: &[NodeType],
    starts: &BTreeSet<usize>,
) -> BTreeSet<usize> {
    let mut result = BTreeSet::new();
    if min == 0 {
        result.extend(starts.iter().copied());
    }

    // An inner expression that can match empty input would loop forever
    // without a bound; no match needs more rounds than positions plus `min`.
    let limit = max.unwrap_or(input.len() + min + 1);
    let mut seen = starts.clone();
    let mut current = starts.clone();

    for count in 1..=limit {
        let next = ends(expr, input, &current);
        if next.is_empty() {
            break;
        }
        if count >= min {
            result.extend(next.iter().copied());
            if next.is_subset(&seen) {
                break;
            }
        }
        seen.extend(next.iter().copied());
        current = next;
    }

    result
}
