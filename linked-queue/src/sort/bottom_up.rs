use std::cmp::Ordering;

use super::mergesort::merge;
use crate::queue::{Arena, Link, NodeId};

/// Iterative merge sort of a chain of `len` nodes. Each pass merges
/// neighbouring runs of `width` nodes and doubles `width`, so no recursion
/// is needed.
pub(crate) fn sort<F>(nodes: &mut Arena, mut head: Link, len: usize, cmp: &mut F) -> Link
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut width = 1;

    while width < len {
        let mut rest = head;
        let mut merged_head = None;
        let mut merged_tail: Link = None;

        while let Some(start) = rest {
            let second = detach(nodes, start, width);
            rest = second.and_then(|second| detach(nodes, second, width));

            let (run_head, run_tail) = merge(nodes, Some(start), second, cmp);
            match merged_tail {
                Some(tail) => nodes.set_next(tail, run_head),
                None => merged_head = run_head,
            }
            merged_tail = run_tail;
        }

        head = merged_head;
        width = width.saturating_mul(2);
    }

    head
}

/// Terminates the run of up to `width` nodes starting at `start` and returns
/// whatever followed it.
fn detach(nodes: &mut Arena, start: NodeId, width: usize) -> Link {
    let mut last = start;
    for _ in 1..width {
        match nodes.next(last) {
            Some(next) => last = next,
            None => return None,
        }
    }

    let rest = nodes.next(last);
    nodes.set_next(last, None);
    rest
}
