use std::cmp::Ordering;

use crate::queue::{Arena, Link, NodeId};

/// Recursive merge sort of the chain starting at `head`. Returns the new head.
pub(crate) fn sort<F>(nodes: &mut Arena, head: Link, cmp: &mut F) -> Link
where
    F: FnMut(&str, &str) -> Ordering,
{
    let first = head?;
    if nodes.next(first).is_none() {
        return head;
    }

    let (front, back) = split(nodes, first);
    let front = sort(nodes, Some(front), cmp);
    let back = sort(nodes, back, cmp);

    merge(nodes, front, back, cmp).0
}

/// Cuts the chain in two with a fast/slow walk. For `n` nodes the front keeps
/// `⌈n/2⌉` of them and the back gets the rest.
pub(crate) fn split(nodes: &mut Arena, head: NodeId) -> (NodeId, Link) {
    let mut slow = head;
    let mut fast = nodes.next(head);

    while let Some(ahead) = fast {
        fast = nodes.next(ahead);
        if let Some(ahead) = fast {
            if let Some(next) = nodes.next(slow) {
                slow = next;
            }
            fast = nodes.next(ahead);
        }
    }

    let back = nodes.next(slow);
    nodes.set_next(slow, None);
    (head, back)
}

/// Merges two sorted, terminated chains. Ties take from `a`.
///
/// Returns the head and the last node of the merged chain.
pub(crate) fn merge<F>(nodes: &mut Arena, mut a: Link, mut b: Link, cmp: &mut F) -> (Link, Link)
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut head = None;
    let mut last: Link = None;

    loop {
        let taken = match (a, b) {
            (Some(x), Some(y)) => {
                if cmp(nodes.value(x), nodes.value(y)) != Ordering::Greater {
                    a = nodes.next(x);
                    x
                } else {
                    b = nodes.next(y);
                    y
                }
            }
            (rest, None) | (None, rest) => {
                match last {
                    Some(last) => nodes.set_next(last, rest),
                    None => head = rest,
                }
                let tail = rest.map(|rest| nodes.last(rest)).or(last);
                return (head, tail);
            }
        };

        match last {
            Some(last) => nodes.set_next(last, Some(taken)),
            None => head = Some(taken),
        }
        last = Some(taken);
    }
}
