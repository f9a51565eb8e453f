use std::{cmp::Ordering, str::FromStr};

use log::debug;

use crate::{error::ParseOptionError, queue::Queue};

mod bottom_up;
pub mod compare;
mod mergesort;

pub use compare::{lexicographic, natural};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Lexicographic,
    Natural,
}

impl SortOrder {
    pub fn comparator(self) -> fn(&str, &str) -> Ordering {
        match self {
            SortOrder::Lexicographic => lexicographic,
            SortOrder::Natural => natural,
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicographic" | "lex" => Ok(SortOrder::Lexicographic),
            "natural" | "nat" => Ok(SortOrder::Natural),
            _ => Err(ParseOptionError::new("sort order", s)),
        }
    }
}

/// How the merge sort walks the list. Both produce the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Recursive split and merge; stack depth grows with `log n`.
    TopDown,
    /// Iterative merging of doubling runs; constant stack depth.
    #[default]
    BottomUp,
}

impl FromStr for MergeStrategy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-down" | "topdown" => Ok(MergeStrategy::TopDown),
            "bottom-up" | "bottomup" => Ok(MergeStrategy::BottomUp),
            _ => Err(ParseOptionError::new("merge strategy", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub order: SortOrder,
    pub strategy: MergeStrategy,
}

impl SortOptions {
    pub fn new(order: SortOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_strategy(self, strategy: MergeStrategy) -> Self {
        Self { strategy, ..self }
    }
}

impl Queue {
    /// Sorts the elements into non-descending order by relinking nodes; no
    /// element is allocated, copied or freed.
    pub fn sort(&mut self, options: SortOptions) {
        debug!("sorting {} elements with {:?}", self.size(), options);
        self.sort_with(options.strategy, options.order.comparator())
    }

    /// Sorts with a caller supplied comparator using the default strategy.
    pub fn sort_by<F>(&mut self, cmp: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.sort_with(MergeStrategy::default(), cmp)
    }

    fn sort_with<F>(&mut self, strategy: MergeStrategy, mut cmp: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        if self.size() < 2 {
            return;
        }

        self.relink(|nodes, head, len| match strategy {
            MergeStrategy::TopDown => mergesort::sort(nodes, head, &mut cmp),
            MergeStrategy::BottomUp => bottom_up::sort(nodes, head, len, &mut cmp),
        });
    }
}
