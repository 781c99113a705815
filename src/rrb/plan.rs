//! Rebalance planner used by concatenation.
//!
//! For a count of `k` slots (elements or children) the plan says how many
//! nodes of `BRANCHING` slots, how many of `BRANCHING - 1` slots, and how
//! large a final remainder node to build. The table covers every `k` below
//! `2 * BRANCHING * BRANCHING`, the most slots two adjoining boundary regions
//! can hold.

use std::sync::LazyLock;

use crate::rrb::node::BRANCHING;

/// Number of entries in the plan table.
pub const PLAN_LEN: usize = 2 * BRANCHING * BRANCHING;

/// How to pack a run of slots into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Plan {
    /// Nodes holding `BRANCHING` slots.
    pub full: usize,
    /// Nodes holding `BRANCHING - 1` slots.
    pub near_full: usize,
    /// Slots of the remainder node, 0 when there is none.
    pub leftover: usize,
}

impl Plan {
    /// Number of nodes the plan produces.
    pub fn node_count(&self) -> usize {
        self.full + self.near_full + usize::from(self.leftover > 0)
    }

    /// Number of slots the plan covers.
    pub fn total(&self) -> usize {
        self.full * BRANCHING + self.near_full * (BRANCHING - 1) + self.leftover
    }

    /// Takes one node of exactly `len` slots out of the plan, if it has one.
    pub(crate) fn claim(&mut self, len: usize) -> bool {
        if len == BRANCHING && self.full > 0 {
            self.full -= 1;
        } else if len == BRANCHING - 1 && self.near_full > 0 {
            self.near_full -= 1;
        } else if len > 0 && len == self.leftover {
            self.leftover = 0;
        } else {
            return false;
        }
        true
    }

    /// Takes the next node out of the plan, largest first, and returns its
    /// slot count.
    pub(crate) fn next_node(&mut self) -> usize {
        if self.full > 0 {
            self.full -= 1;
            BRANCHING
        } else if self.near_full > 0 {
            self.near_full -= 1;
            BRANCHING - 1
        } else {
            assert!(self.leftover > 0, "rebalance plan exhausted");
            std::mem::take(&mut self.leftover)
        }
    }
}

static PLANS: LazyLock<Vec<Plan>> = LazyLock::new(build_plans);

/// The plan for `total` slots, or `None` past the end of the table.
pub fn plan(total: usize) -> Option<Plan> {
    PLANS.get(total).copied()
}

fn build_plans() -> Vec<Plan> {
    let mut plans = vec![Plan::default(); PLAN_LEN];
    for (k, entry) in plans.iter_mut().enumerate().take(BRANCHING - 1) {
        entry.leftover = k;
    }
    plans[BRANCHING - 1] = Plan {
        near_full: 1,
        ..Plan::default()
    };
    plans[BRANCHING] = Plan {
        full: 1,
        ..Plan::default()
    };
    for k in BRANCHING + 1..PLAN_LEN {
        let with_full = plans[k - BRANCHING];
        let with_near_full = plans[k - BRANCHING + 1];
        plans[k] = if with_full.leftover == 0 {
            Plan {
                full: with_full.full + 1,
                ..with_full
            }
        } else if with_near_full.leftover == 0 {
            Plan {
                near_full: with_near_full.near_full + 1,
                ..with_near_full
            }
        } else {
            let carried = plans[k - 1];
            Plan {
                leftover: carried.leftover + 1,
                ..carried
            }
        };
    }
    plans
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Whether `k` splits exactly into nodes of `BRANCHING` and
    /// `BRANCHING - 1` slots.
    fn exact_partition_exists(k: usize) -> bool {
        (0..=k / BRANCHING).any(|full| (k - full * BRANCHING) % (BRANCHING - 1) == 0)
    }

    #[test]
    fn test_base_entries() {
        assert_eq!(plan(0), Some(Plan::default()));
        assert_eq!(plan(5).unwrap().leftover, 5);
        assert_eq!(
            plan(BRANCHING - 1),
            Some(Plan {
                full: 0,
                near_full: 1,
                leftover: 0
            })
        );
        assert_eq!(
            plan(BRANCHING),
            Some(Plan {
                full: 1,
                near_full: 0,
                leftover: 0
            })
        );
        assert_eq!(plan(PLAN_LEN), None);
    }

    #[test]
    fn test_every_plan_covers_its_total() {
        for k in 0..PLAN_LEN {
            let entry = plan(k).unwrap();
            assert_eq!(entry.total(), k, "plan for {k}");
            assert!(entry.leftover <= BRANCHING - 2, "leftover too large for {k}");
        }
    }

    #[test]
    fn test_against_brute_force_partitioning() {
        for k in 0..BRANCHING * BRANCHING {
            let entry = plan(k).unwrap();
            assert_eq!(
                entry.leftover == 0,
                exact_partition_exists(k),
                "plan for {k} is {entry:?}"
            );
        }
    }

    #[test]
    fn test_carry_forward_keeps_packing() {
        // 33 slots: one full node and a single leftover slot.
        assert_eq!(
            plan(BRANCHING + 1),
            Some(Plan {
                full: 1,
                near_full: 0,
                leftover: 1
            })
        );
        // 62 slots: two near-full nodes.
        assert_eq!(plan(2 * BRANCHING - 2).unwrap().node_count(), 2);
    }

    #[test]
    fn test_claim_and_next_node() {
        let mut entry = plan(2 * BRANCHING + 5).unwrap();
        assert!(entry.claim(BRANCHING));
        assert!(!entry.claim(BRANCHING - 1));
        assert_eq!(entry.next_node(), BRANCHING);
        assert_eq!(entry.next_node(), 5);
        assert_eq!(entry.node_count(), 0);
    }
}
