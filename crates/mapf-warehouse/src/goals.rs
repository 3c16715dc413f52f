//! Cargo request stream.
//!
//! The first `ngoals` requests are generated up front with bounded locality:
//! inside every sliding window of `goals_m` consecutive requests at most
//! `goals_k` distinct shelves appear.  Once the window already holds
//! `goals_k` distinct shelves, the next request repeats one of them.  After
//! the list is used up, requests are drawn uniformly from all shelves.

use std::collections::{HashMap, VecDeque};

use mapf_core::{PlannerRng, VertexId};

pub struct GoalGenerator {
    shelves: Vec<VertexId>,
    goals:   Vec<VertexId>,
    next:    usize,
    rng:     PlannerRng,
}

impl GoalGenerator {
    /// `goals_m` and `goals_k` must be at least 1.
    pub fn new(
        shelves: Vec<VertexId>,
        goals_m: usize,
        goals_k: usize,
        ngoals: usize,
        mut rng: PlannerRng,
    ) -> Self {
        let mut goals = Vec::with_capacity(ngoals);
        let mut window: VecDeque<VertexId> = VecDeque::with_capacity(goals_m);
        let mut counts: HashMap<VertexId, usize> = HashMap::new();
        // Distinct shelves in the window, in first-seen order.
        let mut distinct: Vec<VertexId> = Vec::with_capacity(goals_k);

        while goals.len() < ngoals {
            let Some(&drawn) = rng.choose(&shelves) else { break };

            if window.len() == goals_m {
                if let Some(old) = window.pop_front() {
                    let c = counts.entry(old).or_insert(1);
                    *c -= 1;
                    if *c == 0 {
                        counts.remove(&old);
                        distinct.retain(|&v| v != old);
                    }
                }
            }

            let goal = if distinct.len() >= goals_k {
                distinct[rng.gen_range(0..distinct.len())]
            } else {
                drawn
            };

            window.push_back(goal);
            let c = counts.entry(goal).or_insert(0);
            if *c == 0 {
                distinct.push(goal);
            }
            *c += 1;
            goals.push(goal);

            if goals.len() % 1000 == 0 {
                log::debug!("generated {}/{} goals", goals.len(), ngoals);
            }
        }

        Self { shelves, goals, next: 0, rng }
    }

    /// Pre-generated requests.
    pub fn goals(&self) -> &[VertexId] {
        &self.goals
    }

    /// Next request; uniform over shelves once the list is exhausted.
    /// `None` only when there are no shelves.
    pub fn next_goal(&mut self) -> Option<VertexId> {
        if let Some(&g) = self.goals.get(self.next) {
            self.next += 1;
            return Some(g);
        }
        self.rng.choose(&self.shelves).copied()
    }
}
