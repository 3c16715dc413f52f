//! Unit tests for mapf-warehouse.

#[cfg(test)]
mod helpers {
    use mapf_core::{Configuration, Solution};
    use mapf_graph::{parse_map, Graph};

    /// ```text
    /// y=0  U . . .
    /// y=1  . H H C
    /// y=2  . . . .
    /// ```
    pub fn strip() -> Graph {
        parse_map("type octile\nheight 3\nwidth 4\nmap\nU...\n.HHC\n....\n".as_bytes(), false).unwrap()
    }

    /// Two shelf rows, two cache blocks, one port.
    pub fn warehouse() -> Graph {
        let rows = ["U.....", "......", ".HH.C.", "......", ".HH.C.", "......"];
        let text = format!("type octile\nheight 6\nwidth 6\nmap\n{}\n", rows.join("\n"));
        parse_map(text.as_bytes(), false).unwrap()
    }

    /// Moves along edges, no vertex or swap conflicts.
    pub fn assert_valid_moves(g: &Graph, solution: &Solution) {
        for (t, frame) in solution.iter().enumerate() {
            assert_eq!(frame.first_duplicate(), None, "vertex conflict at t={t}");
            if t == 0 {
                continue;
            }
            let prev: &Configuration = &solution[t - 1];
            for (i, v) in frame.iter() {
                let u = prev.get(i);
                assert!(u == v || g.is_adjacent(u, v), "{i} jumps at t={t}");
                for (j, w) in frame.iter() {
                    assert!(i == j || !(v == prev.get(j) && w == u), "swap at t={t}");
                }
            }
        }
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use mapf_core::{PlannerRng, VertexId};

    use crate::{Cache, CacheError, CacheKind};

    const A: VertexId = VertexId(10);
    const B: VertexId = VertexId(11);
    const X: VertexId = VertexId(1);
    const Y: VertexId = VertexId(2);
    const Z: VertexId = VertexId(3);

    fn cache(kind: CacheKind) -> Cache {
        Cache::new(kind, &[A, B], PlannerRng::new(7)).unwrap()
    }

    /// Store `cargo` through the reserve/commit path.
    fn store(c: &mut Cache, cargo: VertexId) -> VertexId {
        let block = c.try_insert_cache(cargo).unwrap();
        c.update_cargo_into_cache(cargo, block).unwrap();
        block
    }

    #[test]
    fn miss_then_hit_after_insert() {
        let mut c = cache(CacheKind::Lru);
        assert_eq!(c.try_cache_cargo(X), None);
        let block = store(&mut c, X);
        assert_eq!(block, A, "first free block is used first");
        assert!(c.contains(X));
        assert_eq!(c.try_cache_cargo(X), Some(A));
        assert_eq!(c.blocks()[0].get_lock, 1);
    }

    #[test]
    fn reserved_cargo_is_not_a_hit() {
        let mut c = cache(CacheKind::Fifo);
        c.try_insert_cache(X).unwrap();
        assert!(c.is_coming(X));
        assert!(!c.contains(X));
        assert_eq!(c.try_cache_cargo(X), None);
    }

    #[test]
    fn duplicate_insert_is_refused() {
        let mut c = cache(CacheKind::Lru);
        c.try_insert_cache(X).unwrap();
        assert_eq!(c.try_insert_cache(X), None, "already coming");
        let mut c = cache(CacheKind::Lru);
        store(&mut c, X);
        assert_eq!(c.try_insert_cache(X), None, "already stored");
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut c = cache(CacheKind::Lru);
        store(&mut c, X);
        store(&mut c, Y);
        let a = c.try_cache_cargo(X).unwrap();
        c.update_cargo_from_cache(X, a).unwrap();

        assert_eq!(c.try_insert_cache(Z), Some(B));
        assert!(!c.contains(Y), "victim forgets its cargo at reservation");
        assert!(c.contains(X));
    }

    #[test]
    fn fifo_evicts_oldest_insert() {
        let mut c = cache(CacheKind::Fifo);
        store(&mut c, X);
        store(&mut c, Y);
        let a = c.try_cache_cargo(X).unwrap();
        c.update_cargo_from_cache(X, a).unwrap();

        assert_eq!(c.try_insert_cache(Z), Some(A));
        assert!(!c.contains(X));
        assert!(c.contains(Y));
    }

    #[test]
    fn locked_blocks_are_never_victims() {
        let mut c = cache(CacheKind::Fifo);
        store(&mut c, X);
        store(&mut c, Y);
        c.try_cache_cargo(X).unwrap(); // A stays locked
        assert_eq!(c.try_insert_cache(Z), Some(B));

        // Now A is fetch-locked and B is insert-locked.
        assert_eq!(c.try_insert_cache(VertexId(4)), None);
    }

    #[test]
    fn random_picks_the_only_unlocked_block() {
        let mut c = cache(CacheKind::Random);
        store(&mut c, X);
        store(&mut c, Y);
        c.try_cache_cargo(Y).unwrap();
        for _ in 0..5 {
            let block = c.try_insert_cache(Z).unwrap();
            assert_eq!(block, A);
            c.update_cargo_into_cache(Z, block).unwrap();
            // Fetch and release so the block can be chosen again.
            let got = c.try_cache_cargo(Z).unwrap();
            c.update_cargo_from_cache(Z, got).unwrap();
            c.try_insert_cache(X).unwrap();
            c.update_cargo_into_cache(X, A).unwrap();
        }
    }

    #[test]
    fn misuse_is_reported() {
        let mut c = cache(CacheKind::Lru);
        assert!(matches!(
            c.update_cargo_into_cache(X, A),
            Err(CacheError::NotReserved { .. })
        ));
        assert!(matches!(
            c.update_cargo_from_cache(X, A),
            Err(CacheError::NotLocked { .. })
        ));
        assert!(matches!(
            c.update_cargo_into_cache(X, VertexId(99)),
            Err(CacheError::UnknownBlock(_))
        ));
    }

    #[test]
    fn construction_errors() {
        assert!(matches!(
            Cache::new(CacheKind::None, &[A], PlannerRng::new(0)),
            Err(CacheError::NoPolicy)
        ));
        assert!(matches!(
            Cache::new(CacheKind::Lru, &[], PlannerRng::new(0)),
            Err(CacheError::NoBlocks)
        ));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("LRU".parse::<CacheKind>().unwrap(), CacheKind::Lru);
        assert_eq!("fifo".parse::<CacheKind>().unwrap(), CacheKind::Fifo);
        assert_eq!("Random".parse::<CacheKind>().unwrap(), CacheKind::Random);
        assert_eq!("none".parse::<CacheKind>().unwrap(), CacheKind::None);
        assert!("mru".parse::<CacheKind>().is_err());
        assert_eq!(CacheKind::Fifo.to_string(), "FIFO");
    }
}

// ── Goal generator ────────────────────────────────────────────────────────────

#[cfg(test)]
mod goals {
    use std::collections::HashSet;

    use mapf_core::{PlannerRng, VertexId};

    use crate::GoalGenerator;

    fn shelves(n: u32) -> Vec<VertexId> {
        (0..n).map(VertexId).collect()
    }

    #[test]
    fn every_window_respects_the_distinct_bound() {
        let (m, k) = (6, 3);
        let generator = GoalGenerator::new(shelves(20), m, k, 300, PlannerRng::new(3));
        assert_eq!(generator.goals().len(), 300);
        for window in generator.goals().windows(m) {
            let distinct: HashSet<_> = window.iter().collect();
            assert!(distinct.len() <= k, "{} distinct in {window:?}", distinct.len());
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a = GoalGenerator::new(shelves(10), 5, 2, 50, PlannerRng::new(9));
        let b = GoalGenerator::new(shelves(10), 5, 2, 50, PlannerRng::new(9));
        assert_eq!(a.goals(), b.goals());
    }

    #[test]
    fn falls_back_to_uniform_after_the_list() {
        let mut generator = GoalGenerator::new(shelves(4), 2, 1, 3, PlannerRng::new(0));
        let listed: Vec<_> = generator.goals().to_vec();
        for &g in &listed {
            assert_eq!(generator.next_goal(), Some(g));
        }
        for _ in 0..10 {
            let g = generator.next_goal().unwrap();
            assert!(g.0 < 4);
        }
    }

    #[test]
    fn no_shelves_no_goals() {
        let mut generator = GoalGenerator::new(Vec::new(), 3, 1, 10, PlannerRng::new(0));
        assert!(generator.goals().is_empty());
        assert_eq!(generator.next_goal(), None);
    }
}

// ── Task state machine ────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use mapf_core::{AgentId, Configuration};

    use super::helpers::strip;
    use crate::{CacheKind, TaskStatus, Warehouse, WarehouseConfig, WarehouseError};

    const A0: AgentId = AgentId(0);

    fn config(cache: CacheKind) -> WarehouseConfig {
        WarehouseConfig { cache, ngoals: 10, goals_k: 2, goals_m: 4, nagents: 1, seed: 5 }
    }

    /// Episode that ends with the only agent on `v`.
    fn arrive(w: &mut Warehouse<'_>, v: mapf_core::VertexId) -> usize {
        let episode = vec![w.starts.clone(), Configuration::new(vec![v])];
        w.apply_episode(&episode).unwrap()
    }

    #[test]
    fn uncached_round_trip() {
        let g = strip();
        let port = g.unloading_ports[0];
        let mut w = Warehouse::new(&g, &config(CacheKind::None)).unwrap();
        assert_eq!(w.status(A0), TaskStatus::ToWarehouse);
        let shelf = w.cargo(A0);
        assert_eq!(w.goals[A0], shelf);

        assert_eq!(arrive(&mut w, shelf), 0);
        assert_eq!(w.status(A0), TaskStatus::ToPortUncached);
        assert_eq!(w.goals[A0], port);

        assert_eq!(arrive(&mut w, port), 1);
        assert_eq!(w.delivery_steps, vec![2]);
        assert_eq!(w.status(A0), TaskStatus::ToWarehouse);
        assert_eq!(w.goals[A0], w.cargo(A0));
        assert_eq!(w.cache_access, 0, "no cache, no accesses");
    }

    #[test]
    fn cached_round_trip_then_hit() {
        let g = strip();
        let port = g.unloading_ports[0];
        let block = g.cache_blocks[0];
        let mut w = Warehouse::new(&g, &config(CacheKind::Lru)).unwrap();
        let shelf = w.cargo(A0);

        arrive(&mut w, shelf);
        assert_eq!(w.status(A0), TaskStatus::ToCacheInsert);
        assert_eq!(w.goals[A0], block);

        arrive(&mut w, block);
        assert_eq!(w.status(A0), TaskStatus::ToPortCached);
        assert!(w.cache().unwrap().contains(shelf));

        assert_eq!(arrive(&mut w, port), 1);
        assert_eq!(w.cache_access, 1);
        let next = w.cargo(A0);
        if next == shelf {
            assert_eq!(w.status(A0), TaskStatus::ToCacheHit);
            assert_eq!(w.goals[A0], block);
            assert_eq!(w.cache_hit, 1);
        } else {
            assert_eq!(w.status(A0), TaskStatus::ToWarehouse);
            assert_eq!(w.cache_hit, 0);
        }
    }

    #[test]
    fn unfinished_episode_keeps_state() {
        let g = strip();
        let mut w = Warehouse::new(&g, &config(CacheKind::None)).unwrap();
        let goal = w.goals[A0];
        let elsewhere = g.vertices().find(|&v| v != goal).unwrap();
        assert_eq!(arrive(&mut w, elsewhere), 0);
        assert_eq!(w.status(A0), TaskStatus::ToWarehouse);
        assert_eq!(w.goals[A0], goal);
        assert_eq!(w.starts[A0], elsewhere);
    }

    #[test]
    fn rejects_bad_configs() {
        let g = strip();
        let bad = WarehouseConfig { goals_k: 0, ..config(CacheKind::None) };
        assert!(matches!(Warehouse::new(&g, &bad), Err(WarehouseError::Config(_))));

        let no_port = mapf_graph::GridBuilder::new(3, 3).unwrap().build(false);
        assert!(matches!(
            Warehouse::new(&no_port, &config(CacheKind::None)),
            Err(WarehouseError::NoUnloadingPort)
        ));

        let crowded = WarehouseConfig { nagents: 50, ..config(CacheKind::None) };
        assert!(matches!(Warehouse::new(&g, &crowded), Err(WarehouseError::Instance(_))));
    }
}

// ── Life-long driver ──────────────────────────────────────────────────────────

#[cfg(test)]
mod lifelong {
    use mapf_core::PlannerConfig;
    use mapf_instance::Instance;
    use mapf_planner::PlanReport;

    use super::helpers::{assert_valid_moves, warehouse};
    use crate::{run_lifelong, CacheKind, EpisodeObserver, NoopObserver, WarehouseConfig};

    fn config(cache: CacheKind) -> WarehouseConfig {
        WarehouseConfig { cache, ngoals: 12, goals_k: 2, goals_m: 6, nagents: 4, seed: 11 }
    }

    #[derive(Default)]
    struct Counter {
        episodes: usize,
        finished: Option<usize>,
    }

    impl EpisodeObserver for Counter {
        fn on_episode(&mut self, _episode: usize, _ins: &Instance<'_>, report: &PlanReport) {
            assert!(report.is_solved());
            self.episodes += 1;
        }

        fn on_finish(&mut self, _episodes: usize, delivered: usize) {
            self.finished = Some(delivered);
        }
    }

    #[test]
    fn delivers_all_requests_without_cache() {
        let g = warehouse();
        let mut obs = Counter::default();
        let report = run_lifelong(&g, &config(CacheKind::None), &PlannerConfig::default(), &mut obs).unwrap();

        assert!(report.completed);
        assert_eq!(report.delivered, 12);
        assert_eq!(report.delivery_steps.len(), 12);
        assert_eq!(report.cache_hit_rate, 0.0);
        assert_eq!(obs.episodes, report.episodes);
        assert_eq!(obs.finished, Some(12));
        assert_eq!(report.total_steps, report.episode_lengths.iter().sum::<usize>());
        assert_eq!(report.solution.len(), report.total_steps + 1);
        assert_valid_moves(&g, &report.solution);
    }

    #[test]
    fn delivers_all_requests_with_each_policy() {
        let g = warehouse();
        for kind in [CacheKind::Lru, CacheKind::Fifo, CacheKind::Random] {
            let report =
                run_lifelong(&g, &config(kind), &PlannerConfig::default(), &mut NoopObserver).unwrap();
            assert!(report.completed, "{kind} did not finish");
            assert_eq!(report.delivered, 12);
            assert!((0.0..=1.0).contains(&report.cache_hit_rate));
            assert_valid_moves(&g, &report.solution);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let g = warehouse();
        let a = run_lifelong(&g, &config(CacheKind::Lru), &PlannerConfig::default(), &mut NoopObserver).unwrap();
        let b = run_lifelong(&g, &config(CacheKind::Lru), &PlannerConfig::default(), &mut NoopObserver).unwrap();
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.delivery_steps, b.delivery_steps);
    }
}
