//! Property-based tests for the country border graph.
//!
//! Run with: cargo test --release prop_graph

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::OnceLock;

use proptest::prelude::*;

use geodash::{Continent, CountryCode, Region, Rng, World};

fn world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(|| World::embedded().unwrap())
}

fn bordered() -> &'static [CountryCode] {
    static CODES: OnceLock<Vec<CountryCode>> = OnceLock::new();
    CODES.get_or_init(|| world().graph().connected().collect())
}

fn any_bordered() -> impl Strategy<Value = CountryCode> {
    (0..bordered().len()).prop_map(|i| bordered()[i])
}

fn any_region() -> impl Strategy<Value = Region> {
    prop_oneof![
        Just(Region::All),
        proptest::sample::select(Continent::ALL.to_vec()).prop_map(Region::Only),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Borders are symmetric and never self-referential.
    #[test]
    fn prop_borders_symmetric(a in any_bordered(), b in any_bordered()) {
        let graph = world().graph();
        prop_assert_eq!(graph.is_neighbor(a, b), graph.is_neighbor(b, a));
        prop_assert!(!graph.is_neighbor(a, a));
    }

    /// BFS paths are contiguous, simple and as short as any path can be.
    #[test]
    fn prop_shortest_path_minimal(a in any_bordered(), b in any_bordered()) {
        let world = world();
        let graph = world.graph();
        let Some(path) = graph.shortest_path(a, b, None) else {
            // Unreachable: nothing at any distance can be the target
            for depth in 1..=12 {
                prop_assert!(!world.countries_at_distance(a, depth, Region::All).contains(&b));
            }
            return Ok(());
        };

        prop_assert_eq!(path.first().copied(), Some(a));
        prop_assert_eq!(path.last().copied(), Some(b));
        prop_assert!(path.windows(2).all(|w| graph.is_neighbor(w[0], w[1])));
        prop_assert_eq!(path.iter().collect::<HashSet<_>>().len(), path.len());

        let hops = path.len() - 1;
        prop_assert_eq!(graph.distance(a, b), Some(hops));
        if hops > 0 {
            prop_assert!(world.countries_at_distance(a, hops, Region::All).contains(&b));
        }
        for shorter in 1..hops {
            prop_assert!(!world.countries_at_distance(a, shorter, Region::All).contains(&b));
        }
    }

    /// Excluded countries are never entered.
    #[test]
    fn prop_exclusion_respected(
        a in any_bordered(),
        b in any_bordered(),
        banned in proptest::collection::hash_set(any_bordered(), 0..6)
    ) {
        let graph = world().graph();
        if let Some(path) = graph.shortest_path(a, b, Some(&banned)) {
            let inner = path.iter().skip(1);
            prop_assert!(inner.filter(|c| **c != b).all(|c| !banned.contains(c)));
            let free = graph.shortest_path(a, b, None).unwrap();
            prop_assert!(path.len() >= free.len());
        }
    }

    /// Every country in a frontier is exactly that far away and in region.
    #[test]
    fn prop_frontier_exact(start in any_bordered(), depth in 1usize..5, region in any_region()) {
        let world = world();
        for code in world.countries_at_distance(start, depth, region) {
            prop_assert!(world.catalog().in_region(code, region));
            prop_assert!(code != start);
            if region == Region::All {
                prop_assert_eq!(world.graph().distance(start, code), Some(depth));
            }
        }
    }

    /// Random starts are always land-bordered and in region when possible.
    #[test]
    fn prop_random_connected(seed in any::<u64>(), region in any_region()) {
        let world = world();
        let code = world.random_connected(region, &mut Rng::new(seed)).unwrap();
        prop_assert!(world.graph().has_land_borders(code));
    }
}
