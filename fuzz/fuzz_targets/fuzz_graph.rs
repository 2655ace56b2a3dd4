#![no_main]

//! Dataset loading and graph query fuzzer.
//!
//! Feeds arbitrary adjacency tables through validation. Whatever survives
//! must answer path and frontier queries consistently.

use std::collections::{BTreeMap, HashSet};

use arbitrary::Arbitrary;
use geodash::{CountryCode, CountryGraph};
use libfuzzer_sys::fuzz_target;

const CODES: [&str; 12] = ["AA", "BB", "CC", "DD", "EE", "FF", "GG", "HH", "II", "JJ", "KK", "LL"];

#[derive(Arbitrary, Debug)]
struct GraphInput {
    /// Directed edges as indices into `CODES`.
    edges: Vec<(u8, u8)>,
    /// Mirror every edge so the table is symmetric.
    symmetric: bool,
    /// Query endpoints.
    from: u8,
    to: u8,
    /// Countries barred from the path.
    exclude: Vec<u8>,
    depth: u8,
}

fn code(index: u8) -> CountryCode {
    CountryCode::from_static(CODES[usize::from(index) % CODES.len()])
}

fuzz_target!(|input: GraphInput| {
    let mut adjacency: BTreeMap<CountryCode, Vec<CountryCode>> = BTreeMap::new();
    for &(a, b) in input.edges.iter().take(64) {
        let (a, b) = (code(a), code(b));
        let forward = adjacency.entry(a).or_default();
        if !forward.contains(&b) {
            forward.push(b);
        }
        if input.symmetric {
            let backward = adjacency.entry(b).or_default();
            if !backward.contains(&a) {
                backward.push(a);
            }
        }
    }

    // Rejection is fine; panics are not
    let Ok(graph) = CountryGraph::new(adjacency) else {
        return;
    };

    for a in graph.connected() {
        for &b in graph.neighbors(a) {
            assert!(graph.is_neighbor(b, a), "asymmetric border {a}-{b}");
            assert_ne!(a, b);
        }
    }

    let (from, to) = (code(input.from), code(input.to));
    let banned: HashSet<CountryCode> = input.exclude.iter().take(8).map(|&i| code(i)).collect();
    let free = graph.shortest_path(from, to, None);
    if let Some(path) = &free {
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        assert!(path.windows(2).all(|w| graph.is_neighbor(w[0], w[1])));
        assert_eq!(graph.distance(from, to), Some(path.len() - 1));
    }
    if let Some(path) = graph.shortest_path(from, to, Some(&banned)) {
        let free = free.expect("an excluding path implies a free path");
        assert!(path.len() >= free.len());
        assert!(path[1..].iter().filter(|c| **c != to).all(|c| !banned.contains(c)));
    }

    let depth = usize::from(input.depth % 6) + 1;
    for reached in graph.countries_at_distance(from, depth, |_| true) {
        assert_eq!(graph.distance(from, reached), Some(depth));
    }
});
