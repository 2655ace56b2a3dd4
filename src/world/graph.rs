//! Undirected land-border graph with breadth-first search queries.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::error::DataError;
use crate::rng::Rng;
use crate::world::CountryCode;

/// Adjacency graph over country codes (land borders only).
///
/// Island nations have no entry. Neighbour lists keep their dataset order,
/// which fixes the tie-break between equally short paths.
#[derive(Debug, Clone, Default)]
pub struct CountryGraph {
    adjacency: BTreeMap<CountryCode, Vec<CountryCode>>,
}

impl CountryGraph {
    /// Build a graph, rejecting self-loops and one-sided borders.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SelfBorder`] or [`DataError::AsymmetricBorder`].
    pub fn new(adjacency: BTreeMap<CountryCode, Vec<CountryCode>>) -> Result<Self, DataError> {
        for (&a, neighbors) in &adjacency {
            for &b in neighbors {
                if a == b {
                    return Err(DataError::SelfBorder(a));
                }
                let reverse = adjacency.get(&b).is_some_and(|back| back.contains(&a));
                if !reverse {
                    return Err(DataError::AsymmetricBorder { a, b });
                }
            }
        }
        Ok(Self { adjacency })
    }

    /// Neighbours of a country; empty for islands and unknown codes.
    #[must_use]
    pub fn neighbors(&self, code: CountryCode) -> &[CountryCode] {
        self.adjacency.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `b` is a land neighbour of `a`.
    #[must_use]
    pub fn is_neighbor(&self, a: CountryCode, b: CountryCode) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Whether the country has at least one graph entry.
    #[must_use]
    pub fn has_land_borders(&self, code: CountryCode) -> bool {
        self.adjacency.contains_key(&code)
    }

    /// All land-bordered countries in code order.
    pub fn connected(&self) -> impl Iterator<Item = CountryCode> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of land-bordered countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Shortest path from `start` to `end`, including both endpoints.
    ///
    /// Among equally short paths the one discovered first wins, following
    /// stored neighbour order. Codes in `exclude` are never entered.
    /// Returns `None` if unreachable or if either endpoint has no borders.
    #[must_use]
    pub fn shortest_path(
        &self,
        start: CountryCode,
        end: CountryCode,
        exclude: Option<&HashSet<CountryCode>>,
    ) -> Option<Vec<CountryCode>> {
        if start == end {
            return Some(vec![start]);
        }
        if !self.has_land_borders(start) || !self.has_land_borders(end) {
            return None;
        }

        let mut parent: HashMap<CountryCode, CountryCode> = HashMap::new();
        let mut visited: HashSet<CountryCode> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for &next in self.neighbors(current) {
                if visited.contains(&next) || exclude.is_some_and(|ex| ex.contains(&next)) {
                    continue;
                }
                parent.insert(next, current);
                if next == end {
                    return Some(Self::unwind(&parent, start, end));
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }

        None
    }

    /// Rebuild a path by following parent links back from `end`.
    fn unwind(
        parent: &HashMap<CountryCode, CountryCode>,
        start: CountryCode,
        end: CountryCode,
    ) -> Vec<CountryCode> {
        let mut path = vec![end];
        let mut node = end;
        while node != start {
            match parent.get(&node) {
                Some(&prev) => {
                    path.push(prev);
                    node = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Number of border crossings on the shortest path, if reachable.
    #[must_use]
    pub fn distance(&self, start: CountryCode, end: CountryCode) -> Option<usize> {
        self.shortest_path(start, end, None).map(|p| p.len() - 1)
    }

    /// Countries exactly `depth` hops from `start`.
    ///
    /// Traversal only enters countries accepted by `allow`: a rejected country
    /// is a dead end even if it leads further. Returns an empty list when the
    /// reachable graph is exhausted before `depth`.
    pub fn countries_at_distance(
        &self,
        start: CountryCode,
        depth: usize,
        allow: impl Fn(CountryCode) -> bool,
    ) -> Vec<CountryCode> {
        if !self.has_land_borders(start) {
            return Vec::new();
        }

        let mut visited = HashSet::from([start]);
        let mut frontier = vec![start];

        for _ in 0..depth {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for &country in &frontier {
                for &next in self.neighbors(country) {
                    if !visited.contains(&next) && allow(next) {
                        visited.insert(next);
                        next_frontier.push(next);
                    }
                }
            }
            frontier = next_frontier;
        }

        frontier
    }

    /// Uniform pick among land-bordered countries accepted by `allow`,
    /// falling back to every land-bordered country if none pass.
    pub fn random_connected(
        &self,
        rng: &mut Rng,
        allow: impl Fn(CountryCode) -> bool,
    ) -> Option<CountryCode> {
        let filtered: Vec<CountryCode> = self.connected().filter(|&c| allow(c)).collect();
        if filtered.is_empty() {
            let all: Vec<CountryCode> = self.connected().collect();
            return rng.choose(&all).copied();
        }
        rng.choose(&filtered).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &'static str) -> CountryCode {
        CountryCode::from_static(s)
    }

    /// A small line with a side branch:
    /// `AA - BB - CC - DD` plus `BB - EE - DD` and isolated-from-graph `ZZ`.
    fn sample() -> CountryGraph {
        let edges = [("AA", "BB"), ("BB", "CC"), ("CC", "DD"), ("BB", "EE"), ("EE", "DD")];
        let mut adjacency: BTreeMap<CountryCode, Vec<CountryCode>> = BTreeMap::new();
        for (a, b) in edges {
            adjacency.entry(code(a)).or_default().push(code(b));
            adjacency.entry(code(b)).or_default().push(code(a));
        }
        CountryGraph::new(adjacency).unwrap()
    }

    #[test]
    fn test_neighbors_and_islands() {
        let graph = sample();
        assert_eq!(graph.neighbors(code("BB")), &[code("AA"), code("CC"), code("EE")]);
        assert!(graph.neighbors(code("ZZ")).is_empty());
        assert!(graph.is_neighbor(code("AA"), code("BB")));
        assert!(!graph.is_neighbor(code("AA"), code("CC")));
    }

    #[test]
    fn test_shortest_path_tie_break_follows_order() {
        let graph = sample();
        // BB lists CC before EE, so the path through CC is found first
        let path = graph.shortest_path(code("AA"), code("DD"), None).unwrap();
        assert_eq!(path, vec![code("AA"), code("BB"), code("CC"), code("DD")]);
        assert_eq!(graph.distance(code("AA"), code("DD")), Some(3));
    }

    #[test]
    fn test_shortest_path_with_exclusion() {
        let graph = sample();
        let exclude = HashSet::from([code("CC")]);
        let path = graph.shortest_path(code("AA"), code("DD"), Some(&exclude)).unwrap();
        assert_eq!(path, vec![code("AA"), code("BB"), code("EE"), code("DD")]);

        let blocked = HashSet::from([code("BB")]);
        assert!(graph.shortest_path(code("AA"), code("DD"), Some(&blocked)).is_none());
    }

    #[test]
    fn test_shortest_path_edge_cases() {
        let graph = sample();
        assert_eq!(graph.shortest_path(code("AA"), code("AA"), None), Some(vec![code("AA")]));
        assert!(graph.shortest_path(code("AA"), code("ZZ"), None).is_none());
        assert_eq!(graph.distance(code("ZZ"), code("AA")), None);
    }

    #[test]
    fn test_countries_at_distance() {
        let graph = sample();
        let mut two = graph.countries_at_distance(code("AA"), 2, |_| true);
        two.sort();
        assert_eq!(two, vec![code("CC"), code("EE")]);
        assert_eq!(graph.countries_at_distance(code("AA"), 0, |_| true), vec![code("AA")]);
        assert!(graph.countries_at_distance(code("AA"), 9, |_| true).is_empty());
    }

    #[test]
    fn test_countries_at_distance_filter_blocks_traversal() {
        let graph = sample();
        // Without BB nothing beyond AA is reachable
        let found = graph.countries_at_distance(code("AA"), 2, |c| c != code("BB"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_asymmetric_border_rejected() {
        let mut adjacency = BTreeMap::new();
        adjacency.insert(code("AA"), vec![code("BB")]);
        adjacency.insert(code("BB"), vec![]);
        let err = CountryGraph::new(adjacency).unwrap_err();
        assert!(matches!(err, DataError::AsymmetricBorder { .. }));
    }

    #[test]
    fn test_self_border_rejected() {
        let mut adjacency = BTreeMap::new();
        adjacency.insert(code("AA"), vec![code("AA")]);
        assert!(matches!(
            CountryGraph::new(adjacency),
            Err(DataError::SelfBorder(_))
        ));
    }

    #[test]
    fn test_random_connected_falls_back() {
        let graph = sample();
        let mut rng = Rng::new(1);
        let pick = graph.random_connected(&mut rng, |_| false).unwrap();
        assert!(graph.has_land_borders(pick));
        let only = graph.random_connected(&mut rng, |c| c == code("EE"));
        assert_eq!(only, Some(code("EE")));
    }
}
