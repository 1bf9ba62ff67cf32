use crate::data::AdjacencyMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Traversal bounds for neighbor expansion.
///
/// Two hops covers "neighbors and their neighbors", which is the useful
/// comparison radius for trajectory questions; the cap keeps densely
/// connected subjects (continental landmasses) from dragging in half the
/// population.
#[derive(Debug, Clone, Copy)]
pub struct NeighborPolicy {
    pub max_hops: usize,
    pub max_neighbors: usize,
}

impl Default for NeighborPolicy {
    fn default() -> Self {
        Self { max_hops: 2, max_neighbors: 100 }
    }
}

/// One reference subject's score next to the scores of its neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborComparison {
    pub score: f64,
    pub neighbors: BTreeMap<String, f64>,
}

/// Aligns reference subjects against their adjacency sets.
pub struct NeighborComparator<'a> {
    adjacency: &'a AdjacencyMap,
    policy: NeighborPolicy,
}

impl<'a> NeighborComparator<'a> {
    pub fn new(adjacency: &'a AdjacencyMap, policy: NeighborPolicy) -> Self {
        Self { adjacency, policy }
    }

    /// For each reference subject with a score, collect its bounded
    /// neighborhood and look up each neighbor's precomputed score.
    ///
    /// A reference with no adjacency edges gets an empty neighbor map; a
    /// neighbor without a computed score is omitted from the inner map.
    /// Neither case is an error.
    pub fn compare(
        &self,
        references: &[String],
        scores: &BTreeMap<String, f64>,
    ) -> BTreeMap<String, NeighborComparison> {
        references
            .iter()
            .filter_map(|reference| {
                let own = *scores.get(reference)?;
                let neighbors = self
                    .collect_neighborhood(reference)
                    .into_iter()
                    .filter_map(|code| scores.get(&code).map(|s| (code, *s)))
                    .collect();

                Some((
                    reference.clone(),
                    NeighborComparison { score: own, neighbors },
                ))
            })
            .collect()
    }

    /// Breadth-first expansion up to the hop limit, excluding the start
    /// subject, stopping once the cap is reached.
    fn collect_neighborhood(&self, start: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(start, 0)]);
        let mut found = Vec::new();

        while let Some((code, depth)) = queue.pop_front() {
            if depth == self.policy.max_hops {
                continue;
            }
            for neighbor in self.adjacency.neighbors(code) {
                if !seen.insert(neighbor.as_str()) {
                    continue;
                }
                found.push(neighbor.clone());
                if found.len() >= self.policy.max_neighbors {
                    return found;
                }
                queue.push_back((neighbor.as_str(), depth + 1));
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(&str, &str)]) -> AdjacencyMap {
        let mut map = AdjacencyMap::new();
        for (a, b) in edges {
            map.add_edge(a, b);
            map.add_edge(b, a);
        }
        map
    }

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_two_hop_expansion() {
        // FRA - DEU - POL, POL two hops from FRA
        let map = adjacency(&[("FRA", "DEU"), ("DEU", "POL")]);
        let all = scores(&[("FRA", 1.0), ("DEU", 2.0), ("POL", 3.0)]);

        let comparator = NeighborComparator::new(&map, NeighborPolicy::default());
        let result = comparator.compare(&["FRA".to_string()], &all);

        let fra = &result["FRA"];
        assert_eq!(fra.score, 1.0);
        assert_eq!(fra.neighbors.len(), 2);
        assert_eq!(fra.neighbors["POL"], 3.0);
    }

    #[test]
    fn test_hop_limit_respected() {
        // Chain of four; with one hop only the direct neighbor shows up.
        let map = adjacency(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let all = scores(&[("A", 0.0), ("B", 1.0), ("C", 2.0), ("D", 3.0)]);

        let policy = NeighborPolicy { max_hops: 1, max_neighbors: 100 };
        let comparator = NeighborComparator::new(&map, policy);
        let result = comparator.compare(&["A".to_string()], &all);

        let keys: Vec<&String> = result["A"].neighbors.keys().collect();
        assert_eq!(keys, vec!["B"]);
    }

    #[test]
    fn test_neighbor_cap_bounds_expansion() {
        let mut map = AdjacencyMap::new();
        for i in 0..20 {
            map.add_edge("HUB", &format!("N{i:02}"));
        }
        let all: BTreeMap<String, f64> = (0..20)
            .map(|i| (format!("N{i:02}"), i as f64))
            .chain([("HUB".to_string(), 0.0)])
            .collect();

        let policy = NeighborPolicy { max_hops: 2, max_neighbors: 5 };
        let comparator = NeighborComparator::new(&map, policy);
        let result = comparator.compare(&["HUB".to_string()], &all);

        assert_eq!(result["HUB"].neighbors.len(), 5);
    }

    #[test]
    fn test_isolated_reference_gets_empty_mapping() {
        let map = AdjacencyMap::new();
        let all = scores(&[("ISL", 0.5)]);

        let comparator = NeighborComparator::new(&map, NeighborPolicy::default());
        let result = comparator.compare(&["ISL".to_string()], &all);

        assert!(result["ISL"].neighbors.is_empty());
    }

    #[test]
    fn test_unscored_neighbor_is_omitted() {
        let map = adjacency(&[("FRA", "DEU"), ("FRA", "BEL")]);
        // BEL has no computed score.
        let all = scores(&[("FRA", 1.0), ("DEU", 2.0)]);

        let comparator = NeighborComparator::new(&map, NeighborPolicy::default());
        let result = comparator.compare(&["FRA".to_string()], &all);

        assert_eq!(result["FRA"].neighbors.len(), 1);
        assert!(result["FRA"].neighbors.contains_key("DEU"));
    }

    #[test]
    fn test_unscored_reference_is_skipped() {
        let map = adjacency(&[("FRA", "DEU")]);
        let all = scores(&[("DEU", 2.0)]);

        let comparator = NeighborComparator::new(&map, NeighborPolicy::default());
        let result = comparator.compare(&["FRA".to_string()], &all);

        assert!(result.is_empty());
    }

    #[test]
    fn test_reference_never_lists_itself() {
        // Cycle: A - B - A
        let map = adjacency(&[("A", "B")]);
        let all = scores(&[("A", 1.0), ("B", 2.0)]);

        let comparator = NeighborComparator::new(&map, NeighborPolicy::default());
        let result = comparator.compare(&["A".to_string()], &all);

        assert!(!result["A"].neighbors.contains_key("A"));
    }
}
