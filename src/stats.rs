use std::collections::HashMap;

use serde::Serialize;

use crate::parser::DataLine;

/// Running tally of how many index entries each location owns.
#[derive(Debug, Default)]
pub struct PackageCounts {
    entries: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    count: u64,
    first_seen: u64,
}

/// One row of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPackage {
    pub location: String,
    pub count: u64,
    #[serde(skip)]
    pub first_seen: u64,
}

impl PackageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies every location named on one data line.
    ///
    /// A location listed twice on the same line counts twice: the index
    /// records ownership per entry, not per distinct file.
    pub fn observe(&mut self, line: &DataLine) {
        for location in &line.locations {
            let first_seen = self.entries.len() as u64;
            self.entries
                .entry(location.clone())
                .and_modify(|e| e.count += 1)
                .or_insert(Entry { count: 1, first_seen });
        }
    }

    /// Number of distinct locations seen so far.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all per-location counts.
    pub fn total(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// The `k` locations owning the most entries, largest first. Ties go to
    /// the location that appeared earlier in the index, which keeps the
    /// ranking reproducible across runs on the same input.
    pub fn top_k(&self, k: usize) -> Vec<RankedPackage> {
        let mut ranked: Vec<RankedPackage> = self
            .entries
            .iter()
            .map(|(location, e)| RankedPackage {
                location: location.clone(),
                count: e.count,
                first_seen: e.first_seen,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(file: &str, locations: &[&str]) -> DataLine {
        DataLine {
            file: file.to_string(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn earlier_location_wins_a_tie() {
        let mut counts = PackageCounts::new();
        counts.observe(&line("usr/bin/foo", &["section/pkgA"]));
        counts.observe(&line("usr/bin/bar", &["section/pkgA", "section/pkgB"]));
        counts.observe(&line("usr/bin/baz", &["section/pkgB"]));

        let ranked = counts.top_k(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].location.as_str(), ranked[0].count), ("section/pkgA", 2));
        assert_eq!((ranked[1].location.as_str(), ranked[1].count), ("section/pkgB", 2));
    }

    #[test]
    fn duplicate_location_on_one_line_counts_twice() {
        let mut counts = PackageCounts::new();
        counts.observe(&line("usr/bin/x", &["section/pkgA", "section/pkgA"]));

        assert_eq!(counts.top_k(1)[0].count, 2);
    }

    #[test]
    fn total_matches_token_occurrences() {
        let mut counts = PackageCounts::new();
        counts.observe(&line("a/b", &["x/one"]));
        counts.observe(&line("a/c", &["x/one", "x/two"]));
        counts.observe(&line("a/d", &["x/two", "x/two"]));

        assert_eq!(counts.total(), 5);
        assert_eq!(counts.distinct(), 2);
    }

    #[test]
    fn top_k_caps_the_result_length() {
        let mut counts = PackageCounts::new();
        for i in 0..20 {
            let name = format!("x/pkg{i}");
            counts.observe(&line("a/b", &[name.as_str()]));
        }

        assert_eq!(counts.top_k(10).len(), 10);
    }

    #[test]
    fn top_k_returns_all_when_fewer_than_k() {
        let mut counts = PackageCounts::new();
        counts.observe(&line("a/b", &["x/one", "x/two"]));

        let ranked = counts.top_k(10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].location, "x/one");
        assert_eq!(ranked[1].location, "x/two");
    }

    #[test]
    fn ordering_is_a_total_order() {
        let mut counts = PackageCounts::new();
        counts.observe(&line("a/b", &["x/low"]));
        counts.observe(&line("a/c", &["x/high", "x/high", "x/mid"]));
        counts.observe(&line("a/d", &["x/mid"]));

        let ranked = counts.top_k(10);
        for pair in ranked.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count
                        && pair[0].first_seen < pair[1].first_seen)
            );
        }
    }
}
