//! Field name similarity scoring.
//!
//! A score combines a longest-matching-blocks ratio over the normalized names
//! with substring and synonym boosts. Scoring is pure: the synonym table is
//! owned by the scorer and never mutated after construction.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::normalize::normalize_field_name;

/// Minimum score when one normalized name contains the other
pub const SUBSTRING_BOOST: f64 = 0.85;

/// Minimum score when the names hit the same synonym entry
pub const SYNONYM_BOOST: f64 = 0.8;

// Sequences at least this long get their most frequent elements pruned
// from the index (they can still extend an existing match).
const AUTOJUNK_MIN_LEN: usize = 200;

/// Longest-matching-blocks similarity between two sequences.
///
/// Repeatedly finds the longest common contiguous block, then recurses into
/// the unmatched regions on either side of it. The ratio is `2 * M / T`
/// where `M` is the number of matched elements and `T` the combined length.
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Extend with elements pruned from the index
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// All matching blocks as `(i, j, size)`, ordered by position.
    pub fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks.sort_unstable();
        blocks
    }

    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|&(_, _, k)| k).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Ratio of two strings compared character by character.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Canonical concept keys and the alternate tokens that denote them.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: IndexMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add (or replace) the alternates for a canonical key.
    pub fn with_entry<I, S>(mut self, key: impl Into<String>, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key.into(), alternates.into_iter().map(Into::into).collect());
        self
    }

    /// True if `a` contains a canonical key and `b` contains one of its
    /// alternates, in either direction. Both names must be normalized.
    pub fn related(&self, a: &str, b: &str) -> bool {
        self.entries.iter().any(|(key, alternates)| {
            let hit = |with_key: &str, other: &str| {
                with_key.contains(key.as_str()) && alternates.iter().any(|alt| other.contains(alt.as_str()))
            };
            hit(a, b) || hit(b, a)
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    /// Common naming variants for identifiers, names, contact details and timestamps.
    fn default() -> Self {
        Self::new()
            .with_entry("id", ["identifier", "uid", "key", "code"])
            .with_entry("name", ["title", "label", "display_name"])
            .with_entry("email", ["e_mail", "mail", "email_address"])
            .with_entry("phone", ["telephone", "tel", "phone_number", "mobile"])
            .with_entry("address", ["addr", "location", "street"])
            .with_entry("user", ["customer", "client", "contact"])
            .with_entry("date", ["datetime", "timestamp", "time"])
            .with_entry("created", ["create_date", "created_at", "creation_date"])
            .with_entry("updated", ["update_date", "updated_at", "modification_date"])
    }
}

/// Scores how likely two field names denote the same concept.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    synonyms: SynonymTable,
}

impl SimilarityScorer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Confidence in `[0, 1]`, rounded to two decimals.
    ///
    /// # Example
    ///
    /// ```
    /// use data_whisperer::SimilarityScorer;
    ///
    /// let scorer = SimilarityScorer::default();
    /// assert_eq!(scorer.score("customerID", "customer_id"), 1.0);
    /// assert!(scorer.score("email_address", "email") >= 0.85);
    /// ```
    pub fn score(&self, source: &str, target: &str) -> f64 {
        let source_norm = normalize_field_name(source);
        let target_norm = normalize_field_name(target);

        if source_norm == target_norm {
            return 1.0;
        }

        let mut score = sequence_ratio(&source_norm, &target_norm);

        if source_norm.contains(target_norm.as_str()) || target_norm.contains(source_norm.as_str()) {
            score = score.max(SUBSTRING_BOOST);
        }

        if self.synonyms.related(&source_norm, &target_norm) {
            score = score.max(SYNONYM_BOOST);
        }

        round2(score)
    }
}

/// Score two names with the default synonym table.
pub fn calculate_similarity(source: &str, target: &str) -> f64 {
    SimilarityScorer::default().score(source, target)
}

// Rounds the exact binary value, ties to even (0.625 -> 0.62)
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
