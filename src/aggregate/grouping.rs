//! Grouping primitives
//!
//! Every function here is pure: the same rows give the same result, and keys
//! keep the order in which they were first encountered. Key functions return
//! `Option<K>`; rows mapped to `None` are left out of that one result, which
//! is how null-valued fields are dropped locally.

use std::collections::HashMap;
use std::hash::Hash;

/// Ordered mapping of group key to an accumulated count or sum
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add `amount` to `key`, appending the key if it is new
    pub fn add(&mut self, key: K, amount: u64) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Sum over all groups
    pub fn total(&self) -> u64 {
        self.values().sum()
    }

    /// Entries sorted by value descending; equal values keep encounter order
    pub fn sorted_desc(&self) -> Vec<(K, u64)> {
        let mut sorted = self.entries.clone();
        // sort_by is stable, so ties stay in first-seen order
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// The `n` largest entries
    pub fn top(&self, n: usize) -> Vec<(K, u64)> {
        let mut sorted = self.sorted_desc();
        sorted.truncate(n);
        sorted
    }

    pub fn into_entries(self) -> Vec<(K, u64)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> PartialEq for Tally<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone> FromIterator<(K, u64)> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (key, amount) in iter {
            tally.add(key, amount);
        }
        tally
    }
}

/// Count rows per group key
pub fn count_by<T, K, I, F>(rows: I, mut key: F) -> Tally<K>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
{
    let mut tally = Tally::new();
    for row in rows {
        if let Some(k) = key(&row) {
            tally.add(k, 1);
        }
    }
    tally
}

/// Sum a value per group key
///
/// Rows with a missing value are skipped; a key whose rows all lack a value
/// does not appear.
pub fn sum_by<T, K, I, F, V>(rows: I, mut key: F, mut value: V) -> Tally<K>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
    V: FnMut(&T) -> Option<u64>,
{
    let mut tally = Tally::new();
    for row in rows {
        let Some(amount) = value(&row) else {
            continue;
        };
        if let Some(k) = key(&row) {
            tally.add(k, amount);
        }
    }
    tally
}

/// The `n` most frequent group keys, descending, ties in first-seen order
pub fn top_n_by_count<T, K, I, F>(rows: I, key: F, n: usize) -> Vec<(K, u64)>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
{
    count_by(rows, key).top(n)
}

/// A two-key tally pivoted into a dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab<R, C> {
    pub rows: Vec<R>,
    pub columns: Vec<C>,
    /// `values[row][column]`, zero where no rows were counted
    pub values: Vec<Vec<u64>>,
}

impl<R, C> CrossTab<R, C>
where
    R: Eq + Hash + Clone,
    C: Eq + Hash + Clone,
{
    pub fn from_tally(tally: &Tally<(R, C)>) -> Self {
        let row_keys: Tally<R> = tally.keys().map(|(r, _)| (r.clone(), 0)).collect();
        let col_keys: Tally<C> = tally.keys().map(|(_, c)| (c.clone(), 0)).collect();

        let rows: Vec<R> = row_keys.keys().cloned().collect();
        let columns: Vec<C> = col_keys.keys().cloned().collect();

        let mut values = vec![vec![0u64; columns.len()]; rows.len()];
        for ((r, c), v) in tally.iter() {
            let ri = row_keys.index[r];
            let ci = col_keys.index[c];
            values[ri][ci] = v;
        }

        Self {
            rows,
            columns,
            values,
        }
    }

    pub fn get(&self, row: &R, column: &C) -> u64 {
        let ri = self.rows.iter().position(|r| r == row);
        let ci = self.columns.iter().position(|c| c == column);
        match (ri, ci) {
            (Some(ri), Some(ci)) => self.values[ri][ci],
            _ => 0,
        }
    }

    /// One row of the matrix, aligned with `columns`
    pub fn row(&self, row: &R) -> Option<&[u64]> {
        self.rows
            .iter()
            .position(|r| r == row)
            .map(|ri| self.values[ri].as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &[&'static str]) -> Vec<&'static str> {
        input.to_vec()
    }

    #[test]
    fn test_count_by_keeps_encounter_order() {
        let tally = count_by(words(&["b", "a", "b", "c", "a", "b"]), |w| Some(*w));
        let entries = tally.into_entries();
        assert_eq!(entries, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_count_by_skips_none() {
        let tally = count_by(words(&["a", "", "a", ""]), |w| {
            if w.is_empty() {
                None
            } else {
                Some(*w)
            }
        });
        assert_eq!(tally.len(), 1);
        assert_eq!(tally.get(&"a"), Some(2));
        assert_eq!(tally.get(&""), None);
    }

    #[test]
    fn test_sum_by() {
        let rows = vec![("Mitte", 10u64), ("Pankow", 5), ("Mitte", 7)];
        let tally = sum_by(&rows, |r| Some(r.0), |r| Some(r.1));
        assert_eq!(tally.get(&"Mitte"), Some(17));
        assert_eq!(tally.get(&"Pankow"), Some(5));
        assert_eq!(tally.total(), 22);
    }

    #[test]
    fn test_sum_by_skips_missing_values() {
        let rows = vec![("Mitte", Some(10u64)), ("Pankow", None), ("Mitte", None), ("Spandau", Some(0))];
        let tally = sum_by(&rows, |r| Some(r.0), |r| r.1);
        assert_eq!(tally.get(&"Mitte"), Some(10));
        assert_eq!(tally.get(&"Pankow"), None);
        assert_eq!(tally.get(&"Spandau"), Some(0));
        assert_eq!(tally.keys().collect::<Vec<_>>(), vec![&"Mitte", &"Spandau"]);
    }

    #[test]
    fn test_top_n_sorted_and_truncated() {
        let top = top_n_by_count(words(&["x", "y", "y", "z", "z", "z"]), |w| Some(*w), 2);
        assert_eq!(top, vec![("z", 3), ("y", 2)]);
    }

    #[test]
    fn test_top_n_ties_break_by_first_seen() {
        let top = top_n_by_count(words(&["c", "a", "b", "a", "c", "b"]), |w| Some(*w), 3);
        assert_eq!(top, vec![("c", 2), ("a", 2), ("b", 2)]);

        // Permuting rows with equal counts reorders the ties by first appearance
        let top = top_n_by_count(words(&["b", "a", "c", "a", "c", "b"]), |w| Some(*w), 3);
        assert_eq!(top, vec![("b", 2), ("a", 2), ("c", 2)]);
    }

    #[test]
    fn test_top_n_never_exceeds_n() {
        let rows = words(&["a", "b", "c", "d"]);
        for n in 0..6 {
            let top = top_n_by_count(rows.clone(), |w| Some(*w), n);
            assert!(top.len() <= n);
            assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        }
    }

    #[test]
    fn test_tally_equality_ignores_index() {
        let a: Tally<&str> = vec![("a", 1), ("b", 2)].into_iter().collect();
        let b = count_by(words(&["a", "b", "b"]), |w| Some(*w));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cross_tab() {
        let rows = vec![
            ("Grundschule", "Mitte"),
            ("Gymnasium", "Mitte"),
            ("Grundschule", "Pankow"),
            ("Grundschule", "Mitte"),
        ];
        let tally = count_by(&rows, |r| Some((r.0, r.1)));
        let tab = CrossTab::from_tally(&tally);

        assert_eq!(tab.rows, vec!["Grundschule", "Gymnasium"]);
        assert_eq!(tab.columns, vec!["Mitte", "Pankow"]);
        assert_eq!(tab.values, vec![vec![2, 1], vec![1, 0]]);
        assert_eq!(tab.get(&"Gymnasium", &"Pankow"), 0);
        assert_eq!(tab.row(&"Grundschule"), Some(&[2u64, 1][..]));
    }
}
