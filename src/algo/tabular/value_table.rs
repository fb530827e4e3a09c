use std::collections::HashMap;

use super::Hashable;

/// Action-value estimates for every visited state
///
/// Each state maps to a fixed-size row with one estimate per action index. Unseen states read
/// as all zeros; a row is only materialized by [`row_mut`](ValueTable::row_mut), which inserts
/// a zeroed row on first access.
#[derive(Debug, Clone)]
pub struct ValueTable<S: Hashable, const N: usize> {
    rows: HashMap<S, [f64; N]>,
}

impl<S: Hashable, const N: usize> Default for ValueTable<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable, const N: usize> ValueTable<S, N> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Number of materialized states
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    /// Copy of the row for `state`, zeros if it was never materialized
    pub fn values(&self, state: &S) -> [f64; N] {
        self.rows.get(state).copied().unwrap_or([0.0; N])
    }

    pub fn get(&self, state: &S, action: usize) -> f64 {
        self.rows.get(state).map_or(0.0, |row| row[action])
    }

    /// Mutable row for `state`, inserting a zeroed row on first access
    pub fn row_mut(&mut self, state: S) -> &mut [f64; N] {
        self.rows.entry(state).or_insert([0.0; N])
    }

    pub fn max_value(&self, state: &S) -> f64 {
        self.values(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the highest estimate for `state`, ties resolved to the lowest index
    pub fn greedy_action(&self, state: &S) -> usize {
        let row = self.values(state);
        let mut best = 0;
        for action in 1..N {
            if row[action] > row[best] {
                best = action;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_states_read_as_zero_without_insertion() {
        let table = ValueTable::<u8, 4>::new();
        assert_eq!(table.values(&3), [0.0; 4]);
        assert_eq!(table.get(&3, 2), 0.0);
        assert_eq!(table.max_value(&3), 0.0);
        assert!(table.is_empty(), "Reads do not materialize rows");
    }

    #[test]
    fn row_mut_inserts_zeroed_row_once() {
        let mut table = ValueTable::<u8, 4>::new();
        assert_eq!(*table.row_mut(1), [0.0; 4]);
        table.row_mut(1)[2] = 5.0;
        assert_eq!(table.row_mut(1)[2], 5.0, "Existing row is not reset");
        assert_eq!(table.len(), 1);
        assert!(table.contains(&1));
    }

    #[test]
    fn greedy_action_prefers_first_max() {
        let mut table = ValueTable::<u8, 4>::new();
        assert_eq!(table.greedy_action(&0), 0, "All-zero row picks index 0");

        *table.row_mut(0) = [-1.0, 2.0, 2.0, 1.0];
        assert_eq!(table.greedy_action(&0), 1);
        assert_eq!(table.max_value(&0), 2.0);

        *table.row_mut(0) = [-1.0, -2.0, -0.5, -0.5];
        assert_eq!(table.greedy_action(&0), 2);
    }
}
