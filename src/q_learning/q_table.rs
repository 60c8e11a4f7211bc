//! Sparse action-value table keyed by encoded state

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{encoding::EncodedState, types::Action};

/// Action values for one state, indexed by [`Action::index`].
pub type ActionValues = [f64; Action::COUNT];

/// One persisted row of a [`ValueTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub state: EncodedState,
    pub values: ActionValues,
}

/// Map from encoded state to action values.
///
/// Unseen states read as all zeros. [`ValueTable::values_mut`] materializes
/// the row so later reads observe the mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<TableEntry>", from = "Vec<TableEntry>")]
pub struct ValueTable {
    rows: HashMap<EncodedState, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `state`, zero if never touched. Does not insert.
    pub fn values(&self, state: &EncodedState) -> ActionValues {
        self.rows
            .get(state)
            .copied()
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Mutable row for `state`, inserting zeros on first access.
    pub fn values_mut(&mut self, state: &EncodedState) -> &mut ActionValues {
        self.rows.entry(*state).or_insert([0.0; Action::COUNT])
    }

    pub fn get(&self, state: &EncodedState) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    pub fn contains(&self, state: &EncodedState) -> bool {
        self.rows.contains_key(state)
    }

    /// Number of materialized states.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EncodedState, &ActionValues)> {
        self.rows.iter()
    }

    /// `max_a Q(s, a)`; zero for an unseen state.
    pub fn max_value(&self, state: &EncodedState) -> f64 {
        max_of(&self.values(state))
    }

    /// Lowest-index action with the largest value.
    pub fn first_greedy(&self, state: &EncodedState) -> Action {
        first_argmax(&self.values(state))
    }
}

impl From<ValueTable> for Vec<TableEntry> {
    /// Rows are sorted by state so saved models are byte-stable.
    fn from(table: ValueTable) -> Self {
        let mut entries: Vec<TableEntry> = table
            .rows
            .into_iter()
            .map(|(state, values)| TableEntry { state, values })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state));
        entries
    }
}

impl From<Vec<TableEntry>> for ValueTable {
    fn from(entries: Vec<TableEntry>) -> Self {
        Self {
            rows: entries
                .into_iter()
                .map(|entry| (entry.state, entry.values))
                .collect(),
        }
    }
}

pub(crate) fn max_of(values: &ActionValues) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub(crate) fn first_argmax(values: &ActionValues) -> Action {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    Action::from_index(best)
}

/// All actions whose value equals the maximum.
pub(crate) fn argmax_set(values: &ActionValues) -> Vec<Action> {
    let best = max_of(values);
    Action::ALL
        .into_iter()
        .filter(|action| values[action.index()] == best)
        .collect()
}
