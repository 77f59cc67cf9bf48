use std::collections::HashMap;

use crate::data::Value;

/// Counts distinct raw values while remembering the order they first appeared.
#[derive(Debug, Default)]
pub struct FrequencyAccumulator {
    positions: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
    total: usize,
}

impl FrequencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, value: &Value) {
        if value.is_missing() {
            return;
        }
        self.total += 1;
        let key = value.as_display();
        match self.positions.get(&key) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Most frequent values first; equal counts keep encounter order.
    pub fn ranked(&self, top: usize) -> Vec<(String, usize)> {
        let mut items = self.entries.clone();
        // stable sort keeps first-encounter order among ties
        items.sort_by(|a, b| b.1.cmp(&a.1));
        if top > 0 && items.len() > top {
            items.truncate(top);
        }
        items
    }
}

pub fn top_values<'a, I>(values: I, top: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut accumulator = FrequencyAccumulator::new();
    for value in values {
        accumulator.ingest(value);
    }
    accumulator
        .ranked(top)
        .into_iter()
        .map(|(value, _)| value)
        .collect()
}
