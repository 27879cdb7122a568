use crate::models::Counter;
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_COUNT: u32 = 5;

#[derive(Debug, Default)]
pub struct CounterStore {
    counters: HashMap<String, Counter>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&Counter> {
        self.counters.get(user_id)
    }

    pub fn create(&mut self, user_id: &str, initial_count: u32) -> Counter {
        let counter = Counter {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            count: initial_count,
        };
        self.counters.insert(user_id.to_string(), counter.clone());
        counter
    }

    pub fn update(&mut self, user_id: &str, count: u32) -> Option<Counter> {
        let existing = self.counters.get_mut(user_id)?;
        existing.count = count;
        Some(existing.clone())
    }

    pub fn increment(&mut self, user_id: &str) -> Option<Counter> {
        let existing = self.counters.get_mut(user_id)?;
        existing.count = existing.count.saturating_add(1);
        Some(existing.clone())
    }

    // Refuses at zero so the count can never go negative, even if a caller
    // skips its own precondition check.
    pub fn decrement(&mut self, user_id: &str) -> Option<Counter> {
        let existing = self.counters.get_mut(user_id)?;
        if existing.count == 0 {
            return None;
        }
        existing.count -= 1;
        Some(existing.clone())
    }
}
