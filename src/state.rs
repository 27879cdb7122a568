use crate::store::CounterStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<CounterStore>>,
}

impl AppState {
    pub fn new(store: CounterStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
