use rowset_orm::{MemoryStore, Model};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub status: String,
}

impl Model for Item {
    fn table_name() -> &'static str {
        "items"
    }
}

/// Items 1..=count; even ids are "active", odd ids "archived"
pub fn seeded_store(count: i64) -> MemoryStore {
    let store = MemoryStore::new();
    for id in 1..=count {
        let status = if id % 2 == 0 { "active" } else { "archived" };
        store
            .insert(
                Item::table_name(),
                json!({"id": id, "name": format!("item-{:02}", id), "status": status}),
            )
            .unwrap();
    }
    store
}

#[allow(dead_code)]
pub fn ids(items: &[Item]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}
