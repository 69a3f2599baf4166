//! In-memory user store backing the demo schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A stored user. The id is the lookup key and is not stored on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub age: i64,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, age: i64) -> Self {
        Self {
            username: username.into(),
            age,
        }
    }

    /// The JSON object handed to the query engine, with `id` filled in from
    /// the key the record was found under.
    pub fn to_value(&self, id: &str) -> Value {
        json!({
            "id": id,
            "username": self.username,
            "age": self.age,
        })
    }
}

/// Read-only id to user mapping. Shared behind an `Arc` once built.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: HashMap<String, UserRecord>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four demo users.
    pub fn seeded() -> Self {
        Self::new()
            .with_user("1001", UserRecord::new("高厉害", 21))
            .with_user("1002", UserRecord::new("列队猫", 90))
            .with_user("1003", UserRecord::new("小明", 15))
            .with_user("1004", UserRecord::new("小红", 16))
    }

    pub fn with_user(mut self, id: impl Into<String>, user: UserRecord) -> Self {
        self.users.insert(id.into(), user);
        self
    }

    /// A miss is `None`, never an error.
    pub fn lookup(&self, id: &str) -> Option<&UserRecord> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
