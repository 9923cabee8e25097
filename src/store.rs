//! In-memory student store
//!
//! A mapping from the decimal form of a student's id to the student record,
//! guarded by a readers-writers lock. Readers (get, list) share the lock;
//! writers (insert) hold it exclusively. Guards never outlive the method call,
//! so callers encode and write responses with the lock released.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A student record as it appears on the wire: `{"id":..,"name":..,"age":..}`
///
/// Missing fields decode to their zero value and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

impl Student {
    pub fn new(id: i64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }

    /// Record present in every freshly started store
    pub fn seed() -> Self {
        Self::new(1, "bob", 21)
    }

    /// Key this record is stored under when inserted through [`StudentStore::insert`]
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Concurrent id -> student mapping
#[derive(Debug, Default)]
pub struct StudentStore {
    students: RwLock<HashMap<String, Student>>,
}

impl StudentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding [`Student::seed`] under `seed_key`
    ///
    /// The key is taken as given and is not derived from the record's id, so a
    /// key such as `"Data"` leaves the record visible to [`list`](Self::list) only.
    pub fn seeded(seed_key: impl Into<String>) -> Self {
        let mut students = HashMap::new();
        students.insert(seed_key.into(), Student::seed());
        Self {
            students: RwLock::new(students),
        }
    }

    /// Insert or overwrite a student under the decimal form of its id.
    /// Returns the record previously stored under that key.
    pub async fn insert(&self, student: Student) -> Option<Student> {
        let key = student.key();
        let mut students = self.students.write().await;
        students.insert(key, student)
    }

    /// Look up a student by its key
    pub async fn get(&self, key: &str) -> Option<Student> {
        let students = self.students.read().await;
        students.get(key).cloned()
    }

    /// Snapshot every stored student. Order is unspecified.
    pub async fn list(&self) -> Vec<Student> {
        let students = self.students.read().await;
        students.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }
}
