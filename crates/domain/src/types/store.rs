//! Store (tienda) types

use serde::{Deserialize, Serialize};

/// Store that inventory can be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

/// Partial store reference embedded in inventory rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}
