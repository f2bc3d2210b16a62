//! Project domain model.
//!
//! A project is a named container for issues. Projects come into being
//! lazily, on the first issue submitted under their name; there is no
//! explicit create-project operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named container for a sequence of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique name, used as the shard key for every issue operation.
    pub name: String,
    pub created_on: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_on: Utc::now(),
        }
    }
}
