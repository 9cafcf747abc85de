//! Room parameters
//!
//! Identify the room to observe and carry the client parameters that go into the
//! connect query string.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query key of the room id
pub const ROOM_ID_PARAM: &str = "room_id";

/// Target room and stream parameters for one connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomParameters {
    /// Room identifier; also the heartbeat payload
    pub room_id: String,

    /// Additional client parameters, sorted by key
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl RoomParameters {
    /// Create parameters for a room
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Add a client parameter
    ///
    /// A `room_id` key is ignored; the room id is set at construction.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key != ROOM_ID_PARAM {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// Add several client parameters
    #[must_use]
    pub fn with_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        params
            .into_iter()
            .fold(self, |acc, (key, value)| acc.with_param(key, value))
    }

    /// Query pairs in wire order: room id first, then extras by key
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        std::iter::once((ROOM_ID_PARAM, self.room_id.as_str()))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }

    /// Form-encode the parameters as a query string (without `?`)
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.query_pairs())
    }
}
