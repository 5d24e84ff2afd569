//! Typed request modules, one per area of the platform API.
//!
//! Each module is a thin mapping of URL paths, query parameters and response
//! keys onto a [`RestClient`](crate::core::kernel::RestClient). All of them
//! share the transport they were created from, so they are cheap to clone
//! and safe to use from several tasks at once.

pub mod checkins;
pub mod dashboard;
pub mod groups;
pub mod misc;
pub mod ranking;
pub mod topics;
pub mod users;

pub use checkins::{
    Checkins, CreateCheckinParams, ListCheckinsOptions, PageOptions, UpdateCheckinParams, Validity,
};
pub use dashboard::Dashboard;
pub use groups::Groups;
pub use misc::{ActivitiesOptions, Misc};
pub use ranking::{Ranking, RankingOptions};
pub use topics::{ListCommentsOptions, ListTopicsOptions, Topics};
pub use users::Users;

use crate::core::types::{null_default, Group, RankingItem, Topic, User};
use serde::Deserialize;

/// Query parameters in the order they go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &'static str, value: impl ToString) {
        self.0.push((key, value.to_string()));
    }

    pub(crate) fn push_opt<T: std::fmt::Display>(&mut self, key: &'static str, value: Option<&T>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Add `key` only when the caller has not set it already.
    pub(crate) fn push_default(&mut self, key: &'static str, value: impl ToString) {
        if !self.contains(key) {
            self.push(key, value);
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| *k == key)
    }

    pub(crate) fn pairs(&self) -> Vec<(&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GroupsResponse {
    #[serde(deserialize_with = "null_default")]
    pub groups: Vec<Group>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TopicsResponse {
    #[serde(deserialize_with = "null_default")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UsersResponse {
    #[serde(deserialize_with = "null_default")]
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserResponse {
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RankingListResponse {
    #[serde(deserialize_with = "null_default")]
    pub ranking_list: Vec<RankingItem>,
}
