use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{
    Checkin, CheckinStatistics, CheckinStatus, DailyStatistics, MyCheckinStatistics, RankingItem,
    Topic, User, null_default,
};
use crate::resources::{
    ListTopicsOptions, Query, RankingListResponse, RankingOptions, TopicsResponse, UsersResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;

const DEFAULT_CHECKINS_SCOPE: &str = "all";
const DEFAULT_CHECKINS_COUNT: u32 = 100;
const DEFAULT_RANKING_TYPE: &str = "accumulated";
const DEFAULT_CHECKIN_TOPICS_COUNT: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCheckinsOptions {
    /// `ongoing`, `closed`, `over` or `all`
    pub scope: Option<String>,
    pub count: Option<u32>,
}

impl ListCheckinsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

/// Paging for member listings of a check-in project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub count: Option<u32>,
    pub end_time: Option<String>,
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("count", self.count.as_ref());
        query.push_opt("end_time", self.end_time.as_ref());
        query
    }
}

/// Validity window of a new check-in project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_period: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

impl Validity {
    /// A project that never expires.
    pub fn long_period() -> Self {
        Self {
            long_period: Some(true),
            expiration_time: None,
        }
    }

    /// A project that expires at `expiration_time`, e.g.
    /// `2025-12-24T23:59:59.798+0800`.
    pub fn until(expiration_time: impl Into<String>) -> Self {
        Self {
            long_period: Some(false),
            expiration_time: Some(expiration_time.into()),
        }
    }
}

/// Fields of a new check-in project. Unset fields are left out of the
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateCheckinParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_days: Option<u32>,
    /// `accumulated` or `continuous`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub checkin_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_topics_on_timeline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<Validity>,
}

impl CreateCheckinParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub const fn checkin_days(mut self, days: u32) -> Self {
        self.checkin_days = Some(days);
        self
    }

    #[must_use]
    pub fn checkin_type(mut self, checkin_type: impl Into<String>) -> Self {
        self.checkin_type = Some(checkin_type.into());
        self
    }

    #[must_use]
    pub const fn show_topics_on_timeline(mut self, show: bool) -> Self {
        self.show_topics_on_timeline = Some(show);
        self
    }

    #[must_use]
    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = Some(validity);
        self
    }
}

/// Changes to an existing check-in project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateCheckinParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckinStatus>,
}

impl UpdateCheckinParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: CheckinStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckinsResponse {
    #[serde(deserialize_with = "null_default")]
    checkins: Vec<Checkin>,
}

#[derive(Debug, Deserialize)]
struct CheckinResponse {
    checkin: Checkin,
}

/// Writes may succeed with an empty payload, e.g. when closing a project.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckinWriteResponse {
    checkin: Option<Checkin>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailyStatisticsResponse {
    #[serde(deserialize_with = "null_default")]
    daily_statistics: Vec<DailyStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatesResponse {
    #[serde(deserialize_with = "null_default")]
    dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MyStatisticsResponse {
    statistics: MyCheckinStatistics,
}

/// Check-in project ("training camp") endpoints
#[derive(Debug, Clone)]
pub struct Checkins<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Checkins<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Checkins<R> {
    /// Projects of a group. `scope` defaults to `all` and `count` to 100.
    pub async fn list(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        options: Option<&ListCheckinsOptions>,
    ) -> Result<Vec<Checkin>, ZsxqError> {
        let mut query = Query::new();
        if let Some(options) = options {
            query.push_opt("scope", options.scope.as_ref());
            query.push_opt("count", options.count.as_ref());
        }
        query.push_default("scope", DEFAULT_CHECKINS_SCOPE);
        query.push_default("count", DEFAULT_CHECKINS_COUNT);

        let path = format!("/v2/groups/{}/checkins", group_id);
        let response: CheckinsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.checkins)
    }

    pub async fn get(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
    ) -> Result<Checkin, ZsxqError> {
        let path = format!("/v2/groups/{}/checkins/{}", group_id, checkin_id);
        let response: CheckinResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.checkin)
    }

    pub async fn statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
    ) -> Result<CheckinStatistics, ZsxqError> {
        let path = format!("/v2/groups/{}/checkins/{}/statistics", group_id, checkin_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    /// Leaderboard of a project. `type` defaults to `accumulated`.
    pub async fn ranking_list(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
        options: Option<&RankingOptions>,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let mut query = options.map(RankingOptions::to_query).unwrap_or_default();
        query.push_default("type", DEFAULT_RANKING_TYPE);

        let path = format!("/v2/groups/{}/checkins/{}/ranking_list", group_id, checkin_id);
        let response: RankingListResponse =
            self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.ranking_list)
    }

    /// Topics posted to a project. Only `scope` and `count` apply; they
    /// default to `all` and 20.
    pub async fn topics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
        options: Option<&ListTopicsOptions>,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let mut query = Query::new();
        if let Some(options) = options {
            query.push_opt("scope", options.scope.as_ref());
            query.push_opt("count", options.count.as_ref());
        }
        query.push_default("scope", DEFAULT_CHECKINS_SCOPE);
        query.push_default("count", DEFAULT_CHECKIN_TOPICS_COUNT);

        let path = format!("/v2/groups/{}/checkins/{}/topics", group_id, checkin_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.topics)
    }

    pub async fn daily_statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
    ) -> Result<Vec<DailyStatistics>, ZsxqError> {
        let path = format!(
            "/v2/groups/{}/checkins/{}/statistics/daily",
            group_id, checkin_id
        );
        let response: DailyStatisticsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.daily_statistics)
    }

    pub async fn joined_users(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
        options: Option<&PageOptions>,
    ) -> Result<Vec<User>, ZsxqError> {
        let query = options.map(PageOptions::to_query).unwrap_or_default();
        let path = format!("/v2/groups/{}/checkins/{}/joined_users", group_id, checkin_id);
        let response: UsersResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.users)
    }

    /// The current user's check-in topics in a project.
    pub async fn my_checkins(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
        options: Option<&PageOptions>,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let query = options.map(PageOptions::to_query).unwrap_or_default();
        let path = format!(
            "/v2/users/self/groups/{}/checkins/{}/topics",
            group_id, checkin_id
        );
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.topics)
    }

    /// Dates on which the current user checked in.
    pub async fn my_checkin_days(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
    ) -> Result<Vec<String>, ZsxqError> {
        let path = format!(
            "/v2/users/self/groups/{}/checkins/{}/checkined_dates",
            group_id, checkin_id
        );
        let response: DatesResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.dates)
    }

    pub async fn my_statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
    ) -> Result<MyCheckinStatistics, ZsxqError> {
        let path = format!(
            "/v2/users/self/groups/{}/checkins/{}/statistics",
            group_id, checkin_id
        );
        let response: MyStatisticsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.statistics)
    }

    /// Create a project. The parameters are sent wrapped in `req_data`.
    ///
    /// `Ok(None)` means the platform accepted the request without echoing
    /// the project back.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        params: &CreateCheckinParams,
    ) -> Result<Option<Checkin>, ZsxqError> {
        let body = json!({ "req_data": params });
        let path = format!("/v2/groups/{}/checkins", group_id);
        let response: CheckinWriteResponse = self.rest.post_json(cancel, &path, &body).await?;
        Ok(response.checkin)
    }

    /// Update a project. The parameters are sent wrapped in `req_data`.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        checkin_id: i64,
        params: &UpdateCheckinParams,
    ) -> Result<Option<Checkin>, ZsxqError> {
        let body = json!({ "req_data": params });
        let path = format!("/v2/groups/{}/checkins/{}", group_id, checkin_id);
        let response: CheckinWriteResponse = self.rest.put_json(cancel, &path, &body).await?;
        Ok(response.checkin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params_skip_unset_fields() {
        let params = CreateCheckinParams::new("早起打卡")
            .checkin_days(7)
            .checkin_type("accumulated")
            .validity(Validity::until("2025-12-24T23:59:59.798+0800"));
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "早起打卡",
                "checkin_days": 7,
                "type": "accumulated",
                "validity": {
                    "long_period": false,
                    "expiration_time": "2025-12-24T23:59:59.798+0800"
                }
            })
        );
    }

    #[test]
    fn test_long_period_validity() {
        let value = serde_json::to_value(Validity::long_period()).unwrap();
        assert_eq!(value, json!({"long_period": true}));
    }

    #[test]
    fn test_update_params_serialize_status() {
        let params = UpdateCheckinParams::new()
            .description("new rules")
            .status(CheckinStatus::Closed);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"description": "new rules", "status": "closed"}));
    }

    #[test]
    fn test_page_options_query() {
        let options = PageOptions::new().count(50).end_time("2024-05-01T00:00:00.000+0800");
        assert_eq!(
            options.to_query().pairs(),
            vec![("count", "50"), ("end_time", "2024-05-01T00:00:00.000+0800")]
        );
    }
}
