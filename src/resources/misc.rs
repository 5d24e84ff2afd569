use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{
    null_default, Activity, GlobalConfig, PkBattle, PkGroup, UrlDetail,
};
use crate::resources::Query;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Filters for the activity feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitiesOptions {
    pub scope: Option<String>,
    pub count: Option<u32>,
    pub end_time: Option<String>,
}

impl ActivitiesOptions {
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

    #[must_use]
    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("scope", self.scope.as_ref());
        query.push_opt("count", self.count.as_ref());
        query.push_opt("end_time", self.end_time.as_ref());
        query
    }
}

#[derive(Debug, Deserialize)]
struct PkGroupResponse {
    group: PkGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordsResponse {
    #[serde(deserialize_with = "null_default")]
    records: Vec<PkBattle>,
}

#[derive(Debug, Deserialize)]
struct UrlDetailResponse {
    url_detail: UrlDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DynamicsResponse {
    #[serde(deserialize_with = "null_default")]
    dynamics: Vec<Activity>,
}

/// PK battles, link previews, global settings and the activity feed
#[derive(Debug, Clone)]
pub struct Misc<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Misc<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Misc<R> {
    pub async fn pk_group(
        &self,
        cancel: &CancellationToken,
        pk_group_id: i64,
    ) -> Result<PkGroup, ZsxqError> {
        let path = format!("/v2/pk_groups/{}", pk_group_id);
        let response: PkGroupResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.group)
    }

    /// Battle records of a PK group.
    pub async fn pk_battles(
        &self,
        cancel: &CancellationToken,
        pk_group_id: i64,
        count: Option<u32>,
    ) -> Result<Vec<PkBattle>, ZsxqError> {
        let mut query = Query::new();
        query.push_opt("count", count.as_ref());

        let path = format!("/v2/pk_groups/{}/records", pk_group_id);
        let response: RecordsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.records)
    }

    /// Preview metadata for an external link.
    pub async fn parse_url(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<UrlDetail, ZsxqError> {
        let response: UrlDetailResponse = self
            .rest
            .get_json(cancel, "/v2/url_details", &[("url", url)])
            .await?;
        Ok(response.url_detail)
    }

    pub async fn global_config(&self, cancel: &CancellationToken) -> Result<GlobalConfig, ZsxqError> {
        self.rest.get_json(cancel, "/v2/settings", &[]).await
    }

    pub async fn activities(
        &self,
        cancel: &CancellationToken,
        options: Option<&ActivitiesOptions>,
    ) -> Result<Vec<Activity>, ZsxqError> {
        let query = options.map(ActivitiesOptions::to_query).unwrap_or_default();
        let response: DynamicsResponse = self
            .rest
            .get_json(cancel, "/v2/dynamics", &query.pairs())
            .await?;
        Ok(response.dynamics)
    }
}
