use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{JsonMap, RankingItem, RankingStatistics, ScoreboardSettings};
use crate::resources::{Query, RankingListResponse};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Paging and selection for leaderboards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingOptions {
    pub count: Option<u32>,
    pub index: Option<u32>,
    /// Board type, e.g. `accumulated` or `continuous` for check-ins
    pub ranking_type: Option<String>,
}

impl RankingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub const fn index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn ranking_type(mut self, ranking_type: impl Into<String>) -> Self {
        self.ranking_type = Some(ranking_type.into());
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("count", self.count.as_ref());
        query.push_opt("index", self.index.as_ref());
        query.push_opt("type", self.ranking_type.as_ref());
        query
    }
}

#[derive(Debug, Deserialize)]
struct StatisticsResponse {
    statistics: RankingStatistics,
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    settings: ScoreboardSettings,
}

/// Leaderboard endpoints
#[derive(Debug, Clone)]
pub struct Ranking<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Ranking<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Ranking<R> {
    async fn ranking_list(
        &self,
        cancel: &CancellationToken,
        path: &str,
        options: Option<&RankingOptions>,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let query = options.map(RankingOptions::to_query).unwrap_or_default();
        let response: RankingListResponse =
            self.rest.get_json(cancel, path, &query.pairs()).await?;
        Ok(response.ranking_list)
    }

    pub async fn group_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        options: Option<&RankingOptions>,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let path = format!("/v2/groups/{}/ranking_list", group_id);
        self.ranking_list(cancel, &path, options).await
    }

    /// Platform-wide group leaderboard. The shape varies by `ranking_type`
    /// and is returned unparsed.
    pub async fn global_ranking(
        &self,
        cancel: &CancellationToken,
        ranking_type: &str,
        count: u32,
    ) -> Result<JsonMap, ZsxqError> {
        let mut query = Query::new();
        query.push("type", ranking_type);
        query.push("count", count);
        self.rest
            .get_json(cancel, "/v3/groups/ranking_list", &query.pairs())
            .await
    }

    pub async fn group_ranking_statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<RankingStatistics, ZsxqError> {
        let path = format!("/v3/groups/{}/ranking_list/statistics", group_id);
        let response: StatisticsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.statistics)
    }

    /// Scoreboard leaderboard. Same endpoint as
    /// [`Dashboard::scoreboard_ranking`](crate::resources::Dashboard::scoreboard_ranking).
    pub async fn score_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        options: Option<&RankingOptions>,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let path = format!("/v2/dashboard/groups/{}/scoreboard/ranking_list", group_id);
        self.ranking_list(cancel, &path, options).await
    }

    pub async fn my_score_statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v2/groups/{}/scoreboard/my_statistics", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn scoreboard_settings(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<ScoreboardSettings, ZsxqError> {
        let path = format!("/v2/groups/{}/scoreboard/settings", group_id);
        let response: SettingsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.settings)
    }

    pub async fn invitation_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let path = format!("/v2/groups/{}/invitations/ranking_list", group_id);
        self.ranking_list(cancel, &path, None).await
    }

    pub async fn contribution_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let path = format!("/v2/groups/{}/contribution_ranking_list", group_id);
        self.ranking_list(cancel, &path, None).await
    }
}
