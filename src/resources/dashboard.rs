use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{JsonMap, RankingItem};
use crate::resources::{RankingListResponse, RankingOptions};
use tokio_util::sync::CancellationToken;

/// Owner dashboard endpoints. They require the token of a group owner or
/// admin; other tokens get a permission error.
#[derive(Debug, Clone)]
pub struct Dashboard<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Dashboard<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Dashboard<R> {
    pub async fn overview(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v2/dashboard/groups/{}/overview", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn incomes(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v2/dashboard/groups/{}/incomes/overview", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn scoreboard_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        options: Option<&RankingOptions>,
    ) -> Result<Vec<RankingItem>, ZsxqError> {
        let query = options.map(RankingOptions::to_query).unwrap_or_default();
        let path = format!("/v2/dashboard/groups/{}/scoreboard/ranking_list", group_id);
        let response: RankingListResponse =
            self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.ranking_list)
    }
}
