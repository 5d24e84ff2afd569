use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{
    AchievementSummary, Contribution, ContributionStatistics, Coupon, FollowerStatistics, Group,
    Inviter, JsonMap, PreferenceCategory, Remark, Topic, UnansweredQuestionsSummary, User,
    WeeklyRanking, null_default,
};
use crate::resources::{GroupsResponse, Query, TopicsResponse, UserResponse, UsersResponse};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AvatarResponse {
    #[serde(deserialize_with = "null_default")]
    avatar_url: String,
}

#[derive(Debug, Deserialize)]
struct InviterResponse {
    inviter: Option<Inviter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CouponsResponse {
    #[serde(deserialize_with = "null_default")]
    coupons: Vec<Coupon>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemarksResponse {
    #[serde(deserialize_with = "null_default")]
    remarks: Vec<Remark>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoriesResponse {
    #[serde(deserialize_with = "null_default")]
    categories: Vec<PreferenceCategory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContributionsResponse {
    #[serde(deserialize_with = "null_default")]
    contributions: Vec<Contribution>,
}

#[derive(Debug, Deserialize)]
struct ContributionStatisticsResponse {
    statistics: ContributionStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummariesResponse {
    #[serde(deserialize_with = "null_default")]
    summaries: Vec<AchievementSummary>,
}

/// User profile endpoints
///
/// User ids are strings; see [`User`] for how numeric ids are normalized.
#[derive(Debug, Clone)]
pub struct Users<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Users<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Users<R> {
    /// The user that owns the configured token.
    pub async fn current(&self, cancel: &CancellationToken) -> Result<User, ZsxqError> {
        let response: UserResponse = self.rest.get_json(cancel, "/v3/users/self", &[]).await?;
        Ok(response.user)
    }

    pub async fn get(&self, cancel: &CancellationToken, user_id: &str) -> Result<User, ZsxqError> {
        let path = format!("/v3/users/{}", user_id);
        let response: UserResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.user)
    }

    pub async fn statistics(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v3/users/{}/statistics", user_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    /// Recent topics by the user.
    pub async fn footprints(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let path = format!("/v2/users/{}/footprints", user_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.topics)
    }

    pub async fn created_groups(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
    ) -> Result<Vec<Group>, ZsxqError> {
        let path = format!("/v2/users/{}/created_groups", user_id);
        let response: GroupsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.groups)
    }

    /// Large-size avatar URL; empty when the user has none.
    pub async fn avatar_url(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
    ) -> Result<String, ZsxqError> {
        let path = format!("/v3/users/{}/avatar_url", user_id);
        let response: AvatarResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.avatar_url)
    }

    pub async fn group_footprints(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
    ) -> Result<Vec<Group>, ZsxqError> {
        let path = format!("/v2/users/{}/group_footprints", user_id);
        let response: GroupsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.groups)
    }

    /// Groups the current user has applied to join.
    pub async fn applying_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Group>, ZsxqError> {
        let response: GroupsResponse = self
            .rest
            .get_json(cancel, "/v2/groups/applying", &[])
            .await?;
        Ok(response.groups)
    }

    /// Who invited the current user into a group, if anyone.
    pub async fn inviter(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Option<Inviter>, ZsxqError> {
        let path = format!("/v2/groups/{}/inviter", group_id);
        let response: InviterResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.inviter)
    }

    pub async fn coupons(&self, cancel: &CancellationToken) -> Result<Vec<Coupon>, ZsxqError> {
        let response: CouponsResponse = self.rest.get_json(cancel, "/v2/coupons", &[]).await?;
        Ok(response.coupons)
    }

    pub async fn remarks(&self, cancel: &CancellationToken) -> Result<Vec<Remark>, ZsxqError> {
        let response: RemarksResponse = self.rest.get_json(cancel, "/v2/remarks", &[]).await?;
        Ok(response.remarks)
    }

    pub async fn recommended_follows(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<User>, ZsxqError> {
        let response: UsersResponse = self
            .rest
            .get_json(cancel, "/v2/users/recommended_follows", &[])
            .await?;
        Ok(response.users)
    }

    pub async fn blocked_users(&self, cancel: &CancellationToken) -> Result<Vec<User>, ZsxqError> {
        let response: UsersResponse = self
            .rest
            .get_json(cancel, "/v2/users/block_users", &[])
            .await?;
        Ok(response.users)
    }

    /// Register a push channel (e.g. `JPush`) and its device token.
    pub async fn report_push_channel(
        &self,
        cancel: &CancellationToken,
        channel: &str,
        device_token: &str,
    ) -> Result<(), ZsxqError> {
        let body = json!({
            "channel": channel,
            "device_token": device_token,
        });
        let _: IgnoredAny = self
            .rest
            .post_json(cancel, "/v2/users/self/push_channel", &body)
            .await?;
        Ok(())
    }

    pub async fn preference_categories(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PreferenceCategory>, ZsxqError> {
        let response: CategoriesResponse = self
            .rest
            .get_json(
                cancel,
                "/v2/users/self/recommendations/preference_categories",
                &[],
            )
            .await?;
        Ok(response.categories)
    }

    pub async fn unanswered_questions_summary(
        &self,
        cancel: &CancellationToken,
    ) -> Result<UnansweredQuestionsSummary, ZsxqError> {
        self.rest
            .get_json(cancel, "/v2/users/self/unanswered_questions/brief", &[])
            .await
    }

    /// Follower counts, optionally since `begin_time`.
    pub async fn follower_statistics(
        &self,
        cancel: &CancellationToken,
        begin_time: Option<&str>,
    ) -> Result<FollowerStatistics, ZsxqError> {
        let mut query = Query::new();
        query.push_opt("begin_time", begin_time.as_ref());
        self.rest
            .get_json(cancel, "/v3/users/self/followers/statistics", &query.pairs())
            .await
    }

    /// Contribution records; the time range applies only when both ends
    /// are given.
    pub async fn contributions(
        &self,
        cancel: &CancellationToken,
        range: Option<(&str, &str)>,
    ) -> Result<Vec<Contribution>, ZsxqError> {
        let mut query = Query::new();
        if let Some((begin_time, end_time)) = range {
            query.push("begin_time", begin_time);
            query.push("end_time", end_time);
        }
        let response: ContributionsResponse = self
            .rest
            .get_json(cancel, "/v3/users/self/contributions", &query.pairs())
            .await?;
        Ok(response.contributions)
    }

    pub async fn contribution_statistics(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ContributionStatistics, ZsxqError> {
        let response: ContributionStatisticsResponse = self
            .rest
            .get_json(cancel, "/v3/users/self/contributions/statistics", &[])
            .await?;
        Ok(response.statistics)
    }

    pub async fn achievements_summary(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<AchievementSummary>, ZsxqError> {
        let response: SummariesResponse = self
            .rest
            .get_json(cancel, "/v3/users/self/achievements/summaries", &[])
            .await?;
        Ok(response.summaries)
    }

    /// The current user's weekly standing in a group.
    pub async fn weekly_ranking(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<WeeklyRanking, ZsxqError> {
        let group_id = group_id.to_string();
        self.rest
            .get_json(
                cancel,
                "/v3/users/self/group_weekly_rankings",
                &[("group_id", group_id.as_str())],
            )
            .await
    }

    pub async fn preferences(&self, cancel: &CancellationToken) -> Result<JsonMap, ZsxqError> {
        self.rest
            .get_json(cancel, "/v3/users/self/preferences", &[])
            .await
    }
}
