use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{
    ActivitySummary, Column, CustomTag, DistributionInfo, Group, GroupWarning, Hashtag, JsonMap,
    Menu, RenewalInfo, RoleMembers, ScheduledJob, User, null_default,
};
use crate::resources::{GroupsResponse, UserResponse};
use serde::Deserialize;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct GroupResponse {
    group: Group,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HashtagsResponse {
    #[serde(deserialize_with = "null_default")]
    hashtags: Vec<Hashtag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenusResponse {
    #[serde(deserialize_with = "null_default")]
    menus: Vec<Menu>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnsResponse {
    #[serde(deserialize_with = "null_default")]
    columns: Vec<Column>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: ActivitySummary,
}

#[derive(Debug, Deserialize)]
struct RenewalResponse {
    renewal: RenewalInfo,
}

#[derive(Debug, Deserialize)]
struct DistributionResponse {
    distribution: DistributionInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LabelsResponse {
    #[serde(deserialize_with = "null_default")]
    labels: Vec<CustomTag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JobsResponse {
    #[serde(deserialize_with = "null_default")]
    jobs: Vec<ScheduledJob>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WarningResponse {
    #[serde(deserialize_with = "null_default")]
    warning: GroupWarning,
}

/// Group ("planet") endpoints
#[derive(Debug, Clone)]
pub struct Groups<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Groups<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Groups<R> {
    /// Groups the current user has joined.
    pub async fn list(&self, cancel: &CancellationToken) -> Result<Vec<Group>, ZsxqError> {
        let response: GroupsResponse = self.rest.get_json(cancel, "/v2/groups", &[]).await?;
        Ok(response.groups)
    }

    pub async fn get(&self, cancel: &CancellationToken, group_id: i64) -> Result<Group, ZsxqError> {
        let path = format!("/v2/groups/{}", group_id);
        let response: GroupResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.group)
    }

    pub async fn hashtags(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<Hashtag>, ZsxqError> {
        let path = format!("/v2/groups/{}/hashtags", group_id);
        let response: HashtagsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.hashtags)
    }

    /// Free-form statistics object, returned as-is.
    pub async fn statistics(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v2/groups/{}/statistics", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn member(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        member_id: &str,
    ) -> Result<User, ZsxqError> {
        let path = format!("/v2/groups/{}/members/{}", group_id, member_id);
        let response: UserResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.user)
    }

    /// Unread topic counts keyed by group id.
    pub async fn unread_topics_count(
        &self,
        cancel: &CancellationToken,
    ) -> Result<HashMap<String, i64>, ZsxqError> {
        self.rest
            .get_json(cancel, "/v2/groups/unread_topics_count", &[])
            .await
    }

    pub async fn menus(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<Menu>, ZsxqError> {
        let path = format!("/v2/groups/{}/menus", group_id);
        let response: MenusResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.menus)
    }

    /// Owner, partners and admins.
    pub async fn role_members(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<RoleMembers, ZsxqError> {
        let path = format!("/v2/groups/{}/role_members", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn columns(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<Column>, ZsxqError> {
        let path = format!("/v2/groups/{}/columns", group_id);
        let response: ColumnsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.columns)
    }

    pub async fn columns_summary(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<JsonMap, ZsxqError> {
        let path = format!("/v2/groups/{}/columns/summary", group_id);
        self.rest.get_json(cancel, &path, &[]).await
    }

    pub async fn member_activity_summary(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        member_id: &str,
    ) -> Result<ActivitySummary, ZsxqError> {
        let path = format!("/v2/groups/{}/members/{}/summary", group_id, member_id);
        let response: SummaryResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.summary)
    }

    pub async fn renewal_info(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<RenewalInfo, ZsxqError> {
        let path = format!("/v2/groups/{}/renewal", group_id);
        let response: RenewalResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.renewal)
    }

    pub async fn distribution_info(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<DistributionInfo, ZsxqError> {
        let path = format!("/v2/groups/{}/distribution", group_id);
        let response: DistributionResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.distribution)
    }

    pub async fn upgradable_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Group>, ZsxqError> {
        let response: GroupsResponse = self
            .rest
            .get_json(cancel, "/v2/groups/upgradable_groups", &[])
            .await?;
        Ok(response.groups)
    }

    pub async fn recommended_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Group>, ZsxqError> {
        let response: GroupsResponse = self
            .rest
            .get_json(cancel, "/v2/groups/recommendations", &[])
            .await?;
        Ok(response.groups)
    }

    pub async fn custom_tags(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<CustomTag>, ZsxqError> {
        let path = format!("/v2/groups/{}/labels", group_id);
        let response: LabelsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.labels)
    }

    pub async fn scheduled_jobs(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<ScheduledJob>, ZsxqError> {
        let path = format!("/v2/groups/{}/scheduled_jobs", group_id);
        let response: JobsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.jobs)
    }

    /// Risk warnings; an absent warning decodes as an empty one.
    pub async fn risk_warnings(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<GroupWarning, ZsxqError> {
        let path = format!("/v3/groups/{}/group_warning", group_id);
        let response: WarningResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.warning)
    }
}
