use crate::core::errors::ZsxqError;
use crate::core::kernel::RestClient;
use crate::core::types::{null_default, Comment, Reward, Topic};
use crate::resources::{Query, TopicsResponse};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Page size the topic list endpoint requires when none is given.
pub const DEFAULT_TOPICS_COUNT: u32 = 20;

/// Filters for topic listings.
///
/// Times are ISO 8601 strings as the platform emits them, for example
/// `2024-01-01T00:00:00.000+0800`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTopicsOptions {
    pub count: Option<u32>,
    /// `all`, `digests`, `by_owner`, `questions` or `tasks`
    pub scope: Option<String>,
    /// `forward` or `backward`
    pub direction: Option<String>,
    pub begin_time: Option<String>,
    pub end_time: Option<String>,
    pub with_invisibles: Option<bool>,
}

impl ListTopicsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    #[must_use]
    pub fn begin_time(mut self, begin_time: impl Into<String>) -> Self {
        self.begin_time = Some(begin_time.into());
        self
    }

    #[must_use]
    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    #[must_use]
    pub const fn with_invisibles(mut self, with_invisibles: bool) -> Self {
        self.with_invisibles = Some(with_invisibles);
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("count", self.count.as_ref());
        query.push_opt("scope", self.scope.as_ref());
        query.push_opt("direction", self.direction.as_ref());
        query.push_opt("begin_time", self.begin_time.as_ref());
        query.push_opt("end_time", self.end_time.as_ref());
        if self.with_invisibles == Some(true) {
            query.push("with_invisibles", true);
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCommentsOptions {
    pub count: Option<u32>,
    /// `asc` or `desc`
    pub sort: Option<String>,
    pub with_sticky: Option<bool>,
}

impl ListCommentsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub const fn with_sticky(mut self, with_sticky: bool) -> Self {
        self.with_sticky = Some(with_sticky);
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.push_opt("count", self.count.as_ref());
        query.push_opt("sort", self.sort.as_ref());
        query.push_opt("with_sticky", self.with_sticky.as_ref());
        query
    }
}

#[derive(Debug, Deserialize)]
struct TopicResponse {
    topic: Topic,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommentsResponse {
    #[serde(deserialize_with = "null_default")]
    comments: Vec<Comment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RewardsResponse {
    #[serde(deserialize_with = "null_default")]
    rewards: Vec<Reward>,
}

/// Topic and comment endpoints
#[derive(Debug, Clone)]
pub struct Topics<R: RestClient> {
    rest: R,
}

impl<R: RestClient + Clone> Topics<R> {
    pub fn new(rest: &R) -> Self {
        Self { rest: rest.clone() }
    }
}

impl<R: RestClient> Topics<R> {
    /// Topics of a group, newest first.
    ///
    /// `count` defaults to [`DEFAULT_TOPICS_COUNT`] because the endpoint
    /// rejects requests without it.
    pub async fn list(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        options: Option<&ListTopicsOptions>,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let mut query = options.map(ListTopicsOptions::to_query).unwrap_or_default();
        query.push_default("count", DEFAULT_TOPICS_COUNT);

        let path = format!("/v2/groups/{}/topics", group_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.topics)
    }

    pub async fn get(&self, cancel: &CancellationToken, topic_id: i64) -> Result<Topic, ZsxqError> {
        let path = format!("/v2/topics/{}", topic_id);
        let response: TopicResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.topic)
    }

    /// Extended topic detail, including fields `get` omits.
    pub async fn info(&self, cancel: &CancellationToken, topic_id: i64) -> Result<Topic, ZsxqError> {
        let path = format!("/v2/topics/{}/info", topic_id);
        let response: TopicResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.topic)
    }

    pub async fn comments(
        &self,
        cancel: &CancellationToken,
        topic_id: i64,
        options: Option<&ListCommentsOptions>,
    ) -> Result<Vec<Comment>, ZsxqError> {
        let query = options.map(ListCommentsOptions::to_query).unwrap_or_default();
        let path = format!("/v2/topics/{}/comments", topic_id);
        let response: CommentsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.comments)
    }

    /// Topics tagged with a hashtag. Only `count` and `scope` apply.
    pub async fn by_hashtag(
        &self,
        cancel: &CancellationToken,
        hashtag_id: i64,
        options: Option<&ListTopicsOptions>,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let mut query = Query::new();
        if let Some(options) = options {
            query.push_opt("count", options.count.as_ref());
            query.push_opt("scope", options.scope.as_ref());
        }

        let path = format!("/v2/hashtags/{}/topics", hashtag_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.topics)
    }

    /// Topics filed under a column. Only `count` applies.
    pub async fn by_column(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
        column_id: i64,
        options: Option<&ListTopicsOptions>,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let mut query = Query::new();
        if let Some(options) = options {
            query.push_opt("count", options.count.as_ref());
        }

        let path = format!("/v2/groups/{}/columns/{}/topics", group_id, column_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &query.pairs()).await?;
        Ok(response.topics)
    }

    pub async fn rewards(
        &self,
        cancel: &CancellationToken,
        topic_id: i64,
    ) -> Result<Vec<Reward>, ZsxqError> {
        let path = format!("/v2/topics/{}/rewards", topic_id);
        let response: RewardsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.rewards)
    }

    pub async fn recommendations(
        &self,
        cancel: &CancellationToken,
        topic_id: i64,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let path = format!("/v2/topics/{}/recommendations", topic_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.topics)
    }

    /// Pinned topics of a group.
    pub async fn sticky(
        &self,
        cancel: &CancellationToken,
        group_id: i64,
    ) -> Result<Vec<Topic>, ZsxqError> {
        let path = format!("/v2/groups/{}/topics/sticky", group_id);
        let response: TopicsResponse = self.rest.get_json(cancel, &path, &[]).await?;
        Ok(response.topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_options_order() {
        let options = ListTopicsOptions::new()
            .with_invisibles(true)
            .end_time("2024-01-01T00:00:00.000+0800")
            .scope("digests")
            .count(30);
        assert_eq!(
            options.to_query().pairs(),
            vec![
                ("count", "30"),
                ("scope", "digests"),
                ("end_time", "2024-01-01T00:00:00.000+0800"),
                ("with_invisibles", "true"),
            ]
        );
    }

    #[test]
    fn test_with_invisibles_false_is_omitted() {
        let options = ListTopicsOptions::new().count(5).with_invisibles(false);
        assert_eq!(options.to_query().pairs(), vec![("count", "5")]);
    }

    #[test]
    fn test_empty_options_produce_no_params() {
        assert!(ListTopicsOptions::new().to_query().pairs().is_empty());
        assert!(ListCommentsOptions::new().to_query().pairs().is_empty());
    }

    #[test]
    fn test_comment_options() {
        let options = ListCommentsOptions::new().sort("asc").with_sticky(false).count(10);
        assert_eq!(
            options.to_query().pairs(),
            vec![("count", "10"), ("sort", "asc"), ("with_sticky", "false")]
        );
    }
}
