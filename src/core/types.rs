use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Loosely-typed JSON object returned by statistics-style endpoints.
pub type JsonMap = HashMap<String, Value>;

// ─────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────

/// A platform user.
///
/// The platform identifies users inconsistently: the id may arrive under
/// `user_id` or `uid`, as a JSON string or a number. Decoding normalizes
/// both into [`User::user_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub introduction: Option<String>,
    pub unique_id: Option<String>,
    pub user_sid: Option<String>,
    pub grade: Option<String>,
    pub verified: Option<bool>,
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct UserHelper {
            #[serde(default)]
            user_id: Option<Value>,
            #[serde(default)]
            uid: Option<Value>,
            #[serde(default, deserialize_with = "null_default")]
            name: String,
            avatar_url: Option<String>,
            location: Option<String>,
            introduction: Option<String>,
            unique_id: Option<String>,
            user_sid: Option<String>,
            grade: Option<String>,
            verified: Option<bool>,
        }

        let helper = UserHelper::deserialize(deserializer)?;
        let user_id = match normalize_id(helper.user_id.as_ref()).map_err(serde::de::Error::custom)? {
            Some(id) => id,
            None => normalize_id(helper.uid.as_ref())
                .map_err(serde::de::Error::custom)?
                .unwrap_or_default(),
        };

        Ok(Self {
            user_id,
            name: helper.name,
            avatar_url: helper.avatar_url,
            location: helper.location,
            introduction: helper.introduction,
            unique_id: helper.unique_id,
            user_sid: helper.user_sid,
            grade: helper.grade,
            verified: helper.verified,
        })
    }
}

/// Render an id that may be a JSON string or number as a string.
fn normalize_id(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(format!("user id must be a string or number, got {}", other)),
    }
}

/// Decode an explicit `null` as the type's default.
///
/// `#[serde(default)]` only covers absent keys; the platform also sends
/// `null` for unset text and counters.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inviter {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coupon {
    #[serde(deserialize_with = "null_default")]
    pub coupon_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub amount: i64,
    pub valid_until: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Remark {
    #[serde(deserialize_with = "null_default")]
    pub remark_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub target_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub target_type: String,
    #[serde(deserialize_with = "null_default")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceCategory {
    #[serde(deserialize_with = "null_default")]
    pub category_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnansweredQuestionsSummary {
    #[serde(deserialize_with = "null_default")]
    pub count: i64,
    pub latest_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerStatistics {
    #[serde(deserialize_with = "null_default")]
    pub followers_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub following_count: i64,
    pub new_followers: Option<i64>,
    pub unfollowers_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contribution {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionStatistics {
    #[serde(deserialize_with = "null_default")]
    pub total_points: i64,
    #[serde(deserialize_with = "null_default")]
    pub topics_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub comments_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub likes_given_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementSummary {
    #[serde(deserialize_with = "null_default")]
    pub achievement_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyRanking {
    #[serde(deserialize_with = "null_default")]
    pub rank: i64,
    #[serde(deserialize_with = "null_default")]
    pub points: i64,
    #[serde(deserialize_with = "null_default")]
    pub total_users: i64,
}

// ─────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    #[default]
    Free,
    Pay,
    #[serde(other)]
    Unknown,
}

/// A group ("planet").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(deserialize_with = "null_default")]
    pub group_id: i64,
    pub number: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub background_url: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub group_type: GroupType,
    pub member_count: Option<i64>,
    pub owner: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
    pub risk_level: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub partner_ids: Vec<i64>,
    #[serde(deserialize_with = "null_default")]
    pub admin_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hashtag {
    #[serde(deserialize_with = "null_default")]
    pub hashtag_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub topics_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Menu {
    #[serde(deserialize_with = "null_default")]
    pub menu_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    #[serde(deserialize_with = "null_default")]
    pub column_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub topics_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub cover_url: String,
}

/// Owner, partners and admins of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMembers {
    pub owner: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub partners: Vec<User>,
    #[serde(deserialize_with = "null_default")]
    pub admins: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitySummary {
    #[serde(deserialize_with = "null_default")]
    pub topics_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub comments_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub likes_received: i64,
    #[serde(deserialize_with = "null_default")]
    pub likes_given: i64,
    #[serde(deserialize_with = "null_default")]
    pub rewards_received: i64,
    #[serde(deserialize_with = "null_default")]
    pub rewards_given: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenewalInfo {
    pub renewal_id: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_default")]
    pub original_price: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionInfo {
    #[serde(deserialize_with = "null_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub commission_rate: i64,
    pub join_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTag {
    #[serde(deserialize_with = "null_default")]
    pub label_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduledJob {
    #[serde(deserialize_with = "null_default")]
    pub job_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupWarning {
    pub warning_type: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────
// Topics
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicType {
    #[default]
    #[serde(rename = "talk")]
    Talk,
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "q&a")]
    Question,
    #[serde(rename = "solution")]
    Solution,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    #[serde(deserialize_with = "null_default")]
    pub topic_id: i64,
    pub topic_uid: Option<String>,
    pub group: Option<Group>,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub topic_type: TopicType,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
    pub talk: Option<TalkContent>,
    pub task: Option<TaskContent>,
    pub question: Option<QuestionContent>,
    pub solution: Option<SolutionContent>,
    #[serde(deserialize_with = "null_default")]
    pub likes_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub comments_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub rewards_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub reading_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub digested: bool,
    #[serde(deserialize_with = "null_default")]
    pub sticky: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalkContent {
    pub owner: Option<User>,
    pub text: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub images: Vec<Image>,
    #[serde(deserialize_with = "null_default")]
    pub files: Vec<FileAttachment>,
    pub article: Option<Article>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskContent {
    pub owner: Option<User>,
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionContent {
    pub owner: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionContent {
    pub owner: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "null_default")]
    pub image_id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub original: Option<ImageSize>,
    pub thumbnail: Option<ImageSize>,
    pub large: Option<ImageSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSize {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub width: i64,
    #[serde(deserialize_with = "null_default")]
    pub height: i64,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAttachment {
    #[serde(deserialize_with = "null_default")]
    pub file_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub hash: Option<String>,
    pub size: Option<i64>,
    pub duration: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_default")]
    pub article_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    pub inline_content_html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "null_default")]
    pub comment_id: i64,
    pub owner: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
    #[serde(deserialize_with = "null_default")]
    pub likes_count: i64,
    pub repliee: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub sticky: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub user: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub amount: i64,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
}

// ─────────────────────────────────────────────────────────────────────────
// Check-ins and rankings
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinStatus {
    #[default]
    Ongoing,
    Closed,
    Over,
    #[serde(other)]
    Unknown,
}

impl CheckinStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Closed => "closed",
            Self::Over => "over",
            Self::Unknown => "unknown",
        }
    }
}

/// A check-in project (training camp).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkin {
    #[serde(deserialize_with = "null_default")]
    pub checkin_id: i64,
    pub group: Option<Group>,
    pub owner: Option<User>,
    #[serde(alias = "title")]
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(alias = "text")]
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    pub cover_url: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub status: CheckinStatus,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
    #[serde(deserialize_with = "null_default")]
    pub begin_time: String,
    #[serde(deserialize_with = "null_default")]
    pub end_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinStatistics {
    #[serde(deserialize_with = "null_default")]
    pub joined_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub completed_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub checkined_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStatistics {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub checkin_count: i64,
    pub user_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyCheckinStatistics {
    #[serde(deserialize_with = "null_default")]
    pub total_days: i64,
    #[serde(deserialize_with = "null_default")]
    pub continuous_days: i64,
    pub last_checkin_date: Option<String>,
    pub my_rank: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingItem {
    pub user: Option<User>,
    #[serde(deserialize_with = "null_default")]
    pub rank: i64,
    #[serde(deserialize_with = "null_default")]
    pub count: i64,
    pub continuous_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingStatistics {
    #[serde(deserialize_with = "null_default")]
    pub total_users: i64,
    pub my_rank: Option<i64>,
    pub my_points: Option<i64>,
    pub top_user_points: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardSettings {
    #[serde(deserialize_with = "null_default")]
    pub enabled: bool,
    pub rules: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub points_rules: JsonMap,
}

// ─────────────────────────────────────────────────────────────────────────
// Misc
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PkGroup {
    #[serde(deserialize_with = "null_default")]
    pub pk_group_id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PkBattle {
    #[serde(deserialize_with = "null_default")]
    pub battle_id: i64,
    pub group_a: Option<Group>,
    pub group_b: Option<Group>,
    #[serde(deserialize_with = "null_default")]
    pub score_a: i64,
    #[serde(deserialize_with = "null_default")]
    pub score_b: i64,
    #[serde(deserialize_with = "null_default")]
    pub start_time: String,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlDetail {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub version: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub features: JsonMap,
    #[serde(deserialize_with = "null_default")]
    pub settings: JsonMap,
}

/// An entry of the activity ("dynamics") feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    #[serde(deserialize_with = "null_default")]
    pub activity_id: i64,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_default")]
    pub kind: String,
    pub content: Option<String>,
    pub actor: Option<User>,
    pub target: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub create_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_from_numeric_user_id() {
        let user: User = serde_json::from_value(json!({"user_id": 8124, "name": "a"})).unwrap();
        assert_eq!(user.user_id, "8124");
    }

    #[test]
    fn test_user_id_from_string_uid() {
        let user: User = serde_json::from_value(json!({"uid": "5518", "name": "b"})).unwrap();
        assert_eq!(user.user_id, "5518");
    }

    #[test]
    fn test_user_id_from_numeric_uid() {
        let user: User =
            serde_json::from_value(json!({"uid": 412_588_522_121_418_u64, "name": "c"})).unwrap();
        assert_eq!(user.user_id, "412588522121418");
    }

    #[test]
    fn test_user_id_prefers_user_id_over_uid() {
        let user: User =
            serde_json::from_value(json!({"user_id": "1", "uid": "2", "name": "d"})).unwrap();
        assert_eq!(user.user_id, "1");

        let user: User =
            serde_json::from_value(json!({"user_id": null, "uid": 2, "name": "d"})).unwrap();
        assert_eq!(user.user_id, "2");
    }

    #[test]
    fn test_user_id_missing_is_empty() {
        let user: User = serde_json::from_value(json!({"name": "e"})).unwrap();
        assert!(user.user_id.is_empty());
    }

    #[test]
    fn test_user_id_rejects_other_types() {
        let result: Result<User, _> = serde_json::from_value(json!({"user_id": [1]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_users_are_normalized() {
        let item: RankingItem = serde_json::from_value(json!({
            "user": {"uid": 77, "name": "f"},
            "rank": 1,
            "count": 30
        }))
        .unwrap();
        assert_eq!(item.user.unwrap().user_id, "77");
    }

    #[test]
    fn test_topic_type_variants() {
        let topic: Topic =
            serde_json::from_value(json!({"topic_id": 1, "type": "q&a"})).unwrap();
        assert_eq!(topic.topic_type, TopicType::Question);

        let topic: Topic =
            serde_json::from_value(json!({"topic_id": 1, "type": "voice"})).unwrap();
        assert_eq!(topic.topic_type, TopicType::Unknown);
    }

    #[test]
    fn test_checkin_accepts_title_alias() {
        let checkin: Checkin = serde_json::from_value(json!({
            "checkin_id": 9,
            "title": "早起",
            "text": "每天七点前",
            "status": "closed"
        }))
        .unwrap();
        assert_eq!(checkin.name, "早起");
        assert_eq!(checkin.description, "每天七点前");
        assert_eq!(checkin.status, CheckinStatus::Closed);
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let group: Group = serde_json::from_value(json!({
            "group_id": 1,
            "name": "a",
            "description": null,
            "background_url": null,
            "type": null,
            "partner_ids": null,
            "owner": null
        }))
        .unwrap();
        assert_eq!(group.group_id, 1);
        assert!(group.description.is_empty());
        assert!(group.background_url.is_empty());
        assert_eq!(group.group_type, GroupType::Free);
        assert!(group.partner_ids.is_empty());
        assert!(group.owner.is_none());

        let topic: Topic = serde_json::from_value(json!({
            "topic_id": 2,
            "create_time": null,
            "likes_count": null,
            "digested": null,
            "talk": {"text": null, "images": null}
        }))
        .unwrap();
        assert!(topic.create_time.is_empty());
        assert_eq!(topic.likes_count, 0);
        assert!(!topic.digested);
        assert!(topic.talk.unwrap().images.is_empty());

        let user: User = serde_json::from_value(json!({"uid": 3, "name": null})).unwrap();
        assert_eq!(user.user_id, "3");
        assert!(user.name.is_empty());
    }
}
