use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard response envelope.
///
/// Successes are `{ success: true, message?, data? }`; failures are the same
/// shape with `success: false` and a message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn message_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// List envelope: `{ success, data: [...], pagination }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

/// `page`/`size` query parameters shared by every list endpoint.
///
/// Filtered listings repeat the two fields inline instead of flattening
/// this struct; query-string deserialization cannot see through
/// `#[serde(flatten)]` for non-string values.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PageQuery {
    /// 1-based page number, defaulting to 1.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, defaulting to 10.
    pub fn size(&self) -> u64 {
        self.size.unwrap_or(10).max(1)
    }

    /// Number of rows to skip: `(page - 1) * size`.
    pub fn skip(&self) -> u64 {
        (self.page() - 1) * self.size()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u64, size: u64, total: u64) -> Self {
        let size = size.max(1);
        let total_pages = total.div_ceil(size);
        Self {
            page,
            size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

pub mod user {
    use super::*;

    /// A user as exposed over the wire. Never carries the password hash.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub avatar: Option<String>,
        pub role: String,
        pub email_verified: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterRequest {
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OtpVerifyRequest {
        pub email: String,
        pub otp: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthData {
        pub token: String,
        pub user: UserView,
    }

    /// Claims carried by the HS256 bearer token.
    ///
    /// The same shape is accepted from the origin SSO (shared secret).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TokenClaims {
        /// User id.
        pub sub: Uuid,
        pub email: String,
        #[serde(default)]
        pub first_name: Option<String>,
        #[serde(default)]
        pub last_name: Option<String>,
        #[serde(default)]
        pub avatar: Option<String>,
        #[serde(default)]
        pub role: Option<String>,
        /// Expiry, seconds since the epoch.
        pub exp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SsoData {
        pub claims: TokenClaims,
        pub user: UserView,
    }
}

pub mod approval {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatusApproveView {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusApproveCreate {
        pub name: String,
    }

    /// Body for the externally-driven create. `api_key` must match the
    /// configured key; the caller is another system, not a logged-in user.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ApproveListCreate {
        pub api_key: String,
        pub url: String,
        pub title: String,
        pub detail: String,
        pub comment: Option<String>,
        /// Record id on the origin system.
        pub id_from: Option<String>,
        /// Base URL for the origin status callback.
        pub api_path: Option<String>,
        pub status_approve_id: Option<i32>,
        pub config_id: Option<Uuid>,
        pub user_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ApproveListUpdate {
        pub comment: Option<String>,
        pub status_approve_id: Option<i32>,
        /// Callback overrides; stored values are used when absent.
        pub api_path: Option<String>,
        pub id_from: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ApproveListView {
        pub id: Uuid,
        pub url: String,
        pub title: String,
        pub detail: String,
        pub comment: Option<String>,
        pub id_from: Option<String>,
        pub api_path: Option<String>,
        pub status_approve: Option<StatusApproveView>,
        pub config: Option<super::config::ConfigView>,
        pub user: Option<super::user::UserView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ApproveListQuery {
        pub page: Option<u64>,
        pub size: Option<u64>,
        pub user_id: Option<Uuid>,
        pub status_approve_id: Option<i32>,
        pub config_id: Option<Uuid>,
        /// Substring match over title, detail and url.
        pub search: Option<String>,
    }

    impl ApproveListQuery {
        pub fn page_query(&self) -> PageQuery {
            PageQuery {
                page: self.page,
                size: self.size,
            }
        }
    }
}

pub mod config {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConfigTypeView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConfigTypeCreate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConfigCreate {
        pub name: String,
        pub config_type_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConfigUpdate {
        pub name: Option<String>,
        pub config_type_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConfigView {
        pub id: Uuid,
        pub name: String,
        pub config_type: Option<ConfigTypeView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ConfigQuery {
        pub page: Option<u64>,
        pub size: Option<u64>,
        pub search: Option<String>,
    }

    impl ConfigQuery {
        pub fn page_query(&self) -> PageQuery {
            PageQuery {
                page: self.page,
                size: self.size,
            }
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Expense,
        Income,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub name: String,
        /// Minor units, > 0.
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileNew {
        pub url: String,
        pub public_id: String,
    }

    /// Create body. The transaction amount is the sum of its items, so there
    /// is no separate amount field and `items` must not be empty.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionCreate {
        pub title: String,
        pub note: Option<String>,
        pub kind: TransactionKind,
        pub items: Vec<ItemNew>,
        #[serde(default)]
        pub files: Vec<FileNew>,
    }

    /// Update body: full replacement of the mutable state (items and files
    /// included).
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        pub title: String,
        pub note: Option<String>,
        pub kind: TransactionKind,
        pub items: Vec<ItemNew>,
        #[serde(default)]
        pub files: Vec<FileNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionApprove {
        /// Must be Approved (2) or Rejected (3).
        pub status_approve_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ItemView {
        pub id: Uuid,
        pub name: String,
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileView {
        pub id: Uuid,
        pub url: String,
        pub public_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        pub note: Option<String>,
        pub kind: TransactionKind,
        pub amount: i64,
        pub status_approve: Option<super::approval::StatusApproveView>,
        pub created_by: Option<super::user::UserView>,
        pub approved_by: Option<super::user::UserView>,
        pub approved_at: Option<DateTime<Utc>>,
        pub items: Vec<ItemView>,
        pub files: Vec<FileView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionQuery {
        pub page: Option<u64>,
        pub size: Option<u64>,
        pub status_approve_id: Option<i32>,
        pub created_by: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        /// Substring match over title and note.
        pub search: Option<String>,
    }

    impl TransactionQuery {
        pub fn page_query(&self) -> PageQuery {
            PageQuery {
                page: self.page,
                size: self.size,
            }
        }
    }
}

pub mod ledger {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NetAmountView {
        pub id: i32,
        pub amount: i64,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetAmountSet {
        pub amount: i64,
    }

    /// Balance snapshot after one change, append-only.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct HistoryNetAmountView {
        pub id: Uuid,
        pub net_amount_id: i32,
        pub amount: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod upload {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UploadedFile {
        pub url: String,
        pub public_id: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_page_minus_one_times_size() {
        let q = PageQuery {
            page: Some(3),
            size: Some(10),
        };
        assert_eq!(q.skip(), 20);
    }

    #[test]
    fn page_and_size_default_to_one_and_ten() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.size(), 10);
        assert_eq!(q.skip(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        let p = Pagination::new(3, 10, 30);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let p = Pagination::new(2, 10, 25);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }

    #[test]
    fn envelope_skips_absent_fields() {
        let json = serde_json::to_value(Envelope::data(7)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 7);
        assert!(json.get("message").is_none());
    }
}
