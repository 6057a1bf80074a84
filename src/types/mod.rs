//! Type definitions for the Smartsheet API.
//!
//! Request bodies are partial objects: the same types are sent and received,
//! so almost every field is optional and omitted when unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sheet representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Sheet ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Sheet name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Caller's access level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,

    /// Link to the sheet in the web application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    /// Incremented on every change to the sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    /// Number of rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_row_count: Option<i64>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,

    /// Columns, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,

    /// Rows, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Creates a sheet body for `create`.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: Some(name.into()),
            columns,
            ..Self::default()
        }
    }

    /// Finds a column by title.
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.title.as_deref() == Some(title))
    }
}

/// Column representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Zero-based position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Column title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Column type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,

    /// Whether this is the primary column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    /// Picklist options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Display width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Whether the column is hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// Whether the column is locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl Column {
    /// Creates a column body.
    pub fn new(title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            title: Some(title.into()),
            column_type: Some(column_type),
            ..Self::default()
        }
    }

    /// Marks the column as primary.
    pub fn primary(mut self) -> Self {
        self.primary = Some(true);
        self
    }

    /// Sets the position.
    pub fn at_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }
}

/// Column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Free text or number.
    TextNumber,
    /// Date.
    Date,
    /// Date and time (system columns).
    DateTime,
    /// Single contact.
    ContactList,
    /// Multiple contacts.
    MultiContactList,
    /// Checkbox.
    Checkbox,
    /// Single-select dropdown.
    Picklist,
    /// Multi-select dropdown.
    MultiPicklist,
    /// Duration (project sheets).
    Duration,
    /// Predecessors (project sheets).
    Predecessor,
    /// Start or end date (project sheets).
    AbstractDatetime,
    /// A type this client does not know.
    #[serde(other)]
    Unknown,
}

/// Row representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Row ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Containing sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,

    /// One-based row number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<u32>,

    /// Parent row, for indented rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,

    /// Row to insert after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sibling_id: Option<i64>,

    /// Insert at the top of the sheet or parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_top: Option<bool>,

    /// Insert at the bottom of the sheet or parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bottom: Option<bool>,

    /// Whether child rows are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    /// Cells, one per populated column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Cell>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Row {
    /// Creates a row body appended at the bottom of the sheet.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            to_bottom: Some(true),
            cells,
            ..Self::default()
        }
    }

    /// Creates a row body that updates an existing row.
    pub fn update(id: i64, cells: Vec<Cell>) -> Self {
        Self {
            id: Some(id),
            cells,
            ..Self::default()
        }
    }

    /// Returns the cell for a column.
    pub fn cell(&self, column_id: i64) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_id == Some(column_id))
    }
}

/// Cell representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Column the cell belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,

    /// Raw value: string, number or boolean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Formatted value as shown in the web application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    /// Formula, if the cell has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,

    /// Apply strict parsing of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl Cell {
    /// Creates a cell body.
    pub fn new(column_id: i64, value: impl Into<Value>) -> Self {
        Self {
            column_id: Some(column_id),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Attachment representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// File or link name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Link target, or a temporary download URL for files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Attachment type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<AttachmentType>,

    /// Sub type for cloud links (e.g. `DOCUMENT`, `FOLDER`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_sub_type: Option<String>,

    /// MIME type of a file attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Size of a file attachment in KiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_kb: Option<i64>,

    /// `SHEET`, `ROW` or `COMMENT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,

    /// ID of the parent object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,

    /// Uploader.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,

    /// Upload time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Attachment {
    /// Creates a link attachment body.
    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            attachment_type: Some(AttachmentType::Link),
            ..Self::default()
        }
    }
}

/// Attachment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    /// Uploaded file.
    File,
    /// Plain URL.
    Link,
    /// Box.com item.
    BoxCom,
    /// Dropbox item.
    Dropbox,
    /// Egnyte item.
    Egnyte,
    /// Evernote note.
    Evernote,
    /// Google Drive item.
    GoogleDrive,
    /// OneDrive item.
    Onedrive,
    /// A type this client does not know.
    #[serde(other)]
    Unknown,
}

/// Short user reference embedded in other objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Discussion representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    /// Discussion ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Title, taken from the first comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// First comment; only sent when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,

    /// Comments, when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    /// Number of comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,

    /// `SHEET` or `ROW`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,

    /// ID of the parent object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,

    /// Time of the latest comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commented_at: Option<DateTime<Utc>>,

    /// Author of the latest comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commented_user: Option<UserRef>,

    /// Whether the caller may not comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Caller's access level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
}

impl Discussion {
    /// Creates a discussion body starting with one comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            comment: Some(Comment::new(text)),
            ..Self::default()
        }
    }
}

/// Comment representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Comment text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Containing discussion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<i64>,

    /// Author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Creates a comment body.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Share representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Share ID. Share IDs are strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `USER` or `GROUP`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub share_type: Option<ShareType>,

    /// Shared-with user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Shared-with group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,

    /// Shared-with user's email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Shared-with user's or group's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Granted access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,

    /// `ITEM` or `WORKSPACE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Subject of the notification email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Body of the notification email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Copy the sender on the notification email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_me: Option<bool>,
}

impl Share {
    /// Creates a share body for a user.
    pub fn with_user(email: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            email: Some(email.into()),
            access_level: Some(access_level),
            ..Self::default()
        }
    }

    /// Creates a share body for a group.
    pub fn with_group(group_id: i64, access_level: AccessLevel) -> Self {
        Self {
            group_id: Some(group_id),
            access_level: Some(access_level),
            ..Self::default()
        }
    }
}

/// Share type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareType {
    /// A single user.
    User,
    /// A group.
    Group,
}

/// Access level on a shared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    /// Read only.
    Viewer,
    /// Read and comment.
    Commenter,
    /// Edit content.
    Editor,
    /// Edit content and share.
    EditorShare,
    /// Manage the object.
    Admin,
    /// Owner.
    Owner,
    /// A level this client does not know.
    #[serde(other)]
    Unknown,
}

/// Webhook representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Webhook ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Webhook name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// HTTPS endpoint that receives callbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,

    /// Scope type; `sheet` for sheet webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// ID of the scope object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_object_id: Option<i64>,

    /// Subscribed events, e.g. `*.*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,

    /// Callback payload version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Whether callbacks are delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Status such as `ENABLED` or `NEW_NOT_VERIFIED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Why the webhook was disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_details: Option<String>,

    /// Secret used to sign callbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Webhook {
    /// Creates a sheet webhook body subscribed to every event.
    pub fn for_sheet(name: impl Into<String>, callback_url: impl Into<String>, sheet_id: i64) -> Self {
        Self {
            name: Some(name.into()),
            callback_url: Some(callback_url.into()),
            scope: Some("sheet".to_string()),
            scope_object_id: Some(sheet_id),
            events: vec!["*.*".to_string()],
            version: Some(1),
            ..Self::default()
        }
    }
}

/// User account details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Primary email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Locale, e.g. `en_US`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Time zone, e.g. `US/Pacific`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Whether the user is a system admin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,

    /// Whether the user may create sheets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licensed_sheet_creator: Option<bool>,

    /// `ACTIVE`, `PENDING` or `DECLINED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Owning account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

/// Account summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Service information: supported locales and formatting tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Supported locales.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_locales: Vec<String>,

    /// Feature flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_info: Option<Value>,

    /// Formatting tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Value>,
}

/// Format of a sheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetExportFormat {
    /// PDF document.
    Pdf,
    /// Excel workbook.
    Excel,
    /// Comma-separated values.
    Csv,
}

impl SheetExportFormat {
    /// Media type sent as `Accept`.
    pub fn media_type(&self) -> &'static str {
        match self {
            SheetExportFormat::Pdf => "application/pdf",
            SheetExportFormat::Excel => "application/vnd.ms-excel",
            SheetExportFormat::Csv => "text/csv",
        }
    }
}

/// Paper size for PDF exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaperSize {
    /// US letter.
    Letter,
    /// US legal.
    Legal,
    /// 11x17.
    Wide,
    /// ARCH D.
    Archd,
    /// A4.
    A4,
    /// A3.
    A3,
    /// A2.
    A2,
    /// A1.
    A1,
    /// A0.
    A0,
}

/// Query for sheet exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    /// Paper size; PDF only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
}
