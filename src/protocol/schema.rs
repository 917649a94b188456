// Generated from schema/schema.json. Do not edit by hand.
// Schema ref: refs/tags/v0.10.8

use serde::{Deserialize, Serialize};

// Type aliases

crate::type_alias! {
    /// Unique identifier for a permission option.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct PermissionOptionId(String);
}

crate::type_alias! {
    /// Protocol version identifier.
    ///
    /// This version is only bumped for breaking changes.
    /// Non-breaking changes should be introduced via capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ProtocolVersion(u16);
}

crate::union_type! {
    /// JSON RPC Request Id
    ///
    /// An identifier established by the Client that MUST contain a String, Number, or NULL value if included.
    pub enum RequestId {
        Long(i64) => Int64,
        String(String) => String,
    }
    nullable Null;
}

crate::type_alias! {
    /// A unique identifier for a conversation session between a client and agent.
    ///
    /// Sessions maintain their own context, conversation history, and state,
    /// allowing multiple independent interactions with the same agent.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SessionId(String);
}

// Enums

crate::int_enum! {
    /// Predefined error codes for common JSON-RPC and ACP-specific errors.
    pub enum ErrorCode: i32 {
        /// **Parse error**: Invalid JSON was received by the server.
        ParseError = -32700,
        /// **Invalid request**: The JSON sent is not a valid Request object.
        InvalidRequest = -32600,
        /// **Method not found**: The method does not exist or is not available.
        MethodNotFound = -32601,
        /// **Invalid params**: Invalid method parameter(s).
        InvalidParams = -32602,
        /// **Internal error**: Internal JSON-RPC error.
        InternalError = -32603,
        /// **Authentication required**: Authentication is required before this operation can be performed.
        AuthenticationRequired = -32000,
        /// **Resource not found**: A given resource, such as a file, was not found.
        ResourceNotFound = -32002,
    }
    /// Other undefined error code.
    other Other;
}

/// The type of permission option being presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionOptionKind {
    /// Allow this operation only this time.
    #[serde(rename = "allow_once")]
    AllowOnce,
    /// Allow this operation and remember the choice.
    #[serde(rename = "allow_always")]
    AllowAlways,
    /// Reject this operation only this time.
    #[serde(rename = "reject_once")]
    RejectOnce,
    /// Reject this operation and remember the choice.
    #[serde(rename = "reject_always")]
    RejectAlways,
}

/// The sender or recipient of messages and data in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

/// Reasons why an agent stops processing a prompt turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// The turn ended successfully.
    #[serde(rename = "end_turn")]
    EndTurn,
    /// The turn ended because the agent reached the maximum number of tokens.
    #[serde(rename = "max_tokens")]
    MaxTokens,
    /// The turn ended because the agent reached the maximum number of allowed
    /// agent requests between user turns.
    #[serde(rename = "max_turn_requests")]
    MaxTurnRequests,
    /// The turn ended because the agent refused to continue.
    #[serde(rename = "refusal")]
    Refusal,
    /// The turn was cancelled by the client via `session/cancel`.
    #[serde(rename = "cancelled")]
    Cancelled,
}

// Models

/// Optional annotations for the client. The client can use annotations to inform how objects are used or displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Role>>,
    #[serde(rename = "lastModified", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

/// Audio provided to or from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioContent {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Binary resource contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobResourceContents {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    pub blob: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub uri: String,
}

crate::discriminated_union! {
    /// Content blocks represent displayable information in the Agent Client Protocol.
    pub enum ContentBlock: "type" {
        "audio" => Audio(AudioContent),
        "image" => Image(ImageContent),
        "resource" => Resource(EmbeddedResource),
        "resource_link" => ResourceLink(ResourceLink),
        "text" => Text(TextContent),
    }
}

/// A streamed item of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// A single item of content
    pub content: ContentBlock,
}

/// The contents of a resource, embedded into a prompt or tool call result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedResource {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    pub resource: EmbeddedResourceResource,
}

/// Resource content that can be embedded in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddedResourceResource {
    TextResourceContents(TextResourceContents),
    BlobResourceContents(BlobResourceContents),
}

impl From<TextResourceContents> for EmbeddedResourceResource {
    fn from(value: TextResourceContents) -> Self {
        Self::TextResourceContents(value)
    }
}

impl From<BlobResourceContents> for EmbeddedResourceResource {
    fn from(value: BlobResourceContents) -> Self {
        Self::BlobResourceContents(value)
    }
}

/// An image provided to or from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// An option presented to the user when requesting permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionOption {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// Hint about the nature of this permission option.
    pub kind: PermissionOptionKind,
    /// Human-readable label to display to the user.
    pub name: String,
    /// Unique identifier for this permission option.
    #[serde(rename = "optionId")]
    pub option_id: PermissionOptionId,
}

/// Response from processing a user prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// Indicates why the agent stopped processing the turn.
    #[serde(rename = "stopReason")]
    pub stop_reason: StopReason,
}

crate::discriminated_union! {
    /// The outcome of a permission request.
    pub enum RequestPermissionOutcome: "outcome" {
        "cancelled" => Cancelled(RequestPermissionOutcomeCancelled),
        "selected" => Selected(SelectedPermissionOutcome),
    }
}

/// The prompt turn was cancelled before the user responded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPermissionOutcomeCancelled {}

/// Response to a permission request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPermissionResponse {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// The user's decision on the permission request.
    pub outcome: RequestPermissionOutcome,
}

/// A resource that the server is capable of reading, included in a prompt or tool call result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub uri: String,
}

/// The user selected one of the provided options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPermissionOutcome {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// The ID of the option the user selected.
    #[serde(rename = "optionId")]
    pub option_id: PermissionOptionId,
}

/// Text provided to or from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    pub text: String,
}

/// Text-based resource contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResourceContents {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
    pub uri: String,
}
