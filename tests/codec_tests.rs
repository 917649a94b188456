//! Codec Tests
//!
//! Wire behavior of the checked-in ACP models: every runtime codec is driven
//! through real protocol shapes.

use serde_json::json;

use acp_codegen::protocol::*;
use acp_codegen::{Discriminated, DiscriminatorVariant, IntEnum, TypeAlias, UnionType};

// =============================================================================
// Discriminated Unions
// =============================================================================

#[test]
fn test_content_block_decode() {
    let block: ContentBlock = serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
    match &block {
        ContentBlock::Text(text) => {
            assert_eq!(text.text, "hi");
            assert!(text.annotations.is_none());
        }
        other => panic!("Expected Text, got {:?}", other),
    }
    assert_eq!(block.discriminator_value(), "text");

    let image: ContentBlock =
        serde_json::from_value(json!({"type": "image", "data": "AAAA", "mimeType": "image/png"})).unwrap();
    assert!(matches!(image, ContentBlock::Image(ref i) if i.mime_type == "image/png"));
}

#[test]
fn test_content_block_unknown_tag() {
    let err = serde_json::from_value::<ContentBlock>(json!({"type": "bogus"})).unwrap_err();
    assert!(err.to_string().contains("unknown discriminator value 'bogus'"), "{}", err);
}

#[test]
fn test_content_block_missing_tag() {
    let err = serde_json::from_value::<ContentBlock>(json!({"text": "hi"})).unwrap_err();
    assert!(err.to_string().contains("missing discriminator field 'type'"), "{}", err);

    // A null tag counts as missing
    let err = serde_json::from_value::<ContentBlock>(json!({"type": null, "text": "hi"})).unwrap_err();
    assert!(err.to_string().contains("missing discriminator field"), "{}", err);
}

#[test]
fn test_content_block_encode_writes_tag() {
    let block = ContentBlock::from(ResourceLink {
        meta: None,
        annotations: None,
        description: None,
        mime_type: None,
        name: "notes".to_string(),
        size: Some(12),
        title: None,
        uri: "file:///notes.md".to_string(),
    });

    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(
        value,
        json!({"type": "resource_link", "name": "notes", "size": 12, "uri": "file:///notes.md"})
    );
    let first_key = value.as_object().unwrap().keys().next().cloned();
    assert_eq!(first_key.as_deref(), Some("type"));
}

#[test]
fn test_variant_round_trip() {
    let original = json!({
        "type": "resource",
        "resource": {"uri": "file:///a.bin", "blob": "AQID", "mimeType": "application/octet-stream"}
    });
    let block: ContentBlock = serde_json::from_value(original.clone()).unwrap();
    match &block {
        ContentBlock::Resource(embedded) => {
            assert!(matches!(embedded.resource, EmbeddedResourceResource::BlobResourceContents(_)));
        }
        other => panic!("Expected Resource, got {:?}", other),
    }
    assert_eq!(serde_json::to_value(&block).unwrap(), original);
}

#[test]
fn test_discriminator_metadata() {
    assert_eq!(ContentBlock::PROPERTY_NAME, "type");
    assert_eq!(<TextContent as DiscriminatorVariant>::VALUE, "text");
    assert_eq!(<RequestPermissionOutcomeCancelled as DiscriminatorVariant>::VALUE, "cancelled");

    let values: Vec<_> = ContentBlock::registry().values().collect();
    assert_eq!(values, vec!["audio", "image", "resource", "resource_link", "text"]);
}

#[test]
fn test_permission_outcome() {
    let response: RequestPermissionResponse =
        serde_json::from_value(json!({"outcome": {"outcome": "selected", "optionId": "allow"}})).unwrap();
    match &response.outcome {
        RequestPermissionOutcome::Selected(selected) => assert_eq!(selected.option_id.inner(), "allow"),
        other => panic!("Expected Selected, got {:?}", other),
    }

    let cancelled = RequestPermissionOutcome::from(RequestPermissionOutcomeCancelled {});
    assert_eq!(serde_json::to_value(&cancelled).unwrap(), json!({"outcome": "cancelled"}));
}

// =============================================================================
// Abstract Bases
// =============================================================================

#[test]
fn test_abstract_base_decodes_any_child() {
    let text: EmbeddedResourceResource =
        serde_json::from_value(json!({"uri": "file:///a.txt", "text": "hello"})).unwrap();
    assert!(matches!(text, EmbeddedResourceResource::TextResourceContents(ref t) if t.text == "hello"));

    let blob: EmbeddedResourceResource = serde_json::from_value(json!({"uri": "file:///a", "blob": "AA=="})).unwrap();
    assert!(matches!(blob, EmbeddedResourceResource::BlobResourceContents(_)));
}

// =============================================================================
// Unions
// =============================================================================

#[test]
fn test_request_id_alternatives() {
    assert_eq!(serde_json::from_value::<RequestId>(json!(42)).unwrap(), RequestId::Long(42));
    assert_eq!(
        serde_json::from_value::<RequestId>(json!("abc")).unwrap(),
        RequestId::String("abc".to_string())
    );
    assert_eq!(serde_json::from_value::<RequestId>(json!(null)).unwrap(), RequestId::Null);

    assert_eq!(serde_json::to_value(RequestId::Long(7)).unwrap(), json!(7));
    assert_eq!(serde_json::to_value(RequestId::Null).unwrap(), json!(null));
    assert!(RequestId::NULLABLE);
}

#[test]
fn test_request_id_rejects_other_kinds() {
    let err = serde_json::from_value::<RequestId>(json!(true)).unwrap_err();
    assert!(err.to_string().contains("no alternative accepts a boolean value"), "{}", err);

    // No floating alternative: fractional ids are rejected, never truncated
    assert!(serde_json::from_value::<RequestId>(json!(1.5)).is_err());
    assert!(serde_json::from_value::<RequestId>(json!({"id": 1})).is_err());
}

// =============================================================================
// Aliases & Enums
// =============================================================================

#[test]
fn test_alias_transparency() {
    let id = SessionId::from("sess_1".to_string());
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"sess_1\"");
    assert_eq!(serde_json::from_str::<SessionId>("\"sess_1\"").unwrap(), id);
    assert_eq!(id.to_string(), "sess_1");
    assert_eq!(String::from(id), "sess_1");

    let version: ProtocolVersion = serde_json::from_value(json!(1)).unwrap();
    assert_eq!(version.into_inner(), 1u16);
    assert!(serde_json::from_value::<ProtocolVersion>(json!(70000)).is_err());
}

#[test]
fn test_int_enum() {
    let code: ErrorCode = serde_json::from_value(json!(-32601)).unwrap();
    assert_eq!(code, ErrorCode::MethodNotFound);
    assert_eq!(code.repr(), -32601);
    assert!(ErrorCode::OPEN);
}

#[test]
fn test_error_code_keeps_unlisted_codes() {
    let code: ErrorCode = serde_json::from_value(json!(-32800)).unwrap();
    assert_eq!(code, ErrorCode::Other(-32800));
    assert_eq!(serde_json::to_value(code).unwrap(), json!(-32800));

    // Out of i32 range is still an error
    assert!(serde_json::from_value::<ErrorCode>(json!(5_000_000_000i64)).is_err());
}

#[test]
fn test_string_enum() {
    assert_eq!(serde_json::to_value(StopReason::MaxTurnRequests).unwrap(), json!("max_turn_requests"));
    assert_eq!(
        serde_json::from_value::<PermissionOptionKind>(json!("reject_always")).unwrap(),
        PermissionOptionKind::RejectAlways
    );
    assert!(serde_json::from_value::<Role>(json!("system")).is_err());
}

#[test]
fn test_record_optional_fields_are_skipped() {
    let response = PromptResponse {
        meta: None,
        stop_reason: StopReason::EndTurn,
    };
    assert_eq!(serde_json::to_value(&response).unwrap(), json!({"stopReason": "end_turn"}));

    let chunk: ContentChunk = serde_json::from_value(json!({
        "_meta": {"trace": "x"},
        "content": {"type": "audio", "data": "AA==", "mimeType": "audio/wav"}
    }))
    .unwrap();
    assert_eq!(chunk.meta, Some(json!({"trace": "x"})));
    assert!(matches!(chunk.content, ContentBlock::Audio(_)));
}

// =============================================================================
// Method Constants
// =============================================================================

#[test]
fn test_method_constants() {
    assert_eq!(ProtocolMeta::VERSION, 1);
    assert_eq!(AgentMethods::SESSION_SET_MODE, "session/set_mode");
    assert_eq!(ClientMethods::TERMINAL_WAIT_FOR_EXIT, "terminal/wait_for_exit");
}
