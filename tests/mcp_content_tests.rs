use jobboard_mcp_server::mcp::content::{ContentItem, ToolResult};
use serde_json::json;

#[test]
fn test_success_text_shape() {
    let result = ToolResult::success_text("5");

    assert!(!result.is_error);
    assert_eq!(result.content.len(), 1);
    assert_eq!(result.content[0].content_type, "text");
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "content": [{ "type": "text", "text": "5" }], "isError": false })
    );
}

#[test]
fn test_error_result() {
    let result = ToolResult::error("Error scraping Indeed jobs: boom");

    assert!(result.is_error);
    assert_eq!(result.text(), "Error scraping Indeed jobs: boom");
    assert_eq!(serde_json::to_value(&result).unwrap()["isError"], true);
}

#[test]
fn test_content_item_deserialize() {
    let item: ContentItem =
        serde_json::from_value(json!({ "type": "text", "text": "hello" })).unwrap();
    assert_eq!(item, ContentItem::text("hello"));
}
