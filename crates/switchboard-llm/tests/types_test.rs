use switchboard_llm::{Content, ContentPart, Message};

#[test]
fn test_content_text_creation() {
    let content = Content::text("Hello, world!");
    assert_eq!(content.as_text(), Some("Hello, world!"));
}

#[test]
fn test_content_from_string() {
    let content: Content = "Test".into();
    assert_eq!(content.as_text(), Some("Test"));
}

#[test]
fn test_multipart_content_plain_text() {
    let content = Content::Parts(vec![
        ContentPart::Text { text: "Hello, ".to_string() },
        ContentPart::Text { text: "world".to_string() },
    ]);
    assert_eq!(content.as_text(), None);
    assert_eq!(content.to_plain_text(), "Hello, world");
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are helpful").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
    assert_eq!(Message::ai("Hi there!").role(), "assistant");
}

#[test]
fn test_message_text() {
    assert_eq!(Message::human("Hello").text(), Some("Hello"));
    let empty_ai = Message::AI { content: None, name: None };
    assert_eq!(empty_ai.text(), None);
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("Hello"));
}

#[test]
fn test_message_serialization_ai() {
    let msg = Message::ai("Response");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"assistant\""));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"system","content":"Be a mentor"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg, Message::system("Be a mentor"));
}
