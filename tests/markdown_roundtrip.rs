//! Markdown import/export round-trip tests
//!
//! Every node the composer can produce must survive export followed by import.

mod common;

use common::{full_map, pipeline, user};
use feed_composer::document::{Document, EditorNode, InlineMediaNode, MentionUser};

fn assert_roundtrip(node: EditorNode) {
    let p = pipeline(full_map());
    let markdown = p.export(std::slice::from_ref(&node));
    let imported = p.import(&markdown);
    assert_eq!(imported, vec![node], "round-trip failed for {:?}", markdown);
}

// ========================================================================
// Mentions
// ========================================================================

#[test]
fn test_mention_without_avatar() {
    assert_roundtrip(EditorNode::mention(user("u_1", "ada", "Ada Lovelace")));
}

#[test]
fn test_mention_with_avatar() {
    assert_roundtrip(EditorNode::mention(MentionUser {
        avatar_url: Some("https://img.example/avatars/ada.png".to_string()),
        ..user("u_1", "ada", "Ada Lovelace")
    }));
}

#[test]
fn test_mention_with_unicode_display_name() {
    assert_roundtrip(EditorNode::mention(user("7", "zoe", "Zoë 🦜 Ünal")));
}

#[test]
fn test_mention_display_name_with_brackets() {
    assert_roundtrip(EditorNode::mention(user("1", "bob", "Bob [Admin]")));
    assert_roundtrip(EditorNode::mention(user("1", "bob", "]")));
}

#[test]
fn test_mention_ids_with_colons() {
    assert_roundtrip(EditorNode::mention(user("team:42", "bob", "Bob")));
    assert_roundtrip(EditorNode::mention(user("7", "org:bob", "Bob")));
}

#[test]
fn test_mention_avatar_with_parens() {
    assert_roundtrip(EditorNode::mention(MentionUser {
        avatar_url: Some("https://img.example/a_(1).png".to_string()),
        ..user("1", "bob", "Bob")
    }));
}

#[test]
fn test_mention_fields_with_backslashes_and_spaces() {
    assert_roundtrip(EditorNode::mention(MentionUser {
        avatar_url: Some(r"https://img.example/my pics\a.png".to_string()),
        ..user(r"dom\bob", "bob smith", r"Bob \o/")
    }));
}

#[test]
fn test_escaped_mention_in_text() {
    let p = pipeline(full_map());
    let nodes = vec![
        EditorNode::text("hi "),
        EditorNode::mention(user("team:42", "bob", "Bob [Admin]")),
        EditorNode::text(" ok"),
    ];
    assert_eq!(p.import(&p.export(&nodes)), nodes);
}

// ========================================================================
// Inline media
// ========================================================================

#[test]
fn test_image_alt_with_brackets() {
    assert_roundtrip(InlineMediaNode::image("/a.png", "see [1]").into());
}

#[test]
fn test_image_src_with_parens_and_spaces() {
    assert_roundtrip(InlineMediaNode::image("https://img.example/a_(1).png", "a").into());
    assert_roundtrip(
        InlineMediaNode::image("/my pics/cat.png", "cat")
            .with_size(Some(64), None)
            .into(),
    );
    assert_roundtrip(InlineMediaNode::image("/a.png", "a").with_id(r"media\9)").into());
}

#[test]
fn test_emoji_alt_with_brackets() {
    assert_roundtrip(InlineMediaNode::image("https://cdn.example/b.gif", "emoji:b]").into());
}

#[test]
fn test_image_with_url() {
    assert_roundtrip(InlineMediaNode::image("https://img.example/cat.png", "a cat").into());
}

#[test]
fn test_image_with_relative_path() {
    assert_roundtrip(InlineMediaNode::image("/uploads/cat.png", "cat").into());
}

#[test]
fn test_image_with_blob_and_data_sources() {
    assert_roundtrip(InlineMediaNode::image("blob:https://app.example/3f2a", "").into());
    assert_roundtrip(InlineMediaNode::image("data:image/png;base64,iVBORw0KGgo=", "px").into());
}

#[test]
fn test_image_with_id_and_temporary_src() {
    let node = InlineMediaNode::image("blob:https://app.example/3f2a", "upload").with_id("media_9");
    assert_roundtrip(node.into());
}

#[test]
fn test_image_with_size() {
    assert_roundtrip(
        InlineMediaNode::image("/a.png", "a")
            .with_size(Some(320), Some(240))
            .into(),
    );
    assert_roundtrip(InlineMediaNode::image("/a.png", "a").with_size(None, Some(16)).into());
    assert_roundtrip(InlineMediaNode::image("/a.png", "a").with_size(Some(16), None).into());
}

#[test]
fn test_native_emoji_node() {
    let p = pipeline(full_map());
    let nodes = p.import("![emoji:tada](tada)");
    let EditorNode::InlineMedia(media) = &nodes[0] else {
        panic!("expected an inline media node");
    };
    assert_eq!(media.id.as_deref(), Some("tada"));
    assert!(media.src.ends_with("/twitter/64/1f389.png"), "src was {}", media.src);
    assert_roundtrip(nodes[0].clone());
}

#[test]
fn test_emoji_with_literal_url() {
    assert_roundtrip(
        InlineMediaNode::image("https://cdn.example/blob.gif", "emoji:blob")
            .with_size(Some(20), Some(20))
            .into(),
    );
}

// ========================================================================
// Whole documents
// ========================================================================

#[test]
fn test_document_roundtrip_is_byte_exact() {
    let p = pipeline(full_map());
    let inputs = [
        "",
        "just text",
        "hi @[Ada](mention:u_1:ada)!",
        "@[Ada](mention:u_1:ada)@[Bob](mention:u_2:bob:https://img.example/b.png)",
        "look ![cat](/cat.png =64x48) and ![emoji:tada](tada) ok",
        "![emoji:party_parrot](devhub:party_parrot) 🎉 ![x](media_9)",
    ];
    for input in inputs {
        assert_eq!(p.export(&p.import(input)), input);
    }
}

#[test]
fn test_malformed_fragments_are_text() {
    let p = pipeline(full_map());
    for input in [
        "@[Ada](mention:u_1)",
        "@[Ada](user:u_1:ada)",
        "![cat](/cat.png",
        "![emoji:nope](nope)",
        "![a](/a.png =99999999999x1)",
    ] {
        let nodes = p.import(input);
        assert_eq!(nodes, vec![EditorNode::text(input)], "input {:?}", input);
        assert_eq!(p.export(&nodes), input);
    }
}

#[test]
fn test_document_model_matches_pipeline_export() {
    let p = pipeline(full_map());
    let document: Document = p.import_document("a @[Ada](mention:u_1:ada) b ![c](/c.png)");
    assert_eq!(document.len(), 4);
    assert_eq!(document.to_markdown(), p.export_document(&document));
    assert_eq!(document.plain_text(), "a @Ada b c");
}
