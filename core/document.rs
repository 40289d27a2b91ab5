use crate::error::{AppError, Result};
use serde::Deserialize;
use serde_json::Value;

/// One node of the composed prompt. Children render in vector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Text(String),
    LineBreak,
    FileReference {
        locator: Option<String>,
        display_name: Option<String>,
    },
    Paragraph(Vec<DocumentNode>),
    Heading(Vec<DocumentNode>),
    ListItem(Vec<DocumentNode>),
    List {
        ordered: bool,
        children: Vec<DocumentNode>,
    },
    /// Any tag without dedicated rendering; its children pass through.
    Other {
        kind: String,
        children: Vec<DocumentNode>,
    },
}

// Editor JSON: { "type", "text"?, "attrs"?: { "path"?, "name"? }, "content"? }
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    attrs: Option<RawAttrs>,
    #[serde(default)]
    content: Option<Vec<RawNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttrs {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<RawNode> for DocumentNode {
    fn from(raw: RawNode) -> Self {
        let children = || -> Vec<DocumentNode> {
            raw.content
                .unwrap_or_default()
                .into_iter()
                .map(DocumentNode::from)
                .collect()
        };
        match raw.node_type.as_str() {
            "text" => DocumentNode::Text(raw.text.unwrap_or_default()),
            "hardBreak" => DocumentNode::LineBreak,
            "fileCapsule" => {
                let attrs = raw.attrs.unwrap_or_default();
                DocumentNode::FileReference {
                    locator: attrs.path,
                    display_name: attrs.name,
                }
            }
            "paragraph" => DocumentNode::Paragraph(children()),
            "heading" => DocumentNode::Heading(children()),
            "listItem" => DocumentNode::ListItem(children()),
            "bulletList" => DocumentNode::List {
                ordered: false,
                children: children(),
            },
            "orderedList" => DocumentNode::List {
                ordered: true,
                children: children(),
            },
            _ => DocumentNode::Other {
                kind: raw.node_type.clone(),
                children: children(),
            },
        }
    }
}

impl DocumentNode {
    pub fn from_json_value(value: Value) -> Result<Self> {
        let raw: RawNode = serde_json::from_value(value)
            .map_err(|e| AppError::Document(format!("Not a document tree: {}", e)))?;
        Ok(raw.into())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawNode = serde_json::from_str(json)
            .map_err(|e| AppError::Document(format!("Not a document tree: {}", e)))?;
        Ok(raw.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        DocumentNode::Text(content.into())
    }

    pub fn file_reference(locator: impl Into<String>) -> Self {
        DocumentNode::FileReference {
            locator: Some(locator.into()),
            display_name: None,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Text(_) | DocumentNode::LineBreak | DocumentNode::FileReference { .. } => {
                &[]
            }
            DocumentNode::Paragraph(children)
            | DocumentNode::Heading(children)
            | DocumentNode::ListItem(children)
            | DocumentNode::List { children, .. }
            | DocumentNode::Other { children, .. } => children,
        }
    }

    /// Counts reference nodes in the whole tree, including ones without a locator.
    pub fn count_file_references(&self) -> usize {
        let own = usize::from(matches!(self, DocumentNode::FileReference { .. }));
        own + self
            .children()
            .iter()
            .map(DocumentNode::count_file_references)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_editor_json() {
        let doc = DocumentNode::from_json_value(json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Task"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "see "},
                    {"type": "fileCapsule", "attrs": {"path": "/w/a.rs", "name": "a.rs"}},
                    {"type": "hardBreak"}
                ]},
                {"type": "orderedList", "content": [
                    {"type": "listItem", "content": [{"type": "paragraph"}]}
                ]}
            ]
        }))
        .unwrap();

        let expected = DocumentNode::Other {
            kind: "doc".to_string(),
            children: vec![
                DocumentNode::Heading(vec![DocumentNode::text("Task")]),
                DocumentNode::Paragraph(vec![
                    DocumentNode::text("see "),
                    DocumentNode::FileReference {
                        locator: Some("/w/a.rs".to_string()),
                        display_name: Some("a.rs".to_string()),
                    },
                    DocumentNode::LineBreak,
                ]),
                DocumentNode::List {
                    ordered: true,
                    children: vec![DocumentNode::ListItem(vec![DocumentNode::Paragraph(
                        vec![],
                    )])],
                },
            ],
        };
        assert_eq!(doc, expected);
    }

    #[test]
    fn missing_type_is_a_document_error() {
        let err = DocumentNode::from_json_value(json!({"content": []})).unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
        let err = DocumentNode::from_json_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
    }

    #[test]
    fn counts_references_without_locator() {
        let doc = DocumentNode::from_json_str(
            r#"{"type":"doc","content":[
                {"type":"paragraph","content":[
                    {"type":"fileCapsule","attrs":{"path":"/w/a.rs"}},
                    {"type":"fileCapsule"},
                    {"type":"fileCapsule","attrs":{"path":""}}
                ]},
                {"type":"blockquote","content":[{"type":"fileCapsule","attrs":{"path":"/w/b.rs"}}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.count_file_references(), 4);
    }
}
