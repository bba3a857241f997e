//! Text extraction from parsed XML trees
//!
//! Collects the content of `w:t` text leaves under any node, in document
//! order, the same way the doxx run walker concatenates `RunChild::Text`.

use super::super::tree::{ATTRIBUTE_PREFIX, Node, TEXT_KEY};

/// Tag of the WordprocessingML text leaf.
pub(crate) const TEXT_LEAF: &str = "w:t";

/// Concatenate all `w:t` text under `node`.
///
/// Attribute keys are skipped, every other key is searched recursively.
/// Leaves outside a `w:t` element contribute nothing. The result is not
/// trimmed.
pub fn collect_text(node: &Node) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Node, out: &mut String) {
    match node {
        Node::Leaf(_) => {}
        Node::List(items) => {
            for item in items {
                push_text(item, out);
            }
        }
        Node::Map(entries) => {
            for (key, child) in entries {
                if key == TEXT_LEAF {
                    push_leaf_text(child, out);
                } else if !key.starts_with(ATTRIBUTE_PREFIX) {
                    push_text(child, out);
                }
            }
        }
    }
}

/// Value of a `w:t` key: a plain leaf, a map with `#text` (when the element
/// carries attributes such as `xml:space`), or a list of either.
fn push_leaf_text(node: &Node, out: &mut String) {
    match node {
        Node::Leaf(text) => out.push_str(text),
        Node::Map(_) => {
            if let Some(text) = node.get(TEXT_KEY).and_then(Node::as_leaf) {
                out.push_str(text);
            }
        }
        Node::List(items) => {
            for item in items {
                push_leaf_text(item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::tree::{ParseOptions, parse_fragment};
    use super::*;

    fn text_of(xml: &str) -> String {
        collect_text(&parse_fragment(xml, &ParseOptions::default()).unwrap())
    }

    #[test]
    fn test_runs_concatenate_in_document_order() {
        let xml = r#"<w:p w14:paraId="1"><w:r><w:t>E_0003_</w:t></w:r><w:r><w:t>Bestellung</w:t></w:r></w:p>"#;
        assert_eq!(text_of(xml), "E_0003_Bestellung");
    }

    #[test]
    fn test_preserved_whitespace_is_kept() {
        let xml = r#"<w:p><w:r><w:t>Ja</w:t></w:r><w:r><w:t xml:space="preserve"> und  Nein </w:t></w:r></w:p>"#;
        assert_eq!(text_of(xml), "Ja und  Nein ");
    }

    #[test]
    fn test_metadata_and_foreign_leaves_are_ignored() {
        let xml = r#"<w:p><w:pPr><w:pStyle w:val="berschrift3"/></w:pPr><w:r><w:instrText>TOC</w:instrText><w:t>Titel</w:t></w:r></w:p>"#;
        assert_eq!(text_of(xml), "Titel");
    }

    #[test]
    fn test_forced_text_lists_join_without_separator() {
        let options = ParseOptions::with_lists(["w:r", "w:t"]);
        let tree = parse_fragment("<w:r><w:t>A</w:t><w:t>01</w:t></w:r>", &options).unwrap();
        assert_eq!(collect_text(&tree), "A01");
    }

    #[test]
    fn test_missing_text_yields_empty_string() {
        assert_eq!(text_of("<w:p><w:pPr/></w:p>"), "");
        assert_eq!(collect_text(&Node::Leaf("loose".to_string())), "");
    }

    #[test]
    fn test_extracting_twice_is_stable() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">Ist die </w:t></w:r><w:r><w:t>Marktlokation bekannt?</w:t></w:r></w:p>"#;
        let first = text_of(xml);
        let rebuilt = format!("<w:p><w:r><w:t xml:space=\"preserve\">{first}</w:t></w:r></w:p>");
        assert_eq!(text_of(&rebuilt), first);
    }
}
