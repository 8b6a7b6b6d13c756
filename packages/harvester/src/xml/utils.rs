//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! All lookups match on the expanded name (namespace + local name), so
//! elements from other namespaces are never picked up by accident.

use std::str::FromStr;

use roxmltree::Node;

use crate::error::{HarvesterError, Result};

/// Check if a node is an element with the given namespace and local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use volby_harvester::xml::has_tag;
///
/// let xml = r#"<root xmlns="urn:a"><child/></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert!(has_tag(doc.root_element(), "urn:a", "root"));
/// assert!(!has_tag(doc.root_element(), "urn:b", "root"));
/// ```
pub fn has_tag(node: Node<'_, '_>, ns: &str, tag: &str) -> bool {
    node.is_element() && node.has_tag_name((ns, tag))
}

/// Find the first child element with the given tag name.
///
/// # Returns
/// First matching child element, or `None` if not found
pub fn find_child<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, ns, tag))
}

/// Find all child elements with the given tag name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use volby_harvester::xml::find_children;
///
/// let xml = r#"<root xmlns="urn:a"><item/><other/><item/></root>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let items: Vec<_> = find_children(doc.root_element(), "urn:a", "item").collect();
/// assert_eq!(items.len(), 2);
/// ```
pub fn find_children<'a, 'input, 'q>(
    node: Node<'a, 'input>,
    ns: &'q str,
    tag: &'q str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'q
where
    'a: 'q,
    'input: 'q,
{
    node.children().filter(move |child| has_tag(*child, ns, tag))
}

/// Find every element reachable from `node` through a slash-separated path.
///
/// Each step matches all children with that name, so `"CELKEM/HODN_KAND"`
/// returns every `HODN_KAND` under every `CELKEM`. Document order is kept.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use volby_harvester::xml::find_all_by_path;
///
/// let xml = r#"<r xmlns="urn:a"><a><b/><b/></a><a><b/></a></r>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_all_by_path(doc.root_element(), "urn:a", "a/b").len(), 3);
/// assert!(find_all_by_path(doc.root_element(), "urn:a", "a/c").is_empty());
/// ```
pub fn find_all_by_path<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    path: &str,
) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];

    for part in path.split('/').filter(|p| !p.is_empty()) {
        current = current
            .into_iter()
            .flat_map(|n| find_children(n, ns, part))
            .collect();
    }

    current
}

/// Get a required attribute value.
///
/// # Errors
/// `MissingAttribute` naming the attribute and the element's local name.
pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| HarvesterError::MissingAttribute {
            attribute: name.to_string(),
            element: node.tag_name().name().to_string(),
        })
}

/// Get a required attribute and parse it.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// `MissingAttribute` when absent, `InvalidNumber` when it does not parse.
pub fn parse_attribute<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let raw = required_attribute(node, name)?;
    raw.trim()
        .parse()
        .map_err(|_| HarvesterError::InvalidNumber {
            attribute: name.to_string(),
            element: node.tag_name().name().to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const NS: &str = "http://www.volby.cz/prezident/";

    #[test]
    fn test_has_tag_requires_namespace() {
        let xml = r#"<root><child/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(!has_tag(doc.root_element(), NS, "root"));
    }

    #[test]
    fn test_has_tag_with_prefix() {
        let xml = r#"<v:root xmlns:v="http://www.volby.cz/prezident/"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(has_tag(doc.root_element(), NS, "root"));
    }

    #[test]
    fn test_find_child() {
        let xml = r#"<root xmlns="http://www.volby.cz/prezident/"><a/><b/><c/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, NS, "a").is_some());
        assert!(find_child(root, NS, "c").is_some());
        assert!(find_child(root, NS, "d").is_none());
    }

    #[test]
    fn test_find_children_skips_foreign_namespace() {
        let xml = r#"<root xmlns="http://www.volby.cz/prezident/" xmlns:x="urn:x">
            <item/><x:item/><item/>
        </root>"#;
        let doc = Document::parse(xml).unwrap();

        let items: Vec<_> = find_children(doc.root_element(), NS, "item").collect();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_find_all_by_path_keeps_order() {
        let xml = r#"<root xmlns="http://www.volby.cz/prezident/">
            <level1><target id="1"/></level1>
            <level1><target id="2"/><target id="3"/></level1>
        </root>"#;
        let doc = Document::parse(xml).unwrap();

        let ids: Vec<_> = find_all_by_path(doc.root_element(), NS, "level1/target")
            .into_iter()
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_required_attribute() {
        let xml = r#"<root attr="value"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(required_attribute(root, "attr").unwrap(), "value");
        let err = required_attribute(root, "missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required attribute missing on <root>"
        );
    }

    #[test]
    fn test_parse_attribute() {
        let xml = r#"<HODN_KAND PORADOVE_CISLO=" 4 " HLASY="-3" JMENO="x"/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();

        assert_eq!(parse_attribute::<u32>(node, "PORADOVE_CISLO").unwrap(), 4);
        assert!(matches!(
            parse_attribute::<u64>(node, "HLASY"),
            Err(HarvesterError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_attribute::<u64>(node, "JMENO"),
            Err(HarvesterError::InvalidNumber { .. })
        ));
    }
}
