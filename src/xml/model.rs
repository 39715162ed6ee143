//! XML data model

use indexmap::IndexMap;

/// Tag name that matches every element in a tag-name query
pub const WILDCARD: &str = "*";

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Document {
    /// Merge adjacent text nodes and drop empty ones across the whole tree
    pub fn normalize(&mut self) {
        self.root.normalize();
    }

    /// All elements named `name` in document order, the root included.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        if matches_name(&self.root, name) {
            found.push(&self.root);
        }
        self.root.collect_descendants(name, &mut found);
        found
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Attribute value, or the empty string when the attribute is absent
    pub fn attribute(&self, name: &str) -> &str {
        self.attributes.get(name).map_or("", String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Descendant elements named `name` in document order, excluding `self`.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    /// First descendant element named `name` in document order
    pub fn first_element_by_tag_name(&self, name: &str) -> Option<&Self> {
        self.child_elements().find_map(|child| {
            if matches_name(child, name) {
                Some(child)
            } else {
                child.first_element_by_tag_name(name)
            }
        })
    }

    /// Concatenated text of every descendant text node in document order
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.push_text(&mut text);
        text
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Content::Text(text) => out.push_str(text),
                Content::Element(element) => element.push_text(out),
            }
        }
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        for child in self.child_elements() {
            if matches_name(child, name) {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Content> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Content::Text(text) if text.is_empty() => {}
                Content::Text(text) => {
                    if let Some(Content::Text(previous)) = merged.last_mut() {
                        previous.push_str(&text);
                    } else {
                        merged.push(Content::Text(text));
                    }
                }
                Content::Element(mut element) => {
                    element.normalize();
                    merged.push(Content::Element(element));
                }
            }
        }
        self.children = merged;
    }
}

fn matches_name(element: &Element, name: &str) -> bool {
    name == WILDCARD || element.name == name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Content {
        Content::Text(value.to_string())
    }

    fn leaf(name: &str, value: &str) -> Element {
        let mut element = Element::new(name);
        element.children.push(text(value));
        element
    }

    fn sample() -> Document {
        let mut first = Element::new("employee");
        first.attributes.insert("empid".to_string(), "1".to_string());
        first.children.push(Content::Element(leaf("firstname", "Ada")));

        let mut nested = Element::new("team");
        let mut second = Element::new("employee");
        second.attributes.insert("empid".to_string(), "2".to_string());
        second.children.push(Content::Element(leaf("firstname", "Grace")));
        nested.children.push(Content::Element(second));

        let mut root = Element::new("company");
        root.children.push(Content::Element(first));
        root.children.push(text("\n"));
        root.children.push(Content::Element(nested));
        Document { root }
    }

    #[test]
    fn test_elements_by_tag_name_document_order() {
        let doc = sample();
        let ids: Vec<&str> = doc
            .elements_by_tag_name("employee")
            .iter()
            .map(|e| e.attribute("empid"))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_elements_by_tag_name_includes_root() {
        let doc = sample();
        let roots = doc.elements_by_tag_name("company");
        assert_eq!(roots.len(), 1);
        assert!(doc.root.elements_by_tag_name("company").is_empty());
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let doc = sample();
        let names: Vec<&str> = doc
            .elements_by_tag_name(WILDCARD)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["company", "employee", "firstname", "team", "employee", "firstname"]
        );
    }

    #[test]
    fn test_first_element_by_tag_name_is_depth_first() {
        let doc = sample();
        let first = doc.root.first_element_by_tag_name("firstname");
        assert_eq!(first.map(Element::text_content).as_deref(), Some("Ada"));
        assert!(doc.root.first_element_by_tag_name("salary").is_none());
    }

    #[test]
    fn test_missing_attribute_is_empty() {
        let element = Element::new("employee");
        assert_eq!(element.attribute("empid"), "");
        assert!(!element.has_attribute("empid"));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut name = Element::new("name");
        name.children.push(text("Jane "));
        name.children.push(Content::Element(leaf("b", "Q.")));
        name.children.push(text(" Doe"));
        assert_eq!(name.text_content(), "Jane Q. Doe");
    }

    #[test]
    fn test_normalize_merges_adjacent_text() {
        let mut inner = Element::new("nickname");
        inner.children.push(text("J"));
        inner.children.push(text(""));
        inner.children.push(text("D"));
        let mut root = Element::new("root");
        root.children.push(text(""));
        root.children.push(Content::Element(inner));
        let mut doc = Document { root };

        doc.normalize();

        assert_eq!(doc.root.children.len(), 1);
        let nickname = doc.root.first_element_by_tag_name("nickname");
        assert_eq!(
            nickname.map(|e| e.children.clone()),
            Some(vec![text("JD")])
        );
    }
}
