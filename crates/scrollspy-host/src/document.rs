//! Document - arena of nodes plus scroll state
//!
//! Element layout boxes are stored in document coordinates. The bounding
//! client rect of an element is its layout box shifted by the current
//! scroll offset, which is what `getBoundingClientRect` reports in a browser.

use crate::{DOMRect, DOMTokenList, HostError, NodeId, Viewport};

/// A node in the arena
#[derive(Debug)]
pub struct Node {
    /// Parent node (None for the document root)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag: String,
    /// Border box in document coordinates
    pub layout: DOMRect,
    /// Class list
    pub class_list: DOMTokenList,
}

impl Node {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// Scrollable document
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    viewport: Viewport,
    scroll_top: f64,
    scroll_left: f64,
}

impl Document {
    /// Create an empty document with the given viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            viewport,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }

    /// Create an element under the root with a layout box in document coordinates
    pub fn create_element(&mut self, tag: &str, layout: DOMRect) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            layout,
            class_list: DOMTokenList::new(),
        }))
    }

    /// Create a text node under the root
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(content.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: Some(NodeId::ROOT),
            children: Vec::new(),
            data,
        });
        self.nodes[NodeId::ROOT.0 as usize].children.push(id);
        id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Element data for `id`
    pub fn element(&self, id: NodeId) -> Result<&ElementData, HostError> {
        self.get(id)
            .ok_or(HostError::NoSuchNode(id))?
            .as_element()
            .ok_or(HostError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, HostError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(HostError::NoSuchNode(id))?
            .as_element_mut()
            .ok_or(HostError::NotAnElement(id))
    }

    /// Whether `id` names an element in this document
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Replace an element's layout box (a relayout)
    pub fn set_layout(&mut self, id: NodeId, layout: DOMRect) -> Result<(), HostError> {
        self.element_mut(id)?.layout = layout;
        Ok(())
    }

    /// Viewport-relative border box of an element
    pub fn bounding_client_rect(&self, id: NodeId) -> Result<DOMRect, HostError> {
        let layout = self.element(id)?.layout;
        Ok(layout.translate(-self.scroll_left, -self.scroll_top))
    }

    pub fn class_list(&self, id: NodeId) -> Result<&DOMTokenList, HostError> {
        Ok(&self.element(id)?.class_list)
    }

    pub fn class_list_mut(&mut self, id: NodeId) -> Result<&mut DOMTokenList, HostError> {
        Ok(&mut self.element_mut(id)?.class_list)
    }

    /// Vertical scroll offset of the document element
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Horizontal scroll offset of the document element
    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// Set scroll offsets, clamped at the origin.
    /// Returns true if the position changed.
    pub fn set_scroll(&mut self, left: f64, top: f64) -> bool {
        let left = left.max(0.0);
        let top = top.max(0.0);
        let changed = left != self.scroll_left || top != self.scroll_top;
        self.scroll_left = left;
        self.scroll_top = top;
        changed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let mut doc = Document::default();
        let header = doc.create_element("HEADER", DOMRect::from_xywh(0.0, 200.0, 100.0, 40.0));

        assert!(doc.is_element(header));
        assert_eq!(doc.element(header).unwrap().tag, "header");
        assert_eq!(doc.get(NodeId::ROOT).unwrap().children, vec![header]);
    }

    #[test]
    fn test_text_is_not_element() {
        let mut doc = Document::default();
        let text = doc.create_text("hello");

        assert!(!doc.is_element(text));
        assert_eq!(doc.element(text).unwrap_err(), HostError::NotAnElement(text));
        assert_eq!(
            doc.element(NodeId::from_raw(99)).unwrap_err(),
            HostError::NoSuchNode(NodeId::from_raw(99))
        );
    }

    #[test]
    fn test_bounding_client_rect_follows_scroll() {
        let mut doc = Document::default();
        let el = doc.create_element("div", DOMRect::from_xywh(10.0, 200.0, 100.0, 40.0));

        assert_eq!(doc.bounding_client_rect(el).unwrap().top(), 200.0);

        assert!(doc.set_scroll(0.0, 150.0));
        let rect = doc.bounding_client_rect(el).unwrap();
        assert_eq!(rect.top(), 50.0);
        assert_eq!(rect.left(), 10.0);

        assert!(!doc.set_scroll(0.0, 150.0));
    }

    #[test]
    fn test_scroll_clamps_at_origin() {
        let mut doc = Document::default();
        doc.set_scroll(-5.0, -20.0);
        assert_eq!(doc.scroll_top(), 0.0);
        assert_eq!(doc.scroll_left(), 0.0);
    }
}
