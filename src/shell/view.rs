use serde::{Deserialize, Serialize};

/// Opaque view-tree fragment produced by a screen factory.
///
/// The navigation core never interprets it; it only stores it inside a
/// [`ViewNode`] and swaps it out when a screen is refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewFragment {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewFragment>,
}

impl ViewFragment {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Leaf element with text content
    pub fn text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: ViewFragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewFragment>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of elements in the fragment, including the root
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ViewFragment::node_count).sum::<usize>()
    }
}

/// Container a screen instance is mounted in.
///
/// Refreshing replaces the content but keeps the container, so the host's
/// mount point survives a rebuild.
#[derive(Debug, Clone)]
pub struct ViewNode {
    content: ViewFragment,
    revision: u32,
    attached: bool,
}

impl ViewNode {
    pub fn new(content: ViewFragment) -> Self {
        Self {
            content,
            revision: 0,
            attached: true,
        }
    }

    pub fn content(&self) -> &ViewFragment {
        &self.content
    }

    /// How many times the content was rebuilt in place
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn replace_content(&mut self, content: ViewFragment) {
        self.content = content;
        self.revision += 1;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }
}
