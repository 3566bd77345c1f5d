use core::fmt::Debug;

/// Host node classification, as reported by a readable backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Element,
	Text,
	Comment,
}

/// Capability set over a host document tree.
///
/// The engine performs every host mutation through this trait and assumes
/// nothing else about the backend. Calls are infallible at this boundary;
/// a backend that can fail internally (the browser one, say) logs and
/// carries on, leaving the tree partially patched.
pub trait DomApi: 'static {
	type Node: Clone + Debug + 'static;

	fn create_element(&self, tag: &str) -> Self::Node;
	fn create_element_ns(&self, ns: &str, tag: &str) -> Self::Node;
	fn create_text_node(&self, text: &str) -> Self::Node;
	fn create_comment(&self, text: &str) -> Self::Node;
	fn insert_before(&self, parent: &Self::Node, new: &Self::Node, reference: Option<&Self::Node>);
	fn remove_child(&self, parent: &Self::Node, child: &Self::Node);
	fn append_child(&self, parent: &Self::Node, child: &Self::Node);
	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
	fn tag_name(&self, element: &Self::Node) -> String;
	fn set_text_content(&self, node: &Self::Node, text: &str);
	fn set_attribute(&self, element: &Self::Node, name: &str, value: &str);
	fn remove_attribute(&self, element: &Self::Node, name: &str);
	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String>;

	/// Replaces an element's entire content with one text run.
	fn set_element_text(&self, element: &Self::Node, text: &str) {
		self.set_text_content(element, text);
	}
}

/// Read-side traversal of a host tree, needed only to hydrate existing
/// markup into virtual nodes.
pub trait DomReadApi: DomApi {
	fn node_kind(&self, node: &Self::Node) -> NodeKind;
	fn attributes(&self, element: &Self::Node) -> Vec<(String, String)>;
	fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;
	/// Data of a text or comment node.
	fn character_data(&self, node: &Self::Node) -> String;
}
