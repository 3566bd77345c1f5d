//! Browser backend over `web-sys`. Compiled for `wasm32` targets only.

use crate::{
	diff::{init, DomPatcher},
	dom::{DomApi, DomReadApi, NodeKind},
	module::Module,
};
use log::error;
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{Document, Element, Node};

/// Adapter over a live `web_sys::Document`.
pub struct WebDom {
	document: Document,
}

impl WebDom {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	/// Adapter over the page's own document.
	#[must_use]
	pub fn from_window() -> Self {
		Self::new(
			web_sys::window()
				.expect_throw("xylem-dom: No window found.")
				.document()
				.expect_throw("xylem-dom: No document found for window."),
		)
	}

	fn as_element<'a>(&self, node: &'a Node) -> Option<&'a Element> {
		let element = node.dyn_ref::<Element>();
		if element.is_none() {
			error!("Expected `web_sys::Element` but found {:?}.", node);
		}
		element
	}
}

/// Engine over the page document, with the given modules.
#[must_use]
pub fn init_web(modules: impl IntoIterator<Item = Module<WebDom>>) -> DomPatcher<WebDom> {
	init(modules, WebDom::from_window())
}

impl DomApi for WebDom {
	type Node = Node;

	fn create_element(&self, tag: &str) -> Node {
		self.document
			.create_element(tag)
			.expect_throw("xylem-dom: Failed to create element.")
			.into()
	}

	fn create_element_ns(&self, ns: &str, tag: &str) -> Node {
		self.document
			.create_element_ns(Some(ns), tag)
			.expect_throw("xylem-dom: Failed to create namespaced element.")
			.into()
	}

	fn create_text_node(&self, text: &str) -> Node {
		self.document.create_text_node(text).into()
	}

	fn create_comment(&self, text: &str) -> Node {
		self.document.create_comment(text).into()
	}

	fn insert_before(&self, parent: &Node, new: &Node, reference: Option<&Node>) {
		if let Err(error) = parent.insert_before(new, reference) {
			error!("Failed to insert node: {:?}", error);
		}
	}

	fn remove_child(&self, parent: &Node, child: &Node) {
		if let Err(error) = parent.remove_child(child) {
			error!("Failed to remove node: {:?}", error);
		}
	}

	fn append_child(&self, parent: &Node, child: &Node) {
		if let Err(error) = parent.append_child(child) {
			error!("Failed to append node: {:?}", error);
		}
	}

	fn parent_node(&self, node: &Node) -> Option<Node> {
		node.parent_node()
	}

	fn next_sibling(&self, node: &Node) -> Option<Node> {
		node.next_sibling()
	}

	fn tag_name(&self, element: &Node) -> String {
		self.as_element(element).map(Element::tag_name).unwrap_or_default()
	}

	fn set_text_content(&self, node: &Node, text: &str) {
		node.set_text_content(Some(text));
	}

	fn set_attribute(&self, element: &Node, name: &str, value: &str) {
		if let Some(element) = self.as_element(element) {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Failed to set attribute {:?}: {:?}", name, error);
			}
		}
	}

	fn remove_attribute(&self, element: &Node, name: &str) {
		if let Some(element) = self.as_element(element) {
			if let Err(error) = element.remove_attribute(name) {
				error!("Failed to remove attribute {:?}: {:?}", name, error);
			}
		}
	}

	fn get_attribute(&self, element: &Node, name: &str) -> Option<String> {
		element
			.dyn_ref::<Element>()
			.and_then(|element| element.get_attribute(name))
	}
}

impl DomReadApi for WebDom {
	fn node_kind(&self, node: &Node) -> NodeKind {
		if node.dyn_ref::<Element>().is_some() {
			NodeKind::Element
		} else if node.dyn_ref::<web_sys::Text>().is_some() {
			NodeKind::Text
		} else if node.dyn_ref::<web_sys::Comment>().is_some() {
			NodeKind::Comment
		} else {
			unreachable!("Impossible node {:?}", node)
		}
	}

	fn attributes(&self, element: &Node) -> Vec<(String, String)> {
		let Some(element) = element.dyn_ref::<Element>() else {
			return Vec::new();
		};
		let attributes = element.attributes();
		let mut out = Vec::with_capacity(attributes.length() as usize);
		for index in 0..attributes.length() {
			if let Some(attribute) = attributes.item(index) {
				out.push((attribute.local_name(), attribute.value()));
			}
		}
		out
	}

	fn child_nodes(&self, node: &Node) -> Vec<Node> {
		let child_nodes = node.child_nodes();
		let mut out = Vec::with_capacity(child_nodes.length() as usize);
		for index in 0..child_nodes.length() {
			if let Some(child) = child_nodes.item(index) {
				out.push(child);
			}
		}
		out
	}

	fn character_data(&self, node: &Node) -> String {
		node.text_content().unwrap_or_default()
	}
}
