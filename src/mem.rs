//! In-memory host tree backend.
//!
//! Serves two purposes: rendering to a string outside a browser, and
//! observing exactly which host mutations a patch performed (every adapter
//! call is counted in [`DomStats`]).

use crate::dom::{DomApi, DomReadApi, NodeKind};
use core::{
	cell::{Cell, RefCell},
	fmt,
	mem::take,
};
use log::error;
use std::{
	collections::BTreeMap,
	rc::{Rc, Weak},
};

/// Handle to one node of the in-memory host tree. Cheap to clone; two
/// handles compare equal when they point at the same node.
#[derive(Clone)]
pub struct MemNode(Rc<MemNodeInner>);

struct MemNodeInner {
	content: RefCell<MemContent>,
	parent: RefCell<Weak<MemNodeInner>>,
}

enum MemContent {
	Element {
		tag: String,
		ns: Option<String>,
		attrs: BTreeMap<String, String>,
		children: Vec<MemNode>,
	},
	Text(String),
	Comment(String),
}

impl MemNode {
	fn new(content: MemContent) -> Self {
		Self(Rc::new(MemNodeInner {
			content: RefCell::new(content),
			parent: RefCell::new(Weak::new()),
		}))
	}

	#[must_use]
	pub fn kind(&self) -> NodeKind {
		match &*self.0.content.borrow() {
			MemContent::Element { .. } => NodeKind::Element,
			MemContent::Text(_) => NodeKind::Text,
			MemContent::Comment(_) => NodeKind::Comment,
		}
	}

	#[must_use]
	pub fn tag(&self) -> Option<String> {
		match &*self.0.content.borrow() {
			MemContent::Element { tag, .. } => Some(tag.clone()),
			_ => None,
		}
	}

	#[must_use]
	pub fn namespace(&self) -> Option<String> {
		match &*self.0.content.borrow() {
			MemContent::Element { ns, .. } => ns.clone(),
			_ => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<String> {
		match &*self.0.content.borrow() {
			MemContent::Element { attrs, .. } => attrs.get(name).cloned(),
			_ => None,
		}
	}

	/// Data of a text or comment node.
	#[must_use]
	pub fn text(&self) -> Option<String> {
		match &*self.0.content.borrow() {
			MemContent::Text(data) | MemContent::Comment(data) => Some(data.clone()),
			MemContent::Element { .. } => None,
		}
	}

	#[must_use]
	pub fn children(&self) -> Vec<MemNode> {
		match &*self.0.content.borrow() {
			MemContent::Element { children, .. } => children.clone(),
			_ => Vec::new(),
		}
	}

	#[must_use]
	pub fn parent(&self) -> Option<MemNode> {
		self.0.parent.borrow().upgrade().map(MemNode)
	}

	/// Serializes the subtree, attributes in sorted order.
	#[must_use]
	pub fn outer_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		match &*self.0.content.borrow() {
			MemContent::Element {
				tag, attrs, children, ..
			} => {
				out.push('<');
				out.push_str(tag);
				for (name, value) in attrs {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					out.push_str(&escape_attr(value));
					out.push('"');
				}
				out.push('>');
				for child in children {
					child.write_html(out);
				}
				out.push_str("</");
				out.push_str(tag);
				out.push('>');
			}
			MemContent::Text(data) => out.push_str(&escape_text(data)),
			MemContent::Comment(data) => {
				out.push_str("<!--");
				out.push_str(data);
				out.push_str("-->");
			}
		}
	}

	fn detach(&self) {
		if let Some(parent) = self.parent() {
			if let MemContent::Element { children, .. } = &mut *parent.0.content.borrow_mut() {
				children.retain(|child| !Rc::ptr_eq(&child.0, &self.0));
			}
		}
		*self.0.parent.borrow_mut() = Weak::new();
	}
}

impl PartialEq for MemNode {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}
impl Eq for MemNode {}

impl fmt::Debug for MemNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &*self.0.content.borrow() {
			MemContent::Element { tag, .. } => write!(f, "MemNode(<{tag}>)"),
			MemContent::Text(data) => write!(f, "MemNode(text {data:?})"),
			MemContent::Comment(data) => write!(f, "MemNode(comment {data:?})"),
		}
	}
}

/// Cumulative counts of the host mutations performed through a
/// [`MemoryDom`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DomStats {
	pub elements_created: usize,
	pub texts_created: usize,
	pub comments_created: usize,
	pub inserts: usize,
	pub appends: usize,
	pub removals: usize,
	pub text_writes: usize,
}

/// Owned document with a `body` root element.
#[derive(Clone)]
pub struct MemoryDom {
	body: MemNode,
	stats: Rc<Cell<DomStats>>,
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self {
			body: MemNode::new(MemContent::Element {
				tag: "body".to_owned(),
				ns: None,
				attrs: BTreeMap::new(),
				children: Vec::new(),
			}),
			stats: Rc::default(),
		}
	}

	#[must_use]
	pub fn body(&self) -> MemNode {
		self.body.clone()
	}

	#[must_use]
	pub fn stats(&self) -> DomStats {
		self.stats.get()
	}

	pub fn reset_stats(&self) {
		self.stats.set(DomStats::default());
	}

	fn bump(&self, bump: impl FnOnce(&mut DomStats)) {
		let mut stats = self.stats.get();
		bump(&mut stats);
		self.stats.set(stats);
	}
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl DomApi for MemoryDom {
	type Node = MemNode;

	fn create_element(&self, tag: &str) -> MemNode {
		self.bump(|stats| stats.elements_created += 1);
		MemNode::new(MemContent::Element {
			tag: tag.to_owned(),
			ns: None,
			attrs: BTreeMap::new(),
			children: Vec::new(),
		})
	}

	fn create_element_ns(&self, ns: &str, tag: &str) -> MemNode {
		self.bump(|stats| stats.elements_created += 1);
		MemNode::new(MemContent::Element {
			tag: tag.to_owned(),
			ns: Some(ns.to_owned()),
			attrs: BTreeMap::new(),
			children: Vec::new(),
		})
	}

	fn create_text_node(&self, text: &str) -> MemNode {
		self.bump(|stats| stats.texts_created += 1);
		MemNode::new(MemContent::Text(text.to_owned()))
	}

	fn create_comment(&self, text: &str) -> MemNode {
		self.bump(|stats| stats.comments_created += 1);
		MemNode::new(MemContent::Comment(text.to_owned()))
	}

	fn insert_before(&self, parent: &MemNode, new: &MemNode, reference: Option<&MemNode>) {
		new.detach();
		let mut content = parent.0.content.borrow_mut();
		let MemContent::Element { children, .. } = &mut *content else {
			error!("Cannot insert below a non-element node. Ignoring.");
			return;
		};
		let index = match reference {
			Some(reference) => match children.iter().position(|child| child == reference) {
				Some(index) => index,
				None => {
					error!("Reference node is not a child of the parent; appending instead.");
					children.len()
				}
			},
			None => children.len(),
		};
		children.insert(index, new.clone());
		*new.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
		self.bump(|stats| stats.inserts += 1);
	}

	fn remove_child(&self, parent: &MemNode, child: &MemNode) {
		let mut content = parent.0.content.borrow_mut();
		let MemContent::Element { children, .. } = &mut *content else {
			error!("Cannot remove below a non-element node. Ignoring.");
			return;
		};
		match children.iter().position(|existing| existing == child) {
			Some(index) => {
				children.remove(index);
				*child.0.parent.borrow_mut() = Weak::new();
				self.bump(|stats| stats.removals += 1);
			}
			None => error!("Node to remove is not a child of the parent. Ignoring."),
		}
	}

	fn append_child(&self, parent: &MemNode, child: &MemNode) {
		child.detach();
		let mut content = parent.0.content.borrow_mut();
		let MemContent::Element { children, .. } = &mut *content else {
			error!("Cannot append below a non-element node. Ignoring.");
			return;
		};
		children.push(child.clone());
		*child.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
		self.bump(|stats| stats.appends += 1);
	}

	fn parent_node(&self, node: &MemNode) -> Option<MemNode> {
		node.parent()
	}

	fn next_sibling(&self, node: &MemNode) -> Option<MemNode> {
		let parent = node.parent()?;
		let content = parent.0.content.borrow();
		let MemContent::Element { children, .. } = &*content else {
			return None;
		};
		let index = children.iter().position(|child| child == node)?;
		children.get(index + 1).cloned()
	}

	fn tag_name(&self, element: &MemNode) -> String {
		match element.tag() {
			Some(tag) => tag,
			None => {
				error!("Expected an element but found {:?}.", element);
				String::new()
			}
		}
	}

	fn set_text_content(&self, node: &MemNode, text: &str) {
		let detached = {
			let mut content = node.0.content.borrow_mut();
			match &mut *content {
				MemContent::Element { children, .. } => {
					let detached = take(children);
					if !text.is_empty() {
						let child = MemNode::new(MemContent::Text(text.to_owned()));
						*child.0.parent.borrow_mut() = Rc::downgrade(&node.0);
						children.push(child);
					}
					detached
				}
				MemContent::Text(data) | MemContent::Comment(data) => {
					*data = text.to_owned();
					Vec::new()
				}
			}
		};
		for old in &detached {
			*old.0.parent.borrow_mut() = Weak::new();
		}
		self.bump(|stats| stats.text_writes += 1);
	}

	fn set_attribute(&self, element: &MemNode, name: &str, value: &str) {
		let mut content = element.0.content.borrow_mut();
		match &mut *content {
			MemContent::Element { attrs, .. } => {
				attrs.insert(name.to_owned(), value.to_owned());
			}
			_ => error!("Cannot set attribute {:?} on a non-element node.", name),
		}
	}

	fn remove_attribute(&self, element: &MemNode, name: &str) {
		let mut content = element.0.content.borrow_mut();
		match &mut *content {
			MemContent::Element { attrs, .. } => {
				attrs.remove(name);
			}
			_ => error!("Cannot remove attribute {:?} from a non-element node.", name),
		}
	}

	fn get_attribute(&self, element: &MemNode, name: &str) -> Option<String> {
		element.attribute(name)
	}
}

impl DomReadApi for MemoryDom {
	fn node_kind(&self, node: &MemNode) -> NodeKind {
		node.kind()
	}

	fn attributes(&self, element: &MemNode) -> Vec<(String, String)> {
		match &*element.0.content.borrow() {
			MemContent::Element { attrs, .. } => attrs
				.iter()
				.map(|(name, value)| (name.clone(), value.clone()))
				.collect(),
			_ => Vec::new(),
		}
	}

	fn child_nodes(&self, node: &MemNode) -> Vec<MemNode> {
		node.children()
	}

	fn character_data(&self, node: &MemNode) -> String {
		node.text().unwrap_or_default()
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
	value.replace('&', "&amp;").replace('"', "&quot;")
}
