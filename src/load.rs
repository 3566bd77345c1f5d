#![allow(clippy::module_name_repetitions)]

//! Hydration: reads an existing host subtree back into virtual nodes, so
//! server-rendered markup can be adopted and patched in place instead of
//! being rebuilt.

use crate::{
	dom::{DomReadApi, NodeKind},
	vnode::{vnode, AttrValue, Attrs, VNodeData, VNodeRc},
};
use tracing::instrument;

/// Loads one host node (and its subtree) into a virtual node.
#[instrument(skip(api, node))]
pub fn load_node<A: DomReadApi>(api: &A, node: &A::Node) -> VNodeRc<A::Node> {
	match api.node_kind(node) {
		NodeKind::Element => load_element(api, node),
		NodeKind::Text => vnode(
			None,
			VNodeData::default(),
			None,
			Some(api.character_data(node)),
			Some(node.clone()),
		),
		NodeKind::Comment => vnode(
			Some("!".to_owned()),
			VNodeData::default(),
			None,
			Some(api.character_data(node)),
			Some(node.clone()),
		),
	}
}

/// Loads a host element: tag (lowercased), `id` and `class` fold into the
/// selector, every other attribute lands in `data.attrs`.
#[instrument(skip(api, element))]
pub fn load_element<A: DomReadApi>(api: &A, element: &A::Node) -> VNodeRc<A::Node> {
	let mut sel = api.tag_name(element).to_ascii_lowercase();
	if let Some(id) = api.get_attribute(element, "id").filter(|id| !id.is_empty()) {
		sel.push('#');
		sel.push_str(&id);
	}
	if let Some(class) = api
		.get_attribute(element, "class")
		.filter(|class| !class.is_empty())
	{
		for token in class.split_ascii_whitespace() {
			sel.push('.');
			sel.push_str(token);
		}
	}

	let mut attrs = Attrs::default();
	for (name, value) in api.attributes(element) {
		if name != "id" && name != "class" {
			attrs.insert(name, AttrValue::Str(value));
		}
	}
	let data = VNodeData {
		attrs: (!attrs.is_empty()).then_some(attrs),
		..VNodeData::default()
	};

	vnode(
		Some(sel),
		data,
		Some(load_children(api, element)),
		None,
		Some(element.clone()),
	)
}

/// Loads every child of a host node.
#[instrument(skip(api, parent))]
pub fn load_children<A: DomReadApi>(api: &A, parent: &A::Node) -> Vec<VNodeRc<A::Node>> {
	api.child_nodes(parent)
		.iter()
		.map(|child| load_node(api, child))
		.collect()
}
