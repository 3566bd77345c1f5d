use crate::vnode::{vnode, Child, Children, VNode, VNodeData, VNodeRc};

/// Namespace URI applied to `svg` subtrees.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Builds a virtual node from a selector and children, with an empty data
/// bucket.
///
/// The children argument accepts `()` (no children), a string or number
/// (text content), a single node, or a list of nodes/text runs; see
/// [`Children`].
#[must_use]
pub fn h<N>(sel: impl Into<String>, children: impl Into<Children<N>>) -> VNodeRc<N> {
	h_with(sel, VNodeData::default(), children)
}

/// Builds a virtual node from a selector, a data bucket and children.
///
/// Selectors starting in `svg` (exactly, or followed by `.` or `#`) put the
/// whole subtree into the SVG namespace, stopping below `foreignObject`
/// boundaries so nested HTML content keeps the default namespace.
#[must_use]
pub fn h_with<N>(sel: impl Into<String>, data: VNodeData<N>, children: impl Into<Children<N>>) -> VNodeRc<N> {
	let sel = sel.into();
	let (children, text) = match children.into() {
		Children::Empty => (None, None),
		Children::Text(text) => (None, Some(text)),
		Children::List(list) => (
			Some(list.into_iter().map(Child::into_vnode).collect::<Vec<_>>()),
			None,
		),
	};
	let node = vnode(Some(sel), data, children, text, None);
	if is_svg_selector(node.sel.as_deref().unwrap_or("")) {
		add_ns(&node);
	}
	node
}

fn is_svg_selector(sel: &str) -> bool {
	sel.starts_with("svg") && matches!(sel.as_bytes().get(3).copied(), None | Some(b'.' | b'#'))
}

fn add_ns<N>(node: &VNode<N>) {
	node.data.borrow_mut().ns = Some(SVG_NS.to_owned());
	if node.sel.as_deref() == Some("foreignObject") {
		return;
	}
	if let Some(children) = &node.children {
		for child in children.iter() {
			if child.sel.is_some() {
				add_ns(child);
			}
		}
	}
}
