use crate::module::RemoveCallback;
use core::{any::Any, cell::RefCell, fmt};
use hashbrown::HashMap;
use std::rc::Rc;

/// Shared handle to a virtual node.
///
/// Virtual trees are immutable once built; sharing a subtree between two
/// renders is allowed and lets the engine skip reconciling it by pointer
/// identity.
pub type VNodeRc<N> = Rc<VNode<N>>;

/// Identity token within a sibling list.
///
/// Two unkeyed siblings (`None` on both `VNode`s) compare equal, so unkeyed
/// children match positionally.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
	Str(String),
	Num(i64),
}
impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for Key {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Self::Num(value)
	}
}
impl From<u32> for Key {
	fn from(value: u32) -> Self {
		Self::Num(value.into())
	}
}

/// Attribute value as understood by the attributes module.
///
/// `Bool(true)` renders as an empty attribute, `Bool(false)` as an absent
/// one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
	Str(String),
	Num(i64),
	Bool(bool),
}
impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl From<i64> for AttrValue {
	fn from(value: i64) -> Self {
		Self::Num(value)
	}
}
impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// Attribute area of [`VNodeData`], diffed by the attributes module.
pub type Attrs = HashMap<String, AttrValue>;

pub type InitHook<N> = dyn Fn(&VNode<N>);
pub type CreateHook<N> = dyn Fn(&VNode<N>, &VNode<N>);
pub type InsertHook<N> = dyn Fn(&VNode<N>);
pub type PatchHook<N> = dyn Fn(&VNode<N>, &VNode<N>);
pub type DestroyHook<N> = dyn Fn(&VNode<N>);
pub type RemoveHook<N> = dyn Fn(&VNode<N>, &RemoveCallback);

/// Per-node lifecycle hooks, stored under `data.hook`.
pub struct Hooks<N> {
	pub init: Option<Rc<InitHook<N>>>,
	pub create: Option<Rc<CreateHook<N>>>,
	pub insert: Option<Rc<InsertHook<N>>>,
	pub prepatch: Option<Rc<PatchHook<N>>>,
	pub update: Option<Rc<PatchHook<N>>>,
	pub postpatch: Option<Rc<PatchHook<N>>>,
	pub destroy: Option<Rc<DestroyHook<N>>>,
	pub remove: Option<Rc<RemoveHook<N>>>,
}
impl<N> Default for Hooks<N> {
	fn default() -> Self {
		Self {
			init: None,
			create: None,
			insert: None,
			prepatch: None,
			update: None,
			postpatch: None,
			destroy: None,
			remove: None,
		}
	}
}

/// Per-node metadata bucket.
///
/// The engine itself only reads `key`, `ns` and `hook`; `attrs` belongs to
/// the attributes module and `extra` holds module-private payloads keyed by
/// module name.
pub struct VNodeData<N> {
	pub key: Option<Key>,
	pub ns: Option<String>,
	pub hook: Hooks<N>,
	pub attrs: Option<Attrs>,
	pub extra: HashMap<&'static str, Rc<dyn Any>>,
}
impl<N> Default for VNodeData<N> {
	fn default() -> Self {
		Self {
			key: None,
			ns: None,
			hook: Hooks::default(),
			attrs: None,
			extra: HashMap::new(),
		}
	}
}
impl<N> VNodeData<N> {
	#[must_use]
	pub fn with_key(key: impl Into<Key>) -> Self {
		Self {
			key: Some(key.into()),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_attrs(attrs: impl IntoIterator<Item = (String, AttrValue)>) -> Self {
		Self {
			attrs: Some(attrs.into_iter().collect()),
			..Self::default()
		}
	}
}

/// One node of a virtual tree.
///
/// `children` and `text` are mutually exclusive; `elm` is written by the
/// engine when the node is materialized and must not be reassigned by
/// anyone else. `data` is interior-mutable so an `init` hook may replace it
/// and modules may stash their own state.
pub struct VNode<N> {
	pub sel: Option<String>,
	pub data: RefCell<VNodeData<N>>,
	pub children: Option<Rc<Vec<VNodeRc<N>>>>,
	pub text: Option<String>,
	pub elm: RefCell<Option<N>>,
	pub key: Option<Key>,
}
impl<N: Clone> VNode<N> {
	/// Host node backreference, populated once the node is materialized.
	#[must_use]
	pub fn elm(&self) -> Option<N> {
		self.elm.borrow().clone()
	}
}
impl<N: fmt::Debug> fmt::Debug for VNode<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("sel", &self.sel)
			.field("key", &self.key)
			.field("text", &self.text)
			.field("children", &self.children)
			.field("elm", &self.elm.borrow())
			.finish_non_exhaustive()
	}
}

/// Canonical virtual node factory.
///
/// Copies `data.key` into the node's own `key` slot, which is what sibling
/// matching compares.
#[must_use]
pub fn vnode<N>(
	sel: Option<String>,
	data: VNodeData<N>,
	children: Option<Vec<VNodeRc<N>>>,
	text: Option<String>,
	elm: Option<N>,
) -> VNodeRc<N> {
	let key = data.key.clone();
	Rc::new(VNode {
		sel,
		data: RefCell::new(data),
		children: children.map(Rc::new),
		text,
		elm: RefCell::new(elm),
		key,
	})
}

/// Whether two virtual nodes describe the same host element.
#[must_use]
pub fn same_vnode<N>(a: &VNode<N>, b: &VNode<N>) -> bool {
	a.key == b.key && a.sel == b.sel
}

/// One child argument of the hyperscript builder: either a proper node or a
/// bare text run (promoted to a text node at build time).
pub enum Child<N> {
	Node(VNodeRc<N>),
	Text(String),
}
impl<N> Child<N> {
	pub(crate) fn into_vnode(self) -> VNodeRc<N> {
		match self {
			Self::Node(node) => node,
			Self::Text(text) => vnode(None, VNodeData::default(), None, Some(text), None),
		}
	}
}
impl<N> From<VNodeRc<N>> for Child<N> {
	fn from(value: VNodeRc<N>) -> Self {
		Self::Node(value)
	}
}
impl<N> From<&str> for Child<N> {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl<N> From<String> for Child<N> {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl<N> From<i64> for Child<N> {
	fn from(value: i64) -> Self {
		Self::Text(value.to_string())
	}
}

/// Children argument of the hyperscript builder.
///
/// `()` means no children, a string or number a single text content, a
/// single node or a list a proper child list.
pub enum Children<N> {
	Empty,
	Text(String),
	List(Vec<Child<N>>),
}
impl<N> From<()> for Children<N> {
	fn from(_: ()) -> Self {
		Self::Empty
	}
}
impl<N> From<&str> for Children<N> {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl<N> From<String> for Children<N> {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl<N> From<i64> for Children<N> {
	fn from(value: i64) -> Self {
		Self::Text(value.to_string())
	}
}
impl<N> From<VNodeRc<N>> for Children<N> {
	fn from(value: VNodeRc<N>) -> Self {
		Self::List(vec![Child::Node(value)])
	}
}
impl<N> From<Vec<VNodeRc<N>>> for Children<N> {
	fn from(value: Vec<VNodeRc<N>>) -> Self {
		Self::List(value.into_iter().map(Child::Node).collect())
	}
}
impl<N> From<Vec<Child<N>>> for Children<N> {
	fn from(value: Vec<Child<N>>) -> Self {
		Self::List(value)
	}
}
