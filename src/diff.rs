use crate::{
	dom::DomApi,
	module::{HookLists, Module, RemoveCallback},
	vnode::{same_vnode, vnode, Key, VNode, VNodeData, VNodeRc},
};
use core::slice;
use hashbrown::HashMap;
use log::{error, trace};
use std::rc::Rc;

/// Constructs a patch engine from an ordered module list and a host-tree
/// adapter.
#[must_use]
pub fn init<A: DomApi>(modules: impl IntoIterator<Item = Module<A>>, api: A) -> DomPatcher<A> {
	DomPatcher::new(modules, api)
}

/// Reconciles virtual trees against a host tree.
///
/// One patch cycle runs to completion on the caller's context; hooks and
/// host mutations are synchronous. Concurrent cycles over overlapping
/// subtrees are the caller's problem to serialize.
pub struct DomPatcher<A: DomApi> {
	api: Rc<A>,
	cbs: HookLists<A>,
	empty: VNodeRc<A::Node>,
}

type InsertQueue<N> = Vec<VNodeRc<N>>;

impl<A: DomApi> DomPatcher<A> {
	#[must_use]
	pub fn new(modules: impl IntoIterator<Item = Module<A>>, api: A) -> Self {
		Self {
			api: Rc::new(api),
			cbs: HookLists::collect(modules),
			empty: vnode(Some(String::new()), VNodeData::default(), Some(Vec::new()), None, None),
		}
	}

	/// Adapter this engine patches through.
	#[must_use]
	pub fn api(&self) -> &A {
		&self.api
	}

	/// Patches the host tree from the previously rendered `old_vnode` to
	/// `new_vnode` and returns the latter with its host backreferences
	/// populated.
	pub fn patch(&self, old_vnode: &VNodeRc<A::Node>, new_vnode: &VNodeRc<A::Node>) -> VNodeRc<A::Node> {
		let mut queue = InsertQueue::new();
		for pre in &self.cbs.pre {
			pre();
		}

		if same_vnode(old_vnode, new_vnode) {
			self.patch_vnode(old_vnode, new_vnode, &mut queue);
		} else {
			trace!("Replacing root node.");
			let old_elm = expect_elm(old_vnode);
			let parent = self.api.parent_node(&old_elm);
			self.create_elm(new_vnode, &mut queue);
			if let Some(parent) = parent {
				self.api.insert_before(
					&parent,
					&expect_elm(new_vnode),
					self.api.next_sibling(&old_elm).as_ref(),
				);
				self.remove_vnodes(&parent, slice::from_ref(old_vnode));
			}
		}

		for inserted in &queue {
			let hook = inserted.data.borrow().hook.insert.clone();
			if let Some(hook) = hook {
				hook(inserted);
			}
		}
		for post in &self.cbs.post {
			post();
		}
		new_vnode.clone()
	}

	/// Patches against a plain host element (a first render over existing
	/// markup): the element is wrapped into a selector-only virtual node
	/// and reconciled as usual, which replaces it unless the selectors
	/// happen to agree.
	pub fn patch_element(&self, root: &A::Node, new_vnode: &VNodeRc<A::Node>) -> VNodeRc<A::Node> {
		let wrapped = self.empty_node_at(root);
		self.patch(&wrapped, new_vnode)
	}

	/// Materializes `vnode_` into a live host node, recursively, recording
	/// the backreference and queueing `insert` hooks for the cycle's end.
	fn create_elm(&self, vnode_: &VNodeRc<A::Node>, queue: &mut InsertQueue<A::Node>) -> A::Node {
		let init = vnode_.data.borrow().hook.init.clone();
		if let Some(init) = init {
			// May replace `data`; everything below re-reads it.
			init(vnode_);
		}

		match vnode_.sel.as_deref() {
			Some("!") => {
				trace!("Creating comment node.");
				let elm = self.api.create_comment(vnode_.text.as_deref().unwrap_or(""));
				*vnode_.elm.borrow_mut() = Some(elm.clone());
				elm
			}
			None => {
				trace!("Creating text node.");
				let elm = self.api.create_text_node(vnode_.text.as_deref().unwrap_or(""));
				*vnode_.elm.borrow_mut() = Some(elm.clone());
				elm
			}
			Some(sel) => {
				let (tag, id, class) = parse_sel(sel);
				trace!("Creating element <{}>.", tag);
				let ns = vnode_.data.borrow().ns.clone();
				let elm = match ns {
					Some(ns) => self.api.create_element_ns(&ns, tag),
					None => self.api.create_element(tag),
				};
				if let Some(id) = id {
					self.api.set_attribute(&elm, "id", id);
				}
				if let Some(class) = &class {
					self.api.set_attribute(&elm, "class", class);
				}
				*vnode_.elm.borrow_mut() = Some(elm.clone());

				for create in &self.cbs.create {
					create(&self.api, &self.empty, vnode_);
				}

				if let Some(children) = &vnode_.children {
					for child in children.iter() {
						let child_elm = self.create_elm(child, queue);
						self.api.append_child(&elm, &child_elm);
					}
				} else if let Some(text) = &vnode_.text {
					self.api.append_child(&elm, &self.api.create_text_node(text));
				}

				let create = vnode_.data.borrow().hook.create.clone();
				if let Some(create) = create {
					create(&self.empty, vnode_);
				}
				if vnode_.data.borrow().hook.insert.is_some() {
					queue.push(vnode_.clone());
				}
				elm
			}
		}
	}

	/// Reconciles two virtual nodes that describe the same host element.
	fn patch_vnode(
		&self,
		old_vnode: &VNodeRc<A::Node>,
		new_vnode: &VNodeRc<A::Node>,
		queue: &mut InsertQueue<A::Node>,
	) {
		let prepatch = new_vnode.data.borrow().hook.prepatch.clone();
		if let Some(prepatch) = prepatch {
			prepatch(old_vnode, new_vnode);
		}

		let elm = expect_elm(old_vnode);
		*new_vnode.elm.borrow_mut() = Some(elm.clone());

		if Rc::ptr_eq(old_vnode, new_vnode) {
			return;
		}

		// Text leaves promoted from bare strings carry no metadata and see
		// no update hooks.
		if new_vnode.sel.is_some() {
			for update in &self.cbs.update {
				update(&self.api, old_vnode, new_vnode);
			}
			let update = new_vnode.data.borrow().hook.update.clone();
			if let Some(update) = update {
				update(old_vnode, new_vnode);
			}
		}

		if new_vnode.text.is_none() {
			match (&old_vnode.children, &new_vnode.children) {
				(Some(old_ch), Some(new_ch)) => {
					if !Rc::ptr_eq(old_ch, new_ch) {
						self.update_children(&elm, old_ch, new_ch, queue);
					}
				}
				(None, Some(new_ch)) => {
					if old_vnode.text.is_some() {
						self.api.set_element_text(&elm, "");
					}
					self.add_vnodes(&elm, None, new_ch, queue);
				}
				(Some(old_ch), None) => {
					self.remove_vnodes(&elm, old_ch.iter());
				}
				(None, None) => {
					if old_vnode.text.is_some() {
						self.api.set_element_text(&elm, "");
					}
				}
			}
		} else if old_vnode.text != new_vnode.text {
			if let Some(old_ch) = &old_vnode.children {
				self.remove_vnodes(&elm, old_ch.iter());
			}
			self.api
				.set_text_content(&elm, new_vnode.text.as_deref().unwrap_or(""));
		}

		let postpatch = new_vnode.data.borrow().hook.postpatch.clone();
		if let Some(postpatch) = postpatch {
			postpatch(old_vnode, new_vnode);
		}
	}

	/// Keyed two-pointer children reconciliation.
	///
	/// Shrinks both windows from both ends, falling back to a lazily-built
	/// key→old-index map when no window endpoint matches. Old slots vacated
	/// by a key match are nulled so later endpoint steps skip them.
	#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
	#[allow(clippy::too_many_lines)]
	fn update_children(
		&self,
		parent_elm: &A::Node,
		old_ch: &[VNodeRc<A::Node>],
		new_ch: &[VNodeRc<A::Node>],
		queue: &mut InsertQueue<A::Node>,
	) {
		trace!("Updating children - start");
		let mut old: Vec<Option<VNodeRc<A::Node>>> = old_ch.iter().cloned().map(Some).collect();

		let mut old_start_idx = 0_isize;
		let mut new_start_idx = 0_isize;
		let mut old_end_idx = old_ch.len() as isize - 1;
		let mut new_end_idx = new_ch.len() as isize - 1;
		let mut key_to_old_idx: Option<HashMap<Key, isize>> = None;

		while old_start_idx <= old_end_idx && new_start_idx <= new_end_idx {
			// Endpoint slots vacated by an earlier key match are skipped
			// before anything else.
			if old[old_start_idx as usize].is_none() {
				old_start_idx += 1;
				continue;
			}
			if old[old_end_idx as usize].is_none() {
				old_end_idx -= 1;
				continue;
			}

			let old_start = old[old_start_idx as usize].clone().expect("checked above");
			let old_end = old[old_end_idx as usize].clone().expect("checked above");
			let new_start = &new_ch[new_start_idx as usize];
			let new_end = &new_ch[new_end_idx as usize];

			if same_vnode(&old_start, new_start) {
				self.patch_vnode(&old_start, new_start, queue);
				old_start_idx += 1;
				new_start_idx += 1;
			} else if same_vnode(&old_end, new_end) {
				self.patch_vnode(&old_end, new_end, queue);
				old_end_idx -= 1;
				new_end_idx -= 1;
			} else if same_vnode(&old_start, new_end) {
				trace!("Child moved right.");
				self.patch_vnode(&old_start, new_end, queue);
				self.api.insert_before(
					parent_elm,
					&expect_elm(&old_start),
					self.api.next_sibling(&expect_elm(&old_end)).as_ref(),
				);
				old_start_idx += 1;
				new_end_idx -= 1;
			} else if same_vnode(&old_end, new_start) {
				trace!("Child moved left.");
				self.patch_vnode(&old_end, new_start, queue);
				self.api
					.insert_before(parent_elm, &expect_elm(&old_end), Some(&expect_elm(&old_start)));
				old_end_idx -= 1;
				new_start_idx += 1;
			} else {
				let map = key_to_old_idx
					.get_or_insert_with(|| key_to_old_index(&old, old_start_idx, old_end_idx));
				let found = new_start
					.key
					.as_ref()
					.and_then(|key| map.get(key))
					.and_then(|&idx| old[idx as usize].clone().map(|moved| (idx, moved)));
				match found {
					Some((idx_in_old, elm_to_move)) if elm_to_move.sel == new_start.sel => {
						self.patch_vnode(&elm_to_move, new_start, queue);
						old[idx_in_old as usize] = None;
						self.api.insert_before(
							parent_elm,
							&expect_elm(&elm_to_move),
							Some(&expect_elm(&old_start)),
						);
					}
					// Unknown key, or a key now describing a different
					// element type: reuse is unsafe either way.
					_ => {
						trace!("New child; creating.");
						let new_elm = self.create_elm(new_start, queue);
						self.api
							.insert_before(parent_elm, &new_elm, Some(&expect_elm(&old_start)));
					}
				}
				new_start_idx += 1;
			}
		}

		if new_start_idx <= new_end_idx || old_start_idx <= old_end_idx {
			if old_start_idx > old_end_idx {
				let before = new_ch
					.get((new_end_idx + 1) as usize)
					.map(|next| expect_elm(next));
				self.add_vnodes(
					parent_elm,
					before.as_ref(),
					&new_ch[new_start_idx as usize..=new_end_idx as usize],
					queue,
				);
			} else {
				self.remove_vnodes(
					parent_elm,
					old[old_start_idx as usize..=old_end_idx as usize].iter().flatten(),
				);
			}
		}
		trace!("Updating children - end");
	}

	fn add_vnodes(
		&self,
		parent_elm: &A::Node,
		before: Option<&A::Node>,
		vnodes: &[VNodeRc<A::Node>],
		queue: &mut InsertQueue<A::Node>,
	) {
		for vnode_ in vnodes {
			let elm = self.create_elm(vnode_, queue);
			self.api.insert_before(parent_elm, &elm, before);
		}
	}

	fn remove_vnodes<'v>(
		&self,
		parent_elm: &A::Node,
		vnodes: impl IntoIterator<Item = &'v VNodeRc<A::Node>>,
	) {
		for child in vnodes {
			if child.sel.is_some() {
				self.invoke_destroy(child);
				let listeners = self.cbs.remove.len() + 1;
				let rm = self.remove_callback(expect_elm(child), listeners);
				for remove in &self.cbs.remove {
					remove(&self.api, child, &rm);
				}
				let remove = child.data.borrow().hook.remove.clone();
				match remove {
					Some(remove) => remove(child, &rm),
					// The engine's own completion; without it a node with
					// no remove hooks anywhere would never leave the tree.
					None => rm.call(),
				}
			} else {
				trace!("Removing text node.");
				self.api.remove_child(parent_elm, &expect_elm(child));
			}
		}
	}

	/// Depth-first destruction: children complete before the node itself,
	/// then the node's own hook runs before the module hooks.
	fn invoke_destroy(&self, vnode_: &VNodeRc<A::Node>) {
		if vnode_.sel.is_none() {
			return;
		}
		if let Some(children) = &vnode_.children {
			for child in children.iter() {
				self.invoke_destroy(child);
			}
		}
		let destroy = vnode_.data.borrow().hook.destroy.clone();
		if let Some(destroy) = destroy {
			destroy(vnode_);
		}
		for destroy in &self.cbs.destroy {
			destroy(&self.api, vnode_);
		}
	}

	fn remove_callback(&self, child_elm: A::Node, listeners: usize) -> RemoveCallback {
		let api = Rc::clone(&self.api);
		RemoveCallback::new(listeners, move || match api.parent_node(&child_elm) {
			Some(parent) => api.remove_child(&parent, &child_elm),
			None => error!("Could not find parent node of node to remove. Ignoring."),
		})
	}

	/// Wraps a live host element into a virtual node carrying only its
	/// selector, so existing markup can serve as a patch starting point.
	fn empty_node_at(&self, elm: &A::Node) -> VNodeRc<A::Node> {
		let tag = self.api.tag_name(elm).to_ascii_lowercase();
		let id = self
			.api
			.get_attribute(elm, "id")
			.filter(|id| !id.is_empty())
			.map(|id| format!("#{id}"))
			.unwrap_or_default();
		let class = self
			.api
			.get_attribute(elm, "class")
			.filter(|class| !class.is_empty())
			.map(|class| format!(".{}", class.split_ascii_whitespace().collect::<Vec<_>>().join(".")))
			.unwrap_or_default();
		vnode(
			Some(format!("{tag}{id}{class}")),
			VNodeData::default(),
			Some(Vec::new()),
			None,
			Some(elm.clone()),
		)
	}
}

fn expect_elm<N: Clone>(vnode_: &VNode<N>) -> N {
	vnode_
		.elm
		.borrow()
		.clone()
		.expect("virtual node was never materialized")
}

/// Key→index map over the old window. On duplicate keys the last
/// occurrence wins; earlier ones degrade to unkeyed behavior.
#[allow(clippy::cast_sign_loss)]
fn key_to_old_index<N>(old: &[Option<VNodeRc<N>>], begin: isize, end: isize) -> HashMap<Key, isize> {
	let mut map = HashMap::new();
	for idx in begin..=end {
		if let Some(child) = &old[idx as usize] {
			if let Some(key) = &child.key {
				map.insert(key.clone(), idx);
			}
		}
	}
	map
}

/// Splits `tag#id.class1.class2` into its parts: the tag runs to the first
/// `#` or `.`, the id sits between `#` and the first following `.`, and
/// every later `.`-separated token becomes a class.
fn parse_sel(sel: &str) -> (&str, Option<&str>, Option<String>) {
	let hash_idx = sel.find('#');
	let dot_idx = sel[hash_idx.unwrap_or(0)..]
		.find('.')
		.map(|idx| idx + hash_idx.unwrap_or(0));
	let hash = match hash_idx {
		Some(idx) if idx > 0 => idx,
		_ => sel.len(),
	};
	let dot = match dot_idx {
		Some(idx) if idx > 0 => idx,
		_ => sel.len(),
	};
	let tag = if hash_idx.is_some() || dot_idx.is_some() {
		&sel[..hash.min(dot)]
	} else {
		sel
	};
	let id = (hash < dot).then(|| &sel[hash + 1..dot]);
	let class = match dot_idx {
		Some(idx) if idx > 0 => Some(sel[idx + 1..].replace('.', " ")),
		_ => None,
	};
	(tag, id, class)
}
