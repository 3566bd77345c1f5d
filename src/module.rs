use crate::{dom::DomApi, vnode::VNode};
use core::cell::Cell;
use std::rc::Rc;

pub type CycleHook = dyn Fn();
pub type ModuleCreateHook<A, N> = dyn Fn(&A, &VNode<N>, &VNode<N>);
pub type ModuleUpdateHook<A, N> = dyn Fn(&A, &VNode<N>, &VNode<N>);
pub type ModuleDestroyHook<A, N> = dyn Fn(&A, &VNode<N>);
pub type ModuleRemoveHook<A, N> = dyn Fn(&A, &VNode<N>, &RemoveCallback);

/// Partial bundle of global hooks contributed by one module.
///
/// Element hooks receive the adapter so modules can reach the host tree;
/// `pre` and `post` frame a whole patch cycle.
pub struct Module<A: DomApi> {
	pub pre: Option<Rc<CycleHook>>,
	pub create: Option<Rc<ModuleCreateHook<A, A::Node>>>,
	pub update: Option<Rc<ModuleUpdateHook<A, A::Node>>>,
	pub destroy: Option<Rc<ModuleDestroyHook<A, A::Node>>>,
	pub remove: Option<Rc<ModuleRemoveHook<A, A::Node>>>,
	pub post: Option<Rc<CycleHook>>,
}
impl<A: DomApi> Default for Module<A> {
	fn default() -> Self {
		Self {
			pre: None,
			create: None,
			update: None,
			destroy: None,
			remove: None,
			post: None,
		}
	}
}

/// Per-hook lists in module registration order, collected once at engine
/// construction and read on every cycle.
pub(crate) struct HookLists<A: DomApi> {
	pub pre: Vec<Rc<CycleHook>>,
	pub create: Vec<Rc<ModuleCreateHook<A, A::Node>>>,
	pub update: Vec<Rc<ModuleUpdateHook<A, A::Node>>>,
	pub destroy: Vec<Rc<ModuleDestroyHook<A, A::Node>>>,
	pub remove: Vec<Rc<ModuleRemoveHook<A, A::Node>>>,
	pub post: Vec<Rc<CycleHook>>,
}
impl<A: DomApi> HookLists<A> {
	pub fn collect(modules: impl IntoIterator<Item = Module<A>>) -> Self {
		let mut lists = Self {
			pre: Vec::new(),
			create: Vec::new(),
			update: Vec::new(),
			destroy: Vec::new(),
			remove: Vec::new(),
			post: Vec::new(),
		};
		for module in modules {
			if let Some(hook) = module.pre {
				lists.pre.push(hook);
			}
			if let Some(hook) = module.create {
				lists.create.push(hook);
			}
			if let Some(hook) = module.update {
				lists.update.push(hook);
			}
			if let Some(hook) = module.destroy {
				lists.destroy.push(hook);
			}
			if let Some(hook) = module.remove {
				lists.remove.push(hook);
			}
			if let Some(hook) = module.post {
				lists.post.push(hook);
			}
		}
		lists
	}
}

/// Completion handle for delayed removal.
///
/// The engine hands one shared handle to every `remove` hook of a node
/// being detached (plus one completion it owes itself); the host node is
/// removed when the last outstanding completion arrives. A hook may stash a
/// clone and call it later, e.g. after an exit animation. Calling more
/// often than the listener count does nothing.
#[derive(Clone)]
pub struct RemoveCallback(Rc<RemoveState>);

struct RemoveState {
	remaining: Cell<usize>,
	remove: Box<dyn Fn()>,
}

impl RemoveCallback {
	pub(crate) fn new(listeners: usize, remove: impl Fn() + 'static) -> Self {
		Self(Rc::new(RemoveState {
			remaining: Cell::new(listeners),
			remove: Box::new(remove),
		}))
	}

	/// Signals one completion.
	pub fn call(&self) {
		match self.0.remaining.get() {
			0 => {}
			1 => {
				self.0.remaining.set(0);
				(self.0.remove)();
			}
			outstanding => self.0.remaining.set(outstanding - 1),
		}
	}

	/// Completions still outstanding before the host node is removed.
	#[must_use]
	pub fn remaining(&self) -> usize {
		self.0.remaining.get()
	}
}
