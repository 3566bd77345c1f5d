//! Attributes module: diffs `data.attrs` between renders and applies the
//! delta to the host element.

use crate::{
	dom::DomApi,
	module::Module,
	vnode::{AttrValue, VNode},
};
use std::rc::Rc;

/// Builds the attributes module for registration with `init`.
#[must_use]
pub fn module<A: DomApi>() -> Module<A> {
	Module {
		create: Some(Rc::new(update_attrs::<A>)),
		update: Some(Rc::new(update_attrs::<A>)),
		..Module::default()
	}
}

fn update_attrs<A: DomApi>(api: &A, old_vnode: &VNode<A::Node>, new_vnode: &VNode<A::Node>) {
	let Some(elm) = new_vnode.elm() else { return };
	let old_attrs = old_vnode.data.borrow().attrs.clone().unwrap_or_default();
	let new_attrs = new_vnode.data.borrow().attrs.clone().unwrap_or_default();
	if old_attrs == new_attrs {
		return;
	}

	for (name, value) in &new_attrs {
		if old_attrs.get(name) != Some(value) {
			match value {
				AttrValue::Bool(true) => api.set_attribute(&elm, name, ""),
				AttrValue::Bool(false) => api.remove_attribute(&elm, name),
				AttrValue::Num(number) => api.set_attribute(&elm, name, &number.to_string()),
				AttrValue::Str(text) => api.set_attribute(&elm, name, text),
			}
		}
	}
	for name in old_attrs.keys() {
		if !new_attrs.contains_key(name) {
			api.remove_attribute(&elm, name);
		}
	}
}
