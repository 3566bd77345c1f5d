use std::{cell::RefCell, rc::Rc};
use xylem_dom::{
	h, h_with, init,
	mem::{MemNode, MemoryDom},
	DomApi, Module, VNodeData, VNodeRc,
};

fn mount_point(api: &MemoryDom) -> MemNode {
	let mount = api.create_element("div");
	api.append_child(&api.body(), &mount);
	mount
}

fn keyed_list(keys: &[&str]) -> VNodeRc<MemNode> {
	h(
		"ul",
		keys.iter()
			.map(|key| h_with("li", VNodeData::with_key(*key), *key))
			.collect::<Vec<_>>(),
	)
}

#[test]
fn keyed_reorder_moves_one_node() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patched_items = Rc::new(RefCell::new(0_usize));

	let counting: Module<MemoryDom> = Module {
		update: Some(Rc::new({
			let patched_items = Rc::clone(&patched_items);
			move |_api, _old, vnode| {
				if vnode.sel.as_deref() == Some("li") {
					*patched_items.borrow_mut() += 1;
				}
			}
		})),
		..Module::default()
	};
	let patcher = init(vec![counting], api.clone());

	let old = patcher.patch_element(&mount, &keyed_list(&["a", "b", "c", "d"]));
	api.reset_stats();

	patcher.patch(&old, &keyed_list(&["d", "a", "b", "c"]));

	let stats = api.stats();
	assert_eq!(stats.elements_created, 0);
	assert_eq!(stats.texts_created, 0);
	assert_eq!(stats.inserts, 1);
	assert_eq!(stats.removals, 0);
	assert_eq!(*patched_items.borrow(), 4);
	assert_eq!(
		api.body().children()[0].outer_html(),
		"<ul><li>d</li><li>a</li><li>b</li><li>c</li></ul>"
	);
}

#[test]
fn keyed_insertion_creates_only_the_new_node() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &keyed_list(&["a", "b", "c"]));
	api.reset_stats();

	patcher.patch(&old, &keyed_list(&["x", "a", "b", "c"]));

	let stats = api.stats();
	assert_eq!(stats.elements_created, 1);
	assert_eq!(stats.inserts, 1);
	assert_eq!(stats.removals, 0);
	assert_eq!(
		api.body().children()[0].outer_html(),
		"<ul><li>x</li><li>a</li><li>b</li><li>c</li></ul>"
	);
}

#[test]
fn keyed_shuffle_recreates_nothing() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &keyed_list(&["a", "b", "c", "d", "e"]));
	let before = api.body().children()[0].children();
	api.reset_stats();

	patcher.patch(&old, &keyed_list(&["c", "e", "a", "d", "b"]));

	assert_eq!(api.stats().elements_created, 0);
	assert_eq!(api.stats().removals, 0);
	let after = api.body().children()[0].children();
	assert_eq!(after.len(), before.len());
	for node in &after {
		assert!(before.iter().any(|b| b == node), "host node was rebuilt");
	}
	assert_eq!(
		api.body().children()[0].outer_html(),
		"<ul><li>c</li><li>e</li><li>a</li><li>d</li><li>b</li></ul>"
	);
}

#[test]
fn unkeyed_children_match_positionally() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &h("div", vec![h("p", "one"), h("p", "two")]));
	api.reset_stats();

	patcher.patch(&old, &h("div", vec![h("p", "two"), h("p", "three")]));

	assert_eq!(api.stats().elements_created, 0);
	assert_eq!(api.stats().text_writes, 2);
	assert_eq!(
		api.body().children()[0].outer_html(),
		"<div><p>two</p><p>three</p></div>"
	);
}

#[test]
fn text_to_children_switch_clears_once() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &h("p", "hi"));
	api.reset_stats();

	patcher.patch(&old, &h("p", vec![h("b", "hi")]));

	let stats = api.stats();
	assert_eq!(stats.text_writes, 1);
	assert_eq!(stats.elements_created, 1);
	assert_eq!(api.body().children()[0].outer_html(), "<p><b>hi</b></p>");
}

#[test]
fn children_to_text_switch_destroys_them() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let destroyed = Rc::new(RefCell::new(Vec::<String>::new()));

	let recording: Module<MemoryDom> = Module {
		destroy: Some(Rc::new({
			let destroyed = Rc::clone(&destroyed);
			move |_api, vnode| {
				destroyed
					.borrow_mut()
					.push(vnode.sel.clone().unwrap_or_default());
			}
		})),
		..Module::default()
	};
	let patcher = init(vec![recording], api.clone());

	let old = patcher.patch_element(&mount, &h("p", vec![h("b", "hi")]));
	api.reset_stats();

	patcher.patch(&old, &h("p", "hi"));

	assert_eq!(*destroyed.borrow(), ["b"]);
	assert_eq!(api.stats().removals, 1);
	assert_eq!(api.body().children()[0].outer_html(), "<p>hi</p>");
}

#[test]
fn key_kept_but_selector_changed_recreates() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &h("ul", vec![h_with("li", VNodeData::with_key("a"), "a")]));
	api.reset_stats();

	patcher.patch(&old, &h("ul", vec![h_with("p", VNodeData::with_key("a"), "a")]));

	assert_eq!(api.stats().elements_created, 1);
	assert_eq!(api.stats().removals, 1);
	assert_eq!(api.body().children()[0].outer_html(), "<ul><p>a</p></ul>");
}

#[test]
fn duplicate_keys_stay_deterministic() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &keyed_list(&["a", "a"]));
	api.reset_stats();

	patcher.patch(&old, &keyed_list(&["a"]));

	assert_eq!(api.stats().elements_created, 0);
	assert_eq!(api.stats().removals, 1);
	assert_eq!(api.body().children()[0].outer_html(), "<ul><li>a</li></ul>");
}

#[test]
fn children_can_be_cleared_entirely() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let old = patcher.patch_element(&mount, &keyed_list(&["a", "b", "c"]));
	api.reset_stats();

	patcher.patch(&old, &h("ul", Vec::<VNodeRc<MemNode>>::new()));

	assert_eq!(api.stats().removals, 3);
	assert_eq!(api.body().children()[0].outer_html(), "<ul></ul>");
}
