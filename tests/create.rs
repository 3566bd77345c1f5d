use std::{cell::RefCell, rc::Rc};
use xylem_dom::{
	h, h_with, init,
	mem::{MemNode, MemoryDom},
	DomApi, Hooks, Module, VNodeData, VNodeRc, SVG_NS,
};

fn mount_point(api: &MemoryDom) -> MemNode {
	let mount = api.create_element("div");
	api.append_child(&api.body(), &mount);
	mount
}

fn inserted(order: &Rc<RefCell<Vec<String>>>, label: &str) -> VNodeData<MemNode> {
	let order = Rc::clone(order);
	let label = label.to_owned();
	VNodeData {
		hook: Hooks {
			insert: Some(Rc::new(move |_vnode| {
				order.borrow_mut().push(format!("insert {label}"));
			})),
			..Hooks::default()
		},
		..VNodeData::default()
	}
}

#[test]
fn fresh_mount_fires_create_then_insert() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let order = Rc::new(RefCell::new(Vec::<String>::new()));

	let recording: Module<MemoryDom> = Module {
		create: Some(Rc::new({
			let order = Rc::clone(&order);
			move |_api, _empty, vnode| {
				order
					.borrow_mut()
					.push(format!("create {}", vnode.sel.clone().unwrap_or_default()));
			}
		})),
		..Module::default()
	};
	let patcher = init(vec![recording], api.clone());

	let tree = h_with(
		"div.container",
		inserted(&order, "div.container"),
		vec![h_with("span", inserted(&order, "span"), "hello")],
	);
	patcher.patch_element(&mount, &tree);

	assert_eq!(
		api.body().children()[0].outer_html(),
		r#"<div class="container"><span>hello</span></div>"#
	);
	assert_eq!(
		*order.borrow(),
		[
			"create div.container",
			"create span",
			"insert span",
			"insert div.container",
		]
	);
}

#[test]
fn selector_tag_id_classes_round_trip() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	patcher.patch_element(&mount, &h("section#main.wide.dark", ()));

	let section = &api.body().children()[0];
	assert_eq!(section.tag().as_deref(), Some("section"));
	assert_eq!(section.attribute("id").as_deref(), Some("main"));
	assert_eq!(section.attribute("class").as_deref(), Some("wide dark"));
	assert_eq!(
		section.outer_html(),
		r#"<section class="wide dark" id="main"></section>"#
	);
}

#[test]
fn comment_selector_creates_comment_nodes() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	patcher.patch_element(&mount, &h("div", vec![h("!", "marker"), h("!", ())]));

	assert_eq!(
		api.body().children()[0].outer_html(),
		"<div><!--marker--><!----></div>"
	);
	assert_eq!(api.stats().comments_created, 2);
}

#[test]
fn svg_namespace_propagates_until_foreign_object() {
	let api = MemoryDom::new();
	let mount = mount_point(&api);
	let patcher = init(Vec::new(), api.clone());

	let tree = h(
		"svg",
		vec![h("circle", ()), h("foreignObject", vec![h("div", "plain html")])],
	);
	patcher.patch_element(&mount, &tree);

	let svg = &api.body().children()[0];
	assert_eq!(svg.namespace().as_deref(), Some(SVG_NS));
	let children = svg.children();
	assert_eq!(children[0].namespace().as_deref(), Some(SVG_NS));
	assert_eq!(children[1].namespace().as_deref(), Some(SVG_NS));
	assert_eq!(children[1].children()[0].namespace(), None);
}

#[test]
fn svg_prefix_requires_a_delimiter() {
	let plain: VNodeRc<MemNode> = h("svganything", ());
	assert!(plain.data.borrow().ns.is_none());

	let classed: VNodeRc<MemNode> = h("svg.icon", ());
	assert_eq!(classed.data.borrow().ns.as_deref(), Some(SVG_NS));
}
