use xylem_dom::{h, init, load::load_node, mem::MemoryDom, AttrValue, DomApi};

#[test]
fn hydration_adopts_existing_markup() {
	let api = MemoryDom::new();

	// Markup as a server renderer would have left it.
	let root = api.create_element("div");
	api.set_attribute(&root, "id", "app");
	api.set_attribute(&root, "class", "shell dark");
	api.set_attribute(&root, "data-ready", "yes");
	let label = api.create_element("span");
	api.set_text_content(&label, "old");
	api.append_child(&root, &label);
	api.append_child(&api.body(), &root);

	let loaded = load_node(&api, &root);
	assert_eq!(loaded.sel.as_deref(), Some("div#app.shell.dark"));
	assert_eq!(
		loaded.data.borrow().attrs.as_ref().and_then(|attrs| attrs.get("data-ready")),
		Some(&AttrValue::Str("yes".to_owned()))
	);
	let children = loaded.children.as_ref().expect("loaded children");
	assert_eq!(children.len(), 1);
	assert_eq!(children[0].sel.as_deref(), Some("span"));

	// Patching the loaded tree updates in place instead of rebuilding.
	let patcher = init(Vec::new(), api.clone());
	api.reset_stats();
	patcher.patch(&loaded, &h("div#app.shell.dark", vec![h("span", "new")]));

	assert_eq!(api.stats().elements_created, 0);
	assert_eq!(
		api.body().children()[0].children()[0].outer_html(),
		"<span>new</span>"
	);
}

#[test]
fn comments_and_text_load_as_leaves() {
	let api = MemoryDom::new();
	let root = api.create_element("div");
	api.append_child(&root, &api.create_text_node("plain"));
	api.append_child(&root, &api.create_comment("note"));
	api.append_child(&api.body(), &root);

	let loaded = load_node(&api, &root);
	let children = loaded.children.as_ref().expect("loaded children");
	assert_eq!(children.len(), 2);
	assert!(children[0].sel.is_none());
	assert_eq!(children[0].text.as_deref(), Some("plain"));
	assert_eq!(children[1].sel.as_deref(), Some("!"));
	assert_eq!(children[1].text.as_deref(), Some("note"));
}
