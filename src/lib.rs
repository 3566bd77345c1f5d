#![doc(html_root_url = "https://docs.rs/xylem-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::single_match_else)]

//! Virtual-DOM reconciliation over a pluggable host-tree adapter.
//!
//! A consumer describes the desired UI as an immutable tree of [`VNode`]s
//! (usually via [`h()`]); [`DomPatcher::patch`] computes and applies the
//! minimal host mutations that turn the previously rendered tree into the
//! new one. Sibling lists reconcile with a keyed two-pointer diff, so
//! stable keys survive reorders without their host nodes being rebuilt.
//!
//! The host tree is abstract: anything implementing [`DomApi`] works. The
//! crate ships a browser backend (`web`, `wasm32` only) and an in-memory
//! one ([`mem`]) for server-side rendering and native tests.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attrs;
pub mod diff;
pub mod dom;
pub mod h;
pub mod load;
pub mod mem;
pub mod module;
pub mod vnode;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use diff::{init, DomPatcher};
pub use dom::{DomApi, DomReadApi, NodeKind};
pub use h::{h, h_with, SVG_NS};
pub use module::{Module, RemoveCallback};
pub use vnode::{
	same_vnode, vnode, AttrValue, Attrs, Child, Children, Hooks, Key, VNode, VNodeData, VNodeRc,
};
