//! Love map core: two people, a heart-shaped path between them, the
//! distance facts that go with it, and a small timeline of memories.

pub mod animation;
pub mod config;
pub mod error;
pub mod facts;
pub mod geo;
pub mod heart;
pub mod image;
pub mod overlay;
pub mod scene;
pub mod session;
pub mod store;
pub mod timeline;
pub mod types;
