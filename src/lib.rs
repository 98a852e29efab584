//! Interaction core for annotating a vertical stack of document pages.
//!
//! The crate owns everything between raw pointer/wheel input and the
//! retained scene graph that draws the pages: the pan/zoom viewport, the
//! single shared context menu, drag-to-reposition with containment, and the
//! registry of pages and the annotations and images attached to them. The
//! host is responsible only for delivering input, supplying a [`scene::Scene`]
//! implementation, and acting on the [`engine::Action`]s the engine returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] that routes input and returns actions |
//! | [`registry`] | Pages, annotations, embedded images and their lifecycle |
//! | [`menu`] | Context menu session state machine and row layout |
//! | [`bus`] | Menu click routing keyed by action kind and owner |
//! | [`drag`] | Per-element drag state machine with vertical containment |
//! | [`viewport`] | Geometry types and the pan/zoom viewport |
//! | [`input`] | Pointer/wheel event types and the wheel gesture mapping |
//! | [`hit`] | Hit-testing of menu rows and elements |
//! | [`element`] | Element identity and the shared scene element contract |
//! | [`scene`] | Scene-graph collaborator trait and an in-memory implementation |
//! | [`import`] | File-import collaborator and pending import tickets |
//! | [`source`] | Page descriptors and ordered texture loading |
//! | [`config`] | Tunables, loadable from JSON |
//! | [`consts`] | Default numeric constants |
//! | [`error`] | Error code trait shared by all error types |

pub mod bus;
pub mod config;
pub mod consts;
pub mod drag;
pub mod element;
pub mod engine;
pub mod error;
pub mod hit;
pub mod import;
pub mod input;
pub mod menu;
pub mod registry;
pub mod scene;
pub mod source;
pub mod viewport;
