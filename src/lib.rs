//! Browser drawing canvas with freehand paint, destructive erase, and media
//! placement.
//!
//! This crate is compiled to WebAssembly and runs in the browser. The user
//! paints and erases strokes, uploads images and videos onto the canvas, and
//! moves, scales, or removes media in select mode. Uploaded videos play
//! inline as live bitmaps. The host page wires DOM events and the upload
//! control to [`web::CanvasApp`]; everything else happens here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`web`] | `CanvasApp` export, DOM wiring, video elements, timers |
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Scene objects in draw order and the z-order invariant |
//! | [`input`] | Tools, UI state, and the gesture state machine |
//! | [`hit`] | Hit-testing media bodies and corner handles |
//! | [`video`] | Live bitmap wrapper and its refresh loop |
//! | [`ingest`] | Upload dispatch, image decode and clamping, placement |
//! | [`redraw`] | Debounced redraw coalescing |
//! | [`render`] | Scene and brush-preview rendering |
//! | [`events`] | JSON notifications sent to the host page |
//! | [`geom`] | Points, rectangles, viewport |
//! | [`config`] | JSON-overridable tuning |
//! | [`error`] | Shared error type |
//! | [`consts`] | Shared numeric constants (size caps, refresh rate, brush range, etc.) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod events;
pub mod geom;
pub mod hit;
pub mod ingest;
pub mod input;
pub mod redraw;
pub mod render;
pub mod video;
pub mod web;
