//! Host-facing abstractions.
//!
//! The engine never talks to a real canvas directly. It sees the document
//! through [`CanvasDocument`] and individual widgets through
//! [`CanvasObject`]; [`MemoryCanvas`] is the in-process implementation used
//! by tests and dry runs.

pub mod document;
pub mod memory;
pub mod widget;

pub use document::{CanvasDocument, DocumentLocation, InstanceToken, ResolveRequest};
pub use memory::{MemoryCanvas, MemoryWidget};
pub use widget::{CanvasObject, Rgba, WidgetKind, WidgetSummary, WidgetValue};
