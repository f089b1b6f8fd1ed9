pub mod codec;
pub mod component;
pub mod error;
pub mod handlers;
pub mod host;
pub mod ledger;
pub mod paths;
pub mod state_file;

pub use component::{StateManager, StatusLevel, StatusReport, TickInputs};
pub use error::StateError;
pub use handlers::{HandlerRegistry, WidgetHandler};
pub use host::{
    CanvasDocument, CanvasObject, DocumentLocation, InstanceToken, MemoryCanvas, MemoryWidget,
    ResolveRequest, Rgba, WidgetKind, WidgetSummary, WidgetValue,
};
pub use ledger::{Ledger, RunValues};
pub use state_file::{StateEntry, StateFile, StateSection};
