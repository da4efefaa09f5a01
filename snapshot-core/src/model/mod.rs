//! View-model value types shared by the transformer and every storage
//! backend. All types are plain serde-derived values, immutable after
//! construction.

pub mod bar;
pub mod event;
pub mod market;
pub mod order;
pub mod view;

pub use bar::Bar;
pub use event::StrategyEvent;
pub use market::{split_vt_symbol, Exchange, Interval};
pub use order::{PendingOrder, Position};
pub use view::{InstrumentView, StrategySummary, ViewModel};
