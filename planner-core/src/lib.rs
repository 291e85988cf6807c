//! # Strategy Planner Core
//!
//! Canvas annotation engine for game strategy plans: layered vector
//! drawings over a map, edited with a small set of tools and shared as a
//! compact text code.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Planner                    │
//! ├─────────────────────────────────────────────┤
//! │  Input            │  Editing                │
//! │  - Pointer/touch  │  - Tool state machine   │
//! │  - Shortcuts      │  - Hit-testing          │
//! │  - Prompts        │  - Move/resize/rotate   │
//! ├─────────────────────────────────────────────┤
//! │  Model            │  Output                 │
//! │  - Layers/items   │  - Redraw to a Surface  │
//! │  - Undo history   │  - PCWSTRAT- codes      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod item;
pub mod layer;
pub mod notify;
pub mod plan;
pub mod render;
pub mod text;
pub mod tool;
pub mod transform;

pub use catalog::{MapCatalog, MapInfo};
pub use codec::{decode_plan, encode_plan, SHARE_CODE_PREFIX};
pub use config::PlannerConfig;
pub use engine::Planner;
pub use error::{PlannerError, PlannerResult};
pub use event::{
    EventOutcome, KeyEvent, KeyModifiers, PointerEvent, PointerPhase, PointerSource, TouchEvent,
    TouchPhase, TouchPoint,
};
pub use geometry::{Bounds, Point};
pub use history::{History, Snapshot};
pub use item::{Item, Shape, Style};
pub use layer::Layer;
pub use notify::{ConfirmAction, Notification, NotificationLevel, Prompt};
pub use plan::{Extent, Plan};
pub use render::{Frame, Surface};
pub use text::{ApproxTextMeasure, TextMeasure, TextMetrics};
pub use tool::{Cursor, Handle, Interaction, Tool};

/// Planner core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
