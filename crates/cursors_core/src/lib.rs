//! Cursors Core
//!
//! Foundational primitives shared by every crate in the workspace:
//!
//! - **Geometry**: points, rectangles and colors in display pixels
//! - **Input Events**: the narrow event vocabulary consumed by the tick
//! - **State Machines**: table-driven transitions with entry callbacks
//! - **Draw Lists**: recorded paint commands handed to a renderer
//!
//! # Example
//!
//! ```rust
//! use cursors_core::fsm::{StateMachine, Transition};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Door { Closed, Open }
//!
//! let mut fsm = StateMachine::new(Door::Closed, vec![Transition::new(Door::Closed, "push", Door::Open)]);
//! assert_eq!(fsm.send("push"), Door::Open);
//! assert_eq!(fsm.send("push"), Door::Open);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod paint;

pub use events::{InputEvent, KeyCode, MouseButton};
pub use fsm::{StateMachine, Transition};
pub use geometry::{Color, Point, Rect};
pub use paint::{DrawCommand, DrawList, TextAnchor};
