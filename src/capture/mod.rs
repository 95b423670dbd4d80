//! Interaction capture
//!
//! Converts raw field interactions (focus, input, paste, hover, click, blur)
//! into friction events and hands them to a transport.
//!
//! Pipeline: Interaction → FieldInteractionState → Signal → FormTracker → FrictionEvent → Transport

pub mod abandonment;
pub mod descriptor;
pub mod field;
pub mod session;
pub mod tracker;
pub mod transport;

pub use abandonment::AbandonmentDetector;
pub use descriptor::{DescribedField, FieldDescriptor, FormDescriptor};
pub use field::{EditKind, FieldInteractionState, Interaction, Signal};
pub use session::SessionId;
pub use tracker::{FormTracker, SubmitTrigger};
pub use transport::{Delivered, IngestTransport, NdjsonTransport, NullTransport, Transport};
