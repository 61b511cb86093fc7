pub mod error;
pub mod events;
pub mod pairing_table;
pub mod registry;
pub mod session;
pub mod sink;
pub mod waiting_queue;

pub use error::{InvariantViolation, MatchError};
pub use events::{ChatMessage, ClientEvent, Control, RelayKind, ServerEvent, Signal};
pub use pairing_table::PairingTable;
pub use registry::Registry;
pub use session::{Session, SessionId, SessionState};
#[cfg(any(test, feature = "testing"))]
pub use sink::MemorySink;
pub use sink::{SessionSink, SinkError};
pub use waiting_queue::WaitingQueue;
