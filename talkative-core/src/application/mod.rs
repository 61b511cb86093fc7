mod dispatch;
mod matchmaker;
mod pairing_engine;
mod presence;
mod relay_router;

pub use dispatch::{dispatch, Action, IgnoreReason};
pub use matchmaker::{Matchmaker, MatchmakerSnapshot, Outcome};
pub use pairing_engine::{PairingEngine, PairingOutcome};
pub use presence::PresenceBroadcaster;
pub use relay_router::{RelayOutcome, RelayRouter};
