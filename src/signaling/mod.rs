mod control;
mod coordinator;
mod handler;
mod presence;
pub mod protocol;
mod registry;
mod relay;
mod room;
mod server;

pub use coordinator::{Coordinator, CoordinatorStats, EventSender};
pub use handler::SignalingHandler;
pub use protocol::{ConnectionId, InboundEvent, OutboundEvent, Role, UserInfo};
pub use registry::{ConnectionRegistry, Identity, UNKNOWN_USERNAME};
pub use room::RoomDirectory;
pub use server::SignalingServer;
