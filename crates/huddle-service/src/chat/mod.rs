//! One-to-one chat: conversation resolution, message flow, read state,
//! and the client-view timeline reconciler.

pub mod sender;
pub mod service;
pub mod session;
pub mod timeline;

pub use sender::SenderCache;
pub use service::ChatService;
pub use session::ChatSession;
pub use timeline::MessageTimeline;
