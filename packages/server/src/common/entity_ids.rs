//! Typed ID aliases for the entities this service tracks.

pub use super::id::Id;

/// Marker for saved links.
pub struct Link;

/// Marker for live event subscribers (websocket connections).
pub struct Subscriber;

pub type LinkId = Id<Link>;
pub type SubscriberId = Id<Subscriber>;
