//! Feed refresh signalling.

mod broadcast;

pub use self::broadcast::BroadcastFeedNotifier;
