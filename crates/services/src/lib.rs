//! # services
//!
//! The Rediscover selection engine: picks active followings, then surfaces
//! one unread post per account without ever repeating itself in a session.

pub mod filter;
pub mod options;
pub mod rediscover;
pub mod shuffle;

pub use filter::is_recent_unread;
pub use options::{RediscoverOptions, Since, DEFAULT_BATCH_SIZE, DEFAULT_SINCE_DAYS};
pub use rediscover::Rediscover;
pub use shuffle::{NoShuffle, ReverseShuffle, Shuffler, ThreadRngShuffler};
