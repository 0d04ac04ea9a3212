//! Shared simulation module
//!
//! Pieces used by both games. Like the game modules themselves, nothing here
//! touches rendering or the platform:
//! - Fixed per-frame step only
//! - Seeded RNG only
//! - Stable iteration order (list insertion order)

pub mod collision;
pub mod particles;
pub mod phase;
pub mod timers;

pub use collision::{Rect, circles_overlap, remove_at_indices};
pub use particles::{MAX_PARTICLES, Particle, ParticleSystem};
pub use phase::GamePhase;
pub use timers::{TimerId, TimerQueue};
