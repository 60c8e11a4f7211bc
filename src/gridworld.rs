//! Static maze representation
//!
//! A [`Map`] is the immutable tile layout fixed for the lifetime of the
//! process; a [`Grid`] is the mutable per-level copy the simulation eats
//! pellets from. A [`Layout`] bundles a map with the start cells of the agent
//! and the ghosts.

pub mod layout;
pub mod map;

pub use layout::{DEFAULT_MAP, Layout};
pub use map::{Grid, Map, Tile};
