//! Card data as seen in a state snapshot.
//!
//! ## Key Types
//!
//! - `Card`: one card instance (protocol, value, orientation, text)
//! - `Keyword` / `Keywords`: effect keywords printed on a card
//! - `Passive`: declarative static abilities read by the rules oracle
//!
//! Rules that depend on static text are expressed as passives rather than
//! protocol-name checks, so new protocols need no AI changes.

pub mod card;
pub mod passive;

pub use card::{Card, Keyword, Keywords};
pub use passive::Passive;
