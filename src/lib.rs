// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Quote-block recognition for plain-text email bodies
//!
//! Mailing-list archives are full of replies that embed the message they
//! answer. This crate recovers that structure from plain text.
//!
//! # Blocks
//!
//! - [`MessageHeaderBlock`]: forwarded `From:`/`To:`/`Subject:` runs, with
//!   an optional `----- Original Message -----` banner
//! - [`DividerBlock`]: `----` and `____` rules
//! - [`AttributionBlock`]: `On Tue, 3 Jan 2006, Alice wrote:` and friends,
//!   with the timestamp normalized to UTC
//!
//! Each block implements [`Block::from_text`], which finds the first
//! occurrence in a span and returns the text before and after it.
//! [`Document::parse`] applies all of them to a whole body.
//!
//! # Example
//!
//! ```rust
//! use mail_quote::{AttributionBlock, Block};
//!
//! let text = "Thanks!\n\nOn Tue, 3 Jan 2006 10:00:00 -0700, Alice wrote:\n> Hi";
//! let mut attribution = AttributionBlock::default();
//! let split = attribution.from_text(text).unwrap();
//!
//! assert_eq!(attribution.name, "Alice");
//! assert!(attribution.has_time);
//! assert_eq!(split.before, "Thanks!\n\n");
//! assert_eq!(split.after, "\n> Hi");
//! ```

mod block;
mod document;
mod error;
mod format;
mod parser;
pub mod patterns;
mod types;

pub use block::{AttributionBlock, Block, DividerBlock, Field, MessageHeaderBlock, Split};
pub use document::{Document, Segment};
pub use error::{ParseError, Result};
pub use format::{DateLayout, Format};
pub use parser::parse_message;
pub use types::{Message, MessageRecord};
