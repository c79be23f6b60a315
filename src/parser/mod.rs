//! # Headline Parsing Module
//!
//! Listing headlines on The Aviation Herald are loosely structured sentences
//! such as `"Boeing 737 at Berlin on Mar 31st 2025, engine failure"`. This
//! module turns one of them into the fields of an [`Incident`](crate::Incident).
//!
//! ## Key Components
//!
//! - `DateNormalizer`: converts `"Mar 31st 2025"` into UTC epoch seconds
//! - `TitleParser`: splits a headline into cleaned title, cause, date and location
//! - `ParsedTitle`: the result of parsing one headline
//!
//! Both parsers compile their patterns once on construction and are then
//! shared by reference. Parse failures never raise; they degrade to defaults
//! or `None`.

mod date;
mod title;

pub use date::DateNormalizer;
pub use title::{NOT_SPECIFIED, ParsedTitle, TitleParser, UNKNOWN_LOCATION};
