//! Filename directives.
//!
//! - [`name`]: split `<base>~<op>~<op>.svg` into a [`SourceItem`]
//! - [`decode`]: turn one raw token into a [`Directive`]

mod decode;
mod name;

pub use decode::{Directive, decode};
pub use name::{SourceItem, is_source_file, split_ops};
