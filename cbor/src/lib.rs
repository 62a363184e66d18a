/*!
An RFC 8949 CBOR codec built around a reference-counted item tree.

- [`stream`] is a stateless token decoder that reports each header or scalar
  to a set of callbacks, without allocating.
- [`load`] builds an [`Item`] tree from a complete buffer, with bounded
  nesting depth and an allocation budget.
- [`serialize`], [`serialized_size`] and [`serialize_alloc`] write a tree
  back out, preserving integer widths and definite/indefinite forms.
- [`encode`] holds the low-level header encoders, and [`encoder`] a growable
  encoder for writing CBOR without building a tree.
*/

#![no_std]
extern crate alloc;

use alloc::{string::String, sync::Arc, vec, vec::Vec};
use tracing::{debug, trace};

mod budget;
mod config;
mod error;
mod item;
mod load;
mod sequence;
mod serialize;

pub mod encode;
pub mod encoder;
pub mod stream;

#[cfg(test)]
mod decode_tests;


pub use budget::{Allocator, Budget};
pub use config::{Config, DEFAULT_MAX_DEPTH};
pub use error::{Error, Malformed};
pub use item::{Array, FloatCtrl, Int, Item, Kind, Map, Pair, Str, Tag, Value, Width};
pub use load::{load, load_with};
pub use sequence::Sequence;
pub use serialize::{serialize, serialize_alloc, serialized_size};
