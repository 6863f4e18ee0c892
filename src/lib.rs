//! Columnar attribute codec for the Open Vector Tile format. It turns arbitrarily
//! nested, dynamically typed attribute documents into a compact, deduplicated,
//! column-oriented byte stream, and reconstructs the original documents losslessly on
//! read.
//!
//! The pieces:
//!
//! - A [`Value`] model: strings, integers (sign-preserving, see [`Integer`]), doubles,
//!   booleans, null, arrays, and insertion-ordered objects ([`Map`]).
//! - A [`ColumnCacheWriter`] holding one deduplicating column per scalar kind plus the
//!   values and shapes columns, serialized as one protobuf-style message.
//! - [`encode_value`]/[`decode_value`]: one nested document flattened into a single
//!   values-column entry of tags, counts, and scalar column references.
//! - [`encode_shape`]/[`read_shape`]: flat objects split into a deduplicated schema
//!   (the shape) and a per-instance reference list, the common case for homogeneous
//!   feature attributes.
//! - A [`ColumnCacheReader`] that scans the message once, recording byte positions
//!   only, then decodes entries on demand and memoizes them in place.
//!
//! A cache instance belongs to one tile and one thread: the dedup tables and the
//! memoization rewrites are unsynchronized in-place mutations.

mod column_cache;
mod error;
mod geometry;
mod integer;
mod pbf;
mod value;
mod vector_value;

pub use self::column_cache::{ColumnCacheReader, ColumnCacheWriter, ColumnKind};
pub use self::error::{Error, Result};
pub use self::geometry::{
    BBox, BBox3D, FeatureType, Point, Point3D, VectorGeometry, VectorLine, VectorLine3D,
    VectorLines, VectorLines3D, VectorMultiPoly, VectorMultiPoly3D, VectorPoints,
    VectorPoints3D, VectorPoly, VectorPoly3D,
};
pub use self::integer::Integer;
pub use self::pbf::{PbfReader, PbfWriter, WireType};
pub use self::value::{Map, Value};
pub use self::vector_value::{decode_value, encode_shape, encode_value, read_shape};

/// Documents nested deeper than this are rejected on decode, bounding recursion on
/// corrupt or adversarial token streams. Well-formed tiles stay far below it.
pub const MAX_NESTING_DEPTH: usize = 128;
