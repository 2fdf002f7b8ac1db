//! PDF writing support
//!
//! Only the byte-exact number serialization lives here; object and file
//! structure writing belongs to the higher layers.

pub mod number;

pub use number::{
    double_to_bytes, encode_double, encode_int, int_to_bytes, write_double, write_int,
    DOUBLE_BUFFER_CAPACITY,
};
