//! Timestamp-indexed collections with flexible, loosely-typed slicing.
//!
//! ## Features
//! - **Loose slicing**: slice bounds can be dates, datetimes, strings,
//!   numeric encodings like `20201013.1234`, or custom convertible values;
//!   every element is coerced to the bound's kind before comparison
//! - **Flexible parsing**: one parser for timestamp-like values, one for
//!   compound duration text such as `"-1y2m3d4h"`
//! - **Distributive arithmetic**: operations on a sequence apply per
//!   element, so `[1, 2, 3] * 2` gives `[2, 4, 6]`
//! - **Directory store**: a directory behaving like a sliceable mapping,
//!   one JSON file per key (with the `store` feature)
//!
//! ## Slicing behavior
//! Filters are half-open (`start` inclusive, `stop` exclusive) and never
//! mutate their input. Integer bounds keep plain positional semantics as
//! the escape hatch for conventional index access; a non-integer,
//! non-slice key is an *equality filter* returning every matching element
//! rather than a single lookup.
//!
//! ```rust
//! use tslice::{TsList, TsSlice, Value};
//!
//! let list: TsList = [1.0, 1.1, 1.2, 1.3, 1.4].into_iter().collect();
//!
//! let ranged = list.slice(&TsSlice::between(1.0, 1.3))?;
//! assert_eq!(ranged, [1.0, 1.1, 1.2].into_iter().collect());
//!
//! let hits = list.select(&Value::from(1.1))?;
//! assert_eq!(hits, [1.1].into_iter().collect());
//!
//! let doubled = list.mul(&Value::from(2.0))?;
//! assert_eq!(doubled.len(), 5);
//! # Ok::<(), tslice::TsError>(())
//! ```

pub mod cast;
pub mod delta;
pub mod dict;
pub mod error;
pub mod list;
pub mod parse;
pub mod record;
pub mod slice;
pub mod ts;
pub mod value;

#[cfg(feature = "store")]
pub mod dir;
#[cfg(feature = "store")]
pub mod tree;

pub use cast::{Caster, Target};
pub use delta::{FromMonths, MonthsDelta, TsDelta};
pub use dict::TsDict;
pub use error::{Result, TsError};
pub use list::{Operand, TsList};
pub use parse::{parse_castable, parse_duration, parse_duration_with, parse_timestamp};
pub use record::TsRecord;
pub use slice::TsSlice;
pub use ts::Ts;
pub use value::{Castable, Value};

#[cfg(feature = "store")]
pub use dir::{TsDir, Verbosity};
#[cfg(feature = "store")]
pub use tree::tree;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, TsError};

    pub use crate::{Ts, TsDelta, Value};

    pub use crate::{TsDict, TsList, TsSlice};

    pub use crate::{parse_duration, parse_timestamp};

    #[cfg(feature = "store")]
    pub use crate::{TsDir, Verbosity};
}
