#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::SlotId;

/// Virtual index → slot holding it.
#[cfg(feature = "std")]
pub(crate) type SlotMap = HashMap<usize, SlotId>;
#[cfg(not(feature = "std"))]
pub(crate) type SlotMap = BTreeMap<usize, SlotId>;
