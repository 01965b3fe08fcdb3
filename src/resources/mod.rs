//! Resource value generation.
//!
//! Contains the quantity arithmetic and the transforms that produce the
//! resource values rendered into GooseFS component templates.
//!
//! ## Components
//!
//! | Component | Resources |
//! |-----------|-----------|
//! | Master / JobMaster | User override, copied unchanged |
//! | Worker / JobWorker | User override + memory tier quota on the memory limit |
//! | Fuse | User override + memory tier quota on the memory limit |

pub mod quantity;
pub mod transform;
pub mod values;

pub use quantity::{Quantity, QuantityError};
pub use transform::{ComponentResourcePair, augment_resources, copy_resources};
pub use values::{ComponentValues, GooseFsValues, ResourceList, ResourceName, Resources};
