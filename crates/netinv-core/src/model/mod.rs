// ── Inventory domain model ──
//
// The device record, its enumerated vocabularies, and the pure
// validation functions that turn operator input into typed values.

pub mod device;
pub mod validate;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{
    DeviceRecord, DeviceType, DeviceUpdate, NetworkLayer, NetworkService, NewDevice, RecordField,
};
pub use validate::ValidationError;
