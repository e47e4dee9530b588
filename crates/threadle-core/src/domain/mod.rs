pub mod phone;
pub mod record;
pub mod target;

pub use phone::{normalize_phone, normalize_phone_value, MIN_PHONE_DIGITS};
pub use record::{record_channel, record_id, FieldKind, FieldPath, PHONE_FIELDS};
pub use target::TargetSet;
