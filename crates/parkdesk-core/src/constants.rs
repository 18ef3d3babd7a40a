//! Application-wide constants
//!
//! Centralized location for magic strings shared across modules.

/// Placeholder participant id for the undifferentiated staff side of a
/// direct thread.
pub const OFFICIAL_SIDE: &str = "OFFICIAL";

/// Sender id stamped on broadcast messages.
pub const SYSTEM_SENDER: &str = "SYSTEM";

/// The channel every staff role belongs to, independent of department.
pub const STAFF_WIDE_GROUP: &str = "GRP-all-staff";
