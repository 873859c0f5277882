//! Validation for channel and observer sizing.

use crate::schema::LiveConfig;

use super::helpers::validate_range;

pub(crate) fn validate_ipc(errors: &mut Vec<String>, config: &LiveConfig) {
    validate_range(
        errors,
        "ipc.event_bus_capacity",
        config.ipc.event_bus_capacity,
        16,
        4096,
    );
    validate_range(
        errors,
        "ipc.push_capacity",
        config.ipc.push_capacity,
        16,
        4096,
    );
}
