//! Output size estimate

use crate::host::FormatRecord;

/// Report the uncompressed document size as the upper bound and half of it
/// as the lower bound, both clamped to `i32::MAX`.
pub(super) fn estimate_start(record: &mut FormatRecord) {
    if record.host_supports_32bit_coordinates
        && record.image_size.width != 0
        && record.image_size.height != 0
    {
        record.plugin_using_32bit_coordinates = true;
    }

    let bytes = i64::from(record.width())
        * i64::from(record.height())
        * i64::from(record.planes)
        * i64::from(record.depth >> 3);
    let limit = i64::from(i32::MAX);

    record.min_data_bytes = clamp_to_i32(bytes / 2, limit);
    record.max_data_bytes = clamp_to_i32(bytes, limit);
    tracing::debug!(
        "estimate {}..{} bytes",
        record.min_data_bytes,
        record.max_data_bytes
    );
}

fn clamp_to_i32(value: i64, limit: i64) -> i32 {
    i32::try_from(value.clamp(0, limit)).unwrap_or(i32::MAX)
}
