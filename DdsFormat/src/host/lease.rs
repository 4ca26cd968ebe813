//! Scoped loan of pixel memory to the host
//!
//! While a [`DataLease`] is alive the record reports pixel data as lent;
//! dropping the lease withdraws it on every exit path, early returns and
//! unwinding included, so a later phase never sees stale data.

use std::ops::{Deref, DerefMut};

use super::record::FormatRecord;

/// Guard over a [`FormatRecord`] whose pixel data is on loan to the host.
pub struct DataLease<'r> {
    record: &'r mut FormatRecord,
}

impl<'r> DataLease<'r> {
    /// Mark the record's pixel data as lent for the lifetime of the guard.
    pub fn acquire(record: &'r mut FormatRecord) -> Self {
        record.data_lent = true;
        Self { record }
    }
}

impl Deref for DataLease<'_> {
    type Target = FormatRecord;

    fn deref(&self) -> &Self::Target {
        self.record
    }
}

impl DerefMut for DataLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.record
    }
}

impl Drop for DataLease<'_> {
    fn drop(&mut self) {
        self.record.data_lent = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::record::HOST_EDITOR;

    #[test]
    fn test_lease_marks_and_releases() {
        let mut record = FormatRecord::new(HOST_EDITOR);
        {
            let lease = DataLease::acquire(&mut record);
            assert!(lease.has_data());
        }
        assert!(!record.has_data());
    }

    #[test]
    fn test_lease_released_on_early_return() {
        fn phase(record: &mut FormatRecord) -> Result<(), ()> {
            let _lease = DataLease::acquire(record);
            Err(())
        }

        let mut record = FormatRecord::new(HOST_EDITOR);
        assert!(phase(&mut record).is_err());
        assert!(!record.has_data());
    }

    #[test]
    fn test_lease_released_on_unwind() {
        let mut record = FormatRecord::new(HOST_EDITOR);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _lease = DataLease::acquire(&mut record);
            panic!("host blew up");
        }));
        assert!(result.is_err());
        assert!(!record.has_data());
    }
}
