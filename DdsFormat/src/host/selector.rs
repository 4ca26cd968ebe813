//! Format selectors issued by the host

use crate::error::Error;

/// One step of the host-driven format protocol.
///
/// The discriminants are the selector values the host passes to the
/// dispatch entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum Selector {
    About = 0,
    ReadPrepare = 1,
    ReadStart = 2,
    ReadContinue = 3,
    ReadFinish = 4,
    OptionsPrepare = 5,
    OptionsStart = 6,
    OptionsContinue = 7,
    OptionsFinish = 8,
    EstimatePrepare = 9,
    EstimateStart = 10,
    EstimateContinue = 11,
    EstimateFinish = 12,
    WritePrepare = 13,
    WriteStart = 14,
    WriteContinue = 15,
    WriteFinish = 16,
    FilterFile = 17,
}

impl Selector {
    /// Every selector, in protocol order.
    pub const ALL: [Selector; 18] = [
        Self::About,
        Self::ReadPrepare,
        Self::ReadStart,
        Self::ReadContinue,
        Self::ReadFinish,
        Self::OptionsPrepare,
        Self::OptionsStart,
        Self::OptionsContinue,
        Self::OptionsFinish,
        Self::EstimatePrepare,
        Self::EstimateStart,
        Self::EstimateContinue,
        Self::EstimateFinish,
        Self::WritePrepare,
        Self::WriteStart,
        Self::WriteContinue,
        Self::WriteFinish,
        Self::FilterFile,
    ];

    /// Selectors a host issues to open a file.
    pub const READ_SEQUENCE: [Selector; 5] = [
        Self::FilterFile,
        Self::ReadPrepare,
        Self::ReadStart,
        Self::ReadContinue,
        Self::ReadFinish,
    ];

    /// Selectors a host issues to save a document.
    pub const WRITE_SEQUENCE: [Selector; 12] = [
        Self::OptionsPrepare,
        Self::OptionsStart,
        Self::OptionsContinue,
        Self::OptionsFinish,
        Self::EstimatePrepare,
        Self::EstimateStart,
        Self::EstimateContinue,
        Self::EstimateFinish,
        Self::WritePrepare,
        Self::WriteStart,
        Self::WriteContinue,
        Self::WriteFinish,
    ];

    /// Raw selector value.
    #[must_use]
    pub const fn value(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for Selector {
    type Error = Error;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(Error::UnknownSelector(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_values_match_table_order() {
        for (index, selector) in Selector::ALL.iter().enumerate() {
            assert_eq!(selector.value() as usize, index);
            assert_eq!(Selector::try_from(selector.value()).ok(), Some(*selector));
        }
    }

    #[test]
    fn test_out_of_range_selectors() {
        assert!(matches!(
            Selector::try_from(18),
            Err(Error::UnknownSelector(18))
        ));
        assert!(matches!(
            Selector::try_from(-1),
            Err(Error::UnknownSelector(-1))
        ));
    }
}
