//! Generated districts and offices of the First District Court of Appeal.
//!
//! Each of the five divisions is a district with one presiding justice
//! (`pj`) and three associate justice (`aj`) seats.

use std::ops::RangeInclusive;

use elect_core::{CourtOffice, District};

const COURT_OF_APPEALS_ID: &str = "ca_court_app";
const DIVISIONS: RangeInclusive<u32> = 1..=5;

/// A kind of justice seat in a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JusticeKind {
    /// Presiding justice, one seat.
    Presiding,
    /// Associate justices, three seats.
    Associate,
}

impl JusticeKind {
    /// Both kinds, in output order.
    pub const ALL: [Self; 2] = [Self::Presiding, Self::Associate];

    /// Short id used in office and office type ids.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Presiding => "pj",
            Self::Associate => "aj",
        }
    }

    /// Seat count, when it differs from the default of one.
    #[must_use]
    pub const fn seat_count(self) -> Option<u32> {
        match self {
            Self::Presiding => None,
            Self::Associate => Some(3),
        }
    }
}

fn district_id(division: u32) -> String {
    format!("{COURT_OF_APPEALS_ID}_d1_div{division}")
}

/// Returns the division districts.
#[must_use]
pub fn court_of_appeals_districts() -> Vec<District> {
    DIVISIONS
        .map(|division| District {
            district_code: division,
            district_type_id: format!("{COURT_OF_APPEALS_ID}_d1"),
            id: district_id(division),
        })
        .collect()
}

/// Returns the justice offices, division by division.
#[must_use]
pub fn court_of_appeals_offices() -> Vec<CourtOffice> {
    DIVISIONS
        .flat_map(|division| {
            JusticeKind::ALL.map(|kind| CourtOffice {
                id: format!("{}_{}", district_id(division), kind.code()),
                office_type_id: format!("{COURT_OF_APPEALS_ID}_{}", kind.code()),
                seat_count: kind.seat_count(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_districts() {
        let districts = court_of_appeals_districts();
        assert_eq!(districts.len(), 5);
        assert_eq!(
            districts[0],
            District {
                district_code: 1,
                district_type_id: "ca_court_app_d1".to_owned(),
                id: "ca_court_app_d1_div1".to_owned(),
            }
        );
        assert_eq!(districts[4].id, "ca_court_app_d1_div5");
    }

    #[test]
    fn test_offices() {
        let offices = court_of_appeals_offices();
        assert_eq!(offices.len(), 10);
        assert_eq!(
            offices[0],
            CourtOffice {
                id: "ca_court_app_d1_div1_pj".to_owned(),
                office_type_id: "ca_court_app_pj".to_owned(),
                seat_count: None,
            }
        );
        assert_eq!(
            offices[9],
            CourtOffice {
                id: "ca_court_app_d1_div5_aj".to_owned(),
                office_type_id: "ca_court_app_aj".to_owned(),
                seat_count: Some(3),
            }
        );
    }
}
