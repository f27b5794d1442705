use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matches `YYYY-MM-DD` after trimming. Calendar correctness is the server's
/// concern; `2024-02-31` passes here.
#[must_use]
pub fn is_valid_date_format(value: &str) -> bool {
    let bytes = value.trim().as_bytes();
    bytes.len() == 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Editable text fields of the disposal form. The shell routes every text
/// change through one `FieldChanged` event carrying this discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    DrNo,
    FcNo,
    DpcNo,
    DpcDate,
    FirNo,
    FirDate,
    DrDate,
    Remarks,
    ActDate,
    ActRemarks,
    AuthorityOo,
    OfficerName,
    OfficerDesignation,
    AuctionDetails,
    AuctionDate,
    AuctionAuthorityName,
    AuctionAuthorityDesignation,
    AuctionRemarks,
}

impl FormField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DrNo => "DR No",
            Self::FcNo => "FC No",
            Self::DpcNo => "DPC No",
            Self::DpcDate => "DPC Date",
            Self::FirNo => "FIR No",
            Self::FirDate => "FIR Date",
            Self::DrDate => "DR Date",
            Self::Remarks => "Remarks",
            Self::ActDate => "Act Date",
            Self::ActRemarks => "Act Remarks",
            Self::AuthorityOo => "Authority O/O",
            Self::OfficerName => "Officer Name",
            Self::OfficerDesignation => "Officer Designation",
            Self::AuctionDetails => "Auction Details",
            Self::AuctionDate => "Auction Date",
            Self::AuctionAuthorityName => "Auction Authority Name",
            Self::AuctionAuthorityDesignation => "Auction Authority Designation",
            Self::AuctionRemarks => "Auction Remarks",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{} must match YYYY-MM-DD", .field.label())]
    BadDateFormat { field: FormField },
    #[error("Auction Details is required when auction is enabled")]
    MissingAuctionDetails,
}

/// In-memory form state for one disposal record. Strings are held raw; blank
/// means "not provided" and is normalized to null at serialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalForm {
    pub dr_no: String,
    pub fc_no: String,
    pub dpc_no: String,
    pub dpc_date: String,
    pub fir_no: String,
    pub fir_date: String,
    pub dr_date: String,
    pub remarks: String,
    pub peeda_act: bool,
    pub act_date: String,
    pub act_remarks: String,
    pub authority_oo: String,
    pub officer_name: String,
    pub officer_designation: String,
    pub auction: bool,
    pub auction_details: String,
    pub auction_date: String,
    pub auction_authority_name: String,
    pub auction_authority_designation: String,
    pub auction_remarks: String,
}

/// The five optional date-constrained fields, checked in form order.
const DATE_FIELDS: [FormField; 5] = [
    FormField::DpcDate,
    FormField::FirDate,
    FormField::DrDate,
    FormField::ActDate,
    FormField::AuctionDate,
];

impl DisposalForm {
    pub fn set(&mut self, field: FormField, value: String) {
        *self.slot_mut(field) = value;
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::DrNo => &self.dr_no,
            FormField::FcNo => &self.fc_no,
            FormField::DpcNo => &self.dpc_no,
            FormField::DpcDate => &self.dpc_date,
            FormField::FirNo => &self.fir_no,
            FormField::FirDate => &self.fir_date,
            FormField::DrDate => &self.dr_date,
            FormField::Remarks => &self.remarks,
            FormField::ActDate => &self.act_date,
            FormField::ActRemarks => &self.act_remarks,
            FormField::AuthorityOo => &self.authority_oo,
            FormField::OfficerName => &self.officer_name,
            FormField::OfficerDesignation => &self.officer_designation,
            FormField::AuctionDetails => &self.auction_details,
            FormField::AuctionDate => &self.auction_date,
            FormField::AuctionAuthorityName => &self.auction_authority_name,
            FormField::AuctionAuthorityDesignation => &self.auction_authority_designation,
            FormField::AuctionRemarks => &self.auction_remarks,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::DrNo => &mut self.dr_no,
            FormField::FcNo => &mut self.fc_no,
            FormField::DpcNo => &mut self.dpc_no,
            FormField::DpcDate => &mut self.dpc_date,
            FormField::FirNo => &mut self.fir_no,
            FormField::FirDate => &mut self.fir_date,
            FormField::DrDate => &mut self.dr_date,
            FormField::Remarks => &mut self.remarks,
            FormField::ActDate => &mut self.act_date,
            FormField::ActRemarks => &mut self.act_remarks,
            FormField::AuthorityOo => &mut self.authority_oo,
            FormField::OfficerName => &mut self.officer_name,
            FormField::OfficerDesignation => &mut self.officer_designation,
            FormField::AuctionDetails => &mut self.auction_details,
            FormField::AuctionDate => &mut self.auction_date,
            FormField::AuctionAuthorityName => &mut self.auction_authority_name,
            FormField::AuctionAuthorityDesignation => &mut self.auction_authority_designation,
            FormField::AuctionRemarks => &mut self.auction_remarks,
        }
    }

    /// Client-side checks run before any network activity. Blank date fields
    /// are "not provided" and skip format validation.
    pub fn validate(&self) -> Result<(), FormError> {
        for field in DATE_FIELDS {
            let value = self.get(field);
            if !value.trim().is_empty() && !is_valid_date_format(value) {
                return Err(FormError::BadDateFormat { field });
            }
        }

        if self.auction && self.auction_details.trim().is_empty() {
            return Err(FormError::MissingAuctionDetails);
        }

        Ok(())
    }

    /// Assembles the outgoing payload. Blank strings become null, and every
    /// auction sub-field is forced to null when `auction` is off, regardless
    /// of what is held in memory.
    #[must_use]
    pub fn to_payload(&self, pole_crop_id: i64, pictures: Vec<String>) -> DisposalPayload {
        let auction_field = |value: &str| {
            if self.auction {
                opt(value)
            } else {
                None
            }
        };

        DisposalPayload {
            pole_crop_id,
            dr_no: opt(&self.dr_no),
            fc_no: opt(&self.fc_no),
            dpc_no: opt(&self.dpc_no),
            dpc_date: opt(&self.dpc_date),
            fir_no: opt(&self.fir_no),
            fir_date: opt(&self.fir_date),
            dr_date: opt(&self.dr_date),
            remarks: opt(&self.remarks),
            peeda_act: self.peeda_act,
            act_date: opt(&self.act_date),
            act_remarks: opt(&self.act_remarks),
            authority_oo: opt(&self.authority_oo),
            officer_name: opt(&self.officer_name),
            officer_designation: opt(&self.officer_designation),
            auction: self.auction,
            auction_details: auction_field(&self.auction_details),
            auction_date: auction_field(&self.auction_date),
            auction_authority_name: auction_field(&self.auction_authority_name),
            auction_authority_designation: auction_field(&self.auction_authority_designation),
            auction_remarks: auction_field(&self.auction_remarks),
            pictures,
        }
    }
}

fn opt(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Wire shape of the disposal submission. Field names follow the server
/// contract exactly; `pictures` is always present, never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalPayload {
    #[serde(rename = "poleCropId")]
    pub pole_crop_id: i64,
    pub dr_no: Option<String>,
    pub fc_no: Option<String>,
    pub dpc_no: Option<String>,
    pub dpc_date: Option<String>,
    pub fir_no: Option<String>,
    pub fir_date: Option<String>,
    pub dr_date: Option<String>,
    pub remarks: Option<String>,
    pub peeda_act: bool,
    pub act_date: Option<String>,
    pub act_remarks: Option<String>,
    pub authority_oo: Option<String>,
    pub officer_name: Option<String>,
    pub officer_designation: Option<String>,
    pub auction: bool,
    pub auction_details: Option<String>,
    pub auction_date: Option<String>,
    pub auction_authority_name: Option<String>,
    pub auction_authority_designation: Option<String>,
    pub auction_remarks: Option<String>,
    pub pictures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn date_format_accepts_exact_shape() {
        assert!(is_valid_date_format("2024-02-01"));
        assert!(is_valid_date_format("  2024-02-01  "));
        // Calendar nonsense still passes the format check.
        assert!(is_valid_date_format("2024-02-31"));
    }

    #[test]
    fn date_format_rejects_loose_shapes() {
        assert!(!is_valid_date_format("2024-2-1"));
        assert!(!is_valid_date_format("24-02-01"));
        assert!(!is_valid_date_format("2024/02/01"));
        assert!(!is_valid_date_format("2024-02-011"));
        assert!(!is_valid_date_format(""));
        assert!(!is_valid_date_format("abcd-ef-gh"));
    }

    // Reference implementation: char classes position by position.
    fn reference_date_check(value: &str) -> bool {
        let chars: Vec<char> = value.trim().chars().collect();
        chars.len() == 10
            && chars.iter().enumerate().all(|(i, c)| match i {
                4 | 7 => *c == '-',
                _ => c.is_ascii_digit(),
            })
    }

    proptest! {
        #[test]
        fn date_format_matches_reference(value in "\\PC{0,16}") {
            prop_assert_eq!(is_valid_date_format(&value), reference_date_check(&value));
        }

        #[test]
        fn generated_dates_always_pass(value in "[0-9]{4}-[0-9]{2}-[0-9]{2}") {
            prop_assert!(is_valid_date_format(&value));
        }
    }

    #[test]
    fn validate_skips_blank_dates() {
        let form = DisposalForm::default();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn validate_names_the_offending_date_field() {
        let form = DisposalForm {
            fir_date: "2024-2-1".into(),
            ..DisposalForm::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, FormError::BadDateFormat { field: FormField::FirDate });
        assert!(err.to_string().contains("FIR Date"));
    }

    #[test]
    fn validate_requires_auction_details_when_auction_on() {
        let mut form = DisposalForm {
            auction: true,
            auction_details: "   ".into(),
            ..DisposalForm::default()
        };
        assert_eq!(form.validate().unwrap_err(), FormError::MissingAuctionDetails);

        form.auction_details = "lot 12, upset price 40k".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn payload_normalizes_blank_to_null() {
        let form = DisposalForm {
            dr_no: "  DR-17  ".into(),
            remarks: "   ".into(),
            ..DisposalForm::default()
        };

        let payload = form.to_payload(5, vec![]);
        assert_eq!(payload.dr_no.as_deref(), Some("DR-17"));
        assert_eq!(payload.remarks, None);
    }

    #[test]
    fn payload_nulls_auction_fields_when_auction_off() {
        let form = DisposalForm {
            auction: false,
            auction_details: "kept in memory".into(),
            auction_date: "2024-05-01".into(),
            auction_authority_name: "DFO".into(),
            auction_authority_designation: "Divisional Officer".into(),
            auction_remarks: "still visible in the form".into(),
            ..DisposalForm::default()
        };

        let payload = form.to_payload(5, vec![]);
        assert_eq!(payload.auction_details, None);
        assert_eq!(payload.auction_date, None);
        assert_eq!(payload.auction_authority_name, None);
        assert_eq!(payload.auction_authority_designation, None);
        assert_eq!(payload.auction_remarks, None);
    }

    #[test]
    fn payload_keeps_auction_fields_when_auction_on() {
        let form = DisposalForm {
            auction: true,
            auction_details: "lot 12".into(),
            ..DisposalForm::default()
        };

        let payload = form.to_payload(5, vec![]);
        assert_eq!(payload.auction_details.as_deref(), Some("lot 12"));
    }

    #[test]
    fn payload_serializes_contract_field_names() {
        let form = DisposalForm::default();
        let json = serde_json::to_value(form.to_payload(7, vec!["https://f/x.jpg".into()]))
            .unwrap();

        assert_eq!(json["poleCropId"], 7);
        assert_eq!(json["dr_no"], serde_json::Value::Null);
        assert_eq!(json["peeda_act"], false);
        assert_eq!(json["pictures"][0], "https://f/x.jpg");
    }
}
