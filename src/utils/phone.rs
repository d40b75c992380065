use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

pub const ERR_PHONE_MSG: &str = "phone validation failed";

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("mobile phone pattern is valid"));

// Local part starts with 2-9; a bare number starting with 1 is a truncated mobile.
static FIXED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0\d{2,3}-?)?[2-9]\d{6,7}(-\d{1,6})?$").expect("fixed-line pattern is valid")
});

/// Landline numbers such as `010-62345678`, `075588889999` or a bare local
/// `87654321`. The value is matched exactly as submitted.
pub fn is_fixed_line(phone: &str) -> bool {
    FIXED_LINE_RE.is_match(phone)
}

pub fn is_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRule {
    /// Fixed-line numbers are not pattern checked.
    Skip,
    Mobile,
}

impl PhoneRule {
    pub fn apply(&self, value: &str) -> Result<(), ValidationError> {
        match self {
            PhoneRule::Skip => Ok(()),
            PhoneRule::Mobile if is_mobile(value) => Ok(()),
            PhoneRule::Mobile => {
                let mut error = ValidationError::new("phone");
                error.message = Some(Cow::Borrowed(ERR_PHONE_MSG));
                error.add_param(Cow::Borrowed("value"), &value);
                Err(error)
            }
        }
    }
}

/// Picks the rule for a phone number: fixed-line numbers skip the mobile
/// pattern check entirely.
pub fn phone_rule(phone: &str) -> PhoneRule {
    if is_fixed_line(phone) {
        PhoneRule::Skip
    } else {
        PhoneRule::Mobile
    }
}
