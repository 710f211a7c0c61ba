use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowReason {
    ForgotAtHome,
    LostDevice,
    /// The borrower supplies the text themselves.
    Other,
}

impl BorrowReason {
    /// Text posted as `Reason` for the fixed choices.
    pub fn label(&self) -> &'static str {
        match self {
            BorrowReason::ForgotAtHome => "Forgot at home",
            BorrowReason::LostDevice => "Lost device",
            BorrowReason::Other => "Others",
        }
    }
}

impl Display for BorrowReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown borrow reason \"{0}\" (expected one of: forgot at home, lost device, other)")]
pub struct UnknownReason(pub String);

impl FromStr for BorrowReason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forgot at home" | "forgot-at-home" => Ok(BorrowReason::ForgotAtHome),
            "lost device" | "lost-device" => Ok(BorrowReason::LostDevice),
            "other" | "others" => Ok(BorrowReason::Other),
            _ => Err(UnknownReason(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Forgot at home".parse::<BorrowReason>().unwrap(), BorrowReason::ForgotAtHome);
        assert_eq!("LOST DEVICE".parse::<BorrowReason>().unwrap(), BorrowReason::LostDevice);
        assert_eq!("others".parse::<BorrowReason>().unwrap(), BorrowReason::Other);
        assert_eq!(" other ".parse::<BorrowReason>().unwrap(), BorrowReason::Other);
    }

    #[test]
    fn rejects_unknown_reason() {
        let err = "bored".parse::<BorrowReason>().unwrap_err();
        assert!(err.to_string().contains("bored"));
    }
}
