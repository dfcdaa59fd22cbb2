//! Display/FromStr for the lowercase wire names of domain enums
//!
//! Priorities and transition kinds travel as lowercase strings; this macro
//! keeps both directions of that mapping in one table.
//!
//! # Example
//!
//! ```rust
//! use console_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ApprovalDecision {
//!     Approve,
//!     Reject,
//! }
//!
//! impl_domain_status_conversions!(ApprovalDecision {
//!     Approve => "approve",
//!     Reject => "reject",
//! });
//!
//! assert_eq!(ApprovalDecision::Reject.to_string(), "reject");
//! assert_eq!("APPROVE".parse::<ApprovalDecision>(), Ok(ApprovalDecision::Approve));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: converts enum variants to lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
///
/// # Features
///
/// - Case-insensitive parsing (e.g., "PENDING", "pending", "Pending" all work)
/// - Consistent lowercase string output
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
