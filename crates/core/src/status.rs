//! Closed enums for every status-like field.
//!
//! Each enum maps to the wire code stored in documents and accepted by the
//! API. [`parse`](TaskStatus::parse) is the single validation entry point:
//! unknown codes come back as [`CoreError::Validation`] listing the valid
//! codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($what:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Wire code stored in documents.
            pub fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Parse a wire code.
            pub fn parse(code: &str) -> Result<Self, CoreError> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    other => {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.code()).collect();
                        Err(CoreError::Validation(format!(
                            "Invalid {} '{other}'. Valid values: {valid:?}",
                            $what
                        )))
                    }
                }
            }

            /// `(code, label)` pairs for every variant.
            pub fn catalog() -> Vec<(&'static str, &'static str)> {
                Self::ALL.iter().map(|v| (v.code(), v.label())).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_code_enum! {
    /// Task workflow status.
    TaskStatus ("task status") {
        Open = "OPEN" => "Open",
        Todo = "TODO" => "To do",
        Investigation = "INVEST" => "Under investigation",
        InProgress = "PROG" => "In progress",
        InReview = "REV" => "In review",
        WaitingForCustomer = "CUST" => "Waiting for customer",
        Standby = "STANDBY" => "Standby",
        Done = "DONE" => "Done",
        Cancelled = "CANCEL" => "Cancelled",
        Postponed = "POST" => "Postponed",
    }
}

define_code_enum! {
    /// Task kind.
    TaskType ("task type") {
        Bug = "BUG" => "Bug",
        Task = "TASK" => "Task",
        Story = "STORY" => "Story",
        Epic = "EPIC" => "Epic",
        Doc = "DOC" => "Doc",
        Test = "TEST" => "Test",
        Deliverable = "DELIVERABLE" => "Deliverable",
    }
}

define_code_enum! {
    /// Ready-for-test outcome.
    Rft ("RFT value") {
        Unset = "" => "Not set",
        Ok = "OK" => "OK",
        Ko = "KO" => "KO",
    }
}

define_code_enum! {
    /// Delivery outcome of a task.
    DeliveryStatus ("delivery status") {
        Unset = "" => "Not set",
        Ok = "OK" => "Delivered",
        Ko = "KO" => "Delivery issue",
    }
}

define_code_enum! {
    /// Sprint lifecycle. Transitions are not guarded.
    SprintStatus ("sprint status") {
        Todo = "To do" => "To do",
        InProgress = "In progress" => "In progress",
        Done = "Done" => "Done",
        Closed = "Closed" => "Closed",
    }
}

define_code_enum! {
    /// Project lifecycle.
    ProjectStatus ("project status") {
        Bid = "BID" => "Bid",
        InProgress = "In progress" => "In progress",
        Done = "Done" => "Done",
        Cancelled = "Cancelled" => "Cancelled",
        Closed = "Closed" => "Closed",
    }
}

define_code_enum! {
    /// Service center lifecycle.
    ServiceCenterStatus ("service center status") {
        Operational = "Operational" => "Operational",
        Closed = "Closed" => "Closed",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl Default for TaskType {
    fn default() -> Self {
        Self::Task
    }
}

impl Default for Rft {
    fn default() -> Self {
        Self::Unset
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        Self::Unset
    }
}

impl Default for SprintStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl Default for ServiceCenterStatus {
    fn default() -> Self {
        Self::Operational
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn task_status_parses_wire_codes() {
        assert_eq!(TaskStatus::parse("PROG").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("CANCEL").unwrap(), TaskStatus::Cancelled);
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn unknown_code_lists_valid_values() {
        let err = TaskType::parse("FEATURE").unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg.contains("FEATURE") && msg.contains("BUG"));
    }

    #[test]
    fn rft_unset_is_empty_code() {
        assert_eq!(Rft::parse("").unwrap(), Rft::Unset);
        assert_eq!(Rft::default().code(), "");
    }

    #[test]
    fn task_status_catalog_has_ten_entries() {
        let catalog = TaskStatus::catalog();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog[0], ("OPEN", "Open"));
        assert_eq!(catalog[9], ("POST", "Postponed"));
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&SprintStatus::InProgress).unwrap();
        assert_eq!(json, "\"In progress\"");
        let back: SprintStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SprintStatus::InProgress);
        assert!(serde_json::from_str::<SprintStatus>("\"Started\"").is_err());
    }
}
