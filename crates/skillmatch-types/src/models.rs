use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a stored enum column holds a value this build does not know.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// -- Roles --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Candidate,
    Recruiter,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "CANDIDATE",
            Self::Recruiter => "RECRUITER",
            Self::Admin => "ADMIN",
        }
    }

    /// Dashboard a freshly signed-in user is sent to.
    /// Admins have no dashboard yet.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Candidate => "/candidate/dashboard",
            Self::Recruiter => "/recruiter/dashboard",
            Self::Admin => "/unauthorized",
        }
    }

    /// Roles a visitor may pick for themselves at registration.
    pub fn is_self_assignable(&self) -> bool {
        match self {
            Self::Candidate | Self::Recruiter => true,
            Self::Admin => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CANDIDATE" => Ok(Self::Candidate),
            "RECRUITER" => Ok(Self::Recruiter),
            "ADMIN" => Ok(Self::Admin),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

// -- Application status --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        Self::Pending,
        Self::Shortlisted,
        Self::Rejected,
        Self::Hired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Shortlisted => "SHORTLISTED",
            Self::Rejected => "REJECTED",
            Self::Hired => "HIRED",
        }
    }

    /// Statuses a recruiter may move an application to from this one.
    /// Rejected and hired applications can only be reset to pending.
    pub fn next_statuses(&self) -> &'static [ApplicationStatus] {
        match self {
            Self::Pending => &[Self::Shortlisted, Self::Rejected],
            Self::Shortlisted => &[Self::Hired, Self::Rejected],
            Self::Rejected | Self::Hired => &[Self::Pending],
        }
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "application status",
                value: s.to_string(),
            })
    }
}

// -- Job categories --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobCategory {
    ItSoftware,
    SalesMarketing,
    FinanceAccounting,
    HrAdministration,
    EngineeringManufacturing,
}

impl JobCategory {
    pub const ALL: [JobCategory; 5] = [
        Self::ItSoftware,
        Self::SalesMarketing,
        Self::FinanceAccounting,
        Self::HrAdministration,
        Self::EngineeringManufacturing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItSoftware => "IT_SOFTWARE",
            Self::SalesMarketing => "SALES_MARKETING",
            Self::FinanceAccounting => "FINANCE_ACCOUNTING",
            Self::HrAdministration => "HR_ADMINISTRATION",
            Self::EngineeringManufacturing => "ENGINEERING_MANUFACTURING",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ItSoftware => "Information Technology (IT) & Software",
            Self::SalesMarketing => "Sales & Marketing",
            Self::FinanceAccounting => "Finance & Accounting",
            Self::HrAdministration => "Human Resources (HR) & Administration",
            Self::EngineeringManufacturing => "Engineering & Manufacturing",
        }
    }
}

impl FromStr for JobCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "job category",
                value: s.to_string(),
            })
    }
}
