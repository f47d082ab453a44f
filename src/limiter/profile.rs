//! Rate Limit Profiles
//!
//! Static quota configuration. Each profile pairs a window length with a
//! request cap and is counted independently per client, so exhausting the
//! forensic quota leaves the general quota untouched.

use std::fmt;
use std::str::FromStr;

const HOUR_MS: u64 = 60 * 60 * 1000;
const MINUTE_MS: u64 = 60 * 1000;

// == Rate Profile ==
/// Named quota tied to a class of endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateProfile {
    /// Full report builds: 10 per hour
    ReportGeneration,
    /// Report file exports: 20 per hour
    ReportExport,
    /// Financial summaries: 30 per hour
    FinancialSummary,
    /// Forensic analysis runs: 5 per hour
    Forensic,
    /// Everything else: 100 per minute
    General,
}

impl RateProfile {
    /// Window length in milliseconds.
    pub fn window_ms(&self) -> u64 {
        match self {
            RateProfile::General => MINUTE_MS,
            _ => HOUR_MS,
        }
    }

    /// Base request cap per window, before role multipliers.
    pub fn max_requests(&self) -> u64 {
        match self {
            RateProfile::ReportGeneration => 10,
            RateProfile::ReportExport => 20,
            RateProfile::FinancialSummary => 30,
            RateProfile::Forensic => 5,
            RateProfile::General => 100,
        }
    }

    /// Stable name used in window keys and logs.
    pub fn name(&self) -> &'static str {
        match self {
            RateProfile::ReportGeneration => "reportGeneration",
            RateProfile::ReportExport => "reportExport",
            RateProfile::FinancialSummary => "financialSummary",
            RateProfile::Forensic => "forensic",
            RateProfile::General => "general",
        }
    }
}

impl fmt::Display for RateProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RateProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reportGeneration" => Ok(RateProfile::ReportGeneration),
            "reportExport" => Ok(RateProfile::ReportExport),
            "financialSummary" => Ok(RateProfile::FinancialSummary),
            "forensic" => Ok(RateProfile::Forensic),
            "general" => Ok(RateProfile::General),
            other => Err(format!("unknown rate limit profile: {}", other)),
        }
    }
}

// == Role Multipliers ==
/// Quota multiplier for an authenticated role. Resolved by the caller, who
/// knows the authenticated identity; the limiter itself is role-agnostic.
pub fn role_multiplier(role: &str) -> f64 {
    match role {
        "super_admin" => 5.0,
        "financial_manager" => 3.0,
        "operational_manager" => 2.0,
        _ => 1.0,
    }
}
