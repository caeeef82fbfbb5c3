//! Department set and the job-title → department rule table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Department {
    /// No job assigned.
    #[default]
    None,
    Partner,
    Executive,
    Central,
    Director,
    Boh,
    Foh,
}

impl Department {
    /// Every department in display order.
    pub const ALL: [Department; 7] = [
        Department::None,
        Department::Partner,
        Department::Executive,
        Department::Central,
        Department::Director,
        Department::Boh,
        Department::Foh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Partner => "PARTNER",
            Self::Executive => "EXECUTIVE",
            Self::Central => "CENTRAL",
            Self::Director => "DIRECTOR",
            Self::Boh => "BOH",
            Self::Foh => "FOH",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == upper)
            .ok_or_else(|| format!("unknown department: {s}"))
    }
}

/// Ordered (department, job substring) rules. First match wins, so the
/// order here is significant.
pub const JOB_RULES: &[(Department, &str)] = &[
    (Department::Partner, "Dispatcher"),
    (Department::Executive, "Mobile Drinks"),
    (Department::Central, "Lemons"),
    (Department::Director, "Front Counter Stager"),
    (Department::Boh, "BOH General"),
    (Department::Foh, "FOH General"),
];

/// Map a jobs string (jobs joined with `" | "`) to a department.
///
/// Empty or `"-"` means no job: [`Department::None`]. Otherwise the first
/// rule whose job appears (case-insensitively) in the string wins; `None` if
/// no rule matches.
pub fn map_department_from_jobs(jobs: &str) -> Option<Department> {
    let lower = jobs.trim().to_lowercase();
    if lower.is_empty() || lower == "-" {
        return Some(Department::None);
    }
    JOB_RULES
        .iter()
        .find(|(_, job)| lower.contains(&job.to_lowercase()))
        .map(|(department, _)| *department)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rule_wins() {
        assert_eq!(
            map_department_from_jobs("FOH General | BOH General"),
            Some(Department::Boh)
        );
        assert_eq!(
            map_department_from_jobs("BOH General | Dispatcher"),
            Some(Department::Partner)
        );
    }

    #[test]
    fn case_insensitive_substring() {
        assert_eq!(map_department_from_jobs("foh general - closer"), Some(Department::Foh));
        assert_eq!(map_department_from_jobs("LEMONS"), Some(Department::Central));
    }

    #[test]
    fn empty_and_dash_mean_none() {
        assert_eq!(map_department_from_jobs(""), Some(Department::None));
        assert_eq!(map_department_from_jobs(" - "), Some(Department::None));
    }

    #[test]
    fn unmapped_job_is_dropped() {
        assert_eq!(map_department_from_jobs("Janitor"), None);
    }

    #[test]
    fn parse_and_display_round_trip() {
        for d in Department::ALL {
            assert_eq!(d.to_string().parse::<Department>(), Ok(d));
        }
        assert_eq!("boh".parse::<Department>(), Ok(Department::Boh));
        assert!("TERMINATED".parse::<Department>().is_err());
    }
}
