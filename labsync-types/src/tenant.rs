//! Tenants (implementing partners) and their raw directory records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A tenant as stored in the directory, before eligibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Organization name.
    pub name: String,
    /// Facility codes that scope every aggregate query.
    pub facility_codes: Vec<String>,
    /// Comma-separated recipient addresses.
    pub mail_list: Option<String>,
    /// Document-repository id used when archiving the workbook.
    pub repo_id: Option<String>,
    /// Shareable link to the document repository, sent with the notification.
    pub repo_link: Option<String>,
    /// Whether the tenant takes part in the batch.
    pub enabled: bool,
}

impl TenantRecord {
    /// Convert into a reportable [`Tenant`].
    ///
    /// Returns `None` unless the record is enabled and carries both a
    /// repository id and a repository link.
    #[must_use]
    pub fn into_reportable(self) -> Option<Tenant> {
        if !self.enabled {
            return None;
        }
        let (Some(repo_id), Some(repo_link)) = (self.repo_id, self.repo_link) else {
            return None;
        };
        Some(Tenant {
            recipients: self
                .mail_list
                .as_deref()
                .map(Tenant::parse_recipients)
                .unwrap_or_default(),
            name: self.name,
            facility_codes: self.facility_codes.into_iter().collect(),
            repo_id,
            repo_link,
        })
    }
}

/// A tenant eligible for reporting. Immutable for the duration of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Organization name; upper-cased into the attachment name.
    pub name: String,
    /// Facility codes that scope every aggregate query.
    pub facility_codes: BTreeSet<String>,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Document-repository id.
    pub repo_id: String,
    /// Document-repository link.
    pub repo_link: String,
}

impl Tenant {
    /// Split a comma-separated mail list, trimming blanks and dropping empties.
    #[must_use]
    pub fn parse_recipients(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
