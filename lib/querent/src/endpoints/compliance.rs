//! Compliance jobs: batch jobs checking stored tweets or users against the API.
//!
//! Two operations share the family:
//!
//! | Kind | Mode | Target |
//! |------|------|--------|
//! | `SingleJob` | path | `tweets/compliance/jobs/{id}` (requires `ID`) |
//! | `MultipleJobs` | query | `tweets/compliance/jobs?end_time=..&start_time=..&status=..` |

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use querent_core::{
    BuildMode, EndpointFamily, FieldDecl, FieldKind, FieldValue, OperationKind, Predicate, Rule,
    RuleTable, WireToken,
};
use serde::{Deserialize, Deserializer};

/// The compliance jobs endpoint family.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceJobs;

/// Operation kinds of [`ComplianceJobs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceKind {
    /// One job by ID.
    SingleJob,
    /// Jobs filtered by time window and status.
    MultipleJobs,
}

impl WireToken for ComplianceKind {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::SingleJob => "SingleJob",
            Self::MultipleJobs => "MultipleJobs",
        }
    }
}

impl OperationKind for ComplianceKind {
    fn from_token(token: &str) -> Option<Self> {
        [Self::SingleJob, Self::MultipleJobs]
            .into_iter()
            .find(|kind| kind.wire_token() == token)
    }

    fn mode(&self) -> BuildMode {
        match self {
            Self::SingleJob => BuildMode::Path,
            Self::MultipleJobs => BuildMode::Query,
        }
    }

    fn path_template(&self) -> &'static str {
        match self {
            Self::SingleJob => "tweets/compliance/jobs/{id}",
            Self::MultipleJobs => "tweets/compliance/jobs",
        }
    }
}

/// Lifecycle state of a compliance job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, waiting for upload.
    Created,
    /// Processing.
    InProgress,
    /// Processing failed.
    Failed,
    /// Results ready for download.
    Complete,
    /// Results no longer available.
    Expired,
}

impl WireToken for JobStatus {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Failed => "failed",
            Self::Complete => "complete",
            Self::Expired => "expired",
        }
    }
}

impl EndpointFamily for ComplianceJobs {
    type Kind = ComplianceKind;

    const NAME: &'static str = "compliance";

    const FIELDS: &'static [FieldDecl] = &[
        FieldDecl::selector("Type"),
        FieldDecl::path("ID", "id"),
        FieldDecl::query("EndTime", "end_time", FieldKind::Date),
        FieldDecl::query("StartTime", "start_time", FieldKind::Date),
        FieldDecl::query("Status", "status", FieldKind::List),
    ];

    fn rules() -> &'static RuleTable<ComplianceKind> {
        static RULES: LazyLock<RuleTable<ComplianceKind>> = LazyLock::new(|| {
            RuleTable::new()
                .rule(ComplianceKind::SingleJob, Rule::new().require("ID"))
                .rule(ComplianceKind::MultipleJobs, Rule::new())
        });
        &RULES
    }
}

impl ComplianceJobs {
    /// Predicate selecting one job.
    #[must_use]
    pub fn single_job(id: impl Into<String>) -> Predicate {
        Predicate::eq("Type", FieldValue::token(&ComplianceKind::SingleJob))
            .and(Predicate::eq("ID", FieldValue::text(id)))
    }

    /// Predicate selecting the job listing; add `EndTime`, `StartTime` or
    /// `Status` terms with [`Predicate::and`].
    #[must_use]
    pub fn multiple_jobs() -> Predicate {
        Predicate::eq("Type", FieldValue::token(&ComplianceKind::MultipleJobs))
    }

    /// Status filter term.
    #[must_use]
    pub fn status_in(statuses: &[JobStatus]) -> Predicate {
        Predicate::eq("Status", FieldValue::tokens(statuses))
    }
}

/// One compliance job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComplianceJob {
    /// Job ID.
    pub id: String,
    /// `tweets` or `users`.
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    /// Caller-given name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the upload URL accepts resumable uploads.
    #[serde(default)]
    pub resumable: Option<bool>,
    /// Current state.
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Where to upload the IDs to check.
    #[serde(default)]
    pub upload_url: Option<String>,
    /// Upload URL expiry.
    #[serde(default)]
    pub upload_expires_at: Option<DateTime<Utc>>,
    /// Where to download results.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Download URL expiry.
    #[serde(default)]
    pub download_expires_at: Option<DateTime<Utc>>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of both compliance operations.
///
/// A single-job lookup returns one object under `data`, the listing an
/// array; both land in the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComplianceResponse {
    #[serde(default, deserialize_with = "one_or_many")]
    data: Vec<ComplianceJob>,
}

impl ComplianceResponse {
    /// Jobs in the response; empty when the API returned none.
    #[must_use]
    pub fn jobs(&self) -> &[ComplianceJob] {
        &self.data
    }

    /// First job, for single-job lookups.
    #[must_use]
    pub fn job(&self) -> Option<&ComplianceJob> {
        self.data.first()
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ComplianceJob>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ComplianceJob),
        Many(Vec<ComplianceJob>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(job)) => vec![job],
        Some(OneOrMany::Many(jobs)) => jobs,
        None => Vec::new(),
    })
}
