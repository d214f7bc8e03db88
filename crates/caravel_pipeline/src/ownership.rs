//! Offline ownership resolution from an external spreadsheet.

use caravel_core::{Profile, Video, normalize_title};
use caravel_error::{CaravelResult, OwnershipError, OwnershipErrorKind};
use caravel_storage::{OwnershipTable, ResourceStore};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    email: String,
}

/// Outcome of one resolver pass.
#[derive(Debug, Default)]
pub struct OwnershipReport {
    /// Number of videos with a resolved owner
    pub resolved: usize,
    /// Emails in the spreadsheet with no pulled profile
    pub unknown_owners: Vec<String>,
    /// Rows skipped for lack of an email
    pub skipped: usize,
}

/// Reconcile a `;`-delimited spreadsheet of `(video display name, owner
/// email)` rows against pulled video titles and profile emails, writing the
/// `video_id → username` table the push pipeline consumes.
///
/// Titles are compared case/whitespace/punctuation-insensitively. A row
/// whose email has no pulled profile is reported and skipped; a row whose
/// name matches no pulled video at all aborts the pass, since that signals a
/// structural mismatch worth halting for human review.
#[instrument(skip(store, table))]
pub fn resolve_ownership(
    store: &ResourceStore,
    csv_path: &Path,
    mut table: OwnershipTable,
) -> CaravelResult<OwnershipReport> {
    let videos = store
        .list::<Video>()?
        .collect::<CaravelResult<Vec<_>>>()?;
    let profiles: HashMap<String, Profile> = store
        .list::<Profile>()?
        .collect::<CaravelResult<Vec<_>>>()?
        .into_iter()
        .map(|p| (p.email.clone(), p))
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(csv_path)
        .map_err(|e| {
            OwnershipError::new(OwnershipErrorKind::Spreadsheet(format!(
                "{}: {}",
                csv_path.display(),
                e
            )))
        })?;

    let mut report = OwnershipReport::default();
    for row in reader.deserialize::<Row>() {
        let row = row.map_err(|e| {
            OwnershipError::new(OwnershipErrorKind::Spreadsheet(format!(
                "{}: {}",
                csv_path.display(),
                e
            )))
        })?;
        info!(name = %row.name, "Processing spreadsheet row");
        if row.email.is_empty() {
            report.skipped += 1;
            continue;
        }
        let Some(profile) = profiles.get(&row.email) else {
            warn!(email = %row.email, "Spreadsheet owner has no pulled profile");
            report.unknown_owners.push(row.email.clone());
            continue;
        };

        let wanted = normalize_title(&row.name);
        let matched = videos
            .iter()
            .find(|video| normalize_title(&video.title) == wanted)
            .ok_or_else(|| {
                OwnershipError::new(OwnershipErrorKind::NoTitleMatch(row.name.clone()))
            })?;
        table.insert(matched.id.clone(), profile.username());
        report.resolved += 1;
    }

    table.write()?;
    info!(
        resolved = report.resolved,
        unknown = report.unknown_owners.len(),
        skipped = report.skipped,
        "Wrote ownership table"
    );
    Ok(report)
}
