use log::{error, warn};

use crate::cache::CacheStore;
use crate::error::{Error, Result};
use crate::models::{SemesterId, SemesterReport, UNPUBLISHED};
use crate::notify::Notifier;

/// Diffs the fresh report against the cached snapshot and delivers one alert
/// per newly published grade, returning how many were delivered.
///
/// Reads the snapshot once, merges the new grades into it, writes it back
/// once (full replace). Cached entries missing from the fresh report are
/// preserved. Re-running with an unchanged report yields 0.
///
/// Delivery policy: a grade counts as seen once delivery was attempted, so a
/// failed delivery is logged and lost rather than repeated on the next run.
pub async fn notify_new_grades(
    cache: &mut dyn CacheStore,
    notifier: &dyn Notifier,
    semester: &SemesterId,
    report: &SemesterReport,
) -> Result<u32> {
    let mut snapshot = cache.get(semester).await?;

    let mut notified = 0;
    for entry in &report.entries {
        let cached = snapshot.get(&entry.description).map(String::as_str);
        if !newly_publishable(cached, &entry.grade) {
            continue;
        }

        let value = match numeric_grade(&entry.grade) {
            Ok(value) => value,
            Err(e) => {
                // Not cached, so the record is retried once the portal (or
                // the parser) produces something readable.
                error!("Skipping {:?}: {}", entry.description, e);
                continue;
            }
        };

        match notifier.notify(&entry.description, value).await {
            Ok(()) => notified += 1,
            Err(e) => warn!("Delivery failed for {:?}: {}", entry.description, e),
        }
        snapshot.insert(entry.description.clone(), entry.grade.clone());
    }

    cache.set(semester, &snapshot).await?;
    Ok(notified)
}

/// A grade qualifies when it was unseen or unpublished before, and the fresh
/// value is a published one we have not reported yet. Never overwrites a
/// known numeric grade and never downgrades one back to the placeholder.
fn newly_publishable(cached: Option<&str>, fresh: &str) -> bool {
    let unseen = matches!(cached, None | Some(UNPUBLISHED));
    unseen && fresh != UNPUBLISHED && cached != Some(fresh)
}

fn numeric_grade(grade: &str) -> Result<f32> {
    grade.parse::<f32>().map_err(|_| Error::Format(grade.to_string()))
}
