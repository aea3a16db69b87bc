//! End-to-end diff & notify flow over the durable file cache: parse a report
//! page, notify against an empty cache, then prove repeated runs stay quiet.

use std::sync::Mutex;

use async_trait::async_trait;

use gradewatch::cache::{CacheStore, FileCache};
use gradewatch::engine::notify_new_grades;
use gradewatch::models::SemesterId;
use gradewatch::notify::Notifier;
use gradewatch::parser::parse_report;
use gradewatch::Result;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, f32)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, description: &str, grade: f32) -> Result<()> {
        self.sent.lock().unwrap().push((description.to_string(), grade));
        Ok(())
    }
}

fn report_page() -> String {
    let rows = [
        ("Test 1 for gradewatch", "***"),
        ("Test 2 for gradewatch", "5.5"),
        ("Test 3 for gradewatch", "4.5"),
        ("Test 4 for gradewatch", "3.0"),
    ];
    let mut body = String::new();
    for (description, grade) in rows {
        body.push_str(&format!(
            "<tr><td></td><td></td><td><div><div><div><a>{description}</a>\
             </div></div></div></td><td>{grade}</td></tr>\n"
        ));
    }
    format!(
        r#"<html><body><div id="gradeReport">
            <div class="semester">TestSemester</div>
            <table class="grades">
              <tr><td>Term report</td></tr>
              <tr><td>Student</td></tr>
              <tr><td>Course</td><td></td><td></td><td>Grade</td></tr>
              {body}
              <tr><td>Average</td></tr>
              <tr><td>Printed by the portal</td></tr>
            </table>
           </div></body></html>"#
    )
}

#[tokio::test]
async fn scrape_notify_and_stay_quiet_on_the_second_run() {
    let dir = tempfile::tempdir().unwrap();

    let (semester, report) = parse_report(&report_page()).unwrap();
    assert_eq!(semester.as_str(), "TestSemester");

    // First run against an empty cache: three published grades fire, the
    // placeholder stays silent.
    let mut cache = FileCache::new(dir.path()).unwrap();
    let notifier = RecordingNotifier::default();
    let count = notify_new_grades(&mut cache, &notifier, &semester, &report).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        *notifier.sent.lock().unwrap(),
        vec![
            ("Test 2 for gradewatch".to_string(), 5.5),
            ("Test 3 for gradewatch".to_string(), 4.5),
            ("Test 4 for gradewatch".to_string(), 3.0),
        ]
    );

    // The persisted snapshot holds all four entries, placeholder included.
    let snapshot = cache.get(&semester).await.unwrap();
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.get("Test 1 for gradewatch").map(String::as_str), Some("***"));
    assert_eq!(snapshot.get("Test 2 for gradewatch").map(String::as_str), Some("5.5"));

    // Second run, fresh store instance as if the scheduler fired again.
    let mut cache = FileCache::new(dir.path()).unwrap();
    let notifier = RecordingNotifier::default();
    let count = notify_new_grades(&mut cache, &notifier, &semester, &report).await.unwrap();
    assert_eq!(count, 0);
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn placeholder_fires_once_it_turns_into_a_grade() {
    let dir = tempfile::tempdir().unwrap();
    let (semester, report) = parse_report(&report_page()).unwrap();

    let mut cache = FileCache::new(dir.path()).unwrap();
    notify_new_grades(&mut cache, &RecordingNotifier::default(), &semester, &report)
        .await
        .unwrap();

    // The portal publishes the held-back grade.
    let published = report_page().replace("<td>***</td>", "<td>5.0</td>");
    let (semester, report) = parse_report(&published).unwrap();

    let mut cache = FileCache::new(dir.path()).unwrap();
    let notifier = RecordingNotifier::default();
    let count = notify_new_grades(&mut cache, &notifier, &semester, &report).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(*notifier.sent.lock().unwrap(), vec![("Test 1 for gradewatch".to_string(), 5.0)]);
}

#[tokio::test]
async fn flush_resets_the_cache_and_everything_fires_again() {
    let dir = tempfile::tempdir().unwrap();
    let (semester, report) = parse_report(&report_page()).unwrap();

    let mut cache = FileCache::new(dir.path()).unwrap();
    notify_new_grades(&mut cache, &RecordingNotifier::default(), &semester, &report)
        .await
        .unwrap();
    cache.flush().await.unwrap();

    let notifier = RecordingNotifier::default();
    let count = notify_new_grades(&mut cache, &notifier, &semester, &report).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn different_semesters_use_separate_cache_entries() {
    let dir = tempfile::tempdir().unwrap();
    let (_, report) = parse_report(&report_page()).unwrap();

    let mut cache = FileCache::new(dir.path()).unwrap();
    let autumn = SemesterId::from_label("HS 2013");
    let spring = SemesterId::from_label("FS 2014");

    let first = notify_new_grades(&mut cache, &RecordingNotifier::default(), &autumn, &report)
        .await
        .unwrap();
    let second = notify_new_grades(&mut cache, &RecordingNotifier::default(), &spring, &report)
        .await
        .unwrap();
    assert_eq!((first, second), (3, 3));
}
