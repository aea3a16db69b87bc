use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::models::{CourseGrade, SemesterId, SemesterReport};

const SEMESTER_SELECTOR: &str = "#gradeReport div.semester";
const GRADES_SELECTOR: &str = "#gradeReport table.grades tr";

// The report table carries three header rows and two footer rows that hold
// no grade data. Structural property of the portal's table layout.
const HEADER_ROWS: usize = 3;
const FOOTER_ROWS: usize = 2;

// Grade codes for courses graded pass/fail instead of numerically, as they
// read after cleanup. Substituted with the scale's end points so the diff
// and tone logic only ever see numbers or the placeholder.
const PASS_MARKER: &str = "bestanden";
const FAIL_MARKER: &str = "nichtbestanden";

/// Parses the term report page into a semester id and the ordered list of
/// (course, grade) entries. Pure transform, no side effects.
pub fn parse_report(html: &str) -> Result<(SemesterId, SemesterReport)> {
    let document = Html::parse_document(html);

    let semester_selector = Selector::parse(SEMESTER_SELECTOR).unwrap();
    let label = document
        .select(&semester_selector)
        .next()
        .ok_or_else(|| Error::MalformedReport("semester label not found".into()))?;
    let semester = SemesterId::from_label(&label.text().collect::<String>());

    let row_selector = Selector::parse(GRADES_SELECTOR).unwrap();
    let rows: Vec<_> = document.select(&row_selector).collect();
    if rows.is_empty() {
        return Err(Error::MalformedReport("grade table not found".into()));
    }

    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let mut entries = Vec::new();
    if rows.len() > HEADER_ROWS + FOOTER_ROWS {
        for row in &rows[HEADER_ROWS..rows.len() - FOOTER_ROWS] {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 4 {
                // Separator rows carry no cells worth reading.
                continue;
            }
            let description = match cells[2].select(&link_selector).next() {
                Some(link) => link.text().collect::<String>().trim().to_string(),
                None => continue,
            };
            if description.is_empty() {
                continue;
            }
            let grade = normalize_grade(&clean_grade(&cells[3].text().collect::<String>()));
            entries.push(CourseGrade { description, grade });
        }
    }

    Ok((semester, SemesterReport { entries }))
}

/// Strips every character outside `[*a-zA-Z0-9.]` from the raw grade text.
fn clean_grade(raw: &str) -> String {
    let re = Regex::new(r"[^*a-zA-Z0-9.]").unwrap();
    re.replace_all(raw, "").into_owned()
}

/// Rewrites pass/fail grade codes to the scale's fixed end points; anything
/// else, including the unpublished placeholder, passes through untouched.
fn normalize_grade(cleaned: &str) -> String {
    match cleaned {
        PASS_MARKER => "6.0".into(),
        FAIL_MARKER => "1.0".into(),
        other => other.into(),
    }
}
