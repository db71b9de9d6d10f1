use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfError};
use crate::model::{Semesters, Student};
use crate::store::{RecordStore, StorageBackend};
use std::collections::{BTreeMap, BTreeSet};

pub const MAX_MARKS: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub roll: String,
    pub name: String,
    pub branch: String,
    pub photo: Option<Vec<u8>>,
}

/// One line of a branch's result sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub serial: usize,
    pub name: String,
    pub roll: String,
    /// Subject marks by semester.
    pub marks: Semesters,
    pub semester_totals: BTreeMap<u32, u32>,
    pub total: u32,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub rank: usize,
    pub roll: String,
    pub name: String,
    pub branch: String,
    pub total: u32,
}

pub fn add<B: StorageBackend>(
    store: &mut RecordStore<Student, B>,
    new: NewStudent,
) -> Result<CmdResult<Student>> {
    let roll = new.roll.trim();
    if roll.is_empty() {
        return Ok(CmdResult::warning("Please enter the roll number."));
    }

    let mut student = Student::new(roll, new.name.trim(), new.branch.trim());
    student.photo = new.photo;

    match store.insert_unique(student.clone()) {
        Ok(()) => {}
        Err(ShelfError::AlreadyExists(roll)) => {
            return Ok(CmdResult::warning(format!(
                "Student with roll number {} already exists.",
                roll
            )));
        }
        Err(e) => return Err(e),
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Student {} added successfully!",
        student.name
    )));
    Ok(result.with_affected(vec![student]))
}

/// Record (or overwrite) one subject's marks for a semester.
pub fn record_marks<B: StorageBackend>(
    store: &mut RecordStore<Student, B>,
    roll: &str,
    semester: u32,
    subject: &str,
    marks: u32,
) -> Result<CmdResult<Student>> {
    let roll = roll.trim();
    let subject = subject.trim();
    if semester == 0 {
        return Ok(CmdResult::warning("Semester must be 1 or higher."));
    }
    if marks > MAX_MARKS {
        return Ok(CmdResult::warning(format!(
            "Marks must be between 0 and {}.",
            MAX_MARKS
        )));
    }
    if subject.is_empty() {
        return Ok(CmdResult::warning("Please enter the subject name."));
    }

    let updated = store.update_where(roll, |s| {
        s.semesters
            .entry(semester)
            .or_default()
            .insert(subject.to_string(), marks);
    })?;
    if !updated {
        return Ok(CmdResult::warning(
            "Please add the student before adding marks.",
        ));
    }

    let student = store.find(roll).cloned();
    let mut result = CmdResult::default();
    if let Some(student) = student {
        result.add_message(CmdMessage::success(format!(
            "Added {} marks for {} in Semester {}.",
            subject, student.name, semester
        )));
        result = result.with_affected(vec![student]);
    }
    Ok(result)
}

/// Result sheet for one branch, in store order.
pub fn results<B: StorageBackend>(
    store: &RecordStore<Student, B>,
    branch: &str,
) -> Result<CmdResult<ResultRow>> {
    let rows: Vec<ResultRow> = store
        .records()
        .iter()
        .filter(|s| s.branch == branch)
        .enumerate()
        .map(|(i, s)| ResultRow {
            serial: i + 1,
            name: s.name.clone(),
            roll: s.roll.clone(),
            marks: s.semesters.clone(),
            semester_totals: s
                .semesters
                .keys()
                .map(|&sem| (sem, s.semester_total(sem)))
                .collect(),
            total: s.total_marks(),
            percentage: s.percentage(),
        })
        .collect();

    if rows.is_empty() {
        return Ok(CmdResult::warning("No data available for this branch."));
    }
    Ok(CmdResult::default().with_listed(rows))
}

/// Students by total marks, highest first. Ties keep store order.
fn ranking(store: &RecordStore<Student, impl StorageBackend>) -> Vec<Ranked> {
    let mut students: Vec<&Student> = store.records().iter().collect();
    students.sort_by(|a, b| b.total_marks().cmp(&a.total_marks()));
    students
        .into_iter()
        .enumerate()
        .map(|(i, s)| Ranked {
            rank: i + 1,
            roll: s.roll.clone(),
            name: s.name.clone(),
            branch: s.branch.clone(),
            total: s.total_marks(),
        })
        .collect()
}

pub fn top<B: StorageBackend>(
    store: &RecordStore<Student, B>,
    n: usize,
) -> Result<CmdResult<Ranked>> {
    let mut ranked = ranking(store);
    ranked.truncate(n);
    if ranked.is_empty() {
        return Ok(CmdResult::warning("No students found."));
    }
    Ok(CmdResult::default().with_listed(ranked))
}

pub fn first<B: StorageBackend>(store: &RecordStore<Student, B>) -> Result<CmdResult<Ranked>> {
    match ranking(store).into_iter().next() {
        Some(best) => {
            let message = format!(
                "First Student: {} (Roll: {}, Branch: {})",
                best.name, best.roll, best.branch
            );
            Ok(CmdResult::default()
                .with_listed(vec![best])
                .with_message(CmdMessage::success(message)))
        }
        None => Ok(CmdResult::warning("No data available.")),
    }
}

pub fn details<B: StorageBackend>(
    store: &RecordStore<Student, B>,
    roll: &str,
) -> Result<CmdResult<Student>> {
    let roll = roll.trim();
    match store.find(roll) {
        Some(student) => Ok(CmdResult::default().with_listed(vec![student.clone()])),
        None => Ok(CmdResult::warning(format!(
            "No student with roll number {}.",
            roll
        ))),
    }
}

/// Students whose name contains `term`, ignoring case.
pub fn search<B: StorageBackend>(
    store: &RecordStore<Student, B>,
    term: &str,
) -> Result<CmdResult<Student>> {
    if term.trim().is_empty() {
        return Ok(CmdResult::warning("Please enter a student name to search."));
    }

    let found: Vec<Student> = store.search(term.trim()).into_iter().cloned().collect();
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("No students found."));
    }
    Ok(result.with_listed(found))
}

/// Distinct branch names, sorted.
pub fn branches<B: StorageBackend>(store: &RecordStore<Student, B>) -> Result<CmdResult<String>> {
    let names: BTreeSet<&str> = store.records().iter().map(|s| s.branch.as_str()).collect();
    let mut result = CmdResult::default();
    if names.is_empty() {
        result.add_message(CmdMessage::info("No students added yet."));
    }
    Ok(result.with_listed(names.into_iter().map(String::from).collect()))
}

pub fn delete<B: StorageBackend>(
    store: &mut RecordStore<Student, B>,
    roll: &str,
) -> Result<CmdResult<Student>> {
    let roll = roll.trim();
    let removed = store.remove_where(|s| s.roll == roll)?;
    if removed.is_empty() {
        return Ok(CmdResult::warning(format!(
            "No student with roll number {}.",
            roll
        )));
    }

    let mut result = CmdResult::default();
    for student in &removed {
        result.add_message(CmdMessage::success(format!(
            "Student {} deleted successfully!",
            student.name
        )));
    }
    Ok(result.with_affected(removed))
}
