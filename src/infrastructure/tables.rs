// CSV tables: nurses, coverage and preferences in, schedule out

use crate::application::{Scenario, Schedule};
use crate::domain::{
    entities::{CoverageRequirement, Nurse, Preference, ScheduleRow},
    roster::RosterInput,
    value_objects::{Day, PreferenceType, Shift},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const NURSES_FILE: &str = "nurses.csv";
pub const COVERAGE_FILE: &str = "coverage.csv";
pub const PREFERENCES_FILE: &str = "preferences.csv";

const NURSES_HEADER: [&str; 5] = ["nurse_id", "name", "skill_level", "contract", "absence_prob"];
const COVERAGE_HEADER: [&str; 5] = [
    "day",
    "shift",
    "required_total",
    "required_senior",
    "required_icu",
];
const PREFERENCES_HEADER: [&str; 5] = ["nurse_id", "day", "shift", "preference_type", "weight"];
const SCHEDULE_HEADER: [&str; 6] = ["nurse_id", "name", "day", "shift", "assigned", "skill_level"];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed {table} table: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },

    #[error("malformed {table} table, line {line}: {message}")]
    Invalid {
        table: &'static str,
        line: usize,
        message: String,
    },
}

/// Preference row before its type is checked; unknown types are skipped.
#[derive(Debug, Deserialize)]
struct PreferenceRecord {
    nurse_id: u32,
    day: Day,
    shift: Shift,
    preference_type: String,
    weight: u32,
}

fn read_table<T: DeserializeOwned, R: Read>(
    table: &'static str,
    reader: R,
) -> Result<Vec<T>, TableError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| TableError::Csv { table, source })
}

fn write_table<T: Serialize, W: Write>(
    table: &'static str,
    header: &[&str],
    writer: W,
    rows: &[T],
) -> Result<(), TableError> {
    let to_error = |source| TableError::Csv { table, source };
    let mut wtr = csv::Writer::from_writer(writer);
    // serialize() only emits the header alongside the first row
    if rows.is_empty() {
        wtr.write_record(header).map_err(to_error)?;
    }
    for row in rows {
        wtr.serialize(row).map_err(to_error)?;
    }
    wtr.flush().map_err(|e| to_error(e.into()))
}

pub fn read_nurses<R: Read>(reader: R) -> Result<Vec<Nurse>, TableError> {
    read_table("nurses", reader)
}

pub fn read_coverage<R: Read>(reader: R) -> Result<Vec<CoverageRequirement>, TableError> {
    read_table("coverage", reader)
}

/// `preference_type` is matched case-insensitively; rows with any other value are dropped.
pub fn read_preferences<R: Read>(reader: R) -> Result<Vec<Preference>, TableError> {
    let records: Vec<PreferenceRecord> = read_table("preferences", reader)?;
    Ok(records
        .into_iter()
        .filter_map(|r| match r.preference_type.parse::<PreferenceType>() {
            Ok(preference_type) => Some(Preference {
                nurse_id: r.nurse_id,
                day: r.day,
                shift: r.shift,
                preference_type,
                weight: r.weight,
            }),
            Err(reason) => {
                tracing::warn!(nurse_id = r.nurse_id, %reason, "skipping preference row");
                None
            }
        })
        .collect())
}

/// `assigned` must be 0 or 1.
pub fn read_schedule<R: Read>(reader: R) -> Result<Schedule, TableError> {
    let rows: Vec<ScheduleRow> = read_table("schedule", reader)?;
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.assigned > 1) {
        return Err(TableError::Invalid {
            table: "schedule",
            line: i + 2,
            message: format!(
                "assigned must be 0 or 1, got {} for nurse {} on {}/{}",
                row.assigned, row.nurse_id, row.day, row.shift
            ),
        });
    }
    Ok(Schedule::from_rows(rows))
}

pub fn write_nurses<W: Write>(writer: W, nurses: &[Nurse]) -> Result<(), TableError> {
    write_table("nurses", &NURSES_HEADER, writer, nurses)
}

pub fn write_coverage<W: Write>(
    writer: W,
    coverage: &[CoverageRequirement],
) -> Result<(), TableError> {
    write_table("coverage", &COVERAGE_HEADER, writer, coverage)
}

pub fn write_preferences<W: Write>(
    writer: W,
    preferences: &[Preference],
) -> Result<(), TableError> {
    write_table("preferences", &PREFERENCES_HEADER, writer, preferences)
}

pub fn write_schedule<W: Write>(writer: W, schedule: &Schedule) -> Result<(), TableError> {
    write_table("schedule", &SCHEDULE_HEADER, writer, schedule.rows())
}

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File, TableError> {
    File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the three input tables from `dir`.
pub fn load_input(dir: &Path) -> Result<RosterInput, TableError> {
    let nurses = read_nurses(open(&dir.join(NURSES_FILE))?)?;
    let coverage = read_coverage(open(&dir.join(COVERAGE_FILE))?)?;
    let preferences = read_preferences(open(&dir.join(PREFERENCES_FILE))?)?;

    tracing::debug!(
        dir = %dir.display(),
        nurses = nurses.len(),
        coverage = coverage.len(),
        preferences = preferences.len(),
        "input tables loaded"
    );

    Ok(RosterInput::new(nurses, coverage, preferences))
}

/// Write the three input tables into `dir`, creating it if needed.
pub fn save_scenario(dir: &Path, scenario: &Scenario) -> Result<(), TableError> {
    fs::create_dir_all(dir).map_err(|source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    write_nurses(create(&dir.join(NURSES_FILE))?, &scenario.nurses)?;
    write_coverage(create(&dir.join(COVERAGE_FILE))?, &scenario.coverage)?;
    write_preferences(create(&dir.join(PREFERENCES_FILE))?, &scenario.preferences)
}

pub fn load_schedule(path: &Path) -> Result<Schedule, TableError> {
    read_schedule(open(path)?)
}

pub fn save_schedule(path: &Path, schedule: &Schedule) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TableError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write_schedule(create(path)?, schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Contract, SkillLevel};

    #[test]
    fn test_read_nurses() {
        let data = "nurse_id,name,skill_level,contract,absence_prob\n\
                    0,Nurse_1,senior,full_time,0.021\n\
                    1, Nurse_2 ,icu,part_time,0.015\n";
        let nurses = read_nurses(data.as_bytes()).unwrap();
        assert_eq!(nurses.len(), 2);
        assert_eq!(nurses[0].skill_level, SkillLevel::Senior);
        assert_eq!(nurses[1].name, "Nurse_2");
        assert_eq!(nurses[1].contract, Contract::PartTime);
        assert_eq!(nurses[1].absence_prob, 0.015);
    }

    #[test]
    fn test_malformed_row_names_table() {
        let data = "nurse_id,name,skill_level,contract,absence_prob\n\
                    x,Nurse_1,wizard,full_time,0.1\n";
        let err = read_nurses(data.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Csv { table: "nurses", .. }));
    }

    #[test]
    fn test_read_coverage() {
        let data = "day,shift,required_total,required_senior,required_icu\n\
                    Sat,M,6,1,1\n\
                    Sat,N,3,1,1\n";
        let coverage = read_coverage(data.as_bytes()).unwrap();
        assert_eq!(
            coverage[1],
            CoverageRequirement::new(Day::Sat, Shift::Night, 3)
                .with_senior(1)
                .with_icu(1)
        );
    }

    #[test]
    fn test_preference_type_is_case_insensitive_and_unknown_rows_skip() {
        let data = "nurse_id,day,shift,preference_type,weight\n\
                    3,Mon,A,WANT,2\n\
                    3,Tue,N,Avoid,4\n\
                    4,Wed,M,prefer,1\n";
        let prefs = read_preferences(data.as_bytes()).unwrap();
        assert_eq!(
            prefs,
            vec![
                Preference::want(3, Day::Mon, Shift::Afternoon, 2),
                Preference::avoid(3, Day::Tue, Shift::Night, 4),
            ]
        );
    }

    #[test]
    fn test_schedule_table_layout() {
        let schedule = Schedule::from_rows(vec![ScheduleRow {
            nurse_id: 7,
            name: "Nurse_8".to_string(),
            day: Day::Fri,
            shift: Shift::Afternoon,
            assigned: 1,
            skill_level: SkillLevel::Icu,
        }]);

        let mut out = Vec::new();
        write_schedule(&mut out, &schedule).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "nurse_id,name,day,shift,assigned,skill_level\n7,Nurse_8,Fri,A,1,icu\n"
        );
    }

    #[test]
    fn test_assigned_outside_zero_one_is_rejected() {
        let data = "nurse_id,name,day,shift,assigned,skill_level\n\
                    0,Nurse_1,Mon,M,1,senior\n\
                    1,Nurse_2,Mon,M,2,junior\n";
        match read_schedule(data.as_bytes()).unwrap_err() {
            TableError::Invalid { table, line, message } => {
                assert_eq!(table, "schedule");
                assert_eq!(line, 3);
                assert!(message.contains("got 2"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut out = Vec::new();
        write_preferences(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nurse_id,day,shift,preference_type,weight\n"
        );
        assert!(read_preferences(&b"nurse_id,day,shift,preference_type,weight\n"[..])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = load_input(Path::new("/nonexistent/roster-data")).unwrap_err();
        match err {
            TableError::Io { path, .. } => assert!(path.ends_with(NURSES_FILE)),
            other => panic!("unexpected error: {}", other),
        }
    }
}
