use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::model::{attendance::AttendanceRecord, schedule::Shift, schedule::WorkSchedule};
use crate::payroll::{PayrollError, month_bounds};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    /// Nothing scheduled for the day.
    Rest,
    Absent,
    /// Absent with a reason or justification document on file.
    JustifiedAbsence,
    MissingCheckOut,
    Present,
    /// Shift still running today, or the record is inconsistent.
    Unknown,
}

/// Data-entry problem isolated to a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAnomaly {
    #[strum(serialize = "check-out is earlier than check-in")]
    CheckOutBeforeCheckIn,
    #[strum(serialize = "check-out recorded without a check-in")]
    CheckOutWithoutCheckIn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReconciledEntry {
    #[schema(example = "2026-07-14", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(nullable = true)]
    pub scheduled_shift: Option<Shift>,

    #[schema(nullable = true)]
    pub attendance_record: Option<AttendanceRecord>,

    pub status: AttendanceStatus,

    #[schema(nullable = true)]
    pub anomaly: Option<AttendanceAnomaly>,
}

impl ReconciledEntry {
    /// The anomaly on this date as a validation error, for callers that
    /// surface it to whoever corrects the source record.
    pub fn validation_error(&self) -> Option<PayrollError> {
        self.anomaly.map(|anomaly| {
            PayrollError::validation(format!("attendance on {}", self.date), anomaly.to_string())
        })
    }
}

/// Attendance records found for a single date.
///
/// More than one record per day is a data-entry anomaly that has to be
/// tolerated; `pick_latest` reduces it to the authoritative one.
#[derive(Debug, Default)]
enum DayRecords {
    #[default]
    Empty,
    Single(AttendanceRecord),
    Duplicated(Vec<AttendanceRecord>),
}

impl DayRecords {
    fn push(&mut self, record: AttendanceRecord) {
        *self = match std::mem::take(self) {
            DayRecords::Empty => DayRecords::Single(record),
            DayRecords::Single(first) => DayRecords::Duplicated(vec![first, record]),
            DayRecords::Duplicated(mut all) => {
                all.push(record);
                DayRecords::Duplicated(all)
            }
        };
    }

    /// Latest check-in wins; equal check-ins fall back to the most recently
    /// recorded (highest id).
    fn pick_latest(self, date: NaiveDate) -> Option<AttendanceRecord> {
        match self {
            DayRecords::Empty => None,
            DayRecords::Single(record) => Some(record),
            DayRecords::Duplicated(all) => {
                warn!(
                    %date,
                    count = all.len(),
                    ids = ?all.iter().map(|r| r.id).collect::<Vec<_>>(),
                    "Duplicate attendance records for one day, keeping the latest"
                );
                all.into_iter().max_by_key(|r| (r.check_in, r.id))
            }
        }
    }
}

#[derive(Debug, Default)]
struct Day {
    shifts: Vec<Shift>,
    records: DayRecords,
}

/// Merges the month's scheduled shifts with the recorded attendance and
/// classifies every date that has either.
///
/// `today` decides whether an open check-in is still running or was never
/// closed. Records and shifts outside the month, or belonging to another
/// employee, are skipped.
pub fn reconcile(
    employee_id: u64,
    month: u32,
    year: i32,
    schedule: Option<&WorkSchedule>,
    records: &[AttendanceRecord],
    today: NaiveDate,
) -> Result<Vec<ReconciledEntry>, PayrollError> {
    let (first, last) = month_bounds(month, year)?;
    let in_month = |date: NaiveDate| date >= first && date <= last;

    let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();

    if let Some(schedule) = schedule {
        if schedule.employee_id != employee_id || schedule.month != month || schedule.year != year {
            return Err(PayrollError::validation(
                "schedule",
                format!(
                    "schedule {} belongs to employee {} for {}/{}",
                    schedule.id, schedule.employee_id, schedule.month, schedule.year
                ),
            ));
        }

        for shift in &schedule.shifts {
            if !in_month(shift.date) {
                warn!(shift_id = shift.id, date = %shift.date, "Shift outside its schedule month");
                continue;
            }
            days.entry(shift.date).or_default().shifts.push(shift.clone());
        }
    }

    for record in records {
        if record.employee_id != employee_id || !in_month(record.date) {
            debug!(record_id = record.id, "Ignoring attendance record outside the requested period");
            continue;
        }
        days.entry(record.date).or_default().records.push(record.clone());
    }

    let entries = days
        .into_iter()
        .map(|(date, day)| {
            let scheduled_shift = earliest_shift(day.shifts);
            let attendance_record = day.records.pick_latest(date);
            let (status, anomaly) =
                classify(date, scheduled_shift.as_ref(), attendance_record.as_ref(), today);

            if let Some(anomaly) = anomaly {
                warn!(employee_id, %date, %anomaly, "Attendance anomaly, day flagged unknown");
            }

            ReconciledEntry {
                date,
                scheduled_shift,
                attendance_record,
                status,
                anomaly,
            }
        })
        .collect();

    Ok(entries)
}

fn earliest_shift(mut shifts: Vec<Shift>) -> Option<Shift> {
    if shifts.len() > 1 {
        debug!(count = shifts.len(), "Several shifts on one day");
    }
    shifts.sort_by_key(|s| (s.start_time, s.id));
    shifts.into_iter().next()
}

fn classify(
    date: NaiveDate,
    shift: Option<&Shift>,
    record: Option<&AttendanceRecord>,
    today: NaiveDate,
) -> (AttendanceStatus, Option<AttendanceAnomaly>) {
    if shift.is_none() {
        return (AttendanceStatus::Rest, None);
    }

    let Some(record) = record else {
        return (AttendanceStatus::Absent, None);
    };

    match (record.check_in, record.check_out) {
        (None, Some(_)) => (
            AttendanceStatus::Unknown,
            Some(AttendanceAnomaly::CheckOutWithoutCheckIn),
        ),
        (None, None) if record.is_justified() => (AttendanceStatus::JustifiedAbsence, None),
        (None, None) => (AttendanceStatus::Absent, None),
        (Some(_), None) if date < today => (AttendanceStatus::MissingCheckOut, None),
        (Some(_), None) => (AttendanceStatus::Unknown, None),
        (Some(check_in), Some(check_out)) if check_out < check_in => (
            AttendanceStatus::Unknown,
            Some(AttendanceAnomaly::CheckOutBeforeCheckIn),
        ),
        (Some(_), Some(_)) => (AttendanceStatus::Present, None),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveTime;

    pub(crate) fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    pub(crate) fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    pub(crate) fn shift(id: u64, d: u32, start: (u32, u32), end: (u32, u32)) -> Shift {
        Shift {
            id,
            schedule_id: 1,
            date: day(d),
            start_time: time(start.0, start.1),
            end_time: time(end.0, end.1),
            facility_id: 2,
        }
    }

    pub(crate) fn schedule(shifts: Vec<Shift>) -> WorkSchedule {
        WorkSchedule {
            id: 1,
            employee_id: 7,
            month: 7,
            year: 2026,
            shifts,
        }
    }

    pub(crate) fn record(
        id: u64,
        d: u32,
        check_in: Option<(u32, u32)>,
        check_out: Option<(u32, u32)>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: 7,
            facility_id: 2,
            date: day(d),
            check_in: check_in.map(|(h, m)| time(h, m)),
            check_out: check_out.map(|(h, m)| time(h, m)),
            check_in_note: None,
            check_out_note: None,
            absence_reason: None,
            justification: None,
        }
    }

    fn status_on(entries: &[ReconciledEntry], d: u32) -> AttendanceStatus {
        entries
            .iter()
            .find(|e| e.date == day(d))
            .map(|e| e.status)
            .expect("entry for date")
    }

    #[test]
    fn classifies_each_kind_of_day() {
        let sched = schedule(vec![
            shift(1, 1, (10, 0), (18, 0)),
            shift(2, 2, (10, 0), (18, 0)),
            shift(3, 3, (10, 0), (18, 0)),
            shift(4, 4, (10, 0), (18, 0)),
        ]);
        let mut justified = record(13, 3, None, None);
        justified.absence_reason = Some("Medical appointment".into());
        let records = vec![
            record(11, 1, Some((10, 0)), Some((18, 0))),
            record(12, 2, Some((10, 0)), None),
            justified,
            record(15, 5, Some((9, 0)), Some((12, 0))),
        ];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(20)).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(status_on(&entries, 1), AttendanceStatus::Present);
        assert_eq!(status_on(&entries, 2), AttendanceStatus::MissingCheckOut);
        assert_eq!(status_on(&entries, 3), AttendanceStatus::JustifiedAbsence);
        assert_eq!(status_on(&entries, 4), AttendanceStatus::Absent);
        assert_eq!(status_on(&entries, 5), AttendanceStatus::Rest);
    }

    #[test]
    fn scheduled_day_without_record_is_absent() {
        let sched = schedule(vec![shift(1, 10, (10, 0), (18, 0))]);

        for today in [day(1), day(10), day(31)] {
            let entries = reconcile(7, 7, 2026, Some(&sched), &[], today).unwrap();
            assert_eq!(entries[0].status, AttendanceStatus::Absent);
            assert!(entries[0].attendance_record.is_none());
        }
    }

    #[test]
    fn unscheduled_day_is_rest_whatever_the_record_says() {
        let records = vec![
            record(1, 6, Some((10, 0)), None),
            record(2, 7, None, None),
            record(3, 8, Some((18, 0)), Some((10, 0))),
        ];

        let entries = reconcile(7, 7, 2026, None, &records, day(20)).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.status == AttendanceStatus::Rest));
    }

    #[test]
    fn open_check_in_today_is_unknown() {
        let sched = schedule(vec![shift(1, 14, (10, 0), (18, 0))]);
        let records = vec![record(1, 14, Some((10, 2)), None)];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(14)).unwrap();

        assert_eq!(entries[0].status, AttendanceStatus::Unknown);
        assert!(entries[0].anomaly.is_none());
    }

    #[test]
    fn check_out_before_check_in_is_isolated_to_its_date() {
        let sched = schedule(vec![
            shift(1, 1, (10, 0), (18, 0)),
            shift(2, 2, (10, 0), (18, 0)),
        ]);
        let records = vec![
            record(1, 1, Some((18, 0)), Some((10, 0))),
            record(2, 2, Some((10, 0)), Some((18, 0))),
        ];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(20)).unwrap();

        assert_eq!(entries[0].status, AttendanceStatus::Unknown);
        assert_eq!(
            entries[0].anomaly,
            Some(AttendanceAnomaly::CheckOutBeforeCheckIn)
        );
        assert!(matches!(
            entries[0].validation_error(),
            Some(PayrollError::Validation { .. })
        ));
        assert_eq!(entries[1].status, AttendanceStatus::Present);
    }

    #[test]
    fn check_out_without_check_in_is_unknown() {
        let sched = schedule(vec![shift(1, 3, (10, 0), (18, 0))]);
        let records = vec![record(1, 3, None, Some((18, 0)))];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(20)).unwrap();

        assert_eq!(entries[0].status, AttendanceStatus::Unknown);
        assert_eq!(
            entries[0].anomaly,
            Some(AttendanceAnomaly::CheckOutWithoutCheckIn)
        );
    }

    #[test]
    fn duplicate_records_keep_latest_check_in() {
        let sched = schedule(vec![shift(1, 9, (10, 0), (18, 0))]);
        let records = vec![
            record(40, 9, Some((10, 0)), Some((18, 0))),
            record(41, 9, Some((9, 0)), Some((12, 0))),
            record(39, 9, Some((10, 0)), Some((17, 0))),
        ];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(20)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].attendance_record.as_ref().unwrap().id, 40);
    }

    #[test]
    fn duplicate_records_prefer_any_check_in_over_none() {
        let sched = schedule(vec![shift(1, 9, (10, 0), (18, 0))]);
        let records = vec![
            record(50, 9, Some((10, 0)), Some((18, 0))),
            record(51, 9, None, None),
        ];

        let entries = reconcile(7, 7, 2026, Some(&sched), &records, day(20)).unwrap();

        assert_eq!(entries[0].attendance_record.as_ref().unwrap().id, 50);
        assert_eq!(entries[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn ignores_data_outside_the_month_and_other_employees() {
        let mut stray_shift = shift(9, 1, (10, 0), (18, 0));
        stray_shift.date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let sched = schedule(vec![shift(1, 1, (10, 0), (18, 0)), stray_shift]);

        let mut other_employee = record(2, 1, Some((10, 0)), Some((18, 0)));
        other_employee.employee_id = 8;
        let mut last_month = record(3, 30, Some((10, 0)), Some((18, 0)));
        last_month.date = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();

        let entries =
            reconcile(7, 7, 2026, Some(&sched), &[other_employee, last_month], day(20)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn several_shifts_on_one_day_report_the_earliest() {
        let sched = schedule(vec![
            shift(2, 4, (15, 0), (19, 0)),
            shift(1, 4, (8, 0), (12, 0)),
        ]);

        let entries = reconcile(7, 7, 2026, Some(&sched), &[], day(20)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].scheduled_shift.as_ref().unwrap().id, 1);
    }

    #[test]
    fn rejects_a_schedule_for_another_month() {
        let mut sched = schedule(vec![]);
        sched.month = 6;

        assert!(matches!(
            reconcile(7, 7, 2026, Some(&sched), &[], day(20)),
            Err(PayrollError::Validation { .. })
        ));
    }

    #[test]
    fn status_names_are_snake_case() {
        assert_eq!(AttendanceStatus::MissingCheckOut.to_string(), "missing_check_out");
        assert_eq!(
            "justified_absence".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::JustifiedAbsence
        );
    }
}
