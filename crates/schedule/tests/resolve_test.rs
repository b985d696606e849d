//! End-to-end resolution scenarios over realistic semesters.

use chrono::{Duration, NaiveDate};

use kebiao_core::{Course, SemesterInfo, Timetable};
use kebiao_schedule::{resolve, ResolveWarning, SemesterPhase};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fall_2024() -> SemesterInfo {
    SemesterInfo::new("2024秋季学期", date(2024, 9, 2), Some(date(2025, 1, 10))).unwrap()
}

fn make_course(name: &str, day: &str, time: &str, weeks: &str) -> Course {
    Course {
        name: Some(name.to_string()),
        day: Some(day.to_string()),
        time: Some(time.to_string()),
        session: Some("1-2节".to_string()),
        location: Some("A101".to_string()),
        teacher: Some("王老师".to_string()),
        weeks: Some(weeks.to_string()),
    }
}

fn names(courses: &[Course]) -> Vec<&str> {
    courses.iter().map(|c| c.display_name()).collect()
}

#[test]
fn first_day_is_week_one_and_active() {
    let schedule = resolve(&fall_2024(), &[], date(2024, 9, 2));
    assert_eq!(schedule.week, 1);
    assert_eq!(schedule.day, "周一");
    assert_eq!(schedule.status(), "active");
    assert!(schedule.courses().is_empty());
}

#[test]
fn before_start_is_not_started_week_zero() {
    let courses = vec![make_course("高数", "周日", "08:00-09:40", "1-16")];
    for days_before in 1..30 {
        let today = date(2024, 9, 2) - Duration::days(days_before);
        let schedule = resolve(&fall_2024(), &courses, today);
        assert_eq!(schedule.week, 0);
        assert_eq!(schedule.phase, SemesterPhase::NotStarted);
        assert!(schedule.courses().is_empty());
        assert!(schedule.warnings.is_empty());
    }
}

#[test]
fn after_end_is_ended_with_week_computed() {
    let courses = vec![make_course("高数", "周六", "08:00-09:40", "1-30")];
    let schedule = resolve(&fall_2024(), &courses, date(2025, 1, 11));
    assert_eq!(schedule.phase, SemesterPhase::Ended);
    assert!(schedule.courses().is_empty());
    assert_eq!(schedule.week, 19);
}

#[test]
fn end_date_itself_is_active() {
    let schedule = resolve(&fall_2024(), &[], date(2025, 1, 10));
    assert_eq!(schedule.status(), "active");
}

#[test]
fn open_ended_semester_never_ends() {
    let semester = SemesterInfo::new("s", date(2024, 9, 2), None).unwrap();
    let schedule = resolve(&semester, &[], date(2030, 1, 1));
    assert_eq!(schedule.status(), "active");
}

#[test]
fn monday_course_week_five_included_week_nine_excluded() {
    let courses = vec![make_course("线性代数", "周一", "08:00-09:40", "1-8周")];

    // 2024-09-30 is the Monday of week 5.
    let week5 = resolve(&fall_2024(), &courses, date(2024, 9, 30));
    assert_eq!(week5.week, 5);
    assert_eq!(names(week5.courses()), vec!["线性代数"]);

    // 2024-10-28 is the Monday of week 9.
    let week9 = resolve(&fall_2024(), &courses, date(2024, 10, 28));
    assert_eq!(week9.week, 9);
    assert!(week9.courses().is_empty());
}

#[test]
fn huge_week_range_does_not_block_other_courses() {
    let courses = vec![
        make_course("选修课", "周一", "10:00-11:40", "1-4000000000"),
        make_course("线性代数", "周一", "08:00-09:40", "1-8周"),
    ];
    let start = std::time::Instant::now();
    let schedule = resolve(&fall_2024(), &courses, date(2024, 9, 30));
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
    assert_eq!(names(schedule.courses()), vec!["线性代数", "选修课"]);
    assert!(schedule.warnings.is_empty());
}

#[test]
fn other_days_never_included() {
    let courses = vec![make_course("英语", "周二", "10:00-11:40", "1-20")];
    // Every Monday of the semester.
    for k in 0..18 {
        let monday = date(2024, 9, 2) + Duration::weeks(k);
        assert!(resolve(&fall_2024(), &courses, monday).courses().is_empty());
    }
}

#[test]
fn ordered_by_start_time() {
    let courses = vec![
        make_course("下午课", "周一", "14:00-15:40", "1-16"),
        make_course("上午课", "周一", "08:00-09:40", "1-16"),
        make_course("晚课", "周一", "19:00-20:40", "1-16"),
    ];
    let schedule = resolve(&fall_2024(), &courses, date(2024, 9, 9));
    assert_eq!(names(schedule.courses()), vec!["上午课", "下午课", "晚课"]);
}

#[test]
fn unparseable_time_sorts_after_parseable() {
    let mut no_time = make_course("无时间", "周一", "", "1-16");
    no_time.time = None;
    let courses = vec![
        make_course("待定", "周一", "TBD", "1-16"),
        no_time,
        make_course("最晚", "周一", "23:59-23:59", "1-16"),
        make_course("早课", "周一", "08:00-09:40", "1-16"),
    ];
    let schedule = resolve(&fall_2024(), &courses, date(2024, 9, 9));
    assert_eq!(
        names(schedule.courses()),
        vec!["早课", "最晚", "待定", "无时间"]
    );

    let time_warnings: Vec<_> = schedule
        .warnings
        .iter()
        .filter(|w| matches!(w, ResolveWarning::MalformedTime { .. }))
        .collect();
    assert_eq!(time_warnings.len(), 2);
}

#[test]
fn malformed_recurrence_excludes_only_that_course() {
    let courses = vec![
        make_course("坏数据", "周一", "08:00-09:40", "abc"),
        make_course("空周数", "周一", "09:00-09:40", ""),
        make_course("正常", "周一", "10:00-11:40", "1-16"),
        make_course("部分坏", "周一", "13:00-14:40", "x,2"),
    ];
    let schedule = resolve(&fall_2024(), &courses, date(2024, 9, 9));
    assert_eq!(names(schedule.courses()), vec!["正常", "部分坏"]);

    assert!(schedule.warnings.contains(&ResolveWarning::MalformedRecurrence {
        course: "坏数据".into(),
        weeks: "abc".into(),
        token: "abc".into(),
    }));
    assert!(schedule.warnings.contains(&ResolveWarning::EmptyRecurrence {
        course: "空周数".into(),
    }));
    assert!(schedule.warnings.contains(&ResolveWarning::MalformedRecurrence {
        course: "部分坏".into(),
        weeks: "x,2".into(),
        token: "x".into(),
    }));
}

#[test]
fn unknown_day_is_reported_and_excluded() {
    let courses = vec![make_course("星期一课", "Monday", "08:00-09:40", "1-16")];
    let schedule = resolve(&fall_2024(), &courses, date(2024, 9, 9));
    assert!(schedule.courses().is_empty());
    assert_eq!(
        schedule.warnings,
        vec![ResolveWarning::UnknownDay {
            course: "星期一课".into(),
            day: Some("Monday".into()),
        }]
    );
}

#[test]
fn resolves_parsed_timetable() {
    let json = r#"{
        "semester_info": { "name": "2025春季学期", "start_date": "2025-02-17", "end_date": "2025-06-27" },
        "courses": [
            { "name": "操作系统", "day": "周三", "time": "14:00-15:40", "session": "5-6节",
              "location": "B201", "teacher": "李老师", "weeks": "1-8周,10周" },
            { "name": "编译原理", "day": "周三", "time": "08:00-09:40", "weeks": "2-16(周)" },
            { "name": "体育", "day": "周四", "time": "10:00-11:40", "weeks": "1-16周" }
        ]
    }"#;
    let tt = Timetable::from_json_str(json).unwrap();

    // 2025-04-23 is the Wednesday of week 10.
    let schedule = resolve(&tt.semester, &tt.courses, date(2025, 4, 23));
    assert_eq!(schedule.week, 10);
    assert_eq!(names(schedule.courses()), vec!["编译原理", "操作系统"]);

    // Week 9 Wednesday: 操作系统 skips week 9.
    let schedule = resolve(&tt.semester, &tt.courses, date(2025, 4, 16));
    assert_eq!(names(schedule.courses()), vec!["编译原理"]);
}

#[test]
fn serializes_status_and_courses() {
    let courses = vec![make_course("高数", "周一", "08:00-09:40", "1-16")];

    let active = resolve(&fall_2024(), &courses, date(2024, 9, 9));
    let json = serde_json::to_value(&active).unwrap();
    assert_eq!(json["status"], "active");
    assert_eq!(json["date"], "2024-09-09");
    assert_eq!(json["day"], "周一");
    assert_eq!(json["week"], 2);
    assert_eq!(json["courses"][0]["name"], "高数");
    assert!(json.get("warnings").is_none());

    let ended = resolve(&fall_2024(), &courses, date(2025, 3, 1));
    let json = serde_json::to_value(&ended).unwrap();
    assert_eq!(json["status"], "ended");
    assert!(json.get("courses").is_none());
}
