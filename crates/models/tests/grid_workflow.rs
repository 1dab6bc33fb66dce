use models::{
    availability::{AvailabilityIndex, course_options},
    selector::{SelectorStep, SelectorWorkflow},
    subject::{SubjectCatalog, SubjectDetail, Teacher, parse_teacher_field},
    timetable::{FullTimetable, GridError, PeriodAssignment, TimetableStructure},
};

fn catalog() -> SubjectCatalog {
    let mut catalog = SubjectCatalog::new();
    catalog.insert(
        "CS101",
        SubjectDetail {
            display_name: "Programming".to_string(),
            teachers: parse_teacher_field("Alice+Bob"),
            candidate_rooms: vec!["Lab 1".to_string(), "Lab 2".to_string()],
            display_color: Some("#10b981".to_string()),
        },
    );
    catalog.insert(
        "MA101",
        SubjectDetail {
            display_name: "Calculus".to_string(),
            teachers: parse_teacher_field("Carol"),
            candidate_rooms: vec!["R101".to_string()],
            display_color: None,
        },
    );
    catalog
}

fn directory() -> Vec<Teacher> {
    ["Alice", "Bob", "Carol"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Teacher {
            id: idx.to_string(),
            name: name.to_string(),
            department: Some("CSE".to_string()),
            email: None,
        })
        .collect()
}

#[test]
fn selector_submission_lands_in_grid() {
    let catalog = catalog();
    let index = AvailabilityIndex::build(&catalog);
    let structure = TimetableStructure::default();
    let full = FullTimetable::new();

    let options = course_options(&catalog);
    assert_eq!(options[0].code, "CS101");

    let mut workflow = SelectorWorkflow::new();
    workflow.select_course(&options[0].code).unwrap();
    workflow.advance().unwrap();

    let available = index.teachers_for("CS101", &directory());
    assert_eq!(available.len(), 2);
    for teacher in &available {
        workflow.toggle_teacher(&teacher.name).unwrap();
    }
    assert_eq!(workflow.advance(), Ok(SelectorStep::EnterRoom));
    assert!(workflow.suggest_room(&catalog));

    let selection = workflow.submit().unwrap();
    assert_eq!(selection.room, "Lab 1");
    assert_eq!(workflow.step(), SelectorStep::SelectCourse);

    let assignment = PeriodAssignment::new(&selection.teachers, &selection.course, &selection.room);
    let before = full.section_or_empty(0, 1).clone();
    let grid = structure
        .set_cell(0, &before, 2, 3, Some(assignment.clone()))
        .unwrap();
    let updated = full.with_section(0, 1, grid);

    assert!(full.is_empty());
    assert!(before.is_empty());
    assert_eq!(updated.section(0, 1).unwrap().cell(2, 3), Some(&assignment));
    assert_eq!(catalog.color_for(&assignment.subject_code), "#10b981");
}

#[test]
fn break_periods_are_never_written() {
    let structure = TimetableStructure::default();
    let full = FullTimetable::new();
    let assignment = PeriodAssignment::new(["Carol"], "MA101", "R101");

    for semester in 0..structure.semester_count() {
        let layout = structure.semester(semester).unwrap();
        for period in 0..layout.period_count {
            let result = structure.set_cell(
                semester,
                full.section_or_empty(semester, 0),
                0,
                period,
                Some(assignment.clone()),
            );

            if structure.is_break(semester, period) {
                assert_eq!(result, Err(GridError::BreakPeriod { semester, period }));
            } else {
                assert!(structure.violations(semester, &result.unwrap()).is_empty());
            }
        }
    }
}
