use client::{
    config::ClientConfig,
    editor::{CellView, TimetableEditor},
    http::HttpScheduleApi,
    session::Session,
};
use log::error;
use models::timetable::TimetableStructure;
use std::{env, process::ExitCode};

const USAGE: &str = "Usage: timetable <semester> <section>";
const TOKEN_VAR: &str = "TIMETABLE_TOKEN";

/// Reads a 1-based command line number as a 0-based index
fn parse_index(arg: Option<String>) -> Option<usize> {
    arg?.parse::<usize>().ok()?.checked_sub(1)
}

fn render_cell(view: CellView<'_>) -> String {
    match view {
        CellView::Break => "BREAK".to_string(),
        CellView::Empty => "-".to_string(),
        CellView::Assigned { assignment, .. } => format!(
            "{} ({}) @ {}",
            assignment.subject_code,
            assignment.teachers.join(", "),
            assignment.room
        ),
    }
}

/// Prints one section of the stored college timetable
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(semester), Some(section)) = (parse_index(args.next()), parse_index(args.next())) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let session = env::var(TOKEN_VAR)
        .map(Session::with_token)
        .unwrap_or_default();

    let api = match HttpScheduleApi::new(config, session) {
        Ok(api) => api,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut editor = TimetableEditor::new(api, TimetableStructure::default());
    if let Err(e) = editor.select(semester, section) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = editor.load().await {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let structure = editor.structure();
    let Some(layout) = structure.semester(semester) else {
        return ExitCode::FAILURE;
    };

    println!("Semester {} section {}", semester + 1, section + 1);
    println!("Period\t{}", structure.day_names(semester).join("\t"));
    for period in 0..layout.period_count {
        let row = (0..layout.day_count)
            .map(|day| render_cell(editor.cell_view(day, period)))
            .collect::<Vec<_>>();
        println!("{}\t{}", period + 1, row.join("\t"));
    }

    ExitCode::SUCCESS
}
