use super::{CommandContext, CommandResult};
use clap::{Args, Subcommand};
use juzeng_admin::api::ParsedLesson;
use juzeng_admin::components::LessonLinks;
use juzeng_admin::error::{component_error, AppResult, Error};
use std::io::Read;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LessonText {
    /// File with the pasted schedule, stdin when omitted
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum LessonsCommand {
    /// Validate the schedule text
    Check(LessonText),
    /// Validate the text, then create the lessons in every calendar
    Add(LessonText),
}

pub async fn run(ctx: &CommandContext<'_>, command: LessonsCommand) -> CommandResult {
    let page = ctx.page::<LessonLinks>("lessons")?;

    match command {
        LessonsCommand::Check(input) => {
            let text = read_text(&input).await?;
            let lessons = report(page.check(&text).await)?;
            print_lessons(&lessons);
            println!("{}", t!("lessons_all_good", count = lessons.len()));
            Ok(())
        }
        LessonsCommand::Add(input) => {
            let text = read_text(&input).await?;
            report(page.check(&text).await)?;
            let lessons = report(page.add_to_calendars().await)?;
            print_lessons(&lessons);
            println!("{}", t!("lessons_added", count = lessons.len()));
            Ok(())
        }
    }
}

/// Print parser complaints the way the page shows them
fn report(result: AppResult<Vec<ParsedLesson>>) -> AppResult<Vec<ParsedLesson>> {
    if let Err(Error::LessonParsing(message)) = &result {
        eprintln!("{}", t!("lessons_error", message = message));
    }
    result
}

async fn read_text(input: &LessonText) -> AppResult<String> {
    match &input.file {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => tokio::task::spawn_blocking(|| {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).map(|_| text)
        })
        .await
        .map_err(|e| component_error(&format!("Failed to read input: {}", e)))?
        .map_err(Into::into),
    }
}

fn print_lessons(lessons: &[ParsedLesson]) {
    for lesson in lessons {
        println!(
            "{:<24} {:<12} {:<8} {} - {}  {}",
            lesson.teacher_name(),
            lesson.group.as_deref().unwrap_or("N/A"),
            lesson.flow_number.as_deref().unwrap_or("N/A"),
            lesson.start_time.as_deref().unwrap_or("N/A"),
            lesson.end_time.as_deref().unwrap_or("N/A"),
            lesson.event_link.as_deref().unwrap_or(""),
        );
    }
}
