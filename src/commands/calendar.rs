use super::{CommandContext, CommandResult};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use juzeng_admin::components::calendar::{
    Calendar, CalendarHandle, DisplayEvent, DraftEvent, LessonDraft, MeetingDraft,
};
use juzeng_admin::error::{component_error, AppResult, Error};
use juzeng_admin::utils::time::{format_span, local_datetime, parse_time_range};

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// List every event visible to the current user
    List,
    /// Show one event in detail
    Show { id: i64 },
    /// Create a lesson
    AddLesson {
        /// Day of the lesson, YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Time range, e.g. 20:15-21:15
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        group: String,
        #[arg(long)]
        flow: String,
        /// Teacher account id
        #[arg(long)]
        teacher: Option<i64>,
        #[arg(long)]
        students: Option<u32>,
        #[arg(long, default_value = "")]
        link: String,
    },
    /// Create a meeting
    AddMeeting {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        name: String,
        /// Participant account id, repeatable
        #[arg(long = "participant")]
        participants: Vec<i64>,
        #[arg(long, default_value = "")]
        link: String,
    },
}

pub async fn run(ctx: &CommandContext<'_>, command: CalendarCommand) -> CommandResult {
    let handle = calendar_handle(ctx).await?;

    match command {
        CalendarCommand::List => list(&handle).await,
        CalendarCommand::Show { id } => show(&handle, id).await,
        CalendarCommand::AddLesson {
            date,
            time,
            group,
            flow,
            teacher,
            students,
            link,
        } => {
            let details = LessonDraft {
                group,
                flow_number: flow,
                teacher_id: teacher,
                student_count: students,
            };
            let draft = open_draft(ctx, &handle, date, time.as_deref()).await?;
            let draft = DraftEvent::lesson(draft.start, draft.end, details).with_link(link);
            submit(&handle, draft).await
        }
        CalendarCommand::AddMeeting {
            date,
            time,
            name,
            participants,
            link,
        } => {
            let details = MeetingDraft { name, participants };
            let draft = open_draft(ctx, &handle, date, time.as_deref()).await?;
            let draft = DraftEvent::meeting(draft.start, draft.end, details).with_link(link);
            submit(&handle, draft).await
        }
    }
}

async fn calendar_handle(ctx: &CommandContext<'_>) -> AppResult<CalendarHandle> {
    ctx.page::<Calendar>("calendar")?
        .get_handle()
        .await
        .ok_or_else(|| component_error("Calendar is not initialized"))
}

async fn list(handle: &CalendarHandle) -> CommandResult {
    handle.load().await?;
    let snapshot = handle.snapshot().await?;

    if snapshot.events.is_empty() {
        println!("{}", t!("calendar_empty"));
        return Ok(());
    }

    let mut events = snapshot.events;
    events.sort_by_key(|event| event.start);
    for event in &events {
        println!(
            "{:>6}  {}  [{}]  {}",
            event.id,
            format_span(&event.start, &event.end),
            event.color,
            event.title
        );
    }
    println!("{}", t!("calendar_count", count = events.len()));
    Ok(())
}

async fn show(handle: &CalendarHandle, id: i64) -> CommandResult {
    handle.load().await?;
    let event = handle.select_event_by_id(id).await?;
    print_detail(&event);
    handle.close_detail().await
}

fn print_detail(event: &DisplayEvent) {
    println!("{}", event.title);
    println!("{}", format_span(&event.start, &event.end));
    if let Some(teacher) = &event.teacher {
        println!("{}", t!("event_teacher", teacher = teacher));
    }
    if let Some(flow) = &event.flow_number {
        println!("{}", t!("event_flow", flow = flow));
    }
    if let Some(link) = event.link.as_deref().filter(|l| !l.is_empty()) {
        println!("{}", t!("event_link", link = link));
    }
}

/// Open a draft on the requested slot, or on the default slot when none is given
async fn open_draft(
    ctx: &CommandContext<'_>,
    handle: &CalendarHandle,
    date: Option<NaiveDate>,
    time: Option<&str>,
) -> AppResult<DraftEvent> {
    let Some(time) = time else {
        return handle.open_add_event().await;
    };

    let ((start_h, start_m), (end_h, end_m)) = parse_time_range(time)
        .ok_or_else(|| Error::EventSave(format!("Invalid time range: {}", time)))?;

    let tz = ctx.app.config.read().await.tz()?;
    let date = date.unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let start = local_datetime(date, (start_h, start_m), &tz)?;
    let end = local_datetime(date, (end_h, end_m), &tz)?;
    if end <= start {
        return Err(Error::EventSave(format!("Event must end after it starts: {}", time)));
    }

    handle.select_slot(start, end).await
}

async fn submit(handle: &CalendarHandle, draft: DraftEvent) -> CommandResult {
    handle.update_draft(draft.clone()).await?;
    handle.submit_draft(draft).await?;
    println!("{}", t!("event_saved"));
    Ok(())
}
