use super::{read_line, CommandContext, CommandResult};
use clap::Subcommand;
use juzeng_admin::api::NewStaffMember;
use juzeng_admin::components::Staff;
use juzeng_admin::session::Role;
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum StaffCommand {
    /// List staff accounts
    List,
    /// Create an account
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// teacher, curator or supervisor
        #[arg(long, default_value = "teacher")]
        role: String,
    },
    /// Delete an account
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(ctx: &CommandContext<'_>, command: StaffCommand) -> CommandResult {
    let staff = ctx.page::<Staff>("staff")?;

    match command {
        StaffCommand::List => {
            staff.load().await?;
            print_table(staff).await;
            Ok(())
        }
        StaffCommand::Add {
            first_name,
            last_name,
            email,
            role,
        } => {
            let role: Role = role.parse()?;
            staff
                .add(NewStaffMember::new(&first_name, &last_name, &email).with_role(role))
                .await?;
            println!("{}", t!("staff_added"));
            print_table(staff).await;
            Ok(())
        }
        StaffCommand::Delete { id, yes } => {
            if !yes && !confirm().await? {
                println!("{}", t!("staff_delete_cancelled"));
                return Ok(());
            }
            staff.delete(id).await?;
            println!("{}", t!("staff_deleted"));
            print_table(staff).await;
            Ok(())
        }
    }
}

async fn confirm() -> juzeng_admin::error::AppResult<bool> {
    print!("{}", t!("staff_delete_confirm"));
    std::io::stdout().flush()?;
    let answer = read_line().await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn print_table(staff: &Staff) {
    let members = staff.members().await;
    if members.is_empty() {
        println!("{}", t!("staff_empty"));
        return;
    }

    println!("{:>6}  {:<16} {:<16} {:<32} {}", "ID", "First name", "Last name", "Email", "Role");
    for member in &members {
        println!(
            "{:>6}  {:<16} {:<16} {:<32} {}",
            member.id,
            member.first_name_or_na(),
            member.last_name_or_na(),
            member.email.as_deref().unwrap_or("N/A"),
            member.role.as_deref().unwrap_or("N/A"),
        );
    }
}
