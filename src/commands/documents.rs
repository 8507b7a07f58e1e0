use super::{CommandContext, CommandResult};
use clap::Subcommand;
use juzeng_admin::components::Documents;

#[derive(Subcommand, Debug)]
pub enum DocumentsCommand {
    /// List the shared documents
    List,
}

pub async fn run(ctx: &CommandContext<'_>, command: DocumentsCommand) -> CommandResult {
    let documents = ctx.page::<Documents>("documents")?;

    match command {
        DocumentsCommand::List => {
            if documents.list().is_empty() {
                println!("{}", t!("documents_empty"));
            }
            for doc in documents.list() {
                println!("{:>3}. {}  {}", doc.id, doc.title, doc.link);
            }
        }
    }
    Ok(())
}
