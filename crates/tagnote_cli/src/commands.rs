//! Subcommand handlers. The terminal user is the single local actor, so
//! no identity gate applies here.

use crate::{NoteCommand, TagCommand};
use tagnote_core::db::open_db;
use tagnote_core::{
    CoreConfig, NoteDraft, NoteFilter, NoteService, NoteWithTags,
    SqliteSlotRepository, StoreResult,
};

pub(crate) fn run_note(config: &CoreConfig, command: NoteCommand) -> Result<(), String> {
    with_service(config, |service| {
        match command {
            NoteCommand::Add(fields) => {
                let id = service.create_note(NoteDraft::new(
                    fields.title,
                    fields.content,
                    fields.tags,
                ))?;
                println!("{id}");
            }
            NoteCommand::Edit { id, fields } => {
                let Some(current) = service.find_note(&id).cloned() else {
                    println!("note not found: {id}");
                    return Ok(());
                };
                let tag_ids = if fields.clear_tags {
                    Vec::new()
                } else {
                    fields.tags.unwrap_or(current.tag_ids)
                };
                let draft = NoteDraft {
                    title: fields.title.unwrap_or(current.title),
                    content: fields.content.unwrap_or(current.content),
                    tag_ids,
                };
                service.update_note(&id, draft)?;
                println!("updated {id}");
            }
            NoteCommand::Rm { id } => {
                if service.delete_note(&id)? {
                    println!("deleted {id}");
                } else {
                    println!("note not found: {id}");
                }
            }
            NoteCommand::Show { id } => match service.find_note_with_tags(&id) {
                Some(note) => {
                    println!("{}{}", note.title, format_tags(&note));
                    println!("id: {}", note.id);
                    println!();
                    println!("{}", note.content);
                }
                None => println!("note not found: {id}"),
            },
            NoteCommand::List { title, tags } => {
                let filter = NoteFilter {
                    title,
                    tag_ids: tags,
                };
                for note in service.search_notes(&filter) {
                    println!("{}  {}{}", note.id, note.title, format_tags(&note));
                }
            }
        }
        Ok(())
    })
}

pub(crate) fn run_tag(config: &CoreConfig, command: TagCommand) -> Result<(), String> {
    with_service(config, |service| {
        match command {
            TagCommand::Add { label } => println!("{}", service.create_tag(label)?),
            TagCommand::Rename { id, label } => {
                if service.update_tag(&id, label)? {
                    println!("renamed {id}");
                } else {
                    println!("tag not found: {id}");
                }
            }
            TagCommand::Rm { id } => {
                if service.delete_tag(&id)? {
                    println!("deleted {id}");
                } else {
                    println!("tag not found: {id}");
                }
            }
            TagCommand::List => {
                for tag in service.tags() {
                    println!("{}  {}", tag.id, tag.label);
                }
            }
        }
        Ok(())
    })
}

fn with_service(
    config: &CoreConfig,
    f: impl FnOnce(&mut NoteService<SqliteSlotRepository<'_>>) -> StoreResult<()>,
) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteSlotRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut service = NoteService::load_with_policy(repo, config.malformed_slot_policy)
        .map_err(|err| err.to_string())?;
    f(&mut service).map_err(|err| err.to_string())
}

fn format_tags(note: &NoteWithTags) -> String {
    if note.tags.is_empty() {
        return String::new();
    }
    let labels: Vec<String> = note
        .tags
        .iter()
        .map(|tag| format!("#{}", tag.label))
        .collect();
    format!(" [{}]", labels.join(" "))
}
