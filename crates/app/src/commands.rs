//! Command handlers: each applies one subcommand to the tracker and prints
//! the result to stdout.

use std::{fmt::Write as _, fs::File, io};

use engine::{
    Balance, ExpenseRow, KeyValueStore, Session, Settlement, Tracker, format_amount,
    format_saved_at_local, normalize_name, parse_amount,
};
use serde::Serialize;

use crate::{
    cli::{Command, ExportArgs, PersonCommand, RowCommand, RowFields},
    error::{AppError, Result},
};

pub fn run<S: KeyValueStore>(tracker: &mut Tracker<S>, command: Command) -> Result<()> {
    match command {
        Command::Show => {}
        Command::Title { title } => {
            tracker.set_title(&title);
        }
        Command::Person(person) => match person.command {
            PersonCommand::Add { name } => {
                if !tracker.add_participant(&name) {
                    println!("'{}' is blank or already present", name.trim());
                }
            }
            PersonCommand::Rm { name } => {
                if !tracker.remove_participant(&name) {
                    return Err(AppError::InvalidArgument(format!("unknown participant '{name}'")));
                }
            }
        },
        Command::Row(row) => match row.command {
            RowCommand::Add(fields) => {
                let edit = resolve_fields(tracker.session(), &fields)?;
                let id = tracker.add_row();
                apply_edit(tracker, id, edit);
                println!("added row {id}");
            }
            RowCommand::Rm { id } => {
                if !tracker.remove_row(id) {
                    println!("no row {id}");
                }
            }
            RowCommand::Set { id, fields } => {
                if tracker.session().row(id).is_none() {
                    return Err(AppError::InvalidArgument(format!("no row {id}")));
                }
                apply_fields(tracker, id, &fields)?;
            }
        },
        Command::History => {
            print!("{}", render_history(tracker));
            return Ok(());
        }
        Command::Restore { id } => {
            if !tracker.restore(id) {
                return Err(AppError::InvalidArgument(format!("no saved session {id}")));
            }
        }
        Command::Delete { id } => {
            if !tracker.delete_saved(id) {
                return Err(AppError::InvalidArgument(format!("no saved session {id}")));
            }
            println!("deleted {id}");
            return Ok(());
        }
        Command::Reset => tracker.reset(),
        Command::Export(args) => return export(tracker.session(), &args),
    }

    print!(
        "{}",
        render_session(tracker.session(), &tracker.summary(), &tracker.settlements())
    );
    Ok(())
}

/// Row fields checked against the session: names normalized and known,
/// amount parsed.
struct RowEdit {
    payer: Option<String>,
    description: Option<String>,
    amount: Option<Option<f64>>,
    receivers: Receivers,
}

enum Receivers {
    Keep,
    Only(Vec<String>),
    All,
    Nobody,
}

fn resolve_fields(session: &Session, fields: &RowFields) -> Result<RowEdit> {
    let known = |name: &str| -> Result<String> {
        match normalize_name(name) {
            Some(name) if session.participants().contains(&name) => Ok(name),
            _ => Err(AppError::InvalidArgument(format!(
                "unknown participant '{}'",
                name.trim()
            ))),
        }
    };

    let payer = match fields.payer.as_deref() {
        Some(payer) if payer.trim().is_empty() => Some(String::new()),
        Some(payer) => Some(known(payer)?),
        None => None,
    };
    let amount = fields.amount.as_deref().map(parse_amount).transpose()?;
    let receivers = if let Some(names) = &fields.receivers {
        let wanted = names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| known(name.as_str()))
            .collect::<Result<Vec<_>>>()?;
        Receivers::Only(wanted)
    } else if fields.all {
        Receivers::All
    } else if fields.none {
        Receivers::Nobody
    } else {
        Receivers::Keep
    };

    Ok(RowEdit {
        payer,
        description: fields.description.clone(),
        amount,
        receivers,
    })
}

fn apply_edit<S: KeyValueStore>(tracker: &mut Tracker<S>, id: u64, edit: RowEdit) {
    if let Some(payer) = edit.payer {
        tracker.set_payer(id, &payer);
    }
    if let Some(description) = edit.description {
        tracker.set_description(id, &description);
    }
    if let Some(amount) = edit.amount {
        tracker.set_amount(id, amount);
    }
    match edit.receivers {
        Receivers::Keep => {}
        Receivers::Only(wanted) => {
            for name in tracker.session().participants().to_vec() {
                tracker.set_received(id, &name, wanted.contains(&name));
            }
        }
        Receivers::All => {
            tracker.set_all_received(id, true);
        }
        Receivers::Nobody => {
            tracker.set_all_received(id, false);
        }
    }
}

fn apply_fields<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    id: u64,
    fields: &RowFields,
) -> Result<()> {
    let edit = resolve_fields(tracker.session(), fields)?;
    apply_edit(tracker, id, edit);
    Ok(())
}

/// Receivers of `row` in participant order.
fn received_by<'a>(session: &'a Session, row: &ExpenseRow) -> Vec<&'a str> {
    session
        .participants()
        .iter()
        .filter(|name| row.who_received.get(name.as_str()).copied().unwrap_or(false))
        .map(String::as_str)
        .collect()
}

pub fn render_session(session: &Session, summary: &[Balance], plan: &[Settlement]) -> String {
    let mut out = String::new();
    let title = if session.title().trim().is_empty() {
        "(untitled)"
    } else {
        session.title()
    };
    let _ = writeln!(out, "{title}  [{}]", session.id());

    if session.participants().is_empty() {
        let _ = writeln!(out, "No participants yet.");
    } else {
        let _ = writeln!(out, "Participants: {}", session.participants().join(", "));
    }

    if !session.rows().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>4}  {:<12} {:<24} {:>9}  For",
            "#", "Paid by", "Description", "Amount"
        );
        for row in session.rows() {
            let receivers = received_by(session, row);
            let marker = if row.is_invalid() { "  (!)" } else { "" };
            let _ = writeln!(
                out,
                "{:>4}  {:<12} {:<24} {:>9}  {}{marker}",
                row.id,
                row.who_paid,
                row.description,
                format_amount(row.amount),
                receivers.join(", "),
            );
        }
    }

    if !summary.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Balances:");
        for entry in summary {
            let _ = writeln!(out, "  {:<12} {:>+10.2}", entry.name, entry.balance);
        }
    }

    let _ = writeln!(out);
    if plan.is_empty() {
        let _ = writeln!(out, "All settled.");
    } else {
        let _ = writeln!(out, "Settlements:");
        for step in plan {
            let _ = writeln!(
                out,
                "  {} pays {} {}",
                step.from,
                step.to,
                format_amount(Some(step.amount))
            );
        }
    }
    out
}

fn render_history<S: KeyValueStore>(tracker: &Tracker<S>) -> String {
    let saved = tracker.saved_sessions();
    if saved.is_empty() {
        return "No saved sessions.\n".to_string();
    }
    let current = tracker.session().id();
    let mut out = String::new();
    for entry in saved {
        let title = if entry.title.trim().is_empty() {
            "(untitled)"
        } else {
            entry.title.as_str()
        };
        let marker = if entry.id == current { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {}  {:<24} {:>2} people, {:>3} rows  {}",
            entry.id,
            title,
            entry.participants.len(),
            entry.rows.len(),
            format_saved_at_local(&entry.saved_at)
        );
    }
    out
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: u64,
    paid_by: &'a str,
    description: &'a str,
    amount: String,
    received_by: String,
}

fn export(session: &Session, args: &ExportArgs) -> Result<()> {
    let sink: Box<dyn io::Write> = match &args.out {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    write_csv(session, sink)?;
    if let Some(path) = &args.out {
        tracing::info!("exported {} rows to {path}", session.rows().len());
    }
    Ok(())
}

fn write_csv(session: &Session, sink: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for row in session.rows() {
        writer.serialize(ExportRow {
            id: row.id,
            paid_by: &row.who_paid,
            description: &row.description,
            amount: format_amount(row.amount),
            received_by: received_by(session, row).join(";"),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner() -> Tracker<engine::MemoryStore> {
        let mut tracker = Tracker::builder().build();
        tracker.set_title("Dinner");
        for name in ["Anna", "Bruno"] {
            tracker.add_participant(name);
        }
        let row = tracker.add_row();
        let fields = RowFields {
            payer: Some("Anna".to_string()),
            description: Some("Pizza".to_string()),
            amount: Some("24,50".to_string()),
            receivers: None,
            all: true,
            none: false,
        };
        apply_fields(&mut tracker, row, &fields).unwrap();
        tracker
    }

    #[test]
    fn fields_are_applied_to_the_row() {
        let tracker = dinner();
        let row = &tracker.session().rows()[0];
        assert_eq!(row.who_paid, "Anna");
        assert_eq!(row.amount, Some(24.5));
        assert_eq!(row.receivers(), 2);
    }

    #[test]
    fn unknown_receiver_is_rejected() {
        let mut tracker = dinner();
        let fields = RowFields {
            receivers: Some(vec!["Zed".to_string()]),
            ..RowFields::default()
        };
        assert!(apply_fields(&mut tracker, 1, &fields).is_err());
        assert_eq!(tracker.session().rows()[0].receivers(), 2);
    }

    #[test]
    fn session_render_lists_settlements() {
        let tracker = dinner();
        let out = render_session(tracker.session(), &tracker.summary(), &tracker.settlements());
        assert!(out.starts_with("Dinner"));
        assert!(out.contains("Participants: Anna, Bruno"));
        assert!(out.contains("Bruno pays Anna 12.25"));
    }

    #[test]
    fn csv_has_one_line_per_row() {
        let tracker = dinner();
        let mut buf = Vec::new();
        write_csv(tracker.session(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,paid_by,description,amount,received_by"));
        assert_eq!(lines.next(), Some("1,Anna,Pizza,24.50,Anna;Bruno"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn invalid_row_add_leaves_no_row_behind() {
        let mut tracker = dinner();
        let writes = tracker.storage().writes(engine::APP_STATE_KEY);
        for fields in [
            RowFields {
                payer: Some("Zed".to_string()),
                ..RowFields::default()
            },
            RowFields {
                receivers: Some(vec!["Anna".to_string(), "Zed".to_string()]),
                ..RowFields::default()
            },
            RowFields {
                amount: Some("1.234".to_string()),
                ..RowFields::default()
            },
        ] {
            let command = Command::Row(crate::cli::Row {
                command: RowCommand::Add(fields),
            });
            assert!(run(&mut tracker, command).is_err());
        }
        assert_eq!(tracker.session().rows().len(), 1);
        assert_eq!(tracker.storage().writes(engine::APP_STATE_KEY), writes);
    }

    #[test]
    fn names_are_matched_after_normalization() {
        let mut tracker = dinner();
        tracker.add_participant("Anna  Maria");
        let fields = RowFields {
            payer: Some(" Anna   Maria".to_string()),
            receivers: Some(vec!["Anna  Maria".to_string(), " Bruno ".to_string()]),
            ..RowFields::default()
        };
        apply_fields(&mut tracker, 1, &fields).unwrap();

        let row = &tracker.session().rows()[0];
        assert_eq!(row.who_paid, "Anna Maria");
        assert_eq!(received_by(tracker.session(), row), ["Bruno", "Anna Maria"]);
    }

    #[test]
    fn receivers_are_listed_in_participant_order() {
        let mut tracker = Tracker::builder().build();
        for name in ["Zoe", "Anna"] {
            tracker.add_participant(name);
        }
        let row = tracker.add_row();
        let fields = RowFields {
            payer: Some("Zoe".to_string()),
            amount: Some("10".to_string()),
            all: true,
            ..RowFields::default()
        };
        apply_fields(&mut tracker, row, &fields).unwrap();

        let out = render_session(tracker.session(), &tracker.summary(), &tracker.settlements());
        assert!(out.contains("Zoe, Anna"));
        let mut buf = Vec::new();
        write_csv(tracker.session(), &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains(",Zoe;Anna"));
    }
}
