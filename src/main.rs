mod api;
mod error;
mod model;
mod reminders;
mod renewal;
mod validate;

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, Color, Table};
use directories::ProjectDirs;
use inquire::{Confirm, DateSelect, Select, Text};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::api::Api;
use crate::model::{
    Client, ClientCreateRequest, ClientUpdateRequest, ConvertRequest, DocumentType, FloaterType,
    HealthCreateRequest,
    InsuranceCover, InsuranceType, NoteCreateRequest, QuoteCreateRequest, VehicleCreateRequest,
};
use crate::reminders::{Priority, TaggedNote};
use crate::renewal::{Month, RenewalStatus};

// ==========================================
// Constants
// ==========================================

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

const MISSED_RED: Color = Color::Rgb { r: 185, g: 28, b: 28 };
const PENDING_GREEN: Color = Color::Rgb { r: 4, g: 120, b: 87 };
const TODAY_YELLOW: Color = Color::Rgb { r: 202, g: 138, b: 4 };
const UPCOMING_BLUE: Color = Color::Rgb { r: 29, g: 78, b: 216 };

// ==========================================
// Structs & Enums
// ==========================================

#[derive(Debug, Serialize, Deserialize)]
struct AppSettings {
    api_base: String,
}

#[derive(Parser)]
#[command(name = "renewdesk", about = "Terminal front-end for an insurance-agency CRM")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new client (vehicle or health)
    Add,
    /// List clients of one insurance type
    List {
        #[arg(value_enum)]
        insurance_type: InsuranceType,
    },
    /// Show a client with its quotes, notes, documents and conversions
    Show { client_id: u64 },
    /// Edit a client's name, mobile or place
    Edit { client_id: u64 },
    /// Show a client's follow-up history
    History { client_id: u64 },
    /// Add a follow-up note
    Note { client_id: u64 },
    /// Edit a note's text
    EditNote { note_id: u64 },
    /// Delete a note
    DeleteNote { note_id: u64 },
    /// Record an insurer quote
    Quote { client_id: u64 },
    /// List a client's documents
    Docs { client_id: u64 },
    /// Upload a document (RC / Aadhaar / old policy)
    Upload { client_id: u64 },
    /// Delete a document
    DeleteDoc { document_id: u64 },
    /// Follow-up reminder dashboard
    Reminders,
    /// Renewal summary for a calendar month
    Renewals {
        #[arg(value_enum)]
        insurance_type: InsuranceType,
        /// Target month (YYYY-MM, defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Renewal list for a month and status, with renew/delete actions
    RenewalList {
        #[arg(value_enum)]
        insurance_type: InsuranceType,
        /// Target month (YYYY-MM, defaults to the current month)
        #[arg(long)]
        month: Option<String>,
        #[arg(long, value_enum, default_value = "pending")]
        status: StatusFilter,
    },
    /// Record a policy renewal (advances the stored renewal date)
    Renew {
        #[arg(value_enum)]
        insurance_type: InsuranceType,
        client_id: u64,
    },
    /// Set the renewal date on a vehicle record that has none
    SetRenewal { client_id: u64 },
    /// Convert a lead into a sold policy
    Convert { client_id: u64 },
    /// Delete a client and everything attached to it
    Delete { client_id: u64 },
    /// Configure the API base URL
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusFilter {
    Pending,
    Missed,
}

impl From<StatusFilter> for RenewalStatus {
    fn from(filter: StatusFilter) -> RenewalStatus {
        match filter {
            StatusFilter::Pending => RenewalStatus::Pending,
            StatusFilter::Missed => RenewalStatus::Missed,
        }
    }
}

// ==========================================
// Main Function
// ==========================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        return;
    };

    if let Err(e) = run(command) {
        if matches!(
            e.downcast_ref::<inquire::InquireError>(),
            Some(
                inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted
            )
        ) {
            println!("Cancelled");
            return;
        }
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    if let Commands::Config = command {
        setup_config_wizard()?;
        return Ok(());
    }

    let settings = match load_settings() {
        Some(s) => s,
        None => setup_config_wizard()?,
    };
    let api = Api::new(&settings.api_base);

    match command {
        Commands::Add => add_client_wizard(&api),
        Commands::List { insurance_type } => list_clients(&api, insurance_type),
        Commands::Show { client_id } => show_client(&api, client_id),
        Commands::Edit { client_id } => edit_client(&api, client_id),
        Commands::History { client_id } => show_history(&api, client_id),
        Commands::Note { client_id } => add_note_wizard(&api, client_id),
        Commands::EditNote { note_id } => edit_note(&api, note_id),
        Commands::DeleteNote { note_id } => delete_note(&api, note_id),
        Commands::Quote { client_id } => add_quote(&api, client_id),
        Commands::Docs { client_id } => list_documents(&api, client_id),
        Commands::Upload { client_id } => upload_document(&api, client_id),
        Commands::DeleteDoc { document_id } => delete_document(&api, document_id),
        Commands::Reminders => reminders_dashboard(&api),
        Commands::Renewals {
            insurance_type,
            month,
        } => renewal_summary(&api, insurance_type, month),
        Commands::RenewalList {
            insurance_type,
            month,
            status,
        } => renewal_list(&api, insurance_type, month, status),
        Commands::Renew {
            insurance_type,
            client_id,
        } => renew_client(&api, insurance_type, client_id),
        Commands::SetRenewal { client_id } => set_renewal_date(&api, client_id),
        Commands::Convert { client_id } => convert_lead(&api, client_id),
        Commands::Delete { client_id } => delete_client_full(&api, client_id),
        Commands::Config => unreachable!("handled above"),
    }
}

// ==========================================
// 1. Registration Wizard
// ==========================================

fn add_client_wizard(api: &Api) -> anyhow::Result<()> {
    println!("\n--- Register New Client ---");

    let insurance_type = match Select::new("Insurance Type:", vec!["Vehicle", "Health"]).prompt()? {
        "Vehicle" => InsuranceType::Vehicle,
        _ => InsuranceType::Health,
    };

    let name = Text::new("Client Name:").prompt()?;
    let mobile = Text::new("Mobile Number:").prompt()?;
    let place = Text::new("Place:").prompt()?;

    let client_req = ClientCreateRequest {
        name,
        mobile,
        place,
        insurance_type,
    };

    let created = match insurance_type {
        InsuranceType::Vehicle => {
            let vehicle_type = Text::new("Vehicle Type (Car / Bike):").prompt()?;
            let insurance_cover =
                match Select::new("Insurance Cover:", vec!["Full", "Third Party"]).prompt()? {
                    "Full" => InsuranceCover::Full,
                    _ => InsuranceCover::ThirdParty,
                };
            let renewal_date = ask_optional_renewal_date()?;

            api.create_client_with_vehicle(
                &client_req,
                VehicleCreateRequest {
                    client: 0, // filled in once the client record exists
                    vehicle_type,
                    insurance_cover,
                    renewal_date,
                },
            )?
        }
        InsuranceType::Health => {
            let floater_type =
                match Select::new("Floater Type:", vec!["Individual", "Family"]).prompt()? {
                    "Individual" => FloaterType::Individual,
                    _ => FloaterType::Family,
                };
            let hint = match floater_type {
                FloaterType::Individual => "Age (example: 28)",
                FloaterType::Family => "Ages (example: 30,28,5)",
            };
            let ages_text = Text::new("Ages:").with_help_message(hint).prompt()?;

            // Validation runs before anything is sent; a violation blocks the
            // whole submission.
            let ages = validate::parse_ages(&ages_text);
            if let Err(e) = validate::check_floater_ages(floater_type, &ages) {
                println!("❌ {e}");
                return Ok(());
            }

            let ped = Text::new("PED (pre-existing disease) details:").prompt()?;
            let renewal_date = ask_optional_renewal_date()?;
            let joined = ages
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");

            api.create_client_with_health(
                &client_req,
                HealthCreateRequest {
                    client: 0,
                    floater_type,
                    ages: joined,
                    ped,
                    renewal_date,
                },
            )?
        }
    };

    println!("✅ Client created: {} (id {})", created.name, created.id);

    if Confirm::new("Add a follow-up note now?")
        .with_default(false)
        .prompt()?
    {
        add_note_wizard(api, created.id)?;
    }
    Ok(())
}

fn ask_optional_renewal_date() -> anyhow::Result<Option<NaiveDate>> {
    if Confirm::new("Set a renewal date?")
        .with_default(true)
        .prompt()?
    {
        let date = DateSelect::new("Renewal Date:")
            .with_default(Local::now().date_naive())
            .prompt()?;
        Ok(Some(date))
    } else {
        Ok(None)
    }
}

// ==========================================
// 2. Client Views
// ==========================================

fn list_clients(api: &Api, insurance_type: InsuranceType) -> anyhow::Result<()> {
    let clients = api.clients(insurance_type)?;
    if clients.is_empty() {
        println!("(No {insurance_type} clients found)");
        return Ok(());
    }

    let target = Month::current();
    let today = Local::now().date_naive();

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Name", "Mobile", "Place", "Renewal Date", "Status", "Converted",
    ]);
    for c in &clients {
        let status = renewal::classify(c.renewal_date(), target, today);
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name),
            Cell::new(&c.mobile),
            Cell::new(&c.place),
            Cell::new(fmt_date(c.renewal_date())),
            status_cell(status),
            Cell::new(if c.is_converted { "yes" } else { "no" }),
        ]);
    }
    println!("\n--- {insurance_type} clients ({}) ---", clients.len());
    println!("{table}");
    Ok(())
}

fn show_client(api: &Api, client_id: u64) -> anyhow::Result<()> {
    let detail = api.client_detail(client_id)?;

    println!(
        "\n=== #{} {} · {} insurance ===",
        detail.id, detail.name, detail.insurance_type
    );
    if detail.place.is_empty() {
        println!("📱 {}", detail.mobile);
    } else {
        println!("📱 {} · {}", detail.mobile, detail.place);
    }
    if let Some(created_at) = &detail.created_at {
        println!("Registered: {created_at}");
    }
    println!("Converted: {}", if detail.is_converted { "yes" } else { "no" });

    if let Some(v) = &detail.vehicle_details {
        println!(
            "🚗 {} · {} cover · renewal {}",
            v.vehicle_type,
            v.insurance_cover,
            fmt_date(v.renewal_date)
        );
    }
    if let Some(h) = &detail.health_details {
        println!(
            "🏥 {} floater · ages {} · renewal {}",
            h.floater_type,
            h.ages,
            fmt_date(h.renewal_date)
        );
        if !h.ped.is_empty() {
            println!("PED: {}", h.ped);
        }
        if h.renewal_dismissed {
            println!("⚠️ Renewal dismissed");
        }
    }

    if !detail.quotes.is_empty() {
        println!("\n--- Quotes ---");
        let mut table = Table::new();
        table.set_header(vec!["ID", "Company", "Premium"]);
        for q in &detail.quotes {
            table.add_row(vec![
                Cell::new(q.id),
                Cell::new(&q.company_name),
                Cell::new(format!("₹{:.2}", q.premium_amount)),
            ]);
        }
        println!("{table}");
    }

    if !detail.notes.is_empty() {
        println!("\n--- Follow-up Notes ---");
        println!("{}", notes_table(&detail.notes));
    }

    if !detail.documents.is_empty() {
        println!("\n--- Documents ---");
        println!("{}", documents_table(&detail.documents));
    }

    if !detail.conversions.is_empty() {
        println!("\n--- Conversions ---");
        let mut table = Table::new();
        table.set_header(vec!["ID", "POSP", "Customer", "Company", "Premium", "Policy No."]);
        for conv in &detail.conversions {
            table.add_row(vec![
                Cell::new(conv.id),
                Cell::new(&conv.posp_code),
                Cell::new(format!("{} ({})", conv.customer_name, conv.customer_mobile)),
                Cell::new(&conv.company_name),
                Cell::new(format!("₹{:.2}", conv.premium_amount)),
                Cell::new(&conv.policy_number),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}

fn edit_client(api: &Api, client_id: u64) -> anyhow::Result<()> {
    let detail = api.client_detail(client_id)?;

    println!("\n--- Edit Client #{} ---", detail.id);
    let name = Text::new("Name:").with_default(&detail.name).prompt()?;
    let mobile = Text::new("Mobile:").with_default(&detail.mobile).prompt()?;
    let place = Text::new("Place:").with_default(&detail.place).prompt()?;

    if name.trim().is_empty() || mobile.trim().is_empty() {
        println!("❌ name and mobile cannot be empty");
        return Ok(());
    }
    if name == detail.name && mobile == detail.mobile && place == detail.place {
        println!("Nothing changed.");
        return Ok(());
    }

    let updated = api.update_client(client_id, &ClientUpdateRequest { name, mobile, place })?;
    println!("✅ Client updated: {} ({})", updated.name, updated.mobile);
    Ok(())
}

fn show_history(api: &Api, client_id: u64) -> anyhow::Result<()> {
    let notes = api.client_history(client_id)?;
    if notes.is_empty() {
        println!("(No follow-up history)");
        return Ok(());
    }
    println!("\n--- Follow-up History ---");
    println!("{}", notes_table(&notes));
    Ok(())
}

fn notes_table(notes: &[model::Note]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Follow-up", "Reminder", "Completed", "Note"]);
    for n in notes {
        table.add_row(vec![
            Cell::new(n.id),
            Cell::new(n.follow_up_date),
            Cell::new(if n.reminder { "yes" } else { "no" }),
            Cell::new(if n.completed { "yes" } else { "no" }),
            Cell::new(&n.text),
        ]);
    }
    table
}

fn documents_table(documents: &[model::Document]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "File", "Uploaded"]);
    for d in documents {
        table.add_row(vec![
            Cell::new(d.id),
            Cell::new(d.document_type),
            Cell::new(&d.file),
            Cell::new(d.uploaded_at.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

// ==========================================
// 3. Notes & Quotes
// ==========================================

fn add_note_wizard(api: &Api, client_id: u64) -> anyhow::Result<()> {
    println!("\n--- Add Follow-up Note ---");
    let text = Text::new("Note details:").prompt()?;
    let follow_up_date = DateSelect::new("Follow-up Date:")
        .with_default(Local::now().date_naive())
        .prompt()?;
    let reminder = Confirm::new("Set a reminder?")
        .with_default(true)
        .prompt()?;

    api.create_note(&NoteCreateRequest {
        client: client_id,
        text,
        follow_up_date,
        reminder,
    })?;
    println!("✅ Note added");
    Ok(())
}

fn edit_note(api: &Api, note_id: u64) -> anyhow::Result<()> {
    let text = Text::new("New note text:").prompt()?;
    api.update_note_text(note_id, text)?;
    println!("✅ Note updated");
    Ok(())
}

fn delete_note(api: &Api, note_id: u64) -> anyhow::Result<()> {
    if !Confirm::new("Delete this note?")
        .with_default(false)
        .prompt()?
    {
        println!("Cancelled");
        return Ok(());
    }
    api.delete_note(note_id)?;
    println!("✅ Note deleted");
    Ok(())
}

fn add_quote(api: &Api, client_id: u64) -> anyhow::Result<()> {
    println!("\n--- Record Quote ---");
    let company_name = Text::new("Company Name:").prompt()?;
    let premium_text = Text::new("Premium Amount:").prompt()?;

    if company_name.trim().is_empty() || premium_text.trim().is_empty() {
        println!("Nothing recorded.");
        return Ok(());
    }
    let premium_amount: f64 = match premium_text.trim().parse() {
        Ok(p) if p >= 0.0 => p,
        _ => {
            println!("❌ premium amount must be a non-negative number");
            return Ok(());
        }
    };

    let quote = api.create_quote(&QuoteCreateRequest {
        client: client_id,
        company_name,
        premium_amount,
    })?;
    println!("✅ Quote recorded: {} ₹{:.2}", quote.company_name, quote.premium_amount);
    Ok(())
}

// ==========================================
// 4. Documents
// ==========================================

fn list_documents(api: &Api, client_id: u64) -> anyhow::Result<()> {
    let documents = api.documents(client_id)?;
    if documents.is_empty() {
        println!("(No documents uploaded)");
        return Ok(());
    }
    println!("\n--- Documents for client {client_id} ---");
    println!("{}", documents_table(&documents));
    Ok(())
}

fn upload_document(api: &Api, client_id: u64) -> anyhow::Result<()> {
    println!("📂 Opening file picker...");
    let Some(path) = rfd::FileDialog::new()
        .set_title("Select Document File")
        .pick_file()
    else {
        println!("❌ No file selected.");
        return Ok(());
    };

    let document_type =
        match Select::new("Document Type:", vec!["RC", "Aadhaar", "Old Policy"]).prompt()? {
            "RC" => DocumentType::Rc,
            "Aadhaar" => DocumentType::Aadhaar,
            _ => DocumentType::Policy,
        };

    let doc = api.upload_document(client_id, document_type, &path)?;
    println!("✅ Uploaded {} document (id {})", doc.document_type, doc.id);
    Ok(())
}

fn delete_document(api: &Api, document_id: u64) -> anyhow::Result<()> {
    if !Confirm::new("Delete this document?")
        .with_default(false)
        .prompt()?
    {
        println!("Cancelled");
        return Ok(());
    }
    api.delete_document(document_id)?;
    println!("✅ Document deleted");
    Ok(())
}

// ==========================================
// 5. Reminder Dashboard
// ==========================================

fn reminders_dashboard(api: &Api) -> anyhow::Result<()> {
    println!("\n--- Reminder Dashboard ---");
    let summary = api.notes_summary()?;
    println!(
        "📋 {} today · {} overdue · {} upcoming",
        summary.today, summary.overdue, summary.upcoming
    );

    let mut notes = reminders::merge_buckets(
        api.notes_overdue()?,
        api.notes_today()?,
        api.notes_upcoming()?,
    );
    if notes.is_empty() {
        println!("🎉 No reminders pending");
        return Ok(());
    }

    // Overdue stays collapsed unless the operator asks for it.
    let overdue_count = notes
        .iter()
        .filter(|t| t.priority == Priority::Overdue)
        .count();
    let mut show_overdue = false;
    if overdue_count > 0 {
        show_overdue = Confirm::new(&format!(
            "⚠️ {overdue_count} overdue reminder(s). Show them?"
        ))
        .with_default(false)
        .prompt()?;
    }
    print_reminders(&notes, show_overdue);

    loop {
        if notes.is_empty() {
            println!("🎉 No reminders left");
            return Ok(());
        }
        let action = match Select::new(
            "Action:",
            vec!["Mark a reminder complete", "Delete a reminder", "Done"],
        )
        .prompt()
        {
            Ok("Done") | Err(_) => return Ok(()),
            Ok(action) => action,
        };

        let options: Vec<String> = notes
            .iter()
            .filter(|t| show_overdue || t.priority != Priority::Overdue)
            .map(|t| {
                format!(
                    "{} | {} | {} | {}",
                    t.note.id, t.note.follow_up_date, t.priority, t.note.text
                )
            })
            .collect();
        if options.is_empty() {
            println!("(Nothing visible to act on)");
            continue;
        }
        let Ok(choice) = Select::new("Select reminder:", options)
            .with_page_size(10)
            .prompt()
        else {
            continue;
        };
        let Some(id) = choice
            .split(" | ")
            .next()
            .and_then(|s| s.parse::<u64>().ok())
        else {
            continue;
        };

        if action == "Delete a reminder"
            && !Confirm::new("Delete this reminder?")
                .with_default(false)
                .prompt()?
        {
            continue;
        }

        let result = if action == "Delete a reminder" {
            api.delete_note(id)
        } else {
            api.complete_note(id)
        };
        match result {
            // The local sequence only changes once the store has confirmed;
            // a failed call leaves it untouched.
            Ok(()) => {
                reminders::remove_note(&mut notes, id);
                println!("✅ Done");
            }
            Err(e) => println!("❌ {e}"),
        }
    }
}

fn print_reminders(notes: &[TaggedNote], show_overdue: bool) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Client", "Follow-up", "Priority", "Note"]);
    let mut hidden = 0;
    let mut shown = 0;
    for t in notes {
        if t.priority == Priority::Overdue && !show_overdue {
            hidden += 1;
            continue;
        }
        table.add_row(vec![
            Cell::new(t.note.id),
            Cell::new(t.note.client),
            Cell::new(t.note.follow_up_date),
            priority_cell(t.priority),
            Cell::new(&t.note.text),
        ]);
        shown += 1;
    }
    if shown > 0 {
        println!("{table}");
    }
    if hidden > 0 {
        println!("(⚠️ {hidden} overdue reminder(s) hidden)");
    }
}

fn priority_cell(priority: Priority) -> Cell {
    match priority {
        Priority::Overdue => Cell::new("overdue").fg(MISSED_RED),
        Priority::Today => Cell::new("today").fg(TODAY_YELLOW),
        Priority::Upcoming => Cell::new("upcoming").fg(UPCOMING_BLUE),
    }
}

// ==========================================
// 6. Renewals
// ==========================================

fn renewal_summary(
    api: &Api,
    insurance_type: InsuranceType,
    month: Option<String>,
) -> anyhow::Result<()> {
    let Some(target) = resolve_month(month) else {
        return Ok(());
    };
    let clients = api.clients(insurance_type)?;
    let counts = renewal::summarize(&clients, target, Local::now().date_naive());

    println!("\n--- {insurance_type} renewals · {target} ---");
    let mut table = Table::new();
    table.set_header(vec!["Status", "Count"]);
    table.add_row(vec![
        Cell::new("pending").fg(PENDING_GREEN),
        Cell::new(counts.pending),
    ]);
    table.add_row(vec![
        Cell::new("missed").fg(MISSED_RED),
        Cell::new(counts.missed),
    ]);
    table.add_row(vec![
        Cell::new("no renewal date set").fg(TODAY_YELLOW),
        Cell::new(counts.unscheduled),
    ]);
    println!("{table}");
    Ok(())
}

fn renewal_list(
    api: &Api,
    insurance_type: InsuranceType,
    month: Option<String>,
    status: StatusFilter,
) -> anyhow::Result<()> {
    let Some(target) = resolve_month(month) else {
        return Ok(());
    };
    let status: RenewalStatus = status.into();
    let today = Local::now().date_naive();

    let mut clients = api.clients(insurance_type)?;
    loop {
        let matched = renewal::filter_by_status(&clients, target, today, status);
        println!("\n--- {insurance_type} renewals · {target} · {status} ---");
        if matched.is_empty() {
            println!("(No items found)");
            return Ok(());
        }
        print_renewal_rows(&matched);

        let mut actions = vec!["Renew a client", "Done"];
        if status == RenewalStatus::Missed {
            actions.insert(1, "Delete a client (full)");
        }
        match Select::new("Action:", actions).prompt() {
            Ok("Renew a client") => {
                let Some(client_id) = pick_client(&matched)? else {
                    continue;
                };
                let next = DateSelect::new("Next Renewal Date:").prompt()?;
                match api.renew(insurance_type, client_id, next) {
                    Ok(()) => {
                        println!("✅ Renewed; moved to {next}");
                        // consistency by re-fetch, not by patching the list
                        clients = api.clients(insurance_type)?;
                    }
                    Err(e) => println!("❌ {e}"),
                }
            }
            Ok("Delete a client (full)") => {
                let Some(client_id) = pick_client(&matched)? else {
                    continue;
                };
                if !Confirm::new("This deletes the client and ALL attached data permanently. Continue?")
                    .with_default(false)
                    .prompt()?
                {
                    continue;
                }
                match api.delete_client_full(client_id) {
                    Ok(()) => {
                        println!("✅ Client deleted completely");
                        clients = api.clients(insurance_type)?;
                    }
                    Err(e) => println!("❌ {e}"),
                }
            }
            _ => return Ok(()),
        }
    }
}

fn print_renewal_rows(clients: &[Client]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Mobile", "Place", "Renewal Date", "Details"]);
    for c in clients {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name),
            Cell::new(&c.mobile),
            Cell::new(&c.place),
            Cell::new(fmt_date(c.renewal_date())),
            Cell::new(detail_summary(c)),
        ]);
    }
    println!("{table}");
}

fn detail_summary(c: &Client) -> String {
    if let Some(v) = &c.vehicle_details {
        format!("{} · {} cover", v.vehicle_type, v.insurance_cover)
    } else if let Some(h) = &c.health_details {
        let mut s = format!("{} · ages {}", h.floater_type, h.ages);
        if h.renewal_dismissed {
            s.push_str(" · dismissed");
        }
        s
    } else {
        "-".to_string()
    }
}

fn pick_client(clients: &[Client]) -> anyhow::Result<Option<u64>> {
    let options: Vec<String> = clients
        .iter()
        .map(|c| format!("{} | {} | {}", c.id, c.name, c.mobile))
        .collect();
    match Select::new("Select client:", options)
        .with_page_size(10)
        .prompt()
    {
        Ok(choice) => Ok(choice.split(" | ").next().and_then(|s| s.parse().ok())),
        Err(_) => Ok(None),
    }
}

fn renew_client(api: &Api, insurance_type: InsuranceType, client_id: u64) -> anyhow::Result<()> {
    let next = DateSelect::new("Next Renewal Date:").prompt()?;
    api.renew(insurance_type, client_id, next)?;
    println!("✅ Renewal recorded for client {client_id}: {next}");
    Ok(())
}

fn set_renewal_date(api: &Api, client_id: u64) -> anyhow::Result<()> {
    let date = DateSelect::new("Renewal Date:").prompt()?;
    api.set_vehicle_renewal(client_id, date)?;
    println!("✅ Renewal date set for client {client_id}: {date}");
    Ok(())
}

/// Absent month falls back to the current calendar month; a malformed month
/// is a no-op rather than an error.
fn resolve_month(arg: Option<String>) -> Option<Month> {
    match arg {
        None => Some(Month::current()),
        Some(raw) => {
            let parsed = Month::parse(&raw);
            if parsed.is_none() {
                println!("No renewals to show (month must look like 2024-07).");
            }
            parsed
        }
    }
}

// ==========================================
// 7. Conversion & Deletion
// ==========================================

fn convert_lead(api: &Api, client_id: u64) -> anyhow::Result<()> {
    println!("\n--- Convert Lead ---");
    let posp_code = Text::new("POSP Code:").prompt()?;
    let customer_name = Text::new("Customer Name:").prompt()?;
    let customer_mobile = Text::new("Customer Mobile:").prompt()?;
    let company_name = Text::new("Company Name:").prompt()?;
    let premium_text = Text::new("Premium Amount:").prompt()?;
    let policy_number = Text::new("Policy Number:").prompt()?;

    let record = api.convert(
        client_id,
        &ConvertRequest {
            posp_code,
            customer_name,
            customer_mobile,
            company_name,
            premium_amount: validate::coerce_premium(&premium_text),
            policy_number,
        },
    )?;
    println!("✅ Lead converted · policy {}", record.policy_number);
    Ok(())
}

fn delete_client_full(api: &Api, client_id: u64) -> anyhow::Result<()> {
    if !Confirm::new("This will DELETE the client and ALL data permanently. Continue?")
        .with_default(false)
        .prompt()?
    {
        println!("Cancelled");
        return Ok(());
    }
    api.delete_client_full(client_id)?;
    println!("✅ Client deleted completely");
    Ok(())
}

// ==========================================
// 8. Config & Utilities
// ==========================================

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "renewdesk", "app") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).ok();
        }
        return config_dir.join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

fn load_settings() -> Option<AppSettings> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

fn setup_config_wizard() -> anyhow::Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = load_settings()
        .map(|s| s.api_base)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let api_base = Text::new("API Base URL:").with_default(&current).prompt()?;
    let settings = AppSettings { api_base };

    let path = get_config_path();
    let toml_str = toml::to_string_pretty(&settings)?;
    fs::write(&path, toml_str)
        .with_context(|| format!("failed to save settings to {}", path.display()))?;
    println!("✅ Settings saved.");
    Ok(settings)
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn status_cell(status: RenewalStatus) -> Cell {
    match status {
        RenewalStatus::Pending => Cell::new("pending").fg(PENDING_GREEN),
        RenewalStatus::Missed => Cell::new("missed").fg(MISSED_RED),
        RenewalStatus::Unscheduled => Cell::new("no renewal date set").fg(TODAY_YELLOW),
        RenewalStatus::NotDue => Cell::new("not due"),
    }
}
