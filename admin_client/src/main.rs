use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::Receiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_client::config::ClientConfig;
use admin_client::error::AdminError;
use admin_client::models::{Doctor, Patient, VerificationRequest};
use admin_client::notify::{Level, Notification};
use admin_client::shell::{side_nav, AuthGate, Route};
use admin_client::views::{
    Dashboard, DashboardView, DetailView, DoctorDetail, DoctorsList, ListView, LoginForm, LoginView,
    PatientDetail, PatientsList, VerificationRequests,
};
use admin_client::AppContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Clinic admin console", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Clear every stored session entry
    Logout,
    /// Payments and appointment totals
    Dashboard {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    Patients {
        /// Filter by name
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    Patient { id: String },
    /// Block or unblock a patient
    TogglePatient { id: String },
    Doctors {
        /// Filter by name
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    Doctor { id: String },
    /// Block or unblock a doctor
    ToggleDoctor { id: String },
    /// Pending doctor-license verifications
    Requests {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    Approve { id: String },
    Reject { id: String },
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::Dashboard { .. } => Route::Dashboard,
            Command::Patients { .. } => Route::Patients,
            Command::Patient { id } | Command::TogglePatient { id } => Route::Patient(id.clone()),
            Command::Doctors { .. } => Route::Doctors,
            Command::Doctor { id } | Command::ToggleDoctor { id } => Route::Doctor(id.clone()),
            Command::Requests { .. } | Command::Approve { .. } | Command::Reject { .. } => Route::Requests,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env().context("failed to load configuration")?;
    let ctx = AppContext::with_file_session(config).context("failed to start session")?;
    let gate = AuthGate::new(&ctx);
    let mut inbox = ctx.notifier.subscribe();

    let route = args.command.route();
    if route.is_protected() && gate.resolve(route.clone()) == Route::Login {
        bail!("not signed in; run `admin_console login` first");
    }

    let outcome = run(&ctx, &gate, args.command).await;
    print_notifications(&mut inbox);

    if let Err(e) = outcome {
        let signed_out = gate.handle_error(&e).or_else(|| gate.handle_failed_queries());
        if signed_out == Some(Route::Login) {
            bail!("session rejected by the server; signed out, please log in again");
        }
        return Err(e).context("command failed");
    }
    Ok(())
}

async fn run(ctx: &AppContext, gate: &AuthGate, command: Command) -> Result<(), AdminError> {
    match command {
        Command::Login { email, password } => {
            let redirect = LoginView::new(ctx).submit(LoginForm::new(email, password)).await?;
            println!("Signed in. Continue at {}", redirect.to);
            print_nav();
        }
        Command::Logout => {
            let route = gate.logout()?;
            println!("Signed out. Continue at {}", route);
        }
        Command::Dashboard { page } => {
            let mut view = Dashboard::new(ctx);
            view.set_page(page);
            print_dashboard(&view.load().await)?;
        }
        Command::Patients { search, page } => {
            let mut view = PatientsList::new(ctx);
            if !search.is_empty() {
                view.search_mut().type_text(&search);
                view.search_mut().settle().await;
            }
            view.set_page(page);
            print_list(&view.load().await, patient_row)?;
        }
        Command::Patient { id } => {
            let view = PatientDetail::new(ctx, &id);
            print_detail(&view.load().await, patient_detail)?;
            println!("[{}]", view.toggle_button().label);
        }
        Command::TogglePatient { id } => {
            let view = PatientDetail::new(ctx, &id);
            view.toggle_block().await?;
            print_detail(&view.load().await, patient_detail)?;
        }
        Command::Doctors { search, page } => {
            let mut view = DoctorsList::new(ctx);
            if !search.is_empty() {
                view.search_mut().type_text(&search);
                view.search_mut().settle().await;
            }
            view.set_page(page);
            print_list(&view.load().await, doctor_row)?;
        }
        Command::Doctor { id } => {
            let view = DoctorDetail::new(ctx, &id);
            print_detail(&view.load().await, doctor_detail)?;
            println!("[{}]", view.toggle_button().label);
        }
        Command::ToggleDoctor { id } => {
            let view = DoctorDetail::new(ctx, &id);
            view.toggle_block().await?;
            print_detail(&view.load().await, doctor_detail)?;
        }
        Command::Requests { page } => {
            let mut view = VerificationRequests::new(ctx);
            view.set_page(page);
            print_list(&view.load().await, request_row)?;
        }
        Command::Approve { id } => {
            VerificationRequests::new(ctx).approve(&id).await?;
        }
        Command::Reject { id } => {
            VerificationRequests::new(ctx).reject(&id).await?;
        }
    }
    Ok(())
}

fn print_nav() {
    let labels: Vec<String> = side_nav()
        .into_iter()
        .map(|item| format!("{} ({})", item.label, item.route))
        .collect();
    println!("{}", labels.join(" | "));
}

fn print_list<T>(view: &ListView<T>, row: fn(&T) -> String) -> Result<(), AdminError> {
    match view {
        ListView::Loading => println!("Loading..."),
        ListView::Error(message) => return Err(AdminError::request(None, message.clone())),
        ListView::Empty(message) => println!("{}", message),
        ListView::Ready(page) => {
            for item in &page.items {
                println!("{}", row(item));
            }
            if page.show_pagination {
                println!("-- page {} of {} --", page.page, page.total_pages);
            }
        }
    }
    Ok(())
}

fn print_detail<T>(view: &DetailView<T>, show: fn(&T) -> String) -> Result<(), AdminError> {
    match view {
        DetailView::Loading => println!("Loading..."),
        DetailView::Error(message) => return Err(AdminError::request(None, message.clone())),
        DetailView::Ready(item) => println!("{}", show(item)),
    }
    Ok(())
}

fn print_dashboard(view: &DashboardView) -> Result<(), AdminError> {
    let page = match view {
        DashboardView::Loading => {
            println!("Loading...");
            return Ok(());
        }
        DashboardView::Error(message) => return Err(AdminError::request(None, message.clone())),
        DashboardView::Ready(page) => page,
    };
    let s = &page.summary;
    println!("Profit {:.2} | Sales {:.2}", s.profit, s.sales);
    println!(
        "Appointments: {} taken, {} completed, {} pending",
        s.appointments_taken, s.appointments_completed, s.appointments_pending
    );
    println!("Payments: {} pending, {} failed", s.payment_pending, s.payment_failed);
    for p in page.payments() {
        println!(
            "{:<10} {:<20} {} {} {:>10.2} {:<8} {}",
            p.id, p.patient_name, p.appointment_date, p.appointment_time, p.amount, p.payment_method, p.status
        );
    }
    if page.show_pagination {
        println!("-- page {} of {} --", page.page, page.summary.payments.total_pages);
    }
    Ok(())
}

fn status(is_blocked: bool) -> &'static str {
    if is_blocked {
        "Blocked"
    } else {
        "Active"
    }
}

fn na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn patient_row(p: &Patient) -> String {
    format!("{:<10} {:<24} {:<28} {}", p.id, na(&p.name), p.email, status(p.is_blocked))
}

fn patient_detail(p: &Patient) -> String {
    format!(
        "{} <{}> {}\nAppointments: {} taken, {} completed, {} pending\nSpent {:.2} | Profit {:.2}",
        na(&p.name),
        p.email,
        status(p.is_blocked),
        p.appointments_taken,
        p.appointments_completed,
        p.appointments_pending,
        p.total_spent,
        p.profit
    )
}

fn doctor_row(d: &Doctor) -> String {
    let experience = d
        .experience_years
        .map(|y| format!("{} years", y))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{:<10} {:<24} {:<18} {:<14} {:<10} {}",
        d.id,
        na(&d.name),
        na(&d.specialization),
        na(&d.qualification),
        experience,
        status(d.is_blocked)
    )
}

fn doctor_detail(d: &Doctor) -> String {
    format!(
        "{} ({}, {}) <{}> {} {}\nExperience: {} years | Phone {}\nAppointments: {} taken, {} completed, {} pending | Profit {:.2}",
        na(&d.name),
        na(&d.specialization),
        na(&d.qualification),
        d.email,
        na(&d.gender),
        status(d.is_blocked),
        d.experience_years.unwrap_or_default(),
        na(&d.phone),
        d.appointments_taken,
        d.appointments_completed,
        d.appointments_pending,
        d.profit
    )
}

fn request_row(r: &VerificationRequest) -> String {
    format!(
        "{:<10} {:<24} {:<28} {:<14} {}",
        r.id, r.doctor_name, r.email, r.medical_license_number, r.specialization
    )
}

fn print_notifications(inbox: &mut Receiver<Notification>) {
    while let Ok(note) = inbox.try_recv() {
        match note.level {
            Level::Success => println!("✅ {}", note.message),
            Level::Error => eprintln!("❌ {}", note.message),
        }
    }
}
