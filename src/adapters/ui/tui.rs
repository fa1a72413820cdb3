//! Implements InputPort. Inquire-based interactive menus.
//!
//! Each screen collects input, calls one service operation and renders the outcome.
//! Domain errors are printed and the loop continues.

use crate::adapters::ui::progress;
use crate::adapters::ui::prompts::{self, Choice, Nav, Step};
use crate::adapters::ui::table::{Table, clip, hours, money};
use crate::domain::{
    CategoryId, ClientId, ClientUpdate, DomainError, EntryLine, NewCategory, NewClient, NewProject,
    NewTimeEntry, ProjectId, ProjectStatus, ProjectUpdate, TimeEntryId, TimeEntryUpdate,
};
use crate::ports::InputPort;
use crate::usecases::views::PeriodView;
use crate::usecases::{CommandOutcome, LedgerService, ReportService, SeedService};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use std::sync::Arc;
use tracing::info;

/// Prompt defaults taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct TuiSettings {
    pub default_hourly_rate: f64,
    pub recent_days: u32,
    pub report_days: u32,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    ledger: Arc<LedgerService>,
    reports: Arc<ReportService>,
    seeder: Arc<SeedService>,
    settings: TuiSettings,
}

/// Applies the ledger theme to every inquire prompt. Call once at startup.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightGreen))
        .with_highlighted_option_prefix(Styled::new("▸").with_fg(Color::LightGreen))
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightGreen)))
        .with_answer(StyleSheet::new().with_fg(Color::LightCyan))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn show(outcome: &CommandOutcome) {
    if outcome.success {
        prompts::success(&outcome.message);
    } else {
        prompts::failure(&outcome.message);
    }
}

fn show_error(e: &DomainError) {
    prompts::failure(&e.to_string());
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl TuiInputPort {
    pub fn new(
        ledger: Arc<LedgerService>,
        reports: Arc<ReportService>,
        seeder: Arc<SeedService>,
        settings: TuiSettings,
    ) -> Self {
        Self {
            ledger,
            reports,
            seeder,
            settings,
        }
    }

    async fn main_loop(&self) {
        loop {
            let picked = prompts::menu(
                "Main menu",
                &[
                    "Clients",
                    "Projects",
                    "Time tracking",
                    "Categories",
                    "Business summary",
                    "Period report",
                    "Database tools",
                    "Exit",
                ],
            );
            let step = match picked {
                Ok("Clients") => self.clients_menu().await,
                Ok("Projects") => self.projects_menu().await,
                Ok("Time tracking") => self.time_menu().await,
                Ok("Categories") => self.categories_menu().await,
                Ok("Business summary") => self.summary_screen().await,
                Ok("Period report") => self.report_screen().await,
                Ok("Database tools") => self.tools_menu().await,
                Ok(_) | Err(_) => return,
            };
            if step == Err(Nav::Quit) {
                return;
            }
        }
    }

    /// Runs `screen` until the user picks "Back" or presses Esc.
    async fn submenu<F, Fut>(&self, title: &str, options: &[&'static str], screen: F) -> Step<()>
    where
        F: Fn(&'static str) -> Fut,
        Fut: std::future::Future<Output = Step<()>>,
    {
        loop {
            let picked = match prompts::menu(title, options) {
                Ok("Back") | Err(Nav::Back) => return Ok(()),
                Ok(picked) => picked,
                Err(Nav::Quit) => return Err(Nav::Quit),
            };
            match screen(picked).await {
                Ok(()) | Err(Nav::Back) => {}
                Err(Nav::Quit) => return Err(Nav::Quit),
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clients
    // ─────────────────────────────────────────────────────────────────────────

    async fn clients_menu(&self) -> Step<()> {
        self.submenu(
            "Clients",
            &["Add client", "List clients", "View client", "Update client", "Delete client", "Back"],
            |picked| async move {
                match picked {
                    "Add client" => self.add_client().await,
                    "List clients" => self.list_clients().await,
                    "View client" => self.view_client().await,
                    "Update client" => self.update_client().await,
                    "Delete client" => self.delete_client().await,
                    _ => Ok(()),
                }
            },
        )
        .await
    }

    async fn pick_client(&self) -> Step<Option<ClientId>> {
        let rows = match self.ledger.list_clients().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(None);
            }
        };
        if rows.is_empty() {
            prompts::note("No clients yet. Add one first.");
            return Ok(None);
        }
        let choices = rows
            .into_iter()
            .map(|r| {
                Choice::new(
                    format!("{} <{}> (ID {})", r.client.name, r.client.email, r.client.id),
                    r.client.id,
                )
            })
            .collect();
        prompts::choose("Client:", choices).map(Some)
    }

    async fn add_client(&self) -> Step<()> {
        let name = prompts::required("Client name:")?;
        let email = prompts::required("Email:")?;
        let company = prompts::optional("Company:")?;
        let phone = prompts::optional("Phone:")?;
        let notes = prompts::optional("Notes:")?;
        let outcome = self
            .ledger
            .add_client(NewClient {
                name,
                email,
                company,
                phone,
                notes,
            })
            .await;
        show(&outcome);
        Ok(())
    }

    async fn list_clients(&self) -> Step<()> {
        let rows = match self.ledger.list_clients().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading("Clients");
        if rows.is_empty() {
            prompts::note("No clients found.");
            return Ok(());
        }
        let mut table =
            Table::new(["ID", "Name", "Email", "Company", "Projects", "Hours", "Earnings"])
                .right_align(&[0, 4, 5, 6]);
        for row in &rows {
            table.row([
                row.client.id.to_string(),
                row.client.name.clone(),
                row.client.email.clone(),
                or_dash(row.client.company.as_deref()),
                row.project_count.to_string(),
                hours(row.totals.hours),
                money(row.totals.earnings),
            ]);
        }
        print!("{}", table.render());
        Ok(())
    }

    async fn view_client(&self) -> Step<()> {
        let Some(id) = self.pick_client().await? else {
            return Ok(());
        };
        let detail = match self.ledger.view_client(id).await {
            Ok(detail) => detail,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let c = &detail.client;
        prompts::heading(&format!("Client #{}: {}", c.id, c.name));
        println!("Email:    {}", c.email);
        println!("Company:  {}", or_dash(c.company.as_deref()));
        println!("Phone:    {}", or_dash(c.phone.as_deref()));
        println!("Notes:    {}", or_dash(c.notes.as_deref()));
        println!("Since:    {}", c.created_at.format("%Y-%m-%d"));
        if detail.projects.is_empty() {
            prompts::note("No projects for this client.");
        } else {
            let mut table = Table::new(["ID", "Project", "Status", "Rate", "Hours", "Earnings"])
                .right_align(&[0, 3, 4, 5]);
            for row in &detail.projects {
                table.row([
                    row.project.id.to_string(),
                    row.project.name.clone(),
                    row.project.status.to_string(),
                    money(row.project.hourly_rate),
                    hours(row.totals.hours),
                    money(row.totals.earnings),
                ]);
            }
            println!();
            print!("{}", table.render());
        }
        println!(
            "Total: {} / {}",
            hours(detail.total.hours),
            money(detail.total.earnings)
        );
        Ok(())
    }

    async fn update_client(&self) -> Step<()> {
        let Some(id) = self.pick_client().await? else {
            return Ok(());
        };
        let detail = match self.ledger.view_client(id).await {
            Ok(detail) => detail,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let c = detail.client;
        let update = ClientUpdate {
            name: prompts::edit_text("Name:", &c.name)?,
            email: prompts::edit_text("Email:", &c.email)?,
            company: prompts::edit_optional("Company:", c.company.as_deref())?,
            phone: prompts::edit_optional("Phone:", c.phone.as_deref())?,
            notes: prompts::edit_optional("Notes:", c.notes.as_deref())?,
        };
        if update.is_empty() {
            prompts::note("Nothing changed.");
            return Ok(());
        }
        show(&self.ledger.update_client(id, update).await);
        Ok(())
    }

    async fn delete_client(&self) -> Step<()> {
        let Some(id) = self.pick_client().await? else {
            return Ok(());
        };
        let warning = "Delete this client with all of its projects and time entries?";
        if prompts::confirm(warning)? {
            show(&self.ledger.delete_client(id).await);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────────

    async fn projects_menu(&self) -> Step<()> {
        self.submenu(
            "Projects",
            &[
                "Add project",
                "List projects",
                "View project",
                "Change status",
                "Edit project",
                "Delete project",
                "Back",
            ],
            |picked| async move {
                match picked {
                    "Add project" => self.add_project().await,
                    "List projects" => self.list_projects().await,
                    "View project" => self.view_project().await,
                    "Change status" => self.change_status().await,
                    "Edit project" => self.edit_project().await,
                    "Delete project" => self.delete_project().await,
                    _ => Ok(()),
                }
            },
        )
        .await
    }

    async fn pick_project(&self) -> Step<Option<ProjectId>> {
        let rows = match self.ledger.list_projects().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(None);
            }
        };
        if rows.is_empty() {
            prompts::note("No projects yet. Add one first.");
            return Ok(None);
        }
        let choices = rows
            .into_iter()
            .map(|r| {
                Choice::new(
                    format!(
                        "{} for {} [{}] (ID {})",
                        r.project.name, r.client_name, r.project.status, r.project.id
                    ),
                    r.project.id,
                )
            })
            .collect();
        prompts::choose("Project:", choices).map(Some)
    }

    /// Category picker with a "no category" option. `None` when none exist.
    async fn pick_category(&self, current: Option<CategoryId>) -> Step<Option<Option<CategoryId>>> {
        let rows = match self.ledger.list_categories().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(None);
            }
        };
        if rows.is_empty() {
            return Ok(None);
        }
        let mut choices = vec![Choice::new("(no category)", None)];
        choices.extend(rows.into_iter().map(|r| {
            let marker = if current == Some(r.category.id) { " *" } else { "" };
            Choice::new(format!("{}{}", r.category.name, marker), Some(r.category.id))
        }));
        prompts::choose("Category:", choices).map(Some)
    }

    fn pick_status(current: ProjectStatus) -> Step<ProjectStatus> {
        let choices = ProjectStatus::ALL
            .iter()
            .map(|s| {
                let marker = if *s == current { " (current)" } else { "" };
                Choice::new(format!("{}{}", s, marker), *s)
            })
            .collect();
        prompts::choose("Status:", choices)
    }

    async fn add_project(&self) -> Step<()> {
        let Some(client_id) = self.pick_client().await? else {
            return Ok(());
        };
        let name = prompts::required("Project name:")?;
        let description = prompts::optional("Description:")?;
        let rate = prompts::amount("Hourly rate ($):", self.settings.default_hourly_rate)?;
        let deadline = prompts::optional_date("Deadline:", None)?;
        let category_id = self.pick_category(None).await?.flatten();
        let mut input = NewProject::new(name, client_id, rate);
        input.description = description;
        input.deadline = deadline;
        input.category_id = category_id;
        show(&self.ledger.add_project(input).await);
        Ok(())
    }

    async fn list_projects(&self) -> Step<()> {
        let rows = match self.ledger.list_projects().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading("Projects");
        if rows.is_empty() {
            prompts::note("No projects found.");
            return Ok(());
        }
        let mut table = Table::new([
            "ID", "Project", "Client", "Category", "Status", "Rate", "Hours", "Earnings",
        ])
        .right_align(&[0, 5, 6, 7]);
        for row in &rows {
            table.row([
                row.project.id.to_string(),
                row.project.name.clone(),
                row.client_name.clone(),
                or_dash(row.category_name.as_deref()),
                row.project.status.to_string(),
                money(row.project.hourly_rate),
                hours(row.totals.hours),
                money(row.totals.earnings),
            ]);
        }
        print!("{}", table.render());
        Ok(())
    }

    async fn view_project(&self) -> Step<()> {
        let Some(id) = self.pick_project().await? else {
            return Ok(());
        };
        let detail = match self.ledger.view_project(id).await {
            Ok(detail) => detail,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let p = &detail.project;
        prompts::heading(&format!("Project #{}: {}", p.id, p.name));
        println!("Client:      {}", detail.client.name);
        println!(
            "Category:    {}",
            or_dash(detail.category.as_ref().map(|c| c.name.as_str()))
        );
        println!("Status:      {}", p.status);
        println!("Rate:        {}/hr", money(p.hourly_rate));
        println!(
            "Deadline:    {}",
            p.deadline
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into())
        );
        println!("Description: {}", or_dash(p.description.as_deref()));
        if detail.entries.is_empty() {
            prompts::note("No time logged yet.");
        } else {
            println!();
            print!("{}", entry_table(&detail.entries, false).render());
        }
        println!(
            "Total: {} / {}",
            hours(detail.totals.hours),
            money(detail.totals.earnings)
        );
        Ok(())
    }

    async fn change_status(&self) -> Step<()> {
        let Some(id) = self.pick_project().await? else {
            return Ok(());
        };
        let current = match self.ledger.view_project(id).await {
            Ok(detail) => detail.project.status,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let status = Self::pick_status(current)?;
        show(&self.ledger.change_status(id, status).await);
        Ok(())
    }

    async fn edit_project(&self) -> Step<()> {
        let Some(id) = self.pick_project().await? else {
            return Ok(());
        };
        let p = match self.ledger.view_project(id).await {
            Ok(detail) => detail.project,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let name = prompts::edit_text("Name:", &p.name)?;
        let description = prompts::edit_optional("Description:", p.description.as_deref())?;
        let rate = prompts::amount("Hourly rate ($):", p.hourly_rate)?;
        let deadline = prompts::optional_date("Deadline:", p.deadline)?;
        let category = self.pick_category(p.category_id).await?;
        let update = ProjectUpdate {
            name,
            description,
            hourly_rate: (rate != p.hourly_rate).then_some(rate),
            status: None,
            deadline: (deadline != p.deadline).then_some(deadline),
            category_id: category.filter(|c| *c != p.category_id),
        };
        if update.is_empty() {
            prompts::note("Nothing changed.");
            return Ok(());
        }
        show(&self.ledger.update_project(id, update).await);
        Ok(())
    }

    async fn delete_project(&self) -> Step<()> {
        let Some(id) = self.pick_project().await? else {
            return Ok(());
        };
        if prompts::confirm("Delete this project and all of its time entries?")? {
            show(&self.ledger.delete_project(id).await);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Time entries
    // ─────────────────────────────────────────────────────────────────────────

    async fn time_menu(&self) -> Step<()> {
        self.submenu(
            "Time tracking",
            &["Log time", "Recent entries", "Edit entry", "Delete entry", "Back"],
            |picked| async move {
                match picked {
                    "Log time" => self.log_time().await,
                    "Recent entries" => self.recent_entries().await,
                    "Edit entry" => self.edit_entry().await,
                    "Delete entry" => self.delete_entry().await,
                    _ => Ok(()),
                }
            },
        )
        .await
    }

    /// Project first, then one of its entries.
    async fn pick_entry(&self) -> Step<Option<(TimeEntryId, ProjectId)>> {
        let Some(project_id) = self.pick_project().await? else {
            return Ok(None);
        };
        let detail = match self.ledger.view_project(project_id).await {
            Ok(detail) => detail,
            Err(e) => {
                show_error(&e);
                return Ok(None);
            }
        };
        if detail.entries.is_empty() {
            prompts::note("No time logged on this project.");
            return Ok(None);
        }
        let choices = detail
            .entries
            .iter()
            .map(|line| {
                let e = &line.entry;
                Choice::new(
                    format!(
                        "{}  {}  {} (ID {})",
                        e.date,
                        hours(e.hours_worked),
                        clip(&e.description, 40),
                        e.id
                    ),
                    e.id,
                )
            })
            .collect();
        let entry_id = prompts::choose("Entry:", choices)?;
        Ok(Some((entry_id, project_id)))
    }

    async fn log_time(&self) -> Step<()> {
        let Some(project_id) = self.pick_project().await? else {
            return Ok(());
        };
        let date = prompts::date("Date:", today())?;
        let hours_worked = prompts::amount("Hours worked:", 1.0)?;
        let description = prompts::required("What did you work on?")?;
        let task_type = prompts::optional("Task type (coding, design, meeting...):")?;
        let outcome = self
            .ledger
            .log_time(NewTimeEntry {
                project_id,
                date,
                hours_worked,
                description,
                task_type,
            })
            .await;
        show(&outcome);
        Ok(())
    }

    async fn recent_entries(&self) -> Step<()> {
        let days = prompts::whole_days("Show entries from the last N days:", self.settings.recent_days)?;
        let recent = match self.reports.recent_entries(days, today()).await {
            Ok(recent) => recent,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading(&format!("Time entries since {} ({} days)", recent.since, days));
        if recent.lines.is_empty() {
            prompts::note("No time entries in this window.");
            return Ok(());
        }
        print!("{}", entry_table(&recent.lines, true).render());
        println!(
            "Total: {} / {}",
            hours(recent.total.hours),
            money(recent.total.earnings)
        );
        Ok(())
    }

    async fn edit_entry(&self) -> Step<()> {
        let Some((entry_id, project_id)) = self.pick_entry().await? else {
            return Ok(());
        };
        let current = match self.ledger.view_project(project_id).await {
            Ok(detail) => detail
                .entries
                .into_iter()
                .map(|line| line.entry)
                .find(|e| e.id == entry_id),
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let Some(e) = current else {
            return Ok(());
        };
        let date = prompts::date("Date:", e.date)?;
        let worked = prompts::amount("Hours worked:", e.hours_worked)?;
        let description = prompts::edit_text("Description:", &e.description)?;
        let task_type = prompts::edit_optional("Task type:", e.task_type.as_deref())?;
        let update = TimeEntryUpdate {
            date: (date != e.date).then_some(date),
            hours_worked: (worked != e.hours_worked).then_some(worked),
            description,
            task_type,
        };
        if update.is_empty() {
            prompts::note("Nothing changed.");
            return Ok(());
        }
        show(&self.ledger.update_time_entry(entry_id, update).await);
        Ok(())
    }

    async fn delete_entry(&self) -> Step<()> {
        let Some((entry_id, _)) = self.pick_entry().await? else {
            return Ok(());
        };
        if prompts::confirm("Delete this time entry?")? {
            show(&self.ledger.delete_time_entry(entry_id).await);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    async fn categories_menu(&self) -> Step<()> {
        self.submenu(
            "Categories",
            &["Add category", "List categories", "Archive / restore", "Delete category", "Back"],
            |picked| async move {
                match picked {
                    "Add category" => self.add_category().await,
                    "List categories" => self.list_categories().await,
                    "Archive / restore" => self.toggle_category().await,
                    "Delete category" => self.delete_category().await,
                    _ => Ok(()),
                }
            },
        )
        .await
    }

    /// Picks from active and archived categories. Returns id and current state.
    async fn pick_any_category(&self) -> Step<Option<(CategoryId, bool)>> {
        let rows = match self.ledger.list_all_categories().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(None);
            }
        };
        if rows.is_empty() {
            prompts::note("No categories yet.");
            return Ok(None);
        }
        let choices = rows
            .into_iter()
            .map(|r| {
                let state = if r.category.is_active { "" } else { " [archived]" };
                Choice::new(
                    format!("{}{} (ID {})", r.category.name, state, r.category.id),
                    (r.category.id, r.category.is_active),
                )
            })
            .collect();
        prompts::choose("Category:", choices).map(Some)
    }

    async fn add_category(&self) -> Step<()> {
        let name = prompts::required("Category name:")?;
        let description = prompts::optional("Description:")?;
        let color_code = prompts::optional("Colour (#RRGGBB):")?;
        let outcome = self
            .ledger
            .add_category(NewCategory {
                name,
                description,
                color_code,
            })
            .await;
        show(&outcome);
        Ok(())
    }

    async fn list_categories(&self) -> Step<()> {
        let rows = match self.ledger.list_all_categories().await {
            Ok(rows) => rows,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading("Categories");
        if rows.is_empty() {
            prompts::note("No categories found.");
            return Ok(());
        }
        let mut table = Table::new(["ID", "Name", "Colour", "State", "Projects", "Description"])
            .right_align(&[0, 4]);
        for row in &rows {
            let c = &row.category;
            table.row([
                c.id.to_string(),
                c.name.clone(),
                or_dash(c.color_code.as_deref()),
                if c.is_active { "active" } else { "archived" }.to_string(),
                row.project_count.to_string(),
                clip(c.description.as_deref().unwrap_or("-"), 40),
            ]);
        }
        print!("{}", table.render());
        Ok(())
    }

    async fn toggle_category(&self) -> Step<()> {
        let Some((id, active)) = self.pick_any_category().await? else {
            return Ok(());
        };
        show(&self.ledger.set_category_active(id, !active).await);
        Ok(())
    }

    async fn delete_category(&self) -> Step<()> {
        let Some((id, _)) = self.pick_any_category().await? else {
            return Ok(());
        };
        if prompts::confirm("Delete this category? Projects keep existing without it.")? {
            show(&self.ledger.delete_category(id).await);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    async fn summary_screen(&self) -> Step<()> {
        let summary = match self.reports.business_summary(today()).await {
            Ok(summary) => summary,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading("Business summary");
        println!("Clients:              {}", summary.total_clients);
        println!("Projects:             {}", summary.total_projects);
        println!("Total hours:          {}", hours(summary.total_hours));
        println!("Total earnings:       {}", money(summary.total_earnings));
        println!("This month (hours):   {}", hours(summary.month_hours));
        println!("This month (earned):  {}", money(summary.month_earnings));
        println!("Average hourly rate:  {}", money(summary.avg_rate));
        Ok(())
    }

    async fn report_screen(&self) -> Step<()> {
        let days = prompts::whole_days("Report window (days):", self.settings.report_days)?;
        let view = match self.reports.period_report(days, today()).await {
            Ok(view) => view,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        render_period(&view);
        if view.report.is_empty() || !self.reports.can_export() {
            return Ok(());
        }
        if prompts::confirm("Export these entries to CSV?")? {
            match self.reports.export_period(&view).await {
                Ok(path) => prompts::success(&format!("Report written to {}", path.display())),
                Err(e) => show_error(&e),
            }
        }
        Ok(())
    }

    async fn tools_menu(&self) -> Step<()> {
        self.submenu(
            "Database tools",
            &["Seed sample data", "Store overview", "Back"],
            |picked| async move {
                match picked {
                    "Seed sample data" => self.seed().await,
                    "Store overview" => self.overview().await,
                    _ => Ok(()),
                }
            },
        )
        .await
    }

    async fn seed(&self) -> Step<()> {
        if !prompts::confirm("This deletes ALL existing data and inserts sample data. Continue?")? {
            return Ok(());
        }
        let bar = progress::spinner("Seeding sample data...");
        let result = self.seeder.run(today()).await;
        bar.finish_and_clear();
        match result {
            Ok(stats) => prompts::success(&format!(
                "Database seeded: {} categories, {} clients, {} projects, {} time entries",
                stats.categories, stats.clients, stats.projects, stats.time_entries
            )),
            Err(e) => show_error(&e),
        }
        Ok(())
    }

    async fn overview(&self) -> Step<()> {
        let overview = match self.reports.store_overview(today()).await {
            Ok(overview) => overview,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        prompts::heading("Store overview");
        let counts = overview.counts;
        println!(
            "Clients: {}  Projects: {}  Time entries: {}  Categories: {}",
            counts.clients, counts.projects, counts.time_entries, counts.categories
        );
        println!(
            "Total: {} / {}  (avg {}/hr)",
            hours(overview.summary.total_hours),
            money(overview.summary.total_earnings),
            money(overview.summary.avg_rate)
        );
        if !overview.latest.is_empty() {
            prompts::heading("Latest entries");
            print!("{}", entry_table(&overview.latest, true).render());
        }
        if !overview.top_clients.is_empty() {
            prompts::heading("Top clients");
            let mut table = Table::new(["Client", "Earnings"]).right_align(&[1]);
            for (name, earned) in &overview.top_clients {
                table.row([name.clone(), money(*earned)]);
            }
            print!("{}", table.render());
        }
        Ok(())
    }
}

fn entry_table(lines: &[EntryLine], with_project: bool) -> Table {
    let mut headers = vec!["ID", "Date"];
    if with_project {
        headers.extend(["Client", "Project"]);
    }
    headers.extend(["Task", "Hours", "Earnings", "Description"]);
    let numeric = if with_project { [0, 5, 6] } else { [0, 3, 4] };
    let mut table = Table::new(headers).right_align(&numeric);
    for line in lines {
        let e = &line.entry;
        let mut cells = vec![e.id.to_string(), e.date.to_string()];
        if with_project {
            cells.push(line.client_name.clone());
            cells.push(line.project_name.clone());
        }
        cells.push(or_dash(e.task_type.as_deref()));
        cells.push(hours(e.hours_worked));
        cells.push(money(line.earnings));
        cells.push(clip(&e.description, 40));
        table.row(cells);
    }
    table
}

fn render_period(view: &PeriodView) {
    let report = &view.report;
    prompts::heading(&format!(
        "Report {} to {} ({} days)",
        report.since, report.until, report.days
    ));
    if report.is_empty() {
        prompts::note("No time entries in this window.");
        return;
    }

    let mut by_project =
        Table::new(["Project", "Client", "Hours", "Earnings"]).right_align(&[2, 3]);
    for row in &view.projects {
        by_project.row([
            row.project_name.clone(),
            row.client_name.clone(),
            hours(row.tally.hours),
            money(row.tally.earnings),
        ]);
    }
    println!("By project");
    print!("{}", by_project.render());

    let mut by_day = Table::new(["Date", "Hours", "Earnings"]).right_align(&[1, 2]);
    for (date, tally) in report.days_newest_first() {
        by_day.row([date.to_string(), hours(tally.hours), money(tally.earnings)]);
    }
    println!("\nBy day");
    print!("{}", by_day.render());

    println!(
        "\n{} entries, {} / {}",
        report.entry_count,
        hours(report.total.hours),
        money(report.total.earnings)
    );
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> anyhow::Result<()> {
        info!("interactive session started");
        self.main_loop().await;
        println!("Goodbye!");
        info!("interactive session ended");
        Ok(())
    }
}
