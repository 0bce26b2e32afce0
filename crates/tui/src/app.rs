use std::{io, thread, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use belavia_core::{
    flight, AppConfig, FixedSelection, FleetStore, FlightSchedule, SaveManager,
};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::block_font;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 96;
const MAX_ACTIVITY: usize = 200;
const BANNER_TEXT: &str = "Belavia";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    CreateAirport,
    DeleteAirport,
    ViewAirports,
    CreateRoute,
    DeleteRoute,
    ViewRoutes,
    CreateFlight,
    ViewFlights,
    CreateClient,
    DeleteClient,
    ViewClients,
    CreateAirplane,
    DeleteAirplane,
    ViewAirplanes,
    Save,
    Load,
    BookTicket,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 18] = [
        Self::CreateAirport,
        Self::DeleteAirport,
        Self::ViewAirports,
        Self::CreateRoute,
        Self::DeleteRoute,
        Self::ViewRoutes,
        Self::CreateFlight,
        Self::ViewFlights,
        Self::CreateClient,
        Self::DeleteClient,
        Self::ViewClients,
        Self::CreateAirplane,
        Self::DeleteAirplane,
        Self::ViewAirplanes,
        Self::Save,
        Self::Load,
        Self::BookTicket,
        Self::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::CreateAirport => "Airport · create",
            Self::DeleteAirport => "Airport · delete",
            Self::ViewAirports => "Airport · view",
            Self::CreateRoute => "Route · create",
            Self::DeleteRoute => "Route · delete",
            Self::ViewRoutes => "Route · view",
            Self::CreateFlight => "Flight · create",
            Self::ViewFlights => "Flight · view",
            Self::CreateClient => "Client · create",
            Self::DeleteClient => "Client · delete",
            Self::ViewClients => "Client · view",
            Self::CreateAirplane => "Airplane · create",
            Self::DeleteAirplane => "Airplane · delete",
            Self::ViewAirplanes => "Airplane · view",
            Self::Save => "Data · save",
            Self::Load => "Data · load",
            Self::BookTicket => "Buy ticket",
            Self::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Airports,
    Routes,
    Flights,
    Clients,
    Airplanes,
}

impl View {
    fn title(self) -> &'static str {
        match self {
            Self::Airports => "Airports",
            Self::Routes => "Routes",
            Self::Flights => "Flights",
            Self::Clients => "Clients",
            Self::Airplanes => "Airplanes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormPurpose {
    CreateAirport,
    DeleteAirport,
    CreateRoute,
    CreateFlight { route_position: usize },
    CreateClient,
    CreateAirplane,
    DeleteAirplane,
}

#[derive(Debug, Clone)]
struct FormField {
    label: &'static str,
    input: String,
    cursor: usize,
}

#[derive(Debug, Clone)]
struct FormModal {
    title: String,
    fields: Vec<FormField>,
    focus: usize,
    purpose: FormPurpose,
}

impl FormModal {
    fn new(title: impl Into<String>, purpose: FormPurpose, labels: &[&'static str]) -> Self {
        Self {
            title: title.into(),
            fields: labels
                .iter()
                .map(|label| FormField {
                    label,
                    input: String::new(),
                    cursor: 0,
                })
                .collect(),
            focus: 0,
            purpose,
        }
    }

    fn field_mut(&mut self) -> &mut FormField {
        &mut self.fields[self.focus]
    }

    fn on_last_field(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }

    fn next_field(&mut self) {
        if !self.on_last_field() {
            self.focus += 1;
        }
    }

    fn prev_field(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn move_cursor(&mut self, delta: isize) {
        let field = self.field_mut();
        let len = field.input.chars().count() as isize;
        field.cursor = (field.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn move_home(&mut self) {
        self.field_mut().cursor = 0;
    }

    fn move_end(&mut self) {
        let field = self.field_mut();
        field.cursor = field.input.chars().count();
    }

    fn insert(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let field = self.field_mut();
        if field.input.chars().count() >= MAX_INPUT_LEN {
            return;
        }
        let at = byte_index(&field.input, field.cursor);
        field.input.insert(at, ch);
        field.cursor += 1;
    }

    fn backspace(&mut self) {
        let field = self.field_mut();
        if field.cursor == 0 {
            return;
        }
        field.cursor -= 1;
        let at = byte_index(&field.input, field.cursor);
        field.input.remove(at);
    }

    fn delete(&mut self) {
        let field = self.field_mut();
        if field.cursor < field.input.chars().count() {
            let at = byte_index(&field.input, field.cursor);
            field.input.remove(at);
        }
    }

    fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.input.trim().to_string())
            .collect()
    }
}

fn byte_index(input: &str, char_index: usize) -> usize {
    input
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(input.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PickPurpose {
    RouteAirplane {
        departure: String,
        arrival: String,
        distance_km: u32,
    },
    DeleteRoute,
    FlightRoute,
    TicketFlight,
    TicketClient {
        flight_index: usize,
    },
}

#[derive(Debug, Clone)]
struct PickModal {
    title: String,
    options: Vec<String>,
    cursor: usize,
    purpose: PickPurpose,
}

impl PickModal {
    fn new(title: impl Into<String>, options: Vec<String>, purpose: PickPurpose) -> Self {
        Self {
            title: title.into(),
            options,
            cursor: 0,
            purpose,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.options.len().saturating_sub(1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Operator console over a single in-memory store.
pub struct BelaviaApp {
    store: FleetStore,
    save_manager: SaveManager,
    config: AppConfig,
    state: UiState,
    form: Option<FormModal>,
    pick: Option<PickModal>,
    theme: Theme,
}

impl BelaviaApp {
    pub fn new(store: FleetStore, save_manager: SaveManager, config: AppConfig) -> Self {
        Self {
            store,
            save_manager,
            config,
            state: UiState::default(),
            form: None,
            pick: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.set_status(format!(
            "Save file: {}",
            self.save_manager.path().display()
        ));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        info!("Operator console closed");
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.report_failure(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.pick.is_some() {
            self.handle_pick_key(key)
        } else if self.form.is_some() {
            self.handle_form_key(key)
        } else {
            self.handle_menu_key(key)
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_menu_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_menu_cursor(-1),
            KeyCode::Home => self.state.menu_cursor = 0,
            KeyCode::End => self.state.menu_cursor = MenuAction::ALL.len() - 1,
            KeyCode::PageDown => self.state.scroll_view(10),
            KeyCode::PageUp => self.state.scroll_view(-10),
            KeyCode::Enter => {
                let action = MenuAction::ALL[self.state.menu_cursor];
                self.trigger(action)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn trigger(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::CreateAirport => {
                self.open_form("Create airport", FormPurpose::CreateAirport, &["Airport"]);
            }
            MenuAction::DeleteAirport => {
                self.open_form("Delete airport", FormPurpose::DeleteAirport, &["Airport"]);
            }
            MenuAction::ViewAirports => self.state.show(View::Airports),
            MenuAction::CreateRoute => self.open_form(
                "Create route",
                FormPurpose::CreateRoute,
                &["Departure airport", "Arrival airport", "Distance (km)"],
            ),
            MenuAction::DeleteRoute => {
                if self.store.routes().is_empty() {
                    bail!("no routes to delete");
                }
                self.state.show(View::Routes);
                self.open_pick("Choose a route to delete", self.route_options(), PickPurpose::DeleteRoute);
            }
            MenuAction::ViewRoutes => self.state.show(View::Routes),
            MenuAction::CreateFlight => {
                if self.store.routes().is_empty() {
                    bail!("no routes available, create a route first");
                }
                self.open_pick("Choose a route", self.route_options(), PickPurpose::FlightRoute);
            }
            MenuAction::ViewFlights => self.state.show(View::Flights),
            MenuAction::CreateClient => self.open_form(
                "Create client",
                FormPurpose::CreateClient,
                &[
                    "Client name",
                    "Client phone",
                    "Company? (1-yes/2-no)",
                    "Airplanes (company only)",
                ],
            ),
            MenuAction::DeleteClient => {
                let notice = self.config.support_contact.clone();
                self.report_success(notice);
            }
            MenuAction::ViewClients => self.state.show(View::Clients),
            MenuAction::CreateAirplane => self.open_form(
                "Create airplane",
                FormPurpose::CreateAirplane,
                &["Airplane name", "Seat count", "Range (km)", "Airport"],
            ),
            MenuAction::DeleteAirplane => {
                self.open_form("Delete airplane", FormPurpose::DeleteAirplane, &["Airplane"]);
            }
            MenuAction::ViewAirplanes => self.state.show(View::Airplanes),
            MenuAction::Save => {
                self.save_manager.save(&self.store)?;
                self.report_success(format!(
                    "Data saved to {}",
                    self.save_manager.path().display()
                ));
            }
            MenuAction::Load => {
                if let Err(err) = self.save_manager.load(&mut self.store) {
                    error!(%err, "Load failed");
                    return Err(anyhow!(err).context("load aborted, all data cleared"));
                }
                self.report_success(format!(
                    "Data loaded from {}",
                    self.save_manager.path().display()
                ));
            }
            MenuAction::BookTicket => {
                if self.store.flights().is_empty() {
                    bail!("no flights available");
                }
                let options = self
                    .store
                    .flights()
                    .list()
                    .iter()
                    .enumerate()
                    .map(|(index, record)| format!("{index}. {record}"))
                    .collect();
                self.open_pick("Choose a flight", options, PickPurpose::TicketFlight);
            }
            MenuAction::Exit => {
                self.state.should_quit = true;
            }
        }
        Ok(())
    }

    fn open_form(&mut self, title: &str, purpose: FormPurpose, labels: &[&'static str]) {
        self.form = Some(FormModal::new(title, purpose, labels));
    }

    fn open_pick(&mut self, title: impl Into<String>, options: Vec<String>, purpose: PickPurpose) {
        self.pick = Some(PickModal::new(title, options, purpose));
    }

    fn route_options(&self) -> Vec<String> {
        self.store
            .routes()
            .list()
            .iter()
            .enumerate()
            .map(|(index, route)| format!("{}. {} ({} km)", index + 1, route.key, route.distance_km))
            .collect()
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let mut submit = false;
        let mut cancel = false;
        if let Some(form) = self.form.as_mut() {
            match key.code {
                KeyCode::Esc => cancel = true,
                KeyCode::Enter => {
                    if form.on_last_field() {
                        submit = true;
                    } else {
                        form.next_field();
                    }
                }
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Left => form.move_cursor(-1),
                KeyCode::Right => form.move_cursor(1),
                KeyCode::Home => form.move_home(),
                KeyCode::End => form.move_end(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Delete => form.delete(),
                KeyCode::Char(ch) => {
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                        form.insert(ch);
                    }
                }
                _ => {}
            }
        }

        if cancel {
            if let Some(form) = self.form.take() {
                self.state.set_status(format!("{} cancelled", form.title));
            }
            return Ok(());
        }
        if submit {
            if let Some(form) = self.form.take() {
                self.submit_form(form)?;
            }
        }
        Ok(())
    }

    fn submit_form(&mut self, form: FormModal) -> Result<()> {
        let values = form.values();
        match form.purpose {
            FormPurpose::CreateAirport => {
                let name = required(&values[0], "airport")?;
                self.store.create_airport(name)?;
                self.state.show(View::Airports);
                self.report_success(format!("Airport created: {name}"));
            }
            FormPurpose::DeleteAirport => {
                let name = required(&values[0], "airport")?;
                let airplanes = self.store.delete_airport(name).unwrap_or_default();
                for airplane in &airplanes {
                    self.report_success(format!("Deleting airplane: {airplane}"));
                }
                self.state.show(View::Airports);
                self.report_success(format!("Airport deleted: {name}"));
            }
            FormPurpose::CreateRoute => {
                let departure = required(&values[0], "departure airport")?.to_string();
                let arrival = required(&values[1], "arrival airport")?.to_string();
                let distance_km = parse_number(&values[2], "distance")?;
                let options = self
                    .store
                    .route_candidates(&departure, &arrival)?
                    .iter()
                    .enumerate()
                    .map(|(index, choice)| format!("{}. {choice}", index + 1))
                    .collect();
                self.open_pick(
                    format!("Available airplanes at {departure}"),
                    options,
                    PickPurpose::RouteAirplane {
                        departure,
                        arrival,
                        distance_km,
                    },
                );
            }
            FormPurpose::CreateFlight { route_position } => {
                let name = required(&values[0], "flight")?;
                let schedule = FlightSchedule {
                    departure_time: values[1].clone(),
                    departure_date: values[2].clone(),
                    arrival_time: values[3].clone(),
                    arrival_date: values[4].clone(),
                };
                let record = self.store.create_flight(name, route_position, &schedule)?;
                self.state.show(View::Flights);
                self.report_success(format!("Flight created: {record}"));
            }
            FormPurpose::CreateClient => {
                let name = required(&values[0], "client name")?;
                let is_company = parse_company(&values[2])?;
                let airplane_count = if is_company {
                    parse_number(&values[3], "airplane count")?
                } else {
                    0
                };
                let id = self
                    .store
                    .create_client(name, &values[1], is_company, airplane_count);
                let summary = self
                    .store
                    .clients()
                    .get(id)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| name.to_string());
                self.state.show(View::Clients);
                self.report_success(format!("Client created: {summary}"));
            }
            FormPurpose::CreateAirplane => {
                let name = required(&values[0], "airplane name")?;
                let seats = parse_number(&values[1], "seat count")?;
                let range = parse_number(&values[2], "range")?;
                let airport = required(&values[3], "airport")?;
                let summary = self
                    .store
                    .create_airplane(name, seats, range, airport)?
                    .to_string();
                self.state.show(View::Airplanes);
                self.report_success(format!("Airplane created: {summary}"));
            }
            FormPurpose::DeleteAirplane => {
                let name = required(&values[0], "airplane")?;
                let removed = self.store.delete_airplane(name)?;
                self.state.show(View::Airplanes);
                self.report_success(format!("Airplane deleted: {removed}"));
            }
        }
        Ok(())
    }

    fn handle_pick_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(pick) = self.pick.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                let cancelled = self.pick.take();
                if let Some(PickPurpose::RouteAirplane { departure, .. }) =
                    cancelled.map(|pick| pick.purpose)
                {
                    self.report_failure(format!(
                        "Route not created: no airplane chosen at {departure}"
                    ));
                } else {
                    self.state.set_status("Selection cancelled".to_string());
                }
            }
            KeyCode::Char('j') | KeyCode::Down => pick.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => pick.move_cursor(-1),
            KeyCode::PageDown => pick.move_cursor(10),
            KeyCode::PageUp => pick.move_cursor(-10),
            KeyCode::Home => pick.cursor = 0,
            KeyCode::End => pick.move_cursor(isize::MAX / 2),
            KeyCode::Enter => {
                if let Some(pick) = self.pick.take() {
                    self.choose(pick.purpose, pick.cursor)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn choose(&mut self, purpose: PickPurpose, index: usize) -> Result<()> {
        match purpose {
            PickPurpose::RouteAirplane {
                departure,
                arrival,
                distance_km,
            } => {
                let route = self.store.create_route(
                    &departure,
                    &arrival,
                    distance_km,
                    &mut FixedSelection(index + 1),
                )?;
                self.state.show(View::Routes);
                self.report_success(format!(
                    "Route created: {}, Distance: {} km",
                    route.key, route.distance_km
                ));
            }
            PickPurpose::DeleteRoute => {
                let key = self.store.delete_route(index + 1)?;
                self.report_success(format!("Route deleted: {key}"));
            }
            PickPurpose::FlightRoute => {
                self.open_form(
                    "Create flight",
                    FormPurpose::CreateFlight {
                        route_position: index + 1,
                    },
                    &[
                        "Flight",
                        "Departure time",
                        "Departure date",
                        "Arrival time",
                        "Arrival date",
                    ],
                );
            }
            PickPurpose::TicketFlight => {
                if self.store.clients().is_empty() {
                    bail!("no clients available");
                }
                let options = self
                    .store
                    .clients()
                    .list()
                    .iter()
                    .enumerate()
                    .map(|(position, client)| format!("{}. {}", position + 1, client.name))
                    .collect();
                self.open_pick(
                    "Choose a client",
                    options,
                    PickPurpose::TicketClient {
                        flight_index: index,
                    },
                );
            }
            PickPurpose::TicketClient { flight_index } => {
                let ticket_id = self.store.book_ticket(flight_index, index + 1)?;
                let booked = self.store.tickets().get(ticket_id).and_then(|ticket| {
                    self.store
                        .clients()
                        .get(ticket.client)
                        .map(|client| format!("Ticket booked: {} - {}", ticket.flight, client.name))
                });
                self.state.show(View::Clients);
                self.report_success(booked.unwrap_or_else(|| "Ticket booked".to_string()));
            }
        }
        Ok(())
    }

    fn report_success(&mut self, message: String) {
        self.state.push_activity(&message, false);
        self.state.set_status(message);
    }

    fn report_failure(&mut self, message: String) {
        self.state.push_activity(&message, true);
        self.state.set_status(message);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let banner_lines = block_font::render(BANNER_TEXT);
        let banner_height = (banner_lines.len() as u16 + 2).min(area.height / 3);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_banner(frame, layout[0], &banner_lines);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(30)])
            .split(layout[1]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(8)])
            .split(body[1]);

        self.render_menu(frame, body[0]);
        self.render_view(frame, right[0]);
        self.render_activity(frame, right[1]);
        self.render_status(frame, layout[2]);

        if let Some(form) = &self.form {
            self.render_form(frame, form);
        }
        if let Some(pick) = &self.pick {
            self.render_pick(frame, pick);
        }
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, lines: &[String]) {
        let content: Vec<Line> = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL).title("Operator Console"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuAction::ALL
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                if idx == self.state.menu_cursor {
                    ListItem::new(Line::from(Span::styled(
                        format!("▶ {}", action.label()),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )))
                } else {
                    ListItem::new(Line::from(Span::styled(
                        format!("  {}", action.label()),
                        Style::default().fg(self.theme.primary_fg),
                    )))
                }
            })
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(self.state.menu_cursor));
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_view(&self, frame: &mut Frame, area: Rect) {
        let lines = self.view_lines();
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.state.view.title()),
            )
            .scroll((self.state.view_scroll as u16, 0))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn view_lines(&self) -> Vec<Line<'static>> {
        let muted = Style::default().fg(self.theme.muted);
        let mut lines = Vec::new();
        match self.state.view {
            View::Airports => {
                let airports = self.store.airports();
                for name in airports.list() {
                    lines.push(Line::from(format!("Airport: {name}")));
                    match airports.airplanes_of(name) {
                        Some(airplanes) if !airplanes.is_empty() => {
                            lines.push(Line::from("  Associated Airplanes:"));
                            for airplane in airplanes {
                                lines.push(Line::from(format!("    {airplane}")));
                            }
                        }
                        _ => lines.push(Line::styled("  No airplanes associated.", muted)),
                    }
                }
            }
            View::Routes => {
                for (index, route) in self.store.routes().list().iter().enumerate() {
                    lines.push(Line::from(format!(
                        "{}. {}  {} km",
                        index + 1,
                        route.key,
                        route.distance_km
                    )));
                }
            }
            View::Flights => {
                for (index, record) in self.store.flights().list().iter().enumerate() {
                    match flight::summarize(record) {
                        Some(summary) => {
                            lines.push(Line::from(vec![
                                Span::raw(format!("{index}. ")),
                                Span::styled(
                                    summary.name.to_string(),
                                    Style::default().add_modifier(Modifier::BOLD),
                                ),
                                Span::raw(format!("  {}", summary.route)),
                            ]));
                            lines.push(Line::styled(
                                format!(
                                    "    departs {}  arrives {}",
                                    summary.departure, summary.arrival
                                ),
                                muted,
                            ));
                        }
                        None => lines.push(Line::from(format!("{index}. {record}"))),
                    }
                }
            }
            View::Clients => {
                let tickets = self.store.tickets();
                for client in self.store.clients().list() {
                    lines.push(Line::from(client.to_string()));
                    if client.tickets.is_empty() {
                        lines.push(Line::styled("  No tickets associated.", muted));
                    } else {
                        lines.push(Line::from("  Associated Tickets:"));
                        for ticket in tickets.of_client(client) {
                            lines.push(Line::from(format!("    {}", ticket.flight)));
                        }
                    }
                }
            }
            View::Airplanes => {
                for airplane in self.store.fleet().list() {
                    lines.push(Line::from(vec![
                        Span::raw(airplane.to_string()),
                        Span::styled(format!("  @ {}", airplane.home_airport), muted),
                    ]));
                }
            }
        }
        if lines.is_empty() {
            lines.push(Line::styled(
                format!("No {} yet.", self.state.view.title().to_lowercase()),
                muted,
            ));
        }
        lines
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.state.activity.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .state
            .activity
            .iter()
            .skip(skip)
            .map(|entry| {
                let color = if entry.failed {
                    self.theme.danger
                } else {
                    self.theme.success
                };
                Line::from(vec![
                    Span::styled(format!("{} ", entry.at), Style::default().fg(self.theme.muted)),
                    Span::styled(entry.message.clone(), Style::default().fg(color)),
                ])
            })
            .collect();
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Activity"));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let paragraph = Paragraph::new(Line::from(self.state.status.clone()))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, form: &FormModal) {
        let frame_area = frame.size();
        let label_width = form
            .fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);
        let height = (form.fields.len() as u16 + 4).min(frame_area.height);
        let width = 72_u16.min(frame_area.width.saturating_sub(4)).max(24);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let mut lines: Vec<Line> = form
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let focused = idx == form.focus;
                let marker = if focused { "> " } else { "  " };
                let style = if focused {
                    Style::default().fg(self.theme.accent)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Line::from(vec![
                    Span::styled(format!("{marker}{:<label_width$}  ", field.label), style),
                    Span::raw(field.input.clone()),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" next/submit  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" move  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(form.title.clone()));
        frame.render_widget(paragraph, area);

        let field = &form.fields[form.focus];
        let offset = (2 + label_width + 2 + field.cursor) as u16;
        let cursor_x = (area.x + 1 + offset).min(area.x + area.width.saturating_sub(2));
        let cursor_y = area.y + 1 + form.focus as u16;
        frame.set_cursor(cursor_x, cursor_y);
    }

    fn render_pick(&self, frame: &mut Frame, pick: &PickModal) {
        let frame_area = frame.size();
        let height = (pick.options.len() as u16 + 2).min(frame_area.height.saturating_sub(4)).max(3);
        let width = 80_u16.min(frame_area.width.saturating_sub(4)).max(24);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = pick
            .options
            .iter()
            .map(|option| ListItem::new(Line::from(option.clone())))
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(pick.cursor));
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(pick.title.clone()))
            .highlight_symbol("▶ ")
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() {
        bail!("{what} must not be empty");
    }
    Ok(value)
}

fn parse_number(value: &str, what: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .with_context(|| format!("{what} must be a whole number, got {value:?}"))
}

fn parse_company(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" => Ok(true),
        "2" | "n" | "no" | "" => Ok(false),
        other => bail!("answer 1 (company) or 2 (individual), got {other:?}"),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct ActivityEntry {
    at: String,
    message: String,
    failed: bool,
}

struct UiState {
    menu_cursor: usize,
    view: View,
    view_scroll: usize,
    status: String,
    activity: Vec<ActivityEntry>,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            menu_cursor: 0,
            view: View::Airports,
            view_scroll: 0,
            status: "Ready".to_string(),
            activity: Vec::new(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn show(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.view_scroll = 0;
        }
    }

    fn scroll_view(&mut self, delta: isize) {
        self.view_scroll = (self.view_scroll as isize + delta).max(0) as usize;
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let last = MenuAction::ALL.len() as isize - 1;
        self.menu_cursor = (self.menu_cursor as isize + delta).clamp(0, last) as usize;
    }

    fn push_activity(&mut self, message: &str, failed: bool) {
        if self.activity.len() >= MAX_ACTIVITY {
            self.activity.remove(0);
        }
        self.activity.push(ActivityEntry {
            at: Local::now().format("%H:%M:%S").to_string(),
            message: message.to_string(),
            failed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> BelaviaApp {
        BelaviaApp::new(
            FleetStore::new(),
            SaveManager::new("unused.txt"),
            AppConfig::default(),
        )
    }

    fn submit(app: &mut BelaviaApp, purpose: FormPurpose, values: &[&str]) -> Result<()> {
        let labels: Vec<&'static str> = values.iter().map(|_| "field").collect();
        let mut form = FormModal::new("test", purpose, &labels);
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.input = value.to_string();
        }
        app.submit_form(form)
    }

    #[test]
    fn form_editing_tracks_cursor() {
        let mut form = FormModal::new("t", FormPurpose::CreateAirport, &["Airport"]);
        for ch in "WAX".chars() {
            form.insert(ch);
        }
        form.backspace();
        form.insert('W');
        form.move_home();
        form.delete();
        form.insert('Ł');
        form.move_end();
        form.insert('!');
        assert_eq!(form.values(), vec!["ŁAW!".to_string()]);
        assert!(form.on_last_field());
    }

    #[test]
    fn route_flow_picks_airplane_then_creates() -> Result<()> {
        let mut app = app();
        submit(&mut app, FormPurpose::CreateAirport, &["WAW"])?;
        submit(&mut app, FormPurpose::CreateAirport, &["JFK"])?;
        submit(
            &mut app,
            FormPurpose::CreateAirplane,
            &["B737", "180", "3000", "WAW"],
        )?;
        submit(&mut app, FormPurpose::CreateRoute, &["WAW", "JFK", "2000"])?;

        let pick = app.pick.take().expect("airplane pick should open");
        assert_eq!(pick.options, vec!["1. Name: B737, Seats: 180, Range: 3000 km"]);
        app.choose(pick.purpose, 0)?;
        assert_eq!(app.store.routes().distance_of("WAW - JFK"), 2000);
        Ok(())
    }

    #[test]
    fn invalid_numbers_are_rejected_before_the_store() {
        let mut app = app();
        submit(&mut app, FormPurpose::CreateAirport, &["WAW"]).unwrap();
        let err = submit(
            &mut app,
            FormPurpose::CreateAirplane,
            &["B737", "many", "3000", "WAW"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("seat count"));
        assert!(app.store.fleet().list().is_empty());
    }

    #[test]
    fn ticket_flow_uses_flight_index_and_client_position() -> Result<()> {
        let mut app = app();
        app.trigger(MenuAction::BookTicket).unwrap_err();

        submit(&mut app, FormPurpose::CreateClient, &["LOT", "555", "1", "12"])?;
        submit(&mut app, FormPurpose::CreateClient, &["Ann", "123", "2", ""])?;
        app.store.create_airport("WAW")?;
        app.store.create_airport("JFK")?;
        app.store.create_airplane("B737", 180, 3000, "WAW")?;
        app.store
            .create_route("WAW", "JFK", 2000, &mut FixedSelection(1))?;
        submit(
            &mut app,
            FormPurpose::CreateFlight { route_position: 1 },
            &["LO26", "10:15", "2024-05-01", "13:40", "2024-05-01"],
        )?;

        app.trigger(MenuAction::BookTicket)?;
        let pick = app.pick.take().expect("flight pick should open");
        app.choose(pick.purpose, 0)?;
        let pick = app.pick.take().expect("client pick should open");
        assert_eq!(pick.options, vec!["1. LOT", "2. Ann"]);
        app.choose(pick.purpose, 1)?;

        let ann = &app.store.clients().list()[1];
        assert_eq!(ann.tickets.len(), 1);
        assert!(!ann.is_company);
        assert_eq!(app.store.clients().list()[0].airplane_count, 12);
        assert!(app.state.status.starts_with("Ticket booked: LO26 | Route: WAW - JFK"));
        Ok(())
    }

    #[test]
    fn company_answer_parsing() {
        assert!(parse_company("1").unwrap());
        assert!(!parse_company("2").unwrap());
        assert!(parse_company("maybe").is_err());
    }
}
