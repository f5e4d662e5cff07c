//! Application state and navigation logic.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::data::range::query_string;
use crate::data::{CrateMask, RangeQuery, CRATE_SLOTS};
use crate::error::FetchError;
use crate::metric::{expr, MetricClient, MetricSeries, TimeWindow};
use crate::poll::{self, targets, FileListing, PollHandle, TriggerSettings};
use crate::ui::Theme;

/// Sampling steps the step menu cycles through, in seconds.
pub const STEPS: &[u64] = &[1, 10, 60, 600, 3600];

/// Rows in the crate selection grid (two columns, column-major order).
pub const GRID_ROWS: usize = CRATE_SLOTS / 2;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Horizon rows for the cavity temperature sensors.
    Horizon,
    /// Network monitor rows for the remote control room stations.
    Network,
    /// Crate selection grid and the crate-level chart.
    Crates,
    /// File listings for the watched processing streams.
    Files,
    /// Trigger settings readout.
    Settings,
    /// Scatter chart with the range search form.
    Scatter,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Horizon => View::Network,
            View::Network => View::Crates,
            View::Crates => View::Files,
            View::Files => View::Settings,
            View::Settings => View::Scatter,
            View::Scatter => View::Horizon,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Horizon => View::Scatter,
            View::Network => View::Horizon,
            View::Crates => View::Network,
            View::Files => View::Crates,
            View::Settings => View::Files,
            View::Scatter => View::Settings,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Horizon => "Temps",
            View::Network => "Network",
            View::Crates => "Crates",
            View::Files => "Files",
            View::Settings => "Settings",
            View::Scatter => "Scatter",
        }
    }
}

/// Which field of the range form is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Search,
    Start,
    End,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Search => FormField::Start,
            FormField::Start => FormField::End,
            FormField::End => FormField::Search,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub theme: Theme,
    pub config: AppConfig,

    client: MetricClient,
    runtime: Handle,

    // Poll handles (producer side lives on the runtime)
    horizon: PollHandle<Vec<MetricSeries>>,
    network: PollHandle<Vec<MetricSeries>>,
    crates: PollHandle<Vec<MetricSeries>>,
    listings: Vec<(String, PollHandle<FileListing>)>,
    trigger: PollHandle<TriggerSettings>,

    // Latest data per display region
    pub horizon_series: Vec<MetricSeries>,
    pub network_series: Vec<MetricSeries>,
    pub crate_series: Vec<MetricSeries>,
    pub file_listings: Vec<(String, FileListing)>,
    pub trigger_settings: Option<TriggerSettings>,
    pub load_error: Option<String>,

    // Selection state
    pub mask: CrateMask,
    pub selected_slot: usize,
    pub selected_row: usize,
    step: u64,

    // Range form (Scatter view)
    pub form: RangeQuery,
    pub form_active: bool,
    pub form_field: FormField,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
    pub last_updated: Option<Instant>,
}

impl App {
    /// Create a new App and start its pollers on the given runtime.
    pub fn new(config: AppConfig, client: MetricClient, runtime: Handle) -> Self {
        let mask = CrateMask::new(config.available_crates, config.available_crates);
        let step = config.step;

        let guard = runtime.enter();
        let horizon = spawn_group_poller(
            &client,
            "temperatures",
            expr::temperature_exprs(),
            &config,
            step,
        );
        let network = spawn_network_poller(&client, &config, step);
        let crates = spawn_group_poller(
            &client,
            "crates",
            expr::crate_exprs(&config.crate_metric),
            &config,
            step,
        );
        let listings = config
            .streams
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    spawn_listing_poller(&client, name, config.refresh),
                )
            })
            .collect();
        let trigger = spawn_settings_poller(&client, config.refresh);
        drop(guard);

        Self {
            running: true,
            current_view: View::Horizon,
            show_help: false,
            theme: Theme::auto_detect(),
            config,
            client,
            runtime,
            horizon,
            network,
            crates,
            listings,
            trigger,
            horizon_series: Vec::new(),
            network_series: Vec::new(),
            crate_series: Vec::new(),
            file_listings: Vec::new(),
            trigger_settings: None,
            load_error: None,
            mask,
            selected_slot: 0,
            selected_row: 0,
            step,
            form: RangeQuery::default(),
            form_active: false,
            form_field: FormField::default(),
            status_message: None,
            last_updated: None,
        }
    }

    /// The server this app is watching.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// The current sampling step in seconds.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// The query window the live views are currently showing.
    pub fn current_window(&self) -> TimeWindow {
        TimeWindow::trailing(
            Utc::now(),
            self.config.span,
            Duration::from_secs(self.step),
        )
    }

    /// Pull any new results from the pollers. Non-blocking; called once per
    /// draw loop iteration.
    pub fn drain(&mut self) {
        if let Some(series) = self.horizon.poll() {
            self.horizon_series = series;
            self.last_updated = Some(Instant::now());
        }
        if let Some(series) = self.network.poll() {
            self.network_series = series;
            self.last_updated = Some(Instant::now());
        }
        if let Some(series) = self.crates.poll() {
            self.crate_series = series;
            self.last_updated = Some(Instant::now());
        }
        for (name, handle) in &mut self.listings {
            if let Some(listing) = handle.poll() {
                if let Some(entry) = self.file_listings.iter_mut().find(|(n, _)| n == name) {
                    entry.1 = listing;
                } else {
                    self.file_listings.push((name.clone(), listing));
                }
                self.last_updated = Some(Instant::now());
            }
        }
        if let Some(settings) = self.trigger.poll() {
            self.trigger_settings = Some(settings);
            self.last_updated = Some(Instant::now());
        }

        self.load_error = self.first_error();
    }

    fn first_error(&self) -> Option<String> {
        self.horizon
            .error()
            .or_else(|| self.network.error())
            .or_else(|| self.crates.error())
            .or_else(|| self.trigger.error())
            .or_else(|| self.listings.iter().find_map(|(_, h)| h.error()))
            .map(str::to_string)
    }

    /// Advance the step menu and re-issue the metric queries.
    pub fn cycle_step(&mut self) {
        let next = STEPS
            .iter()
            .copied()
            .find(|&s| s > self.step)
            .unwrap_or(STEPS[0]);
        self.step = next;
        self.respawn_metric_pollers();
        self.set_status_message(format!("Sampling step: {}s", next));
    }

    /// Cancel the metric pollers and start fresh ones; the replacements
    /// fetch immediately.
    pub fn force_refresh(&mut self) {
        self.respawn_metric_pollers();
        self.set_status_message("Refreshing...".to_string());
    }

    fn respawn_metric_pollers(&mut self) {
        self.horizon.cancel();
        self.network.cancel();
        self.crates.cancel();

        let runtime = self.runtime.clone();
        let _guard = runtime.enter();
        self.horizon = spawn_group_poller(
            &self.client,
            "temperatures",
            expr::temperature_exprs(),
            &self.config,
            self.step,
        );
        self.network = spawn_network_poller(&self.client, &self.config, self.step);
        self.crates = spawn_group_poller(
            &self.client,
            "crates",
            expr::crate_exprs(&self.config.crate_metric),
            &self.config,
            self.step,
        );
    }

    /// Cancel every poller. Called once on the way out.
    pub fn shutdown(&self) {
        self.horizon.cancel();
        self.network.cancel();
        self.crates.cancel();
        self.trigger.cancel();
        for (_, handle) in &self.listings {
            handle.cancel();
        }
    }

    /// The series rows shown in the current view, if it is a row view.
    pub fn visible_series(&self) -> Option<&[MetricSeries]> {
        match self.current_view {
            View::Horizon => Some(&self.horizon_series),
            View::Network => Some(&self.network_series),
            _ => None,
        }
    }

    /// The selected series row in the Horizon/Network views.
    pub fn selected_series(&self) -> Option<&MetricSeries> {
        self.visible_series()?.get(self.selected_row)
    }

    /// The `/graph` navigation URL for the selected row over the current
    /// window.
    pub fn graph_url_for_selected(&self) -> Option<String> {
        let series = self.selected_series()?;
        Some(self.client.graph_url(series.expr(), &self.current_window()))
    }

    /// The gain history navigation URL for the selected crate and range
    /// form, mirroring the scatter page's query.
    pub fn gain_history_url(&self) -> String {
        let crate_number = self.selected_slot.saturating_sub(1).to_string();
        let query = query_string(&[
            ("crate", crate_number.as_str()),
            ("starting_run", self.form.start.trim()),
            ("ending_run", self.form.end.trim()),
        ]);
        format!("{}/crate_gain_history?{}", self.client.endpoint(), query)
    }

    // --- Status messages ---------------------------------------------------

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    // --- Navigation --------------------------------------------------------

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.selected_row = 0;
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.selected_row = 0;
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_row = 0;
    }

    pub fn select_next_row(&mut self) {
        if let Some(series) = self.visible_series() {
            let max = series.len().saturating_sub(1);
            self.selected_row = (self.selected_row + 1).min(max);
        }
    }

    pub fn select_prev_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    // --- Crate grid --------------------------------------------------------

    pub fn grid_up(&mut self) {
        if self.selected_slot % GRID_ROWS != 0 {
            self.selected_slot -= 1;
        }
    }

    pub fn grid_down(&mut self) {
        if self.selected_slot % GRID_ROWS != GRID_ROWS - 1 && self.selected_slot + 1 < CRATE_SLOTS
        {
            self.selected_slot += 1;
        }
    }

    pub fn grid_left(&mut self) {
        if self.selected_slot >= GRID_ROWS {
            self.selected_slot -= GRID_ROWS;
        }
    }

    pub fn grid_right(&mut self) {
        if self.selected_slot + GRID_ROWS < CRATE_SLOTS {
            self.selected_slot += GRID_ROWS;
        }
    }

    /// Toggle the selected crate slot in the plot mask.
    pub fn toggle_selected_slot(&mut self) {
        self.mask.toggle(self.selected_slot);
    }

    // --- Range form --------------------------------------------------------

    pub fn start_form(&mut self) {
        self.form_active = true;
        self.form_field = FormField::Start;
    }

    pub fn cancel_form(&mut self) {
        self.form_active = false;
    }

    pub fn next_form_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn cycle_search_field(&mut self) {
        self.form.field = self.form.field.next();
    }

    pub fn form_push(&mut self, c: char) {
        match self.form_field {
            FormField::Search => {}
            FormField::Start => self.form.start.push(c),
            FormField::End => self.form.end.push(c),
        }
    }

    pub fn form_pop(&mut self) {
        match self.form_field {
            FormField::Search => {}
            FormField::Start => {
                self.form.start.pop();
            }
            FormField::End => {
                self.form.end.pop();
            }
        }
    }

    /// Validate the range form; on success surface the history URL, on
    /// failure surface the validation message.
    pub fn submit_form(&mut self) {
        match self.form.validate() {
            Ok(()) => {
                let url = self.gain_history_url();
                self.form_active = false;
                self.set_status_message(format!("History: {}", url));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

// --- Poller construction ---------------------------------------------------

fn spawn_group_poller(
    client: &MetricClient,
    name: &str,
    exprs: Vec<String>,
    config: &AppConfig,
    step: u64,
) -> PollHandle<Vec<MetricSeries>> {
    let client = client.clone();
    let span = config.span;
    poll::spawn(name, Duration::from_secs(config.refresh), move || {
        let client = client.clone();
        let exprs = exprs.clone();
        async move {
            let window = TimeWindow::trailing(Utc::now(), span, Duration::from_secs(step));
            client.fetch_group(&exprs, &window).await
        }
    })
}

fn spawn_network_poller(
    client: &MetricClient,
    config: &AppConfig,
    step: u64,
) -> PollHandle<Vec<MetricSeries>> {
    let client = client.clone();
    let span = config.span;
    poll::spawn("network", Duration::from_secs(config.refresh), move || {
        let client = client.clone();
        async move {
            let window = TimeWindow::trailing(Utc::now(), span, Duration::from_secs(step));
            let mut rows = Vec::new();
            for station in expr::REMOTE_STATIONS {
                rows.extend(client.fetch_station(station, &window).await?);
            }
            if rows.is_empty() {
                return Err(FetchError::NoData("remote stations".to_string()));
            }
            Ok(rows)
        }
    })
}

fn spawn_listing_poller(
    client: &MetricClient,
    name: &str,
    refresh: u64,
) -> PollHandle<FileListing> {
    let http = client.http().clone();
    let endpoint = client.endpoint().to_string();
    let stream = name.to_string();
    poll::spawn(
        &format!("files:{name}"),
        Duration::from_secs(refresh),
        move || {
            let http = http.clone();
            let endpoint = endpoint.clone();
            let stream = stream.clone();
            async move { targets::fetch_listing(&http, &endpoint, &stream).await }
        },
    )
}

fn spawn_settings_poller(client: &MetricClient, refresh: u64) -> PollHandle<TriggerSettings> {
    let http = client.http().clone();
    let endpoint = client.endpoint().to_string();
    poll::spawn("settings", Duration::from_secs(refresh), move || {
        let http = http.clone();
        let endpoint = endpoint.clone();
        async move { targets::fetch_settings(&http, &endpoint).await }
    })
}
