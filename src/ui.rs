use std::error::Error;
use std::io;
use std::time::Duration as StdDuration;

use chrono::{NaiveDate, Utc};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use crate::analytics::{progress_percent, time_allocation, total_hours, AllocationSlice};
use crate::date_key::{date_key, day_key, parse_day_key, shift_day, today};
use crate::domain::{ActivityType, DailyData, ScheduleBlock};
use crate::history::HistoryStore;
use crate::storage::SaveStatus;

const FOCUSED_PANEL_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_PANEL_BORDER_COLOR: Color = Color::DarkGray;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);
const ALLOCATION_BAR_WIDTH: f64 = 18.0;

pub fn run_dashboard(
	store: &mut HistoryStore,
	save_status: &SaveStatus,
	day: NaiveDate,
) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, store, save_status, day);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	store: &mut HistoryStore,
	save_status: &SaveStatus,
	day: NaiveDate,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::new(day);

	loop {
		let view = build_view(&app, store);
		app.clamp_selection(&view);
		terminal.draw(|frame| draw_dashboard(frame, &app, &view))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				let should_quit = match &app.mode {
					InputMode::Prompt(_) => handle_prompt_key(&mut app, key.code, store),
					InputMode::Select(_) => handle_select_key(&mut app, key.code, store),
					InputMode::Normal => handle_normal_key(&mut app, key.code, store, &view),
				};

				if let Some(err) = save_status.take_error() {
					app.status = format!("error: failed to save history: {err}");
				}

				if should_quit {
					break;
				}
			}
		}
	}

	Ok(())
}

fn draw_dashboard(frame: &mut Frame, app: &App, view: &ViewModel) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(3), Constraint::Min(12), Constraint::Length(4)])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
		.split(layout[1]);

	let right = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(7), Constraint::Min(8)])
		.split(body[1]);

	render_header(frame, layout[0], app, view);
	render_schedule_panel(frame, body[0], app, view);
	render_priorities_panel(frame, right[0], app, view);
	render_allocation_panel(frame, right[1], view);
	render_footer(frame, layout[2], app);

	if let InputMode::Select(select) = &app.mode {
		render_select_popup(frame, select);
	}
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let tag = if view.is_today { "today" } else { "history" };
	let title = format!(
		"{} | {} | {}{}",
		app.selected_day.format("%A, %d %B %Y"),
		tag,
		view.key,
		if view.is_stored { "" } else { " (template)" }
	);
	let gauge = Gauge::default()
		.block(Block::default().borders(Borders::ALL).title(title))
		.gauge_style(Style::default().fg(Color::Rgb(79, 70, 229)).bg(Color::Black))
		.percent(u16::from(view.progress))
		.label(format!("{}% done", view.progress));
	frame.render_widget(gauge, area);
}

fn render_schedule_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let items = if view.schedule_rows.is_empty() {
		vec![ListItem::new("(no blocks, press a to add one)")]
	} else {
		view.schedule_rows
			.iter()
			.map(|row| ListItem::new(row.line.clone()))
			.collect::<Vec<_>>()
	};

	let mut state = ListState::default();
	if !view.schedule_rows.is_empty() && app.focus == FocusPane::Schedule {
		state.select(Some(app.schedule_index.min(view.schedule_rows.len() - 1)));
	}

	let title = format!("Schedule | {:.1}h planned", view.total_hours);
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(app.focus == FocusPane::Schedule)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_priorities_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let items = if view.day.priorities.is_empty() {
		vec![ListItem::new("(no priorities)")]
	} else {
		view.day
			.priorities
			.iter()
			.map(|priority| {
				let style = if priority.done {
					Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
				} else {
					Style::default()
				};
				ListItem::new(Line::from(vec![
					Span::raw(format!("{} ", checkbox(priority.done))),
					Span::styled(priority.text.clone(), style),
				]))
			})
			.collect::<Vec<_>>()
	};

	let mut state = ListState::default();
	if !view.day.priorities.is_empty() && app.focus == FocusPane::Priorities {
		state.select(Some(app.priority_index.min(view.day.priorities.len() - 1)));
	}

	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title("Top priorities")
				.border_style(border_style(app.focus == FocusPane::Priorities)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_allocation_panel(frame: &mut Frame, area: Rect, view: &ViewModel) {
	let mut lines = Vec::new();
	if view.allocation.is_empty() {
		lines.push(Line::from("(no timed blocks)"));
	}

	let max_hours = view
		.allocation
		.iter()
		.map(|slice| slice.hours)
		.fold(0.0_f64, f64::max)
		.max(0.1);
	for slice in &view.allocation {
		let width = ((slice.hours / max_hours) * ALLOCATION_BAR_WIDTH).round() as usize;
		lines.push(Line::from(vec![
			Span::styled(format!("{:<22}", slice.label), activity_style(slice.activity)),
			Span::raw(format!("{:>5.1}h ", slice.hours)),
			Span::styled("=".repeat(width.max(1)), activity_style(slice.activity)),
		]));
	}

	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Time allocation"));
	frame.render_widget(panel, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer_lines = match &app.mode {
		InputMode::Normal => vec![
			Line::from("h/l or arrows change day | t today | g go to date | Tab pane | j/k move | space toggle | q quit"),
			Line::from(
				"a add block | e title | r time range | c cycle type | s add sub-task | x remove sub-task | d delete block | p edit priority | R reset day",
			),
			Line::from(app.status.clone()),
		],
		InputMode::Prompt(prompt) => vec![
			Line::from(prompt.title.clone()),
			Line::from(format!("> {}", prompt.input)),
			Line::from("Enter submit | Esc cancel"),
		],
		InputMode::Select(select) => vec![
			Line::from(select.title.clone()),
			Line::from(format!(
				"Selected: {}",
				select
					.selected_option()
					.map(|option| option.label.as_str())
					.unwrap_or("(none)")
			)),
			Line::from("j/k or arrows move | Enter choose | Esc cancel"),
		],
	};

	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_select_popup(frame: &mut Frame, select: &SelectState) {
	let area = centered_rect(50, 30, frame.area());
	frame.render_widget(Clear, area);

	let items = select
		.options
		.iter()
		.map(|option| ListItem::new(option.label.clone()).style(option.style))
		.collect::<Vec<_>>();

	let list = List::new(items)
		.block(Block::default().borders(Borders::ALL).title(select.title.clone()))
		.highlight_symbol(">> ")
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR));

	let mut state = ListState::default();
	if !select.options.is_empty() {
		state.select(Some(select.selected.min(select.options.len() - 1)));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key(app: &mut App, code: KeyCode, store: &mut HistoryStore, view: &ViewModel) -> bool {
	let key = view.key.as_str();
	match code {
		KeyCode::Char('q') | KeyCode::Esc => return true,
		KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.toggle(),
		KeyCode::Left | KeyCode::Char('h') => app.shift_selected_day(-1),
		KeyCode::Right | KeyCode::Char('l') => app.shift_selected_day(1),
		KeyCode::Char('t') => app.jump_to(today()),
		KeyCode::Char('g') => {
			app.mode = InputMode::Prompt(PromptState::new("Go to date (YYYY-MM-DD)", PromptKind::JumpToDate));
		}
		KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1, view),
		KeyCode::Down | KeyCode::Char('j') => app.move_selection(1, view),
		KeyCode::Char(' ') | KeyCode::Enter => match app.focus {
			FocusPane::Schedule => match app.selected_row(view) {
				Some(RowKind::SubTask { block_id, sub_task_id }) => {
					store.toggle_sub_task(key, &block_id, &sub_task_id);
					app.status = format!("toggled {sub_task_id}");
				}
				Some(RowKind::Block { .. }) => app.status = "Select a sub-task to toggle it".to_string(),
				None => {}
			},
			FocusPane::Priorities => {
				if let Some(priority) = view.day.priorities.get(app.priority_index) {
					store.toggle_priority(key, priority.id);
					app.status = format!("toggled priority {}", priority.id);
				}
			}
		},
		KeyCode::Char('a') => {
			let block_id = store.add_block(key);
			app.focus = FocusPane::Schedule;
			app.schedule_index = usize::MAX;
			app.status = format!("added block {block_id}");
		}
		KeyCode::Char('e') => {
			if let Some(block_id) = app.selected_block_id(view) {
				let prompt = PromptState::new("Block title", PromptKind::EditTitle { block_id: block_id.clone() })
					.with_input(block_field(&view.day, &block_id, |block| block.title.clone()));
				app.mode = InputMode::Prompt(prompt);
			}
		}
		KeyCode::Char('r') => {
			if let Some(block_id) = app.selected_block_id(view) {
				let prompt = PromptState::new(
					"Time range (HH:MM - HH:MM or HH:MM - End)",
					PromptKind::EditTimeRange { block_id: block_id.clone() },
				)
				.with_input(block_field(&view.day, &block_id, |block| block.time_range.clone()));
				app.mode = InputMode::Prompt(prompt);
			}
		}
		KeyCode::Char('c') => {
			if let Some(mut block) = app
				.selected_block_id(view)
				.and_then(|block_id| view.day.block(&block_id).cloned())
			{
				block.activity = next_activity(block.activity);
				app.status = format!("{} is now {}", block.title, block.activity);
				store.update_block(key, block);
			}
		}
		KeyCode::Char('s') => {
			if let Some(block_id) = app.selected_block_id(view) {
				app.mode = InputMode::Prompt(PromptState::new("New sub-task", PromptKind::AddSubTask { block_id }));
			}
		}
		KeyCode::Char('x') => {
			if let Some(RowKind::SubTask { block_id, sub_task_id }) = app.selected_row(view) {
				store.remove_sub_task(key, &block_id, &sub_task_id);
				app.status = format!("removed {sub_task_id}");
			} else {
				app.status = "Select a sub-task to remove it".to_string();
			}
		}
		KeyCode::Char('d') => {
			if let Some(block) = app
				.selected_block_id(view)
				.and_then(|block_id| view.day.block(&block_id))
			{
				app.mode = InputMode::Select(build_confirm_select(
					format!("Delete \"{}\"?", block.title),
					"Delete block",
					SelectKind::DeleteBlockConfirm {
						block_id: block.id.clone(),
						title: block.title.clone(),
					},
				));
			}
		}
		KeyCode::Char('R') => {
			app.mode = InputMode::Select(build_confirm_select(
				format!("Reset {key} to the template?"),
				"Reset day",
				SelectKind::ResetConfirm,
			));
		}
		KeyCode::Char('p') => {
			if let Some(priority) = view.day.priorities.get(app.priority_index) {
				app.focus = FocusPane::Priorities;
				let prompt = PromptState::new(
					format!("Priority {}", priority.id),
					PromptKind::EditPriority { priority_id: priority.id },
				)
				.with_input(priority.text.clone());
				app.mode = InputMode::Prompt(prompt);
			}
		}
		_ => {}
	}

	false
}

fn handle_prompt_key(app: &mut App, code: KeyCode, store: &mut HistoryStore) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Backspace => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.pop();
			}
		}
		KeyCode::Char(value) => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.push(value);
			}
		}
		KeyCode::Enter => {
			let prompt = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Prompt(prompt) => prompt,
				InputMode::Normal | InputMode::Select(_) => return false,
			};

			match submit_prompt(app, prompt.clone(), store) {
				Ok(message) => app.status = message,
				Err(err) => {
					app.mode = InputMode::Prompt(prompt);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn handle_select_key(app: &mut App, code: KeyCode, store: &mut HistoryStore) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Selection cancelled".to_string();
		}
		KeyCode::Up | KeyCode::Char('k') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(-1);
			}
		}
		KeyCode::Down | KeyCode::Char('j') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(1);
			}
		}
		KeyCode::Enter => {
			let select = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Select(select) => select,
				_ => return false,
			};
			app.status = submit_select(app, select, store);
		}
		_ => {}
	}

	false
}

fn submit_prompt(app: &mut App, prompt: PromptState, store: &mut HistoryStore) -> Result<String, String> {
	let key = day_key(app.selected_day);
	match prompt.kind {
		PromptKind::JumpToDate => {
			let day = parse_day_key(&prompt.input).map_err(|err| err.to_string())?;
			app.jump_to(day);
			Ok(format!("showing {}", day_key(day)))
		}
		PromptKind::EditTitle { block_id } => {
			let title = required_text(&prompt.input, "title")?;
			edit_block(store, &key, &block_id, |block| block.title = title)
		}
		PromptKind::EditTimeRange { block_id } => {
			let time_range = required_text(&prompt.input, "time range")?;
			edit_block(store, &key, &block_id, |block| block.time_range = time_range)
		}
		PromptKind::AddSubTask { block_id } => {
			let text = required_text(&prompt.input, "sub-task")?;
			store
				.add_sub_task(&key, &block_id, &text)
				.map(|sub_task_id| format!("added {sub_task_id}"))
				.ok_or_else(|| format!("block {block_id} no longer exists"))
		}
		PromptKind::EditPriority { priority_id } => {
			let text = prompt.input.trim();
			if store.set_priority_text(&key, priority_id, text) {
				Ok(format!("updated priority {priority_id}"))
			} else {
				Err(format!("priority {priority_id} no longer exists"))
			}
		}
	}
}

fn submit_select(app: &mut App, select: SelectState, store: &mut HistoryStore) -> String {
	let confirmed = select
		.selected_option()
		.is_some_and(|option| option.confirms);
	if !confirmed {
		return "Kept everything as it was".to_string();
	}

	let key = day_key(app.selected_day);
	match select.kind {
		SelectKind::DeleteBlockConfirm { block_id, title } => {
			if store.delete_block(&key, &block_id) {
				format!("deleted {title}")
			} else {
				format!("block {block_id} no longer exists")
			}
		}
		SelectKind::ResetConfirm => {
			store.reset_to_template(&key);
			app.schedule_index = 0;
			app.priority_index = 0;
			format!("reset {key} to the template")
		}
	}
}

fn edit_block(
	store: &mut HistoryStore,
	key: &str,
	block_id: &str,
	edit: impl FnOnce(&mut ScheduleBlock),
) -> Result<String, String> {
	let mut block = store
		.record_for(key)
		.block(block_id)
		.cloned()
		.ok_or_else(|| format!("block {block_id} no longer exists"))?;
	edit(&mut block);
	let title = block.title.clone();
	store.update_block(key, block);
	Ok(format!("updated {title}"))
}

fn build_confirm_select(title: String, action: &str, kind: SelectKind) -> SelectState {
	SelectState::new(
		title,
		kind,
		vec![
			SelectOption::new("Cancel", false, Style::default()),
			SelectOption::new(action, true, Style::default().fg(Color::LightRed)),
		],
	)
}

fn build_view(app: &App, store: &HistoryStore) -> ViewModel {
	let key = day_key(app.selected_day);
	let day = store.record_for(&key);
	let schedule_rows = build_schedule_rows(&day);

	ViewModel {
		is_today: key == date_key(Utc::now()),
		is_stored: store.contains(&key),
		progress: progress_percent(&day.schedule),
		total_hours: total_hours(&day.schedule),
		allocation: time_allocation(&day.schedule),
		schedule_rows,
		key,
		day,
	}
}

fn build_schedule_rows(day: &DailyData) -> Vec<ScheduleRow> {
	let mut rows = Vec::new();
	for block in &day.schedule {
		let title_style = if block.all_done() {
			Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
		} else {
			Style::default().add_modifier(Modifier::BOLD)
		};
		rows.push(ScheduleRow {
			line: Line::from(vec![
				Span::styled(format!("{:<15}", block.time_range), Style::default().fg(Color::Gray)),
				Span::styled(format!("{:<16}", block.activity.name()), activity_style(block.activity)),
				Span::styled(block.title.clone(), title_style),
				Span::raw(format!(
					" | {:.1}h | {}/{}",
					block.hours(),
					block.completed_count(),
					block.sub_tasks.len()
				)),
			]),
			kind: RowKind::Block {
				block_id: block.id.clone(),
			},
		});

		for task in &block.sub_tasks {
			let style = if task.completed {
				Style::default().fg(Color::DarkGray)
			} else {
				Style::default()
			};
			rows.push(ScheduleRow {
				line: Line::from(vec![
					Span::raw(format!("{:<15}{} ", "", checkbox(task.completed))),
					Span::styled(task.text.clone(), style),
				]),
				kind: RowKind::SubTask {
					block_id: block.id.clone(),
					sub_task_id: task.id.clone(),
				},
			});
		}
	}
	rows
}

fn block_field(
	day: &DailyData,
	block_id: &str,
	field: impl Fn(&ScheduleBlock) -> String,
) -> String {
	day.block(block_id).map(field).unwrap_or_default()
}

fn next_activity(activity: ActivityType) -> ActivityType {
	let position = ActivityType::ALL
		.iter()
		.position(|candidate| *candidate == activity)
		.unwrap_or(0);
	ActivityType::ALL[(position + 1) % ActivityType::ALL.len()]
}

fn checkbox(done: bool) -> &'static str {
	if done { "[x]" } else { "[ ]" }
}

fn required_text(input: &str, field_name: &str) -> Result<String, String> {
	let value = input.trim();
	if value.is_empty() {
		Err(format!("{field_name} is required"))
	} else {
		Ok(value.to_string())
	}
}

fn activity_style(activity: ActivityType) -> Style {
	hex_color(activity.chart_color())
		.map(|color| Style::default().fg(color))
		.unwrap_or_default()
}

fn hex_color(hex: &str) -> Option<Color> {
	let digits = hex.strip_prefix('#')?;
	if digits.len() != 6 {
		return None;
	}
	let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
	Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn border_style(focused: bool) -> Style {
	if focused {
		Style::default()
			.fg(FOCUSED_PANEL_BORDER_COLOR)
			.add_modifier(Modifier::BOLD)
	} else {
		Style::default().fg(INACTIVE_PANEL_BORDER_COLOR)
	}
}

#[derive(Debug, Clone)]
struct PromptState {
	title: String,
	input: String,
	kind: PromptKind,
}

impl PromptState {
	fn new(title: impl Into<String>, kind: PromptKind) -> Self {
		Self {
			title: title.into(),
			input: String::new(),
			kind,
		}
	}

	fn with_input(mut self, input: String) -> Self {
		self.input = input;
		self
	}
}

#[derive(Debug, Clone)]
struct SelectState {
	title: String,
	options: Vec<SelectOption>,
	selected: usize,
	kind: SelectKind,
}

impl SelectState {
	fn new(title: impl Into<String>, kind: SelectKind, options: Vec<SelectOption>) -> Self {
		Self {
			title: title.into(),
			options,
			selected: 0,
			kind,
		}
	}

	fn move_selection(&mut self, delta: i32) {
		if self.options.is_empty() {
			self.selected = 0;
			return;
		}

		if delta > 0 {
			self.selected = (self.selected + delta as usize).min(self.options.len() - 1);
		} else {
			self.selected = self.selected.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_option(&self) -> Option<&SelectOption> {
		self.options.get(self.selected)
	}
}

#[derive(Debug, Clone)]
struct SelectOption {
	label: String,
	confirms: bool,
	style: Style,
}

impl SelectOption {
	fn new(label: impl Into<String>, confirms: bool, style: Style) -> Self {
		Self {
			label: label.into(),
			confirms,
			style,
		}
	}
}

#[derive(Debug, Clone)]
enum PromptKind {
	JumpToDate,
	EditTitle { block_id: String },
	EditTimeRange { block_id: String },
	AddSubTask { block_id: String },
	EditPriority { priority_id: u32 },
}

#[derive(Debug, Clone)]
enum SelectKind {
	DeleteBlockConfirm { block_id: String, title: String },
	ResetConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusPane {
	Schedule,
	Priorities,
}

impl FocusPane {
	fn toggle(self) -> Self {
		match self {
			FocusPane::Schedule => FocusPane::Priorities,
			FocusPane::Priorities => FocusPane::Schedule,
		}
	}
}

#[derive(Debug, Clone)]
enum InputMode {
	Normal,
	Prompt(PromptState),
	Select(SelectState),
}

#[derive(Debug, Clone)]
struct App {
	focus: FocusPane,
	selected_day: NaiveDate,
	schedule_index: usize,
	priority_index: usize,
	mode: InputMode,
	status: String,
}

impl App {
	fn new(selected_day: NaiveDate) -> Self {
		Self {
			focus: FocusPane::Schedule,
			selected_day,
			schedule_index: 0,
			priority_index: 0,
			mode: InputMode::Normal,
			status: "Ready".to_string(),
		}
	}

	fn clamp_selection(&mut self, view: &ViewModel) {
		self.schedule_index = self.schedule_index.min(view.schedule_rows.len().saturating_sub(1));
		self.priority_index = self.priority_index.min(view.day.priorities.len().saturating_sub(1));
	}

	fn shift_selected_day(&mut self, delta_days: i64) {
		self.jump_to(shift_day(self.selected_day, delta_days));
	}

	fn jump_to(&mut self, day: NaiveDate) {
		self.selected_day = day;
		self.schedule_index = 0;
		self.priority_index = 0;
	}

	fn move_selection(&mut self, delta: i32, view: &ViewModel) {
		let (index, len) = match self.focus {
			FocusPane::Schedule => (&mut self.schedule_index, view.schedule_rows.len()),
			FocusPane::Priorities => (&mut self.priority_index, view.day.priorities.len()),
		};
		if len == 0 {
			*index = 0;
			return;
		}

		if delta > 0 {
			*index = (*index + delta as usize).min(len - 1);
		} else {
			*index = index.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_row(&self, view: &ViewModel) -> Option<RowKind> {
		view.schedule_rows
			.get(self.schedule_index)
			.map(|row| row.kind.clone())
	}

	fn selected_block_id(&self, view: &ViewModel) -> Option<String> {
		if self.focus != FocusPane::Schedule {
			return None;
		}

		match self.selected_row(view)? {
			RowKind::Block { block_id } | RowKind::SubTask { block_id, .. } => Some(block_id),
		}
	}
}

struct ViewModel {
	key: String,
	day: DailyData,
	is_today: bool,
	is_stored: bool,
	progress: u8,
	total_hours: f64,
	allocation: Vec<AllocationSlice>,
	schedule_rows: Vec<ScheduleRow>,
}

struct ScheduleRow {
	line: Line<'static>,
	kind: RowKind,
}

#[derive(Debug, Clone)]
enum RowKind {
	Block { block_id: String },
	SubTask { block_id: String, sub_task_id: String },
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;
	use ratatui::style::Color;

	use crate::domain::{ActivityType, DailyData, HistoryData};
	use crate::history::HistoryStore;
	use crate::templates::default_schedule;

	use super::{build_schedule_rows, hex_color, next_activity, submit_select, App, RowKind, SelectKind};

	#[test]
	fn rows_follow_blocks_then_their_sub_tasks() {
		let day = DailyData::from_templates(chrono::Utc::now());
		let rows = build_schedule_rows(&day);
		let sub_tasks = default_schedule()
			.iter()
			.map(|block| block.sub_tasks.len())
			.sum::<usize>();
		assert_eq!(rows.len(), 11 + sub_tasks);

		assert!(matches!(&rows[0].kind, RowKind::Block { block_id } if block_id == "1"));
		assert!(matches!(
			&rows[1].kind,
			RowKind::SubTask { block_id, sub_task_id } if block_id == "1" && sub_task_id == "1-1"
		));
		assert!(matches!(&rows[3].kind, RowKind::Block { block_id } if block_id == "2"));
	}

	#[test]
	fn activity_cycle_wraps() {
		assert_eq!(next_activity(ActivityType::MorningRoutine), ActivityType::FieldWork);
		assert_eq!(next_activity(ActivityType::Transit), ActivityType::MorningRoutine);
	}

	#[test]
	fn parses_chart_colors() {
		assert_eq!(hex_color("#2563EB"), Some(Color::Rgb(0x25, 0x63, 0xEB)));
		assert_eq!(hex_color("2563EB"), None);
		assert_eq!(hex_color("#25"), None);
	}

	#[test]
	fn declining_a_reset_leaves_the_day_alone() {
		let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
		let mut app = App::new(day);
		let mut store = HistoryStore::new(HistoryData::new());
		store.delete_block("2024-03-07", "1");

		let select = super::build_confirm_select("Reset?".to_string(), "Reset day", SelectKind::ResetConfirm);
		submit_select(&mut app, select.clone(), &mut store);
		assert_eq!(store.record_for("2024-03-07").schedule.len(), 10);

		let mut confirmed = select;
		confirmed.move_selection(1);
		submit_select(&mut app, confirmed, &mut store);
		assert_eq!(store.record_for("2024-03-07").schedule, default_schedule());
	}

	#[test]
	fn declining_a_block_delete_keeps_the_block() {
		let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
		let mut app = App::new(day);
		let mut store = HistoryStore::new(HistoryData::new());
		store.toggle_sub_task("2024-03-07", "1", "1-1");
		let before = store.record_for("2024-03-07").schedule;

		let kind = SelectKind::DeleteBlockConfirm {
			block_id: "4".to_string(),
			title: before[3].title.clone(),
		};
		let select = super::build_confirm_select("Delete?".to_string(), "Delete block", kind);
		let status = submit_select(&mut app, select.clone(), &mut store);
		assert_eq!(status, "Kept everything as it was");
		assert_eq!(store.record_for("2024-03-07").schedule, before);

		let mut confirmed = select;
		confirmed.move_selection(1);
		submit_select(&mut app, confirmed, &mut store);
		let after = store.record_for("2024-03-07").schedule;
		assert_eq!(after.len(), before.len() - 1);
		assert!(after.iter().all(|block| block.id != "4"));
	}
}
