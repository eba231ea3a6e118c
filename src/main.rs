mod analytics;
mod config;
mod date_key;
mod domain;
mod duration;
mod history;
mod storage;
mod templates;
mod ui;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analytics::{progress_percent, time_allocation, total_hours};
use crate::config::{resolve_history_path, Settings};
use crate::date_key::{day_key, parse_day_key, today};
use crate::domain::{ActivityType, DailyData, Priority};
use crate::history::HistoryStore;
use crate::storage::{file_hook, load_history};
use crate::ui::run_dashboard;

#[derive(Debug, Parser)]
#[command(name = "daybook", about = "Time-blocked daily schedule tracker")]
struct Cli {
	#[arg(long, global = true)]
	history: Option<PathBuf>,
	/// Day to work on, YYYY-MM-DD (defaults to today).
	#[arg(long, global = true)]
	date: Option<String>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Dashboard,
	Show,
	Toggle {
		#[arg(long)]
		block: String,
		#[arg(long)]
		task: String,
	},
	EditBlock {
		#[arg(long)]
		block: String,
		#[arg(long)]
		time_range: Option<String>,
		#[arg(long)]
		title: Option<String>,
		#[arg(long)]
		description: Option<String>,
		/// One of morning-routine, field-work, deep-work, learning, health, transit.
		#[arg(long)]
		activity: Option<String>,
	},
	AddBlock,
	DeleteBlock {
		#[arg(long)]
		block: String,
		#[arg(long)]
		yes: bool,
	},
	AddSubtask {
		#[arg(long)]
		block: String,
		#[arg(long)]
		text: String,
	},
	EditSubtask {
		#[arg(long)]
		block: String,
		#[arg(long)]
		task: String,
		#[arg(long)]
		text: String,
	},
	RemoveSubtask {
		#[arg(long)]
		block: String,
		#[arg(long)]
		task: String,
	},
	Priority {
		#[arg(long)]
		id: u32,
		#[arg(long)]
		text: Option<String>,
		#[arg(long)]
		toggle: bool,
	},
	/// Replace the whole priority list, one --item per entry.
	SetPriorities {
		#[arg(long = "item", required = true)]
		items: Vec<String>,
	},
	Reset {
		#[arg(long)]
		yes: bool,
	},
	Analysis {
		#[arg(long)]
		json: bool,
	},
	Days,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	let settings = Settings::load()?;
	init_logging(&settings);

	let day = match cli.date.as_deref() {
		Some(raw) => parse_day_key(raw)?,
		None => today(),
	};
	let history_path = resolve_history_path(cli.history, &settings);
	let history = load_history(&history_path)?;
	let (hook, save_status) = file_hook(history_path.clone());
	let mut store = HistoryStore::new(history).with_hook(hook);
	let key = day_key(day);

	match cli.command.unwrap_or(Command::Dashboard) {
		Command::Dashboard => {
			run_dashboard(&mut store, &save_status, day)?;
		}
		Command::Show => {
			print_day(&key, &store.record_for(&key));
		}
		Command::Toggle { block, task } => {
			report(store.toggle_sub_task(&key, &block, &task), "toggled", &block, &task);
		}
		Command::EditBlock {
			block,
			time_range,
			title,
			description,
			activity,
		} => {
			let activity = activity
				.as_deref()
				.map(|raw| ActivityType::parse(raw).ok_or_else(|| format!("unknown activity: {raw}")))
				.transpose()?;
			match store.record_for(&key).block(&block).cloned() {
				Some(mut updated) => {
					if let Some(time_range) = time_range {
						updated.time_range = time_range;
					}
					if let Some(title) = title {
						updated.title = title;
					}
					if let Some(description) = description {
						updated.description = Some(description).filter(|value| !value.trim().is_empty());
					}
					if let Some(activity) = activity {
						updated.activity = activity;
					}
					store.update_block(&key, updated);
					println!("updated block {block}");
				}
				None => println!("no block {block} on {key}"),
			}
		}
		Command::AddBlock => {
			let block_id = store.add_block(&key);
			println!("added block {block_id}");
		}
		Command::DeleteBlock { block, yes } => {
			let title = store.record_for(&key).block(&block).map(|found| found.title.clone());
			match title {
				Some(title) => {
					if yes || confirm(&format!("delete \"{title}\" from {key}?"))? {
						store.delete_block(&key, &block);
						println!("deleted block {block}");
					} else {
						println!("delete cancelled");
					}
				}
				None => println!("no block {block} on {key}"),
			}
		}
		Command::AddSubtask { block, text } => match store.add_sub_task(&key, &block, &text) {
			Some(task_id) => println!("added sub-task {task_id}"),
			None => println!("no block {block} on {key}"),
		},
		Command::EditSubtask { block, task, text } => {
			report(store.edit_sub_task(&key, &block, &task, &text), "updated", &block, &task);
		}
		Command::RemoveSubtask { block, task } => {
			report(store.remove_sub_task(&key, &block, &task), "removed", &block, &task);
		}
		Command::Priority { id, text, toggle } => {
			if text.is_none() && !toggle {
				match store.record_for(&key).priorities.iter().find(|priority| priority.id == id) {
					Some(priority) => println!("{} | {} | done={}", priority.id, priority.text, priority.done),
					None => println!("no priority {id} on {key}"),
				}
				return Ok(());
			}

			let mut found = true;
			if let Some(text) = text {
				found &= store.set_priority_text(&key, id, &text);
			}
			if toggle {
				found &= store.toggle_priority(&key, id);
			}
			if found {
				println!("updated priority {id}");
			} else {
				println!("no priority {id} on {key}");
			}
		}
		Command::SetPriorities { items } => {
			let current = store.record_for(&key).priorities;
			let priorities = items
				.into_iter()
				.zip(1..)
				.map(|(text, id)| Priority {
					done: current.iter().any(|priority| priority.id == id && priority.done),
					..Priority::new(id, text)
				})
				.collect::<Vec<_>>();
			let count = priorities.len();
			store.update_priorities(&key, priorities);
			println!("set {count} priorities for {key}");
		}
		Command::Reset { yes } => {
			if yes || confirm(&format!("reset every block and priority of {key} to the template?"))? {
				store.reset_to_template(&key);
				println!("reset {key} to the template");
			} else {
				println!("reset cancelled");
			}
		}
		Command::Analysis { json } => {
			let day = store.record_for(&key);
			if json {
				println!("{}", serde_json::to_string_pretty(&time_allocation(&day.schedule))?);
			} else {
				print_analysis(&key, &day);
			}
		}
		Command::Days => {
			print_days(&store);
		}
	}

	if let Some(err) = save_status.take_error() {
		return Err(format!("could not save {}: {err}", history_path.display()).into());
	}

	Ok(())
}

fn init_logging(settings: &Settings) {
	tracing_subscriber::fmt()
		.with_target(false)
		.with_writer(io::stderr)
		.with_env_filter(EnvFilter::new(settings.log_filter()))
		.init();
}

fn confirm(question: &str) -> Result<bool, io::Error> {
	print!("{question} [y/N] ");
	io::stdout().flush()?;

	let mut answer = String::new();
	io::stdin().lock().read_line(&mut answer)?;
	Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report(changed: bool, verb: &str, block_id: &str, task_id: &str) {
	if changed {
		println!("{verb} sub-task {task_id}");
	} else {
		println!("no sub-task {task_id} in block {block_id}");
	}
}

fn print_day(key: &str, day: &DailyData) {
	println!("{key} | {}% done", progress_percent(&day.schedule));

	println!("\npriorities:");
	for priority in &day.priorities {
		println!(
			"[{}] {} | {}",
			if priority.done { "x" } else { " " },
			priority.id,
			priority.text
		);
	}

	println!("\nschedule:");
	for block in &day.schedule {
		println!(
			"{} | {} | {} | {} | {:.1}h",
			block.id,
			block.time_range,
			block.title,
			block.activity,
			block.hours()
		);
		for task in &block.sub_tasks {
			println!(
				"    [{}] {} | {}",
				if task.completed { "x" } else { " " },
				task.id,
				task.text
			);
		}
	}
}

fn print_analysis(key: &str, day: &DailyData) {
	let slices = time_allocation(&day.schedule);
	println!("time allocation for {key}");
	if slices.is_empty() {
		println!("no timed blocks");
		return;
	}

	for slice in &slices {
		println!("{:>5.1}h | {} | {}", slice.hours, slice.label, slice.color);
	}
	println!("{:>5.1}h | total", total_hours(&day.schedule));
}

fn print_days(store: &HistoryStore) {
	if store.history().is_empty() {
		println!("no recorded days");
		return;
	}

	for (key, day) in store.recorded_days() {
		let weekday = parse_day_key(key)
			.map(|date| date.format("%a").to_string())
			.unwrap_or_default();
		println!(
			"{key} {weekday:<3} | {:>3}% | {} blocks | updated {}",
			progress_percent(&day.schedule),
			day.schedule.len(),
			day.last_updated
				.with_timezone(&Local)
				.format("%Y-%m-%d %H:%M")
		);
	}
}
