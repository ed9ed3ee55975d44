mod appsettings;
mod orchestrator;
mod ui;

use std::{sync::Arc, time::Duration};

use alarmclock_interpreter::HttpAlarmInterpreter;
use alarmclock_models::settings::Settings;
use alarmclock_scheduler::{
    DirectiveParser, NoNotificationChannel, NotificationChannel, NotificationDispatcher,
    ScheduleKind, ScheduleManager, Timer, TokioTimer,
};
use alarmclock_telegram::{TelegramNotificationChannel, teloxide::Bot};
use log::LevelFilter;
use orchestrator::AlarmRequestOrchestrator;
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::Input;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = appsettings::load()?;
    let zone = appsettings::alarm_timezone(&settings)?;

    let dispatcher =
        NotificationDispatcher::start(notification_channel(&settings), Arc::new(ui::TerminalAlert))
            .await;

    let interpreter = HttpAlarmInterpreter::new(
        &settings.interpreter.url,
        Duration::from_secs(settings.interpreter.timeout_secs),
    )?;
    log::info!("Using alarm interpreter at {}", interpreter.url());

    let manager = ScheduleManager::new(TokioTimer, Arc::new(dispatcher));
    let mut orchestrator =
        AlarmRequestOrchestrator::new(Arc::new(interpreter), DirectiveParser::new(zone), manager);

    run(&mut orchestrator).await?;
    orchestrator.shutdown();

    Ok(())
}

fn notification_channel(settings: &Settings) -> Arc<dyn NotificationChannel> {
    match &settings.telegram {
        Some(telegram) => Arc::new(TelegramNotificationChannel::new(
            Bot::new(telegram.token.clone()),
            telegram.chat_id,
        )),
        None => {
            log::info!("Telegram is not configured, alarms will be shown in the terminal.");
            Arc::new(NoNotificationChannel)
        }
    }
}

/// Reads one alarm request per line until stdin closes or Ctrl-C.
async fn run<T: Timer>(orchestrator: &mut AlarmRequestOrchestrator<T>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let busy = orchestrator.busy_indicator();
    println!("Describe your alarm, e.g. \"Set alarm to drink water every 30 minutes\".");
    ui::prompt();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl-C");
                return Ok(());
            }
        };

        let line = match ui::read_input(line) {
            Input::Line(line) => line,
            Input::Skip => {
                ui::prompt();
                continue;
            }
            Input::End => break,
        };

        if !line.trim().is_empty() {
            println!("Setting alarm...");
        }

        let interrupted = async {
            let _ = tokio::signal::ctrl_c().await;
            busy.is_busy()
        };
        let outcome = tokio::select! {
            outcome = orchestrator.handle_request(&line) => outcome,
            in_flight = interrupted => {
                log::info!("Received Ctrl-C. [request_in_flight = {in_flight}]");
                return Ok(());
            }
        };

        if let Some(text) = ui::render(&outcome) {
            println!("{text}");
        }
        ui::prompt();
    }

    if orchestrator.active_kind() != ScheduleKind::None {
        log::info!("Input closed, keeping the armed alarm until Ctrl-C.");
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}
