use crate::component::PackagerMode;
use crate::config::save::save_settings;
use crate::config::{Config, Language, OutputContainer, UserSettings};
use crate::menu::handlers::run_segment_packager;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_package"),
        t!("main_menu.opt_preview"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_segment_packager(term, shutdown_signal, config, PackagerMode::Package)?;
            Ok(true)
        }
        Some(1) => {
            run_segment_packager(term, shutdown_signal, config, PackagerMode::Preview)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_split"),
            t!("settings.opt_container"),
            t!("settings.opt_parallel"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_split_settings_menu(term, config)?,
            Some(1) => show_container_menu(term, config)?,
            Some(2) => show_parallel_jobs_input(term, config)?,
            Some(3) => show_language_menu(term, config)?,
            Some(4) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 驗證並儲存新設定；設定互相矛盾時保留原設定
fn apply_settings(config: &mut Config, updated: UserSettings) -> Result<bool> {
    if updated == config.settings {
        return Ok(false);
    }

    if let Err(e) = updated.validate() {
        println!("\n{} {}", style(t!("common.error_prefix")).red().bold(), e);
        std::thread::sleep(std::time::Duration::from_secs(2));
        return Ok(false);
    }

    config.settings = updated;
    save_settings(&config.settings)?;
    println!("\n{}", style(t!("settings.saved")).green());
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(true)
}

/// 切割規則選單
fn show_split_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.split.title")).cyan().bold());
    println!("{}", style(t!("settings.split.hint")).dim());

    let split = config.settings.split;
    let items: Vec<String> = vec![
        t!("settings.split.ignore_technical").to_string(),
        t!("settings.split.recording_start").to_string(),
        t!("settings.split.recording_time_gap").to_string(),
        t!("settings.split.timecode_gap").to_string(),
    ];
    let defaults = [
        split.ignore_technical_changes,
        split.split_on_recording_start,
        split.split_on_recording_time_gap,
        split.split_on_timecode_gap,
    ];

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.prompt"))
        .items(&items)
        .defaults(&defaults)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let mut updated = config.settings.clone();
    updated.split.ignore_technical_changes = selection.contains(&0);
    updated.split.split_on_recording_start = selection.contains(&1);
    updated.split.split_on_recording_time_gap = selection.contains(&2);
    updated.split.split_on_timecode_gap = selection.contains(&3);

    apply_settings(config, updated)?;
    Ok(())
}

/// 輸出容器選單
fn show_container_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.container.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());
    println!(
        "\n{} {}",
        style(t!("settings.current")).dim(),
        config.settings.packager.container
    );
    println!();

    let containers = [OutputContainer::Mkv, OutputContainer::Mov];
    let items: Vec<String> = containers.iter().map(ToString::to_string).collect();

    let default_index = containers
        .iter()
        .position(|&c| c == config.settings.packager.container)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.container.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let mut updated = config.settings.clone();
    updated.packager.container = containers[selection];
    apply_settings(config, updated)?;
    Ok(())
}

/// 同時擷取數量
fn show_parallel_jobs_input(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.parallel.title")).cyan().bold());

    let jobs: usize = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.parallel.prompt"))
        .default(config.settings.packager.max_parallel_jobs)
        .interact_text_on(term)?;

    let mut updated = config.settings.clone();
    updated.packager.max_parallel_jobs = jobs;
    apply_settings(config, updated)?;
    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let mut updated = config.settings.clone();
    updated.language = languages[selection];
    if apply_settings(config, updated)? {
        rust_i18n::set_locale(config.settings.language.as_str());
    }
    Ok(())
}
