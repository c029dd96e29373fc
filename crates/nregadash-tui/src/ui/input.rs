//! Keyboard input handling for the TUI.
//!
//! This module translates key events into application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use nregadash_core::RemoteSource;

use crate::app::{App, AppState, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input<R: RemoteSource>(app: &mut App<R>, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::Searching) {
        return Ok(handle_search_input(app, key));
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.current_tab = Tab::Overview,
        KeyCode::Char('2') => app.current_tab = Tab::Trends,
        KeyCode::Char('3') => app.current_tab = Tab::Compare,
        KeyCode::Char('4') => app.current_tab = Tab::Data,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
        KeyCode::PageUp => app.scroll_data(false, PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.scroll_data(true, PAGE_SCROLL_SIZE),
        KeyCode::Char('f') | KeyCode::Enter => app.fetch_selected().await,
        KeyCode::Char('c') => {
            app.fetch_comparison().await;
            app.current_tab = Tab::Compare;
        }
        KeyCode::Char('e') => app.export_report(),
        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
        }
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }

    Ok(false)
}

fn handle_search_input<R: RemoteSource>(app: &mut App<R>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.apply_search();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => {}
    }
    false
}
