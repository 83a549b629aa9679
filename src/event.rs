//! Event Handling
//!
//! Keyboard and event handling for catadmin.

use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers).await;
        }
    }
    Ok(false)
}

async fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers).await,
        Mode::Help => handle_help_mode(app, code),
        Mode::Confirm => handle_confirm_mode(app, code).await,
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Picker => handle_picker_mode(app, code, modifiers).await,
        Mode::Detail => handle_detail_mode(app, code).await,
        Mode::Form => handle_form_mode(app, code, modifiers).await,
    }
}

async fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Search input takes every printable key, 'g' included
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            },
            KeyCode::Enter => {
                app.filter_active = false;
            },
            KeyCode::Backspace => {
                app.filter_text.pop();
                app.apply_filter();
            },
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.filter_text.push(c);
                app.apply_filter();
            },
            _ => {},
        }
        return Ok(false);
    }

    // Double-g goes to top
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return Ok(false);
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return Ok(false);
    }

    // Clear last key press for non-g keys
    app.last_key_press = None;

    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),

        // Pagination
        KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Right => app.next_page(),
        KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Left => app.prev_page(),

        // Refresh
        KeyCode::Char('R') => {
            app.refresh_current().await?;
        },

        // Detail
        KeyCode::Enter => {
            app.enter_detail_mode().await;
        },

        // Filter
        KeyCode::Char('/') => {
            app.filter_active = true;
        },
        KeyCode::Esc => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            } else {
                app.clear_selection();
            }
        },
        KeyCode::Char('c') => {
            app.enter_category_picker();
        },

        // Resources
        KeyCode::Char(':') => {
            app.enter_resource_picker();
        },
        KeyCode::Tab => {
            app.cycle_resource(true).await?;
        },
        KeyCode::BackTab => {
            app.cycle_resource(false).await?;
        },

        // Selection
        KeyCode::Char(' ') => {
            app.toggle_selection();
            app.next();
        },
        KeyCode::Char('a') => {
            app.select_all();
        },
        KeyCode::Char('x') => {
            app.clear_selection();
        },

        // Writes
        KeyCode::Char('n') => {
            app.enter_new_form();
        },
        KeyCode::Char('e') => {
            app.enter_edit_form().await;
        },
        KeyCode::Delete | KeyCode::Char('D') => {
            app.stage_delete();
        },

        // Help
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },

        _ => {},
    }

    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_confirm_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.resolve_confirm(false).await;
        },
        KeyCode::Left | KeyCode::Char('h') => {
            app.manager.gate.set_selected_yes(true);
        },
        KeyCode::Right | KeyCode::Char('l') => {
            app.manager.gate.set_selected_yes(false);
        },
        KeyCode::Enter => {
            let yes = app
                .manager
                .gate
                .pending()
                .is_some_and(|pending| pending.selected_yes);
            app.resolve_confirm(yes).await;
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.resolve_confirm(true).await;
        },
        _ => {},
    }
    Ok(false)
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_picker_mode(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    let Some(picker) = app.picker.as_mut() else {
        app.exit_mode();
        return Ok(false);
    };

    match code {
        KeyCode::Esc => {
            app.exit_mode();
        },
        KeyCode::Enter => {
            app.apply_picker().await?;
        },
        KeyCode::Down => picker.next(),
        KeyCode::Up => picker.previous(),
        KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => picker.next(),
        KeyCode::Char('p') if modifiers.contains(KeyModifiers::CONTROL) => picker.previous(),
        KeyCode::Backspace => {
            picker.search_text.pop();
            picker.apply_search();
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            picker.search_text.push(c);
            picker.apply_search();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_detail_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    let Some(detail) = app.detail.as_mut() else {
        app.close_detail();
        return Ok(false);
    };

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.close_detail();
        },
        KeyCode::Char('r') => {
            app.load_detail().await;
        },
        KeyCode::Char('e') if detail.record.is_some() => {
            app.enter_edit_form().await;
        },
        KeyCode::Delete | KeyCode::Char('D') if detail.record.is_some() => {
            app.stage_delete();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            detail.scroll = detail.scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            detail.scroll = detail.scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            detail.scroll = detail.scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            detail.scroll = detail.scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            detail.scroll = 0;
        },
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Ctrl+S submits from any row
    if code == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL) {
        app.submit_form().await;
        return Ok(false);
    }

    match code {
        KeyCode::Esc => {
            app.cancel_form();
            return Ok(false);
        },
        KeyCode::Left => {
            app.cycle_editor_relation(false);
            return Ok(false);
        },
        KeyCode::Right => {
            app.cycle_editor_relation(true);
            return Ok(false);
        },
        KeyCode::Enter | KeyCode::Char(' ') if app.editor_on_relation_list() => {
            app.enter_relation_picker();
            return Ok(false);
        },
        _ => {},
    }

    let Some(editor) = app.editor.as_mut() else {
        app.exit_mode();
        return Ok(false);
    };

    match code {
        KeyCode::Tab | KeyCode::Down => editor.next_row(),
        KeyCode::BackTab | KeyCode::Up => editor.prev_row(),
        KeyCode::Enter => editor.newline(),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => editor.push_char(c),
        _ => {},
    }
    Ok(false)
}
