//! Keyboard input handling for the TUI.
//!
//! Dispatch is state-first (overlays swallow keys), then per-route. The
//! login and register views own the keyboard while focused, so form typing
//! never triggers global shortcuts.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    App, AppState, LoginFocus, RegisterFocus, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH,
    MAX_USERNAME_LENGTH, PAGE_SCROLL_SIZE,
};
use crate::router::Route;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match app.nav.current() {
        Route::Login => handle_login_input(app, key).await,
        Route::Register => handle_register_input(app, key).await,
        Route::Home => handle_home_input(app, key),
        Route::Gallery => handle_gallery_input(app, key),
    }
}

/// Keys available outside of form views. Returns true when handled.
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            true
        }
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            true
        }
        KeyCode::Char('u') => {
            app.refresh_gallery();
            true
        }
        KeyCode::Char('o') => {
            if app.is_authenticated() {
                app.logout();
            }
            true
        }
        KeyCode::Char('1') => {
            app.navigate(Route::Home);
            true
        }
        KeyCode::Char('2') => {
            app.navigate(Route::Gallery);
            true
        }
        KeyCode::Char('3') => {
            app.navigate(Route::Login);
            true
        }
        KeyCode::Char('4') => {
            app.navigate(Route::Register);
            true
        }
        _ => false,
    }
}

fn handle_home_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if handle_global_key(app, key) {
        return Ok(false);
    }
    match key.code {
        KeyCode::Char('n') | KeyCode::Right => app.advance_slideshow(),
        KeyCode::Char('p') | KeyCode::Left => app.rewind_slideshow(),
        _ => {}
    }
    Ok(false)
}

fn handle_gallery_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.gallery_selection = app.gallery_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let max = app.filtered_images().len().saturating_sub(1);
            app.gallery_selection = (app.gallery_selection + 1).min(max);
        }
        KeyCode::PageUp => {
            app.gallery_selection = app.gallery_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            let max = app.filtered_images().len().saturating_sub(1);
            app.gallery_selection = (app.gallery_selection + PAGE_SCROLL_SIZE).min(max);
        }
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Enter | KeyCode::Char('s') => app.start_slideshow(),
        KeyCode::Char('t') => app.cycle_tag_filter(),
        KeyCode::Char('c') => app.selected.clear(),
        KeyCode::Esc => app.navigate(Route::Home),
        _ => {
            handle_global_key(app, key);
        }
    }
    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Submit,
                LoginFocus::Submit => LoginFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Submit,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Submit => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.login_focus = LoginFocus::Submit,
            LoginFocus::Submit => {
                // Failure stays on the form with the error rendered
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Submit => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => push_limited(&mut app.login_username, c, MAX_USERNAME_LENGTH),
            LoginFocus::Password => push_limited(&mut app.login_password, c, MAX_PASSWORD_LENGTH),
            LoginFocus::Submit => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Tab | KeyCode::Down => {
            app.register_focus = match app.register_focus {
                RegisterFocus::Username => RegisterFocus::Email,
                RegisterFocus::Email => RegisterFocus::Password,
                RegisterFocus::Password => RegisterFocus::Submit,
                RegisterFocus::Submit => RegisterFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.register_focus = match app.register_focus {
                RegisterFocus::Username => RegisterFocus::Submit,
                RegisterFocus::Email => RegisterFocus::Username,
                RegisterFocus::Password => RegisterFocus::Email,
                RegisterFocus::Submit => RegisterFocus::Password,
            };
        }
        KeyCode::Enter => match app.register_focus {
            RegisterFocus::Username => app.register_focus = RegisterFocus::Email,
            RegisterFocus::Email => app.register_focus = RegisterFocus::Password,
            RegisterFocus::Password => app.register_focus = RegisterFocus::Submit,
            RegisterFocus::Submit => {
                let _ = app.attempt_register().await;
            }
        },
        KeyCode::Backspace => match app.register_focus {
            RegisterFocus::Username => {
                app.register_username.pop();
            }
            RegisterFocus::Email => {
                app.register_email.pop();
            }
            RegisterFocus::Password => {
                app.register_password.pop();
            }
            RegisterFocus::Submit => {}
        },
        KeyCode::Char(c) => match app.register_focus {
            RegisterFocus::Username => {
                push_limited(&mut app.register_username, c, MAX_USERNAME_LENGTH)
            }
            RegisterFocus::Email => push_limited(&mut app.register_email, c, MAX_EMAIL_LENGTH),
            RegisterFocus::Password => {
                push_limited(&mut app.register_password, c, MAX_PASSWORD_LENGTH)
            }
            RegisterFocus::Submit => {}
        },
        _ => {}
    }
    Ok(false)
}

fn push_limited(field: &mut String, c: char, max_len: usize) {
    if field.chars().count() < max_len {
        field.push(c);
    }
}
